//! Revenue over time and per-product breakdowns.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use pulse_core::range::DateRangeFilter;
use pulse_core::types::Purchase;
use serde::{Deserialize, Serialize};

use crate::calendar::days_in_range;
use crate::grouping::{group_by, ratio};
use crate::summary::total_revenue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    /// Distinct purchasers that day.
    pub member_count: usize,
    pub average_revenue_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_id: String,
    pub product_name: String,
    pub total_revenue: f64,
    pub total_purchases: usize,
    pub unique_customers: usize,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub by_product: Vec<ProductPerformance>,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub purchase_count: usize,
}

/// One point per calendar day in `range`; purchases outside it are ignored.
pub fn compute_daily_revenue(
    purchases: &[Purchase],
    range: &DateRangeFilter,
) -> Vec<DailyRevenuePoint> {
    let mut by_day: HashMap<NaiveDate, (f64, HashSet<&str>)> = HashMap::new();
    for p in purchases {
        let day = p.purchased_at.date_naive();
        if !range.contains_day(day) {
            continue;
        }
        let entry = by_day.entry(day).or_default();
        entry.0 += p.amount.value();
        entry.1.insert(p.member_id.as_str());
    }

    days_in_range(range)
        .into_iter()
        .map(|day| {
            let (revenue, buyers) = by_day
                .get(&day)
                .map(|(revenue, buyers)| (*revenue, buyers.len()))
                .unwrap_or((0.0, 0));
            DailyRevenuePoint {
                date: day,
                revenue,
                member_count: buyers,
                average_revenue_per_user: ratio(revenue, buyers as f64),
            }
        })
        .collect()
}

/// Per-product totals, highest revenue first. Ties keep first-seen order.
/// The product name comes from the product's first purchase.
pub fn compute_product_performance(purchases: &[Purchase]) -> Vec<ProductPerformance> {
    let mut products: Vec<ProductPerformance> = group_by(purchases, |p| p.product_id.clone())
        .into_iter()
        .map(|(product_id, rows)| {
            let revenue: f64 = rows.iter().map(|p| p.amount.value()).sum();
            let customers: HashSet<&str> = rows.iter().map(|p| p.member_id.as_str()).collect();
            ProductPerformance {
                product_name: rows[0].product_name.clone(),
                product_id,
                total_revenue: revenue,
                total_purchases: rows.len(),
                unique_customers: customers.len(),
                average_order_value: ratio(revenue, rows.len() as f64),
            }
        })
        .collect();

    products.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    products
}

pub fn top_products(purchases: &[Purchase], limit: usize) -> Vec<ProductPerformance> {
    let mut products = compute_product_performance(purchases);
    products.truncate(limit);
    products
}

pub fn average_order_value(purchases: &[Purchase]) -> f64 {
    ratio(total_revenue(purchases), purchases.len() as f64)
}

pub fn compute_revenue_breakdown(purchases: &[Purchase]) -> RevenueBreakdown {
    RevenueBreakdown {
        by_product: compute_product_performance(purchases),
        total_revenue: total_revenue(purchases),
        average_order_value: average_order_value(purchases),
        purchase_count: purchases.len(),
    }
}

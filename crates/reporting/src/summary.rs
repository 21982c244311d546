//! Headline numbers for the dashboard's KPI cards.

use chrono::{DateTime, Duration, Utc};
use pulse_core::types::{Member, Purchase};
use serde::{Deserialize, Serialize};

use crate::grouping::{percentage, ratio};

/// Trailing window used for MRR and growth rate.
pub const TRAILING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_members: usize,
    pub active_members: usize,
    pub churned_members: usize,
    pub total_revenue: f64,
    pub average_lifetime_value: f64,
    /// Purchases in the trailing 30 days, not a subscription recurrence.
    pub monthly_recurring_revenue: f64,
    pub churn_rate: f64,
    /// Month-over-month change in new members, percent.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeValueStats {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

pub fn total_revenue(purchases: &[Purchase]) -> f64 {
    purchases.iter().map(|p| p.amount.value()).sum()
}

/// Percent change from `previous` to `current`. A zero baseline reads as
/// 100% growth when anything arrived and 0 otherwise.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Compute the KPI summary. `now` anchors the trailing windows.
pub fn compute_metrics_summary(
    members: &[Member],
    purchases: &[Purchase],
    now: DateTime<Utc>,
) -> MetricsSummary {
    let total_members = members.len();
    let active_members = members.iter().filter(|m| m.is_active()).count();
    let churned_members = members.iter().filter(|m| m.is_churned()).count();

    let lifetime_total: f64 = members.iter().map(|m| m.lifetime_value.value()).sum();

    let window_start = now - Duration::days(TRAILING_WINDOW_DAYS);
    let previous_start = window_start - Duration::days(TRAILING_WINDOW_DAYS);

    let monthly_recurring_revenue = purchases
        .iter()
        .filter(|p| p.purchased_at >= window_start)
        .map(|p| p.amount.value())
        .sum();

    let current_joins = members
        .iter()
        .filter(|m| m.joined_at >= window_start && m.joined_at < now)
        .count();
    let previous_joins = members
        .iter()
        .filter(|m| m.joined_at >= previous_start && m.joined_at < window_start)
        .count();

    MetricsSummary {
        total_members,
        active_members,
        churned_members,
        total_revenue: total_revenue(purchases),
        average_lifetime_value: ratio(lifetime_total, total_members as f64),
        monthly_recurring_revenue,
        churn_rate: percentage(churned_members, total_members),
        growth_rate: percentage_change(current_joins as f64, previous_joins as f64),
    }
}

/// Distribution of stored member lifetime values.
pub fn compute_lifetime_value_stats(members: &[Member]) -> LifetimeValueStats {
    let mut values: Vec<f64> = members.iter().map(|m| m.lifetime_value.value()).collect();
    if values.is_empty() {
        return LifetimeValueStats::default();
    }
    values.sort_by(f64::total_cmp);

    let total: f64 = values.iter().sum();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    LifetimeValueStats {
        average: total / values.len() as f64,
        median,
        min: values[0],
        max: values[values.len() - 1],
        total,
    }
}

/// Spend divided by acquired customers, 0 when nobody was acquired.
pub fn customer_acquisition_cost(marketing_spend: f64, new_customers: usize) -> f64 {
    ratio(marketing_spend, new_customers as f64)
}

pub fn ltv_to_cac_ratio(average_ltv: f64, cac: f64) -> f64 {
    ratio(average_ltv, cac)
}

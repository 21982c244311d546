//! Member dashboard: every chart and KPI for one company over one date range.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pulse_core::config::AnalyticsConfig;
use pulse_core::range::DateRangeFilter;
use pulse_core::source::MemberDataSource;
use pulse_core::types::{Dataset, EngagementRecord, Purchase};
use pulse_core::PulseResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::churn::{compute_churn_by_month, ChurnPeriod};
use crate::cohort::{
    compute_cohort_retention, compute_ltv_by_cohort, CohortRetentionPoint, CohortValuePoint,
};
use crate::engagement::{compute_engagement_summary, EngagementScoring, EngagementSummary};
use crate::growth::{compute_daily_growth, DailyGrowthPoint};
use crate::revenue::{
    compute_daily_revenue, compute_revenue_breakdown, top_products, DailyRevenuePoint,
    ProductPerformance, RevenueBreakdown,
};
use crate::summary::{
    compute_lifetime_value_stats, compute_metrics_summary, LifetimeValueStats, MetricsSummary,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub scoring: EngagementScoring,
    pub top_products_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for DashboardSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            scoring: EngagementScoring::from(config),
            top_products_limit: config.top_products_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub company_id: String,
    pub range: DateRangeFilter,
    pub reference_instant: DateTime<Utc>,
    pub summary: MetricsSummary,
    pub lifetime_value: LifetimeValueStats,
    pub growth: Vec<DailyGrowthPoint>,
    pub revenue: Vec<DailyRevenuePoint>,
    /// Purchases inside the range only.
    pub revenue_breakdown: RevenueBreakdown,
    pub top_products: Vec<ProductPerformance>,
    /// Engagement records inside the range only.
    pub engagement: EngagementSummary,
    pub churn: Vec<ChurnPeriod>,
    pub cohort_retention: Vec<CohortRetentionPoint>,
    pub cohort_value: Vec<CohortValuePoint>,
}

/// Run every aggregation over one company's rows. Summary, lifetime value,
/// and cohort figures cover the full history; the breakdowns and the
/// engagement summary see only rows inside `range`.
pub fn build_dashboard(
    company_id: &str,
    data: &Dataset,
    range: &DateRangeFilter,
    now: DateTime<Utc>,
    settings: &DashboardSettings,
) -> DashboardSnapshot {
    let purchases_in_range: Vec<Purchase> = data
        .purchases
        .iter()
        .filter(|p| range.contains(p.purchased_at))
        .cloned()
        .collect();
    let engagement_in_range: Vec<EngagementRecord> = data
        .engagement
        .iter()
        .filter(|e| range.contains_day(e.date))
        .cloned()
        .collect();

    DashboardSnapshot {
        company_id: company_id.to_string(),
        range: *range,
        reference_instant: now,
        summary: compute_metrics_summary(&data.members, &data.purchases, now),
        lifetime_value: compute_lifetime_value_stats(&data.members),
        growth: compute_daily_growth(&data.members, range),
        revenue: compute_daily_revenue(&data.purchases, range),
        revenue_breakdown: compute_revenue_breakdown(&purchases_in_range),
        top_products: top_products(&purchases_in_range, settings.top_products_limit),
        engagement: compute_engagement_summary(&engagement_in_range, range, &settings.scoring),
        churn: compute_churn_by_month(&data.members, range),
        cohort_retention: compute_cohort_retention(&data.members),
        cohort_value: compute_ltv_by_cohort(&data.members, &data.purchases),
    }
}

/// Dashboard bound to a data source.
pub struct MemberDashboard {
    source: Arc<dyn MemberDataSource>,
    settings: DashboardSettings,
}

impl MemberDashboard {
    pub fn new(source: Arc<dyn MemberDataSource>, settings: DashboardSettings) -> Self {
        info!(
            top_products_limit = settings.top_products_limit,
            normalization = settings.scoring.normalization,
            "Member dashboard initialized"
        );
        Self { source, settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Fetch the company's rows and build a snapshot anchored at `now`.
    pub fn snapshot(
        &self,
        company_id: &str,
        range: &DateRangeFilter,
        now: DateTime<Utc>,
    ) -> PulseResult<DashboardSnapshot> {
        let data = self.source.dataset(company_id)?;
        debug!(
            company_id,
            members = data.members.len(),
            purchases = data.purchases.len(),
            engagement = data.engagement.len(),
            start = %range.start_date,
            end = %range.end_date,
            "Building dashboard snapshot"
        );

        let snapshot = build_dashboard(company_id, &data, range, now, &self.settings);
        debug!(
            company_id,
            engagement_score = snapshot.engagement.engagement_score,
            trend = snapshot.engagement.trend.as_str(),
            "Dashboard snapshot ready"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pulse_core::source::InMemorySource;
    use pulse_core::types::{Member, MemberStatus};

    fn now() -> DateTime<Utc> {
        "2024-08-31T18:00:00Z".parse().unwrap()
    }

    fn dataset() -> Dataset {
        let member = |id: &str, joined: &str, status| Member {
            id: id.into(),
            company_id: "acme".into(),
            email: None,
            name: None,
            joined_at: joined.parse().unwrap(),
            status,
            lifetime_value: "25".into(),
            updated_at: None,
        };
        let purchase = |id: &str, product: &str, amount: f64, at: &str| Purchase {
            id: id.into(),
            company_id: "acme".into(),
            member_id: "m1".into(),
            product_id: product.into(),
            product_name: product.to_uppercase(),
            amount: amount.into(),
            currency: "USD".into(),
            purchased_at: at.parse().unwrap(),
        };
        Dataset {
            members: vec![
                member("m1", "2024-06-10T00:00:00Z", MemberStatus::Active),
                member("m2", "2024-08-20T00:00:00Z", MemberStatus::Churned),
            ],
            purchases: vec![
                purchase("p1", "a", 40.0, "2024-08-25T10:00:00Z"),
                purchase("p2", "b", 15.0, "2024-05-01T10:00:00Z"),
            ],
            engagement: vec![EngagementRecord {
                member_id: "m1".into(),
                company_id: "acme".into(),
                date: NaiveDate::from_ymd_opt(2024, 8, 30).unwrap(),
                messages_sent: 4,
                messages_received: 4,
                interactions: 2,
            }],
        }
    }

    fn range() -> DateRangeFilter {
        DateRangeFilter::from_days(
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_dashboard_scopes_breakdowns_to_range() {
        let snap = build_dashboard("acme", &dataset(), &range(), now(), &DashboardSettings::default());
        assert_eq!(snap.summary.total_members, 2);
        assert_eq!(snap.summary.total_revenue, 55.0);
        assert_eq!(snap.revenue_breakdown.total_revenue, 40.0);
        assert_eq!(snap.revenue_breakdown.purchase_count, 1);
        assert_eq!(snap.top_products.len(), 1);
        assert_eq!(snap.top_products[0].product_name, "A");
        assert_eq!(snap.growth.len(), 31);
        assert_eq!(snap.revenue.len(), 31);
        assert_eq!(snap.engagement.daily.len(), 31);
        assert_eq!(snap.engagement.total_messages, 8);
        assert_eq!(snap.churn.len(), 1);
        assert_eq!(snap.cohort_retention.len(), 2);
        assert_eq!(snap.lifetime_value.total, 50.0);
    }

    #[test]
    fn test_snapshot_through_source() {
        let source = Arc::new(InMemorySource::new(dataset()));
        let dashboard = MemberDashboard::new(source, DashboardSettings::default());
        let snap = dashboard.snapshot("acme", &range(), now()).unwrap();
        assert_eq!(snap.company_id, "acme");
        assert_eq!(snap.reference_instant, now());
        assert_eq!(
            snap,
            build_dashboard("acme", &dataset(), &range(), now(), dashboard.settings())
        );

        let empty = dashboard.snapshot("nobody", &range(), now()).unwrap();
        assert_eq!(empty.summary.total_members, 0);
        assert!(empty.cohort_retention.is_empty());
        assert_eq!(empty.growth.len(), 31);
    }

    #[test]
    fn test_settings_from_config() {
        let config = AnalyticsConfig {
            top_products_limit: 3,
            engagement_normalization: 10.0,
            ..AnalyticsConfig::default()
        };
        let settings = DashboardSettings::from(&config);
        assert_eq!(settings.top_products_limit, 3);
        assert_eq!(settings.scoring.normalization, 10.0);
        assert_eq!(settings.scoring.trend_threshold_pct, 5.0);
    }

    #[test]
    fn test_default_settings_match_config_defaults() {
        let config = AnalyticsConfig::default();
        let settings = DashboardSettings::default();
        assert_eq!(settings, DashboardSettings::from(&config));
        assert_eq!(settings.top_products_limit, config.top_products_limit);
        assert_eq!(settings.scoring, EngagementScoring::default());
        assert_eq!(settings.scoring.normalization, config.engagement_normalization);
    }
}

//! Member analytics aggregation: growth, revenue, churn, engagement, and
//! cohort metrics derived from raw member, purchase, and engagement rows.
//!
//! Every `compute_*` function is pure. Functions that need "now" take it as
//! an argument.

pub mod calendar;
pub mod churn;
pub mod cohort;
pub mod dashboard;
pub mod engagement;
pub mod export;
pub mod grouping;
pub mod growth;
pub mod revenue;
pub mod summary;

pub use churn::{compute_churn_by_month, ChurnPeriod};
pub use cohort::{compute_cohort_retention, compute_ltv_by_cohort, CohortRetentionPoint, CohortValuePoint};
pub use dashboard::{build_dashboard, DashboardSettings, DashboardSnapshot, MemberDashboard};
pub use engagement::{
    compute_daily_engagement, compute_engagement_summary, DailyEngagementPoint, EngagementScoring,
    EngagementSummary, Trend,
};
pub use export::{ReportSection, ReportTable, Tabular};
pub use growth::{compute_daily_growth, DailyGrowthPoint};
pub use revenue::{
    average_order_value, compute_daily_revenue, compute_product_performance, compute_revenue_breakdown,
    top_products, DailyRevenuePoint, ProductPerformance, RevenueBreakdown,
};
pub use summary::{
    compute_lifetime_value_stats, compute_metrics_summary, customer_acquisition_cost, ltv_to_cac_ratio,
    percentage_change, LifetimeValueStats, MetricsSummary,
};

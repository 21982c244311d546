//! Tabular projection of dashboard output, plus CSV and JSON renderings for
//! the export endpoint. PDF rendering lives with the caller.

use std::str::FromStr;

use pulse_core::config::ExportFormat;
use pulse_core::types::{EngagementRecord, Member, Purchase};
use pulse_core::{PulseError, PulseResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::churn::ChurnPeriod;
use crate::cohort::{CohortRetentionPoint, CohortValuePoint};
use crate::dashboard::DashboardSnapshot;
use crate::engagement::DailyEngagementPoint;
use crate::growth::DailyGrowthPoint;
use crate::revenue::{DailyRevenuePoint, ProductPerformance};
use crate::summary::MetricsSummary;

/// A record that can be laid out as one table row.
pub trait Tabular {
    fn columns() -> &'static [&'static str];
    /// Values in `columns()` order.
    fn row(&self) -> Vec<Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ReportTable {
    pub fn from_records<T: Tabular>(records: &[T]) -> Self {
        Self {
            columns: T::columns().iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(T::row).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header line plus one line per row. Strings are quoted with embedded
    /// quotes doubled; numbers are bare; null is empty.
    pub fn to_csv(&self) -> String {
        let mut csv = self.columns.join(",");
        csv.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|v| match v {
                    Value::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }

    /// Array of column-to-value objects.
    pub fn to_json(&self) -> PulseResult<String> {
        let records: Vec<serde_json::Map<String, Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn render(&self, format: ExportFormat) -> PulseResult<String> {
        match format {
            ExportFormat::Csv => Ok(self.to_csv()),
            ExportFormat::Json => self.to_json(),
        }
    }
}

/// Exportable slices of a dashboard snapshot, and the raw row sets the
/// export endpoint also offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Summary,
    Growth,
    Revenue,
    Engagement,
    Products,
    Churn,
    Cohorts,
    CohortValue,
    Members,
    Purchases,
    EngagementRecords,
}

impl ReportSection {
    pub const ALL: [ReportSection; 11] = [
        ReportSection::Summary,
        ReportSection::Growth,
        ReportSection::Revenue,
        ReportSection::Engagement,
        ReportSection::Products,
        ReportSection::Churn,
        ReportSection::Cohorts,
        ReportSection::CohortValue,
        ReportSection::Members,
        ReportSection::Purchases,
        ReportSection::EngagementRecords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSection::Summary => "summary",
            ReportSection::Growth => "growth",
            ReportSection::Revenue => "revenue",
            ReportSection::Engagement => "engagement",
            ReportSection::Products => "products",
            ReportSection::Churn => "churn",
            ReportSection::Cohorts => "cohorts",
            ReportSection::CohortValue => "cohort_value",
            ReportSection::Members => "members",
            ReportSection::Purchases => "purchases",
            ReportSection::EngagementRecords => "engagement_records",
        }
    }

    /// Raw row sections are not part of a snapshot.
    pub fn is_raw(&self) -> bool {
        matches!(
            self,
            ReportSection::Members | ReportSection::Purchases | ReportSection::EngagementRecords
        )
    }
}

impl FromStr for ReportSection {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| PulseError::UnknownSection(s.to_string()))
    }
}

impl DashboardSnapshot {
    /// Table for one snapshot section. Raw row sections yield `None`.
    pub fn table(&self, section: ReportSection) -> Option<ReportTable> {
        let table = match section {
            ReportSection::Summary => ReportTable::from_records(std::slice::from_ref(&self.summary)),
            ReportSection::Growth => ReportTable::from_records(&self.growth),
            ReportSection::Revenue => ReportTable::from_records(&self.revenue),
            ReportSection::Engagement => ReportTable::from_records(&self.engagement.daily),
            ReportSection::Products => ReportTable::from_records(&self.revenue_breakdown.by_product),
            ReportSection::Churn => ReportTable::from_records(&self.churn),
            ReportSection::Cohorts => ReportTable::from_records(&self.cohort_retention),
            ReportSection::CohortValue => ReportTable::from_records(&self.cohort_value),
            ReportSection::Members | ReportSection::Purchases | ReportSection::EngagementRecords => {
                return None
            }
        };
        Some(table)
    }
}

impl Tabular for MetricsSummary {
    fn columns() -> &'static [&'static str] {
        &[
            "total_members",
            "active_members",
            "churned_members",
            "total_revenue",
            "average_lifetime_value",
            "monthly_recurring_revenue",
            "churn_rate",
            "growth_rate",
        ]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.total_members),
            json!(self.active_members),
            json!(self.churned_members),
            json!(self.total_revenue),
            json!(self.average_lifetime_value),
            json!(self.monthly_recurring_revenue),
            json!(self.churn_rate),
            json!(self.growth_rate),
        ]
    }
}

impl Tabular for DailyGrowthPoint {
    fn columns() -> &'static [&'static str] {
        &["date", "new_members", "total_members", "active_members", "churned_members"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.date),
            json!(self.new_members),
            json!(self.total_members),
            json!(self.active_members),
            json!(self.churned_members),
        ]
    }
}

impl Tabular for DailyRevenuePoint {
    fn columns() -> &'static [&'static str] {
        &["date", "revenue", "member_count", "average_revenue_per_user"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.date),
            json!(self.revenue),
            json!(self.member_count),
            json!(self.average_revenue_per_user),
        ]
    }
}

impl Tabular for DailyEngagementPoint {
    fn columns() -> &'static [&'static str] {
        &[
            "date",
            "total_messages",
            "total_interactions",
            "active_users",
            "average_engagement_per_user",
        ]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.date),
            json!(self.total_messages),
            json!(self.total_interactions),
            json!(self.active_users),
            json!(self.average_engagement_per_user),
        ]
    }
}

impl Tabular for ProductPerformance {
    fn columns() -> &'static [&'static str] {
        &[
            "product_id",
            "product_name",
            "total_revenue",
            "total_purchases",
            "unique_customers",
            "average_order_value",
        ]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.product_id),
            json!(self.product_name),
            json!(self.total_revenue),
            json!(self.total_purchases),
            json!(self.unique_customers),
            json!(self.average_order_value),
        ]
    }
}

impl Tabular for ChurnPeriod {
    fn columns() -> &'static [&'static str] {
        &["period", "total_members", "churned_members", "churn_rate", "retention_rate"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.period),
            json!(self.total_members),
            json!(self.churned_members),
            json!(self.churn_rate),
            json!(self.retention_rate),
        ]
    }
}

impl Tabular for CohortRetentionPoint {
    fn columns() -> &'static [&'static str] {
        &["cohort", "total_members", "active_members", "retention_rate"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.cohort),
            json!(self.total_members),
            json!(self.active_members),
            json!(self.retention_rate),
        ]
    }
}

impl Tabular for CohortValuePoint {
    fn columns() -> &'static [&'static str] {
        &["cohort", "member_count", "total_revenue", "average_ltv"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.cohort),
            json!(self.member_count),
            json!(self.total_revenue),
            json!(self.average_ltv),
        ]
    }
}

// Raw row exports keep the column sets the dashboard's export button used.

impl Tabular for Member {
    fn columns() -> &'static [&'static str] {
        &["id", "email", "name", "status", "joined_at", "lifetime_value"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.id),
            json!(self.email),
            json!(self.name),
            json!(self.status.as_str()),
            json!(self.joined_at.to_rfc3339()),
            json!(self.lifetime_value.value()),
        ]
    }
}

impl Tabular for Purchase {
    fn columns() -> &'static [&'static str] {
        &["id", "product_name", "amount", "currency", "purchased_at"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.id),
            json!(self.product_name),
            json!(self.amount.value()),
            json!(self.currency),
            json!(self.purchased_at.to_rfc3339()),
        ]
    }
}

impl Tabular for EngagementRecord {
    fn columns() -> &'static [&'static str] {
        &["member_id", "date", "messages_sent", "messages_received", "interactions"]
    }

    fn row(&self) -> Vec<Value> {
        vec![
            json!(self.member_id),
            json!(self.date),
            json!(self.messages_sent),
            json!(self.messages_received),
            json!(self.interactions),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product(id: &str, name: &str, revenue: f64) -> ProductPerformance {
        ProductPerformance {
            product_id: id.into(),
            product_name: name.into(),
            total_revenue: revenue,
            total_purchases: 2,
            unique_customers: 1,
            average_order_value: revenue / 2.0,
        }
    }

    #[test]
    fn test_csv_quotes_strings() {
        let table = ReportTable::from_records(&[
            product("p1", "The \"Pro\" plan", 50.0),
            product("p2", "Starter", 10.5),
        ]);
        let csv = table.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "product_id,product_name,total_revenue,total_purchases,unique_customers,average_order_value"
        );
        assert_eq!(lines[1], "\"p1\",\"The \"\"Pro\"\" plan\",50.0,2,1,25.0");
        assert_eq!(lines[2], "\"p2\",\"Starter\",10.5,2,1,5.25");
    }

    #[test]
    fn test_json_keeps_columns() {
        let point = DailyGrowthPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            new_members: 1,
            total_members: 4,
            active_members: 3,
            churned_members: 1,
        };
        let json = ReportTable::from_records(&[point]).render(ExportFormat::Json).unwrap();
        let parsed: Vec<serde_json::Map<String, Value>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["date"], json!("2024-01-02"));
        assert_eq!(parsed[0]["total_members"], json!(4));
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let table = ReportTable::from_records::<ChurnPeriod>(&[]);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.to_csv(), "period,total_members,churned_members,churn_rate,retention_rate\n");
        assert_eq!(table.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_member_row_nulls_render_empty() {
        let member: Member = serde_json::from_str(
            r#"{"id": "m1", "joined_at": "2024-03-01T10:00:00Z", "status": "paused",
                "lifetime_value": "12.5"}"#,
        )
        .unwrap();
        let csv = ReportTable::from_records(&[member]).to_csv();
        assert_eq!(
            csv.lines().nth(1),
            Some("\"m1\",,,\"paused\",\"2024-03-01T10:00:00+00:00\",12.5")
        );
    }

    #[test]
    fn test_section_names_round_trip() {
        for section in ReportSection::ALL {
            assert_eq!(section.as_str().parse::<ReportSection>().unwrap(), section);
        }
        assert!(matches!(
            "heatmap".parse::<ReportSection>(),
            Err(PulseError::UnknownSection(_))
        ));
    }
}

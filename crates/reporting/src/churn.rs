//! Monthly churn analysis.

use pulse_core::range::DateRangeFilter;
use pulse_core::types::Member;
use serde::{Deserialize, Serialize};

use crate::calendar::months_in_range;
use crate::grouping::percentage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPeriod {
    /// e.g. `Mar 2024`.
    pub period: String,
    /// Members who had joined by the first instant of the month.
    pub total_members: usize,
    pub churned_members: usize,
    pub churn_rate: f64,
    pub retention_rate: f64,
}

/// One period per calendar month the range touches. A member counts as
/// churned in a month when their status is churned and their last update
/// falls inside it; earlier churn events are not recoverable.
pub fn compute_churn_by_month(members: &[Member], range: &DateRangeFilter) -> Vec<ChurnPeriod> {
    months_in_range(range)
        .into_iter()
        .map(|month| {
            let at_start: Vec<&Member> = members
                .iter()
                .filter(|m| m.joined_at <= month.start)
                .collect();
            let churned_members = at_start
                .iter()
                .filter(|m| m.is_churned() && m.updated_at.is_some_and(|u| month.contains(u)))
                .count();

            let total_members = at_start.len();
            let churn_rate = percentage(churned_members, total_members);
            ChurnPeriod {
                period: month.label(),
                total_members,
                churned_members,
                churn_rate,
                retention_rate: 100.0 - churn_rate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use pulse_core::types::MemberStatus;

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn member(joined: &str, status: MemberStatus, updated: Option<&str>) -> Member {
        Member {
            id: format!("m-{joined}"),
            company_id: "acme".into(),
            email: None,
            name: None,
            joined_at: at(joined),
            status,
            lifetime_value: Default::default(),
            updated_at: updated.map(at),
        }
    }

    fn range(first: (i32, u32, u32), last: (i32, u32, u32)) -> DateRangeFilter {
        DateRangeFilter::from_days(
            NaiveDate::from_ymd_opt(first.0, first.1, first.2).unwrap(),
            NaiveDate::from_ymd_opt(last.0, last.1, last.2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_churn_per_month() {
        let members = vec![
            member("2024-01-05T00:00:00Z", MemberStatus::Churned, Some("2024-03-31T23:00:00Z")),
            member("2024-01-20T00:00:00Z", MemberStatus::Active, None),
            member("2024-02-10T00:00:00Z", MemberStatus::Churned, Some("2024-04-02T00:00:00Z")),
            member("2024-03-15T00:00:00Z", MemberStatus::Churned, None),
        ];
        let periods = compute_churn_by_month(&members, &range((2024, 2, 15), (2024, 4, 1)));

        let labels: Vec<&str> = periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["Feb 2024", "Mar 2024", "Apr 2024"]);

        assert_eq!(periods[0].total_members, 2);
        assert_eq!(periods[0].churned_members, 0);
        assert_eq!(periods[0].retention_rate, 100.0);

        assert_eq!(periods[1].total_members, 3);
        assert_eq!(periods[1].churned_members, 1);

        assert_eq!(periods[2].total_members, 4);
        assert_eq!(periods[2].churned_members, 1);
        assert_eq!(periods[2].churn_rate, 25.0);
        assert_eq!(periods[2].retention_rate, 75.0);
    }

    #[test]
    fn test_no_members_is_full_retention() {
        let periods = compute_churn_by_month(&[], &range((2024, 1, 1), (2024, 1, 31)));
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].churn_rate, 0.0);
        assert_eq!(periods[0].retention_rate, 100.0);
    }

    #[test]
    fn test_join_after_month_start_not_counted() {
        let members = vec![member(
            "2024-05-01T00:00:01Z",
            MemberStatus::Churned,
            Some("2024-05-20T00:00:00Z"),
        )];
        let periods = compute_churn_by_month(&members, &range((2024, 5, 1), (2024, 5, 31)));
        assert_eq!(periods[0].total_members, 0);
        assert_eq!(periods[0].churned_members, 0);
    }
}

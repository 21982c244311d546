//! Daily member growth series.

use chrono::NaiveDate;
use pulse_core::range::DateRangeFilter;
use pulse_core::types::Member;
use serde::{Deserialize, Serialize};

use crate::calendar::days_in_range;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGrowthPoint {
    pub date: NaiveDate,
    pub new_members: usize,
    /// Members whose join date is on or before `date`.
    pub total_members: usize,
    /// Among `total_members`, by current status (status is not historized).
    pub active_members: usize,
    pub churned_members: usize,
}

/// One point per calendar day in `range`. Membership is cumulative by join
/// date; the active/churned split uses each member's status as of now, not
/// as it was on that day.
pub fn compute_daily_growth(members: &[Member], range: &DateRangeFilter) -> Vec<DailyGrowthPoint> {
    let mut joined: Vec<&Member> = members.iter().collect();
    joined.sort_by_key(|m| m.joined_at.date_naive());

    let mut cursor = 0;
    let (mut total, mut active, mut churned) = (0, 0, 0);

    days_in_range(range)
        .into_iter()
        .map(|day| {
            let mut new_members = 0;
            while let Some(m) = joined.get(cursor) {
                let join_day = m.joined_at.date_naive();
                if join_day > day {
                    break;
                }
                if join_day == day {
                    new_members += 1;
                }
                total += 1;
                if m.is_active() {
                    active += 1;
                }
                if m.is_churned() {
                    churned += 1;
                }
                cursor += 1;
            }

            DailyGrowthPoint {
                date: day,
                new_members,
                total_members: total,
                active_members: active,
                churned_members: churned,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use pulse_core::types::MemberStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 20).unwrap()
    }

    fn member(id: &str, joined_at: DateTime<Utc>, status: MemberStatus) -> Member {
        Member {
            id: id.into(),
            company_id: "acme".into(),
            email: None,
            name: None,
            joined_at,
            status,
            lifetime_value: Default::default(),
            updated_at: None,
        }
    }

    fn on(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        day.and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    #[test]
    fn test_join_before_range_is_never_new() {
        let members = vec![member("m1", on(today() - Duration::days(40), 9), MemberStatus::Active)];
        let range = DateRangeFilter::from_days(today() - Duration::days(10), today()).unwrap();
        let points = compute_daily_growth(&members, &range);
        assert_eq!(points.len(), 11);
        assert!(points.iter().all(|p| p.total_members == 1 && p.new_members == 0));
        assert!(points.iter().all(|p| p.active_members == 1));
    }

    #[test]
    fn test_cumulative_counts() {
        let d0 = today() - Duration::days(2);
        let members = vec![
            member("m1", on(d0, 23), MemberStatus::Active),
            member("m2", on(today(), 1), MemberStatus::Churned),
            member("m3", on(d0, 0), MemberStatus::Paused),
            member("m4", on(today() + Duration::days(3), 0), MemberStatus::Active),
        ];
        let range = DateRangeFilter::from_days(d0, today()).unwrap();
        let points = compute_daily_growth(&members, &range);

        let totals: Vec<usize> = points.iter().map(|p| p.total_members).collect();
        let new: Vec<usize> = points.iter().map(|p| p.new_members).collect();
        assert_eq!(totals, vec![2, 2, 3]);
        assert_eq!(new, vec![2, 0, 1]);
        assert_eq!(points[2].churned_members, 1);
        assert_eq!(points[2].active_members, 1);
    }

    #[test]
    fn test_empty_members_still_fill_days() {
        let range = DateRangeFilter::from_days(today() - Duration::days(6), today()).unwrap();
        let points = compute_daily_growth(&[], &range);
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.total_members == 0));
        assert_eq!(points[0].date, today() - Duration::days(6));
    }
}

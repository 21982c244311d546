//! Cohort analysis: join-month retention and lifetime value.

use std::collections::{HashMap, HashSet};

use pulse_core::types::{Member, Purchase};
use serde::{Deserialize, Serialize};

use crate::calendar::month_key;
use crate::grouping::{group_by, percentage, ratio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRetentionPoint {
    /// Join month, `YYYY-MM`.
    pub cohort: String,
    pub total_members: usize,
    pub active_members: usize,
    pub retention_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortValuePoint {
    pub cohort: String,
    pub member_count: usize,
    pub total_revenue: f64,
    pub average_ltv: f64,
}

fn cohorts(members: &[Member]) -> Vec<(String, Vec<&Member>)> {
    let mut groups = group_by(members, |m| month_key(m.joined_at));
    // zero-padded keys sort chronologically
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// Share of each join-month cohort that is still active today.
pub fn compute_cohort_retention(members: &[Member]) -> Vec<CohortRetentionPoint> {
    cohorts(members)
        .into_iter()
        .map(|(cohort, rows)| {
            let active_members = rows.iter().filter(|m| m.is_active()).count();
            CohortRetentionPoint {
                cohort,
                total_members: rows.len(),
                active_members,
                retention_rate: percentage(active_members, rows.len()),
            }
        })
        .collect()
}

/// Purchase revenue attributed to each join-month cohort, per member.
pub fn compute_ltv_by_cohort(members: &[Member], purchases: &[Purchase]) -> Vec<CohortValuePoint> {
    let mut spend: HashMap<&str, f64> = HashMap::new();
    for p in purchases {
        *spend.entry(p.member_id.as_str()).or_default() += p.amount.value();
    }

    cohorts(members)
        .into_iter()
        .map(|(cohort, rows)| {
            let mut seen: HashSet<&str> = HashSet::new();
            let total_revenue: f64 = rows
                .iter()
                .filter(|m| seen.insert(m.id.as_str()))
                .filter_map(|m| spend.get(m.id.as_str()))
                .sum();
            CohortValuePoint {
                cohort,
                member_count: rows.len(),
                total_revenue,
                average_ltv: ratio(total_revenue, rows.len() as f64),
            }
        })
        .collect()
}

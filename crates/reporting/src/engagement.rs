//! Engagement series, scoring, and trend detection.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use pulse_core::config::AnalyticsConfig;
use pulse_core::range::DateRangeFilter;
use pulse_core::types::EngagementRecord;
use serde::{Deserialize, Serialize};

use crate::calendar::days_in_range;
use crate::grouping::{average, ratio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEngagementPoint {
    pub date: NaiveDate,
    /// Sent plus received.
    pub total_messages: u64,
    pub total_interactions: u64,
    /// Number of records for the day, one per member by contract.
    pub active_users: usize,
    pub average_engagement_per_user: f64,
}

impl DailyEngagementPoint {
    fn activity(&self) -> f64 {
        (self.total_messages + self.total_interactions) as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

/// Heuristic constants behind the engagement score and trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementScoring {
    /// Per-user activity that maps to a score of 100.
    pub normalization: f64,
    /// Percent change between halves needed to leave `Flat`. Strict.
    pub trend_threshold_pct: f64,
}

impl Default for EngagementScoring {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

impl From<&AnalyticsConfig> for EngagementScoring {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            normalization: config.engagement_normalization,
            trend_threshold_pct: config.trend_threshold_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    /// 0 to 100.
    pub engagement_score: f64,
    pub trend: Trend,
    pub total_messages: u64,
    pub total_interactions: u64,
    /// Distinct members across the whole input. Not the same as the daily
    /// `active_users`, which counts records.
    pub distinct_active_users: usize,
    pub daily: Vec<DailyEngagementPoint>,
}

/// One point per calendar day in `range`.
pub fn compute_daily_engagement(
    records: &[EngagementRecord],
    range: &DateRangeFilter,
) -> Vec<DailyEngagementPoint> {
    let mut by_day: HashMap<NaiveDate, (u64, u64, usize)> = HashMap::new();
    for r in records {
        let entry = by_day.entry(r.date).or_default();
        entry.0 += r.total_messages();
        entry.1 += r.interactions as u64;
        entry.2 += 1;
    }

    days_in_range(range)
        .into_iter()
        .map(|day| {
            let (total_messages, total_interactions, active_users) =
                by_day.get(&day).copied().unwrap_or_default();
            DailyEngagementPoint {
                date: day,
                total_messages,
                total_interactions,
                active_users,
                average_engagement_per_user: ratio(
                    (total_messages + total_interactions) as f64,
                    active_users as f64,
                ),
            }
        })
        .collect()
}

/// Compare the mean daily activity of the second half of the series with the
/// first half (split at `len / 2`). A zero or empty first half is `Flat`.
pub fn detect_trend(daily: &[DailyEngagementPoint], threshold_pct: f64) -> Trend {
    let mid = daily.len() / 2;
    if mid == 0 {
        return Trend::Flat;
    }
    let activity: Vec<f64> = daily.iter().map(DailyEngagementPoint::activity).collect();
    let first = average(&activity[..mid]);
    let second = average(&activity[mid..]);
    if first == 0.0 {
        return Trend::Flat;
    }

    let change_pct = (second - first) * 100.0 / first;
    if change_pct > threshold_pct {
        Trend::Up
    } else if change_pct < -threshold_pct {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Totals and score are computed over every record passed in; only the
/// daily series is limited to `range`.
pub fn compute_engagement_summary(
    records: &[EngagementRecord],
    range: &DateRangeFilter,
    scoring: &EngagementScoring,
) -> EngagementSummary {
    let daily = compute_daily_engagement(records, range);

    let total_messages: u64 = records.iter().map(EngagementRecord::total_messages).sum();
    let total_interactions: u64 = records.iter().map(|r| r.interactions as u64).sum();
    let distinct_active_users = records
        .iter()
        .map(|r| r.member_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let users = distinct_active_users as f64;
    let per_user = ratio(total_messages as f64, users) + ratio(total_interactions as f64, users);
    let engagement_score = ratio(per_user * 100.0, scoring.normalization).min(100.0);

    EngagementSummary {
        engagement_score,
        trend: detect_trend(&daily, scoring.trend_threshold_pct),
        total_messages,
        total_interactions,
        distinct_active_users,
        daily,
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::numeric::Numeric;

/// A community member, scoped to one creator company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub status: MemberStatus,
    #[serde(default)]
    pub lifetime_value: Numeric,
    /// Last status transition. Only the latest change is kept upstream.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Current membership status. Not historized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Churned,
    Paused,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Churned => "churned",
            MemberStatus::Paused => "paused",
        }
    }
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn is_churned(&self) -> bool {
        self.status == MemberStatus::Churned
    }
}

/// A single product purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    #[serde(default)]
    pub company_id: String,
    pub member_id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub amount: Numeric,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub purchased_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Per-member, per-day activity counters. One record per member per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub member_id: String,
    #[serde(default)]
    pub company_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub messages_sent: u32,
    #[serde(default)]
    pub messages_received: u32,
    #[serde(default)]
    pub interactions: u32,
}

impl EngagementRecord {
    pub fn total_messages(&self) -> u64 {
        self.messages_sent as u64 + self.messages_received as u64
    }
}

/// Every row fetched for one or more tenants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub engagement: Vec<EngagementRecord>,
}

//! Data-access seam. The analytics engine never talks to the database; it is
//! handed the collections a [`MemberDataSource`] returns for one company.

use tracing::debug;

use crate::error::PulseResult;
use crate::types::{Dataset, EngagementRecord, Member, Purchase};

/// Trait for fetching tenant-scoped rows. Implementations return every row
/// for the company with no pagination.
pub trait MemberDataSource: Send + Sync {
    fn members(&self, company_id: &str) -> PulseResult<Vec<Member>>;
    fn purchases(&self, company_id: &str) -> PulseResult<Vec<Purchase>>;
    fn engagement(&self, company_id: &str) -> PulseResult<Vec<EngagementRecord>>;

    /// All three collections for one company.
    fn dataset(&self, company_id: &str) -> PulseResult<Dataset> {
        Ok(Dataset {
            members: self.members(company_id)?,
            purchases: self.purchases(company_id)?,
            engagement: self.engagement(company_id)?,
        })
    }
}

/// Source backed by an already-loaded [`Dataset`], e.g. a JSON export.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: Dataset,
}

impl InMemorySource {
    pub fn new(data: Dataset) -> Self {
        Self { data }
    }

    pub fn from_json(raw: &str) -> PulseResult<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }
}

fn record_rows(kind: &'static str, company_id: &str, rows: usize) {
    metrics::counter!("pulse.source.rows", "kind" => kind).increment(rows as u64);
    debug!(kind, company_id, rows, "Loaded rows from data source");
}

impl MemberDataSource for InMemorySource {
    fn members(&self, company_id: &str) -> PulseResult<Vec<Member>> {
        let rows: Vec<Member> = self
            .data
            .members
            .iter()
            .filter(|m| m.company_id == company_id)
            .cloned()
            .collect();
        record_rows("members", company_id, rows.len());
        Ok(rows)
    }

    fn purchases(&self, company_id: &str) -> PulseResult<Vec<Purchase>> {
        let rows: Vec<Purchase> = self
            .data
            .purchases
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect();
        record_rows("purchases", company_id, rows.len());
        Ok(rows)
    }

    fn engagement(&self, company_id: &str) -> PulseResult<Vec<EngagementRecord>> {
        let rows: Vec<EngagementRecord> = self
            .data
            .engagement
            .iter()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect();
        record_rows("engagement", company_id, rows.len());
        Ok(rows)
    }
}

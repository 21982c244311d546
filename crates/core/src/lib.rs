//! Shared data model, configuration, and data-access seams for the member
//! analytics workspace.

pub mod config;
pub mod error;
pub mod numeric;
pub mod range;
pub mod source;
pub mod types;

pub use config::AppConfig;
pub use error::{PulseError, PulseResult};
pub use numeric::{safe_parse_float, Numeric};
pub use range::{DateRangeFilter, DateRangePreset};
pub use source::{InMemorySource, MemberDataSource};
pub use types::{Dataset, EngagementRecord, Member, MemberStatus, Purchase};

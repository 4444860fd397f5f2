//! # Recall Core
//!
//! Shared data model for the recall-lens workspace:
//! - **VehicleIdentification**: the make/model/year a caller asks about
//! - **RecallTable**: the flattened view of an NHTSA `results` array
//! - **YearlyCountSeries**: recalls grouped by the year they were reported
//!
//! Every downstream crate (store, fetcher, charts, chatbot) speaks these types.

pub mod series;
pub mod table;
pub mod vehicle;

pub use series::{parse_report_year, YearlyCountSeries};
pub use table::{Cell, RecallTable, PLACEHOLDER};
pub use vehicle::VehicleIdentification;

/// Result type for data model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating inbound data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a string or a number")]
    InvalidField(&'static str),
}

/// Known NHTSA recall columns used by the charts.
pub mod columns {
    pub const COMPONENT: &str = "Component";
    pub const MANUFACTURER: &str = "Manufacturer";
    pub const CONSEQUENCE: &str = "Consequence";
    pub const SUMMARY: &str = "Summary";
    pub const REMEDY: &str = "Remedy";
    pub const REPORT_RECEIVED_DATE: &str = "ReportReceivedDate";
}

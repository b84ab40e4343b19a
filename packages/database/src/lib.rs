#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report query building and the storage abstraction.
//!
//! [`query`] turns raw filter input into a validated [`ReportQuery`]
//! without touching storage. [`store::ReportStore`] is the interface the
//! server talks to; [`memory::MemoryReportStore`] is the in-process
//! implementation.
//!
//! [`ReportQuery`]: aquawatch_database_models::ReportQuery

pub mod memory;
pub mod query;
pub mod store;

use aquawatch_geography_models::GeoError;

pub use memory::MemoryReportStore;
pub use query::{QueryError, build_report_filter, build_report_query};
pub use store::ReportStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DbError {
    /// A new report had an invalid location.
    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] GeoError),

    /// Input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what went wrong.
        message: String,
    },
}

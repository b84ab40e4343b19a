#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytics over a working set of water-quality reports.
//!
//! Every function here is a pure, synchronous pass over reports that the
//! caller has already fetched from storage. Nothing is cached between
//! calls, so they can run concurrently for independent requests. An empty
//! working set always produces an empty (or zeroed) result.

pub mod duplicates;
pub mod hotspots;
pub mod kpis;

use thiserror::Error;

pub use duplicates::{DUPLICATE_RADIUS_METERS, DayWindow, DuplicateOptions, find_duplicate_groups};
pub use hotspots::{MAX_CELL_SIZE, MIN_CELL_SIZE, clamp_cell_size, compute_hotspots};
pub use kpis::status_counts;

/// Errors that can occur when configuring analytics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Duplicate radius was zero, negative or not finite.
    #[error("Invalid duplicate radius {0} m: must be a positive finite number")]
    InvalidRadius(f64),

    /// UTC offset outside the representable range (+/- 24h, exclusive).
    #[error("Invalid UTC offset {0} minutes")]
    InvalidUtcOffset(i32),
}

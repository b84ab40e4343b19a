#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Uniform-grid spatial bucketing for report maps and analytics.
//!
//! [`grid::bucket_points`] partitions points into square cells keyed by
//! `(floor(lng / cell), floor(lat / cell))`. It is shared by the hotspot
//! aggregation in `aquawatch_analytics` and by the marker clustering in
//! [`markers`], each of which applies its own cell-size policy before
//! calling it. [`zoom::ZoomPolicy`] maps a map zoom level to a cell size.

pub mod grid;
pub mod markers;
pub mod zoom;

pub use grid::{GridKey, bucket_points};
pub use markers::{ClusterItem, cluster_markers, cluster_markers_for_zoom, singles};
pub use zoom::{ZoomPolicy, ZoomPolicyError, ZoomStep};

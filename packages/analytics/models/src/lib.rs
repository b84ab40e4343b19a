#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for report analytics.
//!
//! These are derived views computed per request from a working set of
//! reports. None of them are persisted.

use aquawatch_geography_models::GeoPoint;
use aquawatch_report_models::{ReportId, ReportStatus};
use serde::{Deserialize, Serialize};

/// Report density for one populated grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotCell {
    /// Number of reports in the cell.
    pub count: u64,
    /// Geometric center of the cell rectangle (not the member centroid).
    pub center: GeoPoint,
}

/// Reports that are likely re-reports of the same incident.
///
/// The first id is the seed the other members were compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateGroup(pub Vec<ReportId>);

impl DuplicateGroup {
    /// The report that started the group.
    #[must_use]
    pub fn seed(&self) -> Option<&ReportId> {
        self.0.first()
    }

    /// Member ids, seed first.
    #[must_use]
    pub fn ids(&self) -> &[ReportId] {
        &self.0
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Report totals per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// All reports counted.
    pub total: u64,
    /// Reports awaiting triage.
    pub pending: u64,
    /// Reports flagged for review.
    pub flagged: u64,
    /// Verified reports.
    pub verified: u64,
    /// Rejected reports.
    pub rejected: u64,
}

impl StatusCounts {
    /// Adds one report with `status` to the tally.
    pub const fn record(&mut self, status: ReportStatus) {
        self.total += 1;
        match status {
            ReportStatus::Pending => self.pending += 1,
            ReportStatus::Flagged => self.flagged += 1,
            ReportStatus::Verified => self.verified += 1,
            ReportStatus::Rejected => self.rejected += 1,
        }
    }

    /// Count for a single status.
    #[must_use]
    pub const fn get(&self, status: ReportStatus) -> u64 {
        match status {
            ReportStatus::Pending => self.pending,
            ReportStatus::Flagged => self.flagged,
            ReportStatus::Verified => self.verified,
            ReportStatus::Rejected => self.rejected,
        }
    }
}

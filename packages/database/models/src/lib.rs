#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report query predicates and pagination parameter definitions.
//!
//! [`ReportFilterParams`] is the raw, untrusted filter input. The query
//! builder in `aquawatch_database` validates it into a [`ReportQuery`],
//! which is what storage backends consume.

use aquawatch_geography_models::{BoundingBox, GeoError, GeoPoint};
use aquawatch_report_models::{Report, ReportStatus, ReportSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw report filter and paging input, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilterParams {
    /// Status name; must be a known status when present.
    pub status: Option<String>,
    /// Earliest creation time (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (inclusive).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
    /// Requested page size; clamped per [`PageCap`].
    pub limit: Option<i64>,
    /// Requested 1-based page number; clamped to at least 1.
    pub page: Option<i64>,
}

/// Page size policy for a read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCap {
    /// Interactive listings: 1..=200, default 20.
    Listing,
    /// Bulk export: 1..=50 000, default 1 000.
    Export,
}

impl PageCap {
    /// Largest page size allowed.
    #[must_use]
    pub const fn max_limit(self) -> i64 {
        match self {
            Self::Listing => 200,
            Self::Export => 50_000,
        }
    }

    /// Page size used when none is requested.
    #[must_use]
    pub const fn default_limit(self) -> i64 {
        match self {
            Self::Listing => 20,
            Self::Export => 1_000,
        }
    }
}

/// Validated report predicate.
///
/// Every field is optional; `None` means "don't filter on this".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// Exact status match.
    pub status: Option<ReportStatus>,
    /// Earliest creation time (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (inclusive).
    pub to: Option<DateTime<Utc>>,
    /// Inclusive spatial containment.
    pub bbox: Option<BoundingBox>,
}

impl ReportFilter {
    /// Whether `report` satisfies every present condition.
    #[must_use]
    pub fn matches(&self, report: &ReportSummary) -> bool {
        self.matches_fields(report.status, report.created_at, &report.location)
    }

    /// Same as [`ReportFilter::matches`], evaluated on a stored [`Report`].
    #[must_use]
    pub fn matches_report(&self, report: &Report) -> bool {
        self.matches_fields(report.status, report.created_at, &report.location)
    }

    /// Narrows the creation-time range to `[from, to]` (inclusive), keeping
    /// any tighter bound already present.
    #[must_use]
    pub fn within(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(self.from.map_or(from, |current| current.max(from)));
        self.to = Some(self.to.map_or(to, |current| current.min(to)));
        self
    }

    fn matches_fields(
        &self,
        status: ReportStatus,
        created_at: DateTime<Utc>,
        location: &GeoPoint,
    ) -> bool {
        if let Some(wanted) = self.status
            && status != wanted
        {
            return false;
        }
        if let Some(from) = self.from
            && created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && created_at > to
        {
            return false;
        }
        if let Some(bbox) = &self.bbox
            && !bbox.contains(location)
        {
            return false;
        }
        true
    }
}

/// A validated, paged report query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Predicate applied before paging.
    pub filter: ReportFilter,
    /// Number of matching reports to skip.
    pub skip: u64,
    /// Maximum number of reports to return.
    pub limit: u64,
    /// 1-based page number the skip was derived from.
    pub page: u64,
}

/// Input for creating a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    /// Where the sample or observation was taken.
    pub location: GeoPoint,
    /// Free-form notes.
    pub notes: String,
    /// Photo identifiers on the media host.
    pub photos: Vec<String>,
    /// Submitting user, if signed in.
    pub reporter_id: Option<String>,
}

impl NewReport {
    /// Checks that the location is a valid WGS84 coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if either coordinate is out of range.
    pub fn validate(&self) -> Result<(), GeoError> {
        GeoPoint::try_new(self.location.longitude, self.location.latitude).map(|_| ())
    }
}

/// Input for adding a comment to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Commenting user, if signed in.
    pub author_id: Option<String>,
    /// Comment text.
    pub content: String,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Water-quality report types and the report status taxonomy.
//!
//! [`Report`] is the record owned by the storage layer. The aggregation
//! code only ever sees [`ReportSummary`] snapshots, which it never mutates.

use aquawatch_geography_models::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Triage status of a report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
    /// Newly submitted, not yet triaged.
    #[default]
    Pending,
    /// Marked for closer review.
    Flagged,
    /// Confirmed by a reviewer or lab.
    Verified,
    /// Dismissed as invalid or spam.
    Rejected,
}

impl ReportStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::Flagged, Self::Verified, Self::Rejected]
    }

    /// Parses a status name (`pending`, `flagged`, `verified`, `rejected`).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStatusError`] for any other value.
    pub fn from_name(name: &str) -> Result<Self, InvalidStatusError> {
        name.parse().map_err(|_| InvalidStatusError {
            value: name.to_string(),
        })
    }
}

/// Error returned when a string is not a known [`ReportStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusError {
    /// The rejected value.
    pub value: String,
}

impl std::fmt::Display for InvalidStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status {:?}: expected one of pending, flagged, verified, rejected",
            self.value
        )
    }
}

impl std::error::Error for InvalidStatusError {}

/// Opaque report identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReportId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The subset of a report that the aggregation code consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Report identifier.
    pub id: ReportId,
    /// Where the sample or observation was taken.
    pub location: GeoPoint,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Current triage status.
    pub status: ReportStatus,
    /// Free-form reporter notes.
    pub notes: String,
}

/// A stored water-quality report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report identifier.
    pub id: ReportId,
    /// Where the sample or observation was taken.
    pub location: GeoPoint,
    /// Free-form reporter notes.
    pub notes: String,
    /// Identifiers of uploaded photos on the media host.
    pub photos: Vec<String>,
    /// Current triage status.
    pub status: ReportStatus,
    /// Identifier of the submitting user, if signed in.
    pub reporter_id: Option<String>,
    /// Reviewer the report is assigned to.
    pub assignee: Option<String>,
    /// Notes recorded when the report was resolved.
    pub resolution_notes: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Returns the read-only snapshot consumed by the aggregation code.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            id: self.id.clone(),
            location: self.location,
            created_at: self.created_at,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        report.summary()
    }
}

/// A reviewer or community comment on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    pub id: String,
    /// Report the comment belongs to.
    pub report_id: ReportId,
    /// Commenting user, if signed in.
    pub author_id: Option<String>,
    /// Comment text.
    pub content: String,
    /// Posting time.
    pub created_at: DateTime<Utc>,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the aquawatch server.
//!
//! These types are serialized to JSON for the REST API. Query parameter
//! structs convert into [`ReportFilterParams`] so every route shares the
//! same filter validation.

use aquawatch_analytics_models::{DuplicateGroup, HotspotCell};
use aquawatch_database_models::{NewComment, NewReport, ReportFilterParams};
use aquawatch_geography_models::{GeoError, GeoPoint};
use aquawatch_report_models::{Comment, Report};
use aquawatch_spatial::ClusterItem;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the report listing and CSV export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQueryParams {
    /// Status name to match.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
    /// Page size.
    pub limit: Option<i64>,
    /// 1-based page number.
    pub page: Option<i64>,
}

/// Query parameters for the KPI endpoint: filters only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Status name to match.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
}

/// Query parameters for the clusters endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterQueryParams {
    /// Current map zoom level.
    pub zoom: Option<f64>,
    /// `false` returns one single marker per report.
    pub cluster: Option<bool>,
    /// Status name to match.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
}

/// Query parameters for the hotspots endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotQueryParams {
    /// Grid cell edge in degrees; clamped server side.
    pub cell_size: Option<f64>,
    /// Status name to match.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
}

/// Query parameters for the duplicates endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateQueryParams {
    /// Calendar day (`YYYY-MM-DD`) to restrict the search to.
    pub day: Option<NaiveDate>,
    /// Status name to match.
    pub status: Option<String>,
    /// Earliest creation time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest creation time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
    /// Bounding box as `minLng,minLat,maxLng,maxLat`.
    pub bbox: Option<String>,
}

impl From<&ReportQueryParams> for ReportFilterParams {
    fn from(p: &ReportQueryParams) -> Self {
        Self {
            status: p.status.clone(),
            from: p.from,
            to: p.to,
            bbox: p.bbox.clone(),
            limit: p.limit,
            page: p.page,
        }
    }
}

impl From<&FilterQueryParams> for ReportFilterParams {
    fn from(p: &FilterQueryParams) -> Self {
        Self {
            status: p.status.clone(),
            from: p.from,
            to: p.to,
            bbox: p.bbox.clone(),
            limit: None,
            page: None,
        }
    }
}

impl From<&ClusterQueryParams> for ReportFilterParams {
    fn from(p: &ClusterQueryParams) -> Self {
        Self {
            status: p.status.clone(),
            from: p.from,
            to: p.to,
            bbox: p.bbox.clone(),
            limit: None,
            page: None,
        }
    }
}

impl From<&HotspotQueryParams> for ReportFilterParams {
    fn from(p: &HotspotQueryParams) -> Self {
        Self {
            status: p.status.clone(),
            from: p.from,
            to: p.to,
            bbox: p.bbox.clone(),
            limit: None,
            page: None,
        }
    }
}

impl From<&DuplicateQueryParams> for ReportFilterParams {
    fn from(p: &DuplicateQueryParams) -> Self {
        Self {
            status: p.status.clone(),
            from: p.from,
            to: p.to,
            bbox: p.bbox.clone(),
            limit: None,
            page: None,
        }
    }
}

/// One page of reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    /// Reports on this page, newest first.
    pub items: Vec<Report>,
    /// 1-based page number.
    pub page: u64,
    /// Total number of pages (at least 1).
    pub pages: u64,
    /// Total number of matching reports.
    pub total: u64,
    /// Page size used.
    pub limit: u64,
}

impl ReportListResponse {
    /// Builds a page, deriving `pages` from `total` and `limit`.
    #[must_use]
    pub fn new(items: Vec<Report>, page: u64, total: u64, limit: u64) -> Self {
        Self {
            items,
            page,
            pages: total.div_ceil(limit.max(1)).max(1),
            total,
            limit,
        }
    }
}

/// Body of `POST /api/reports`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Photo identifiers already uploaded to the media host.
    pub photos: Option<Vec<String>>,
    /// Submitting user.
    pub reporter_id: Option<String>,
}

impl TryFrom<CreateReportRequest> for NewReport {
    type Error = GeoError;

    fn try_from(req: CreateReportRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            location: GeoPoint::try_new(req.lng, req.lat)?,
            notes: req.notes.unwrap_or_default(),
            photos: req.photos.unwrap_or_default(),
            reporter_id: req.reporter_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

/// Body of `PATCH /api/reports/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    /// New status name.
    pub status: String,
}

/// Body of `PATCH /api/reports/{id}/assign`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    /// Reviewer to assign.
    pub assignee: String,
}

/// Body of `PATCH /api/reports/{id}/resolve`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    /// Outcome notes.
    pub resolution_notes: String,
    /// Final status; `verified` when omitted.
    pub status: Option<String>,
}

/// Body of `POST /api/reports/{id}/comments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// Comment text.
    pub content: String,
    /// Commenting user.
    pub author_id: Option<String>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            author_id: req.author_id,
            content: req.content,
        }
    }
}

/// A report's comment thread, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    /// Comments on the report.
    pub items: Vec<Comment>,
}

/// Response from the clusters endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClustersResponse {
    /// Cell size chosen for the requested zoom.
    pub cell_size: f64,
    /// Map markers.
    pub items: Vec<ClusterItem>,
}

/// Response from the hotspots endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotsResponse {
    /// Cell size after clamping.
    pub cell_size: f64,
    /// Populated cells.
    pub cells: Vec<HotspotCell>,
}

/// Response from the duplicates endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatesResponse {
    /// Day the search was restricted to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    /// Grouping radius in meters.
    pub radius_meters: f64,
    /// Groups of two or more reports, seed first.
    pub groups: Vec<DuplicateGroup>,
}

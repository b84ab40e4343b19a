//! Map marker reduction.
//!
//! Reports sharing a grid cell collapse into one [`ClusterItem::Cluster`]
//! placed at the mean of its members' coordinates. This is the marker
//! centroid, not the cell's geometric center used by hotspot aggregation.

use aquawatch_geography_models::GeoPoint;
use aquawatch_report_models::ReportSummary;
use serde::Serialize;

use crate::grid::bucket_points;
use crate::zoom::ZoomPolicy;

/// A marker to render: either one report or a group of co-located reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClusterItem {
    /// A cell holding exactly one report.
    Single {
        /// The report.
        report: ReportSummary,
    },
    /// A cell holding two or more reports.
    Cluster {
        /// Number of members.
        count: usize,
        /// Arithmetic mean of member coordinates.
        centroid: GeoPoint,
        /// Members in input order.
        members: Vec<ReportSummary>,
    },
}

impl ClusterItem {
    /// Number of reports represented by this marker.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Cluster { count, .. } => *count,
        }
    }

    /// Always `false`; a marker represents at least one report.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Groups `reports` into markers using a fixed `cell_size`.
///
/// Output order is unspecified.
#[must_use]
pub fn cluster_markers(reports: &[ReportSummary], cell_size: f64) -> Vec<ClusterItem> {
    let buckets = bucket_points(
        reports.iter().map(|report| (report.location, report)),
        cell_size,
    );

    log::debug!(
        "Clustered {} reports into {} cells (cell size {cell_size})",
        reports.len(),
        buckets.len()
    );

    buckets
        .into_values()
        .map(|members| {
            if let [only] = members.as_slice() {
                ClusterItem::Single {
                    report: (*only).clone(),
                }
            } else {
                ClusterItem::Cluster {
                    count: members.len(),
                    centroid: centroid(&members),
                    members: members.into_iter().cloned().collect(),
                }
            }
        })
        .collect()
}

/// Groups `reports` into markers using the cell size `policy` assigns to
/// `zoom`. Returns the markers and the cell size used.
#[must_use]
pub fn cluster_markers_for_zoom(
    reports: &[ReportSummary],
    policy: &ZoomPolicy,
    zoom: f64,
) -> (Vec<ClusterItem>, f64) {
    let cell_size = policy.cell_size_for(zoom);
    (cluster_markers(reports, cell_size), cell_size)
}

/// One [`ClusterItem::Single`] per report, in input order. Used when
/// clustering is switched off.
#[must_use]
pub fn singles(reports: &[ReportSummary]) -> Vec<ClusterItem> {
    reports
        .iter()
        .map(|report| ClusterItem::Single {
            report: report.clone(),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn centroid(members: &[&ReportSummary]) -> GeoPoint {
    let n = members.len() as f64;
    let (lng_sum, lat_sum) = members.iter().fold((0.0, 0.0), |(lng, lat), report| {
        (lng + report.location.longitude, lat + report.location.latitude)
    });
    GeoPoint::new(lng_sum / n, lat_sum / n)
}

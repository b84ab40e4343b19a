//! Grid-cell report density.

use aquawatch_analytics_models::HotspotCell;
use aquawatch_report_models::ReportSummary;
use aquawatch_spatial::bucket_points;

/// Smallest accepted hotspot cell edge, in degrees.
pub const MIN_CELL_SIZE: f64 = 0.01;

/// Largest accepted hotspot cell edge, in degrees.
pub const MAX_CELL_SIZE: f64 = 1.0;

/// Clamps a requested cell size into `[MIN_CELL_SIZE, MAX_CELL_SIZE]`.
///
/// Bad client input is clamped rather than rejected: `NaN`, zero and
/// negative values map to the minimum, `+inf` to the maximum.
#[must_use]
pub fn clamp_cell_size(cell_size: f64) -> f64 {
    if cell_size.is_nan() || cell_size <= MIN_CELL_SIZE {
        MIN_CELL_SIZE
    } else if cell_size >= MAX_CELL_SIZE {
        MAX_CELL_SIZE
    } else {
        cell_size
    }
}

/// Counts reports per grid cell.
///
/// `cell_size` is clamped with [`clamp_cell_size`] first. Each populated
/// cell reports its geometric center, not the centroid of its members.
/// The cell counts always sum to `reports.len()`. Output order is
/// unspecified.
#[must_use]
pub fn compute_hotspots(reports: &[ReportSummary], cell_size: f64) -> Vec<HotspotCell> {
    let cell_size = clamp_cell_size(cell_size);
    let buckets = bucket_points(reports.iter().map(|r| (r.location, ())), cell_size);

    log::debug!(
        "Computed {} hotspot cells from {} reports (cell size {cell_size})",
        buckets.len(),
        reports.len()
    );

    buckets
        .into_iter()
        .map(|(key, members)| HotspotCell {
            count: members.len() as u64,
            center: key.center(cell_size),
        })
        .collect()
}

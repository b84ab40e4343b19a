//! Grid keys and point bucketing.

use std::collections::HashMap;

use aquawatch_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};

/// Quotients within this distance of an integer snap to it, on either
/// side. `10.02 / 0.01` lands in cell 1002, and a coordinate up to this
/// fraction of a cell below a boundary is placed in the cell above it.
const SNAP_EPSILON: f64 = 1e-9;

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridKey {
    /// Column index, `floor(longitude / cell_size)`.
    pub gx: i64,
    /// Row index, `floor(latitude / cell_size)`.
    pub gy: i64,
}

impl GridKey {
    /// Computes the key of the cell containing `point`.
    ///
    /// `cell_size` must be positive and finite. It is not clamped here.
    #[must_use]
    pub fn for_point(point: &GeoPoint, cell_size: f64) -> Self {
        Self {
            gx: cell_index(point.longitude, cell_size),
            gy: cell_index(point.latitude, cell_size),
        }
    }

    /// Geometric center of this cell, `((gx + 0.5) * c, (gy + 0.5) * c)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self, cell_size: f64) -> GeoPoint {
        GeoPoint::new(
            (self.gx as f64 + 0.5) * cell_size,
            (self.gy as f64 + 0.5) * cell_size,
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_index(coordinate: f64, cell_size: f64) -> i64 {
    let quotient = coordinate / cell_size;
    let nearest = quotient.round();
    if (quotient - nearest).abs() < SNAP_EPSILON {
        nearest as i64
    } else {
        quotient.floor() as i64
    }
}

/// Partitions `points` into grid cells of edge `cell_size` degrees.
///
/// Payloads keep their input order within a bucket. The iteration order of
/// the returned map is unspecified and must only be relied on for display.
/// The caller is responsible for choosing (and clamping) `cell_size`.
pub fn bucket_points<T, I>(points: I, cell_size: f64) -> HashMap<GridKey, Vec<T>>
where
    I: IntoIterator<Item = (GeoPoint, T)>,
{
    let mut buckets: HashMap<GridKey, Vec<T>> = HashMap::new();

    for (point, payload) in points {
        buckets
            .entry(GridKey::for_point(&point, cell_size))
            .or_default()
            .push(payload);
    }

    buckets
}

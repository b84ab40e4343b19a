#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic point and bounding box types.
//!
//! All distances in this crate are *planar* approximations computed on raw
//! WGS84 degrees, with no latitude or curvature correction. Only meaningful
//! at city-block to city scale.

use serde::{Deserialize, Serialize};

/// Number of meters treated as one degree (equatorial approximation).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Errors produced when validating coordinates or bounding boxes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("Invalid longitude {0}: expected a finite value in [-180, 180]")]
    Longitude(f64),

    /// Latitude outside `[-90, 90]` or not finite.
    #[error("Invalid latitude {0}: expected a finite value in [-90, 90]")]
    Latitude(f64),
}

/// Reasons a bounding box was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundingBoxError {
    /// The input did not contain exactly four comma-separated values.
    #[error("Expected 4 comma-separated values, got {0}")]
    WrongArity(usize),

    /// One of the values was not a number.
    #[error("Not a number: {0:?}")]
    NotANumber(String),

    /// One of the values was NaN or infinite.
    #[error("Bounding box values must be finite")]
    NotFinite,

    /// A minimum exceeded its maximum. Boxes are never silently swapped.
    #[error("Bounding box minimum exceeds maximum on the {0} axis")]
    Inverted(&'static str),
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a point without range checks.
    ///
    /// Use [`GeoPoint::try_new`] for untrusted input.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Creates a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if either coordinate is out of range.
    pub fn try_new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude(latitude));
        }
        Ok(Self::new(longitude, latitude))
    }
}

/// An axis-aligned geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub min_lng: f64,
    /// Southern latitude boundary.
    pub min_lat: f64,
    /// Eastern longitude boundary.
    pub max_lng: f64,
    /// Northern latitude boundary.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting non-finite values and inverted axes.
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError`] if any value is not finite or a minimum
    /// exceeds its maximum.
    pub fn try_new(
        min_lng: f64,
        min_lat: f64,
        max_lng: f64,
        max_lat: f64,
    ) -> Result<Self, BoundingBoxError> {
        if ![min_lng, min_lat, max_lng, max_lat]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(BoundingBoxError::NotFinite);
        }
        if min_lng > max_lng {
            return Err(BoundingBoxError::Inverted("longitude"));
        }
        if min_lat > max_lat {
            return Err(BoundingBoxError::Inverted("latitude"));
        }
        Ok(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Inclusive axis-aligned containment test.
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            f64::midpoint(self.min_lng, self.max_lng),
            f64::midpoint(self.min_lat, self.max_lat),
        )
    }
}

/// Parses a bounding box string `"minLng,minLat,maxLng,maxLat"` into a
/// [`BoundingBox`].
///
/// # Errors
///
/// Returns [`BoundingBoxError`] unless the string holds exactly four finite
/// numbers with each minimum not exceeding its maximum.
pub fn parse_bbox(s: &str) -> Result<BoundingBox, BoundingBoxError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(BoundingBoxError::WrongArity(parts.len()));
    }

    let mut values = [0.0_f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| BoundingBoxError::NotANumber((*part).to_string()))?;
    }

    BoundingBox::try_new(values[0], values[1], values[2], values[3])
}

/// Planar distance between two points in raw degrees.
///
/// This is `sqrt(dlng^2 + dlat^2)` with no latitude correction and no
/// great-circle math. Overstates east-west separation away from the
/// equator.
#[must_use]
pub fn distance_approx(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let dlng = a.longitude - b.longitude;
    let dlat = a.latitude - b.latitude;
    (dlng * dlng + dlat * dlat).sqrt()
}

/// Converts meters to degrees using [`METERS_PER_DEGREE`].
#[must_use]
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

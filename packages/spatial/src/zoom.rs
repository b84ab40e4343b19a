//! Zoom-level to cell-size mapping for marker clustering.
//!
//! The thresholds live in a [`ZoomPolicy`] value rather than in the
//! clustering code so deployments (and tests) can supply their own table.

use serde::{Deserialize, Serialize};

/// Errors produced when building a [`ZoomPolicy`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoomPolicyError {
    /// A cell size was zero, negative or not finite.
    #[error("Invalid cell size {0}: must be a positive finite number of degrees")]
    CellSize(f64),

    /// A zoom threshold was not finite.
    #[error("Invalid zoom threshold {0}")]
    Threshold(f64),
}

/// One row of the zoom table: at `min_zoom` and above, use `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomStep {
    /// Lowest zoom level (inclusive) this step applies to.
    #[serde(alias = "min_zoom")]
    pub min_zoom: f64,
    /// Grid cell edge in degrees.
    #[serde(alias = "cell_size")]
    pub cell_size: f64,
}

/// Step function from map zoom level to grid cell size.
///
/// Finer cells at higher zoom, coarser at lower zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomPolicy {
    /// Sorted by descending `min_zoom`.
    steps: Vec<ZoomStep>,
    fallback: f64,
}

impl ZoomPolicy {
    /// Builds a policy from unordered steps and the cell size used below
    /// every threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomPolicyError`] if any cell size is not a positive finite
    /// number or any threshold is not finite.
    pub fn new(mut steps: Vec<ZoomStep>, fallback: f64) -> Result<Self, ZoomPolicyError> {
        validate_cell_size(fallback)?;
        for step in &steps {
            validate_cell_size(step.cell_size)?;
            if !step.min_zoom.is_finite() {
                return Err(ZoomPolicyError::Threshold(step.min_zoom));
            }
        }

        steps.sort_by(|a, b| b.min_zoom.total_cmp(&a.min_zoom));

        Ok(Self { steps, fallback })
    }

    /// Returns the cell size for `zoom`.
    #[must_use]
    pub fn cell_size_for(&self, zoom: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| zoom >= step.min_zoom)
            .map_or(self.fallback, |step| step.cell_size)
    }

    /// The configured steps, highest threshold first.
    #[must_use]
    pub fn steps(&self) -> &[ZoomStep] {
        &self.steps
    }

    /// Cell size used below the lowest threshold.
    #[must_use]
    pub const fn fallback(&self) -> f64 {
        self.fallback
    }
}

impl Default for ZoomPolicy {
    /// zoom >= 14: 0.005, >= 12: 0.01, >= 10: 0.02, otherwise 0.05.
    fn default() -> Self {
        Self {
            steps: vec![
                ZoomStep {
                    min_zoom: 14.0,
                    cell_size: 0.005,
                },
                ZoomStep {
                    min_zoom: 12.0,
                    cell_size: 0.01,
                },
                ZoomStep {
                    min_zoom: 10.0,
                    cell_size: 0.02,
                },
            ],
            fallback: 0.05,
        }
    }
}

fn validate_cell_size(cell_size: f64) -> Result<(), ZoomPolicyError> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(ZoomPolicyError::CellSize(cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let policy = ZoomPolicy::default();
        assert!((policy.cell_size_for(18.0) - 0.005).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(14.0) - 0.005).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(13.5) - 0.01).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(12.0) - 0.01).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(11.0) - 0.02).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(10.0) - 0.02).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(9.99) - 0.05).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(0.0) - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_table_is_sorted() {
        let policy = ZoomPolicy::new(
            vec![
                ZoomStep {
                    min_zoom: 5.0,
                    cell_size: 0.5,
                },
                ZoomStep {
                    min_zoom: 15.0,
                    cell_size: 0.001,
                },
            ],
            1.0,
        )
        .unwrap();

        assert!((policy.steps()[0].min_zoom - 15.0).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(16.0) - 0.001).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(7.0) - 0.5).abs() < f64::EPSILON);
        assert!((policy.cell_size_for(2.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_table_uses_fallback() {
        let policy = ZoomPolicy::new(Vec::new(), 0.1).unwrap();
        assert!((policy.cell_size_for(20.0) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_cell_sizes() {
        assert_eq!(
            ZoomPolicy::new(Vec::new(), 0.0),
            Err(ZoomPolicyError::CellSize(0.0))
        );
        let bad_step = ZoomStep {
            min_zoom: 3.0,
            cell_size: -0.1,
        };
        assert!(ZoomPolicy::new(vec![bad_step], 0.05).is_err());
        let nan_zoom = ZoomStep {
            min_zoom: f64::NAN,
            cell_size: 0.1,
        };
        assert!(matches!(
            ZoomPolicy::new(vec![nan_zoom], 0.05),
            Err(ZoomPolicyError::Threshold(_))
        ));
    }
}

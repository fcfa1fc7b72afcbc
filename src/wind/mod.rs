//! Mean wind state along the girder
//!
//! Batched fields (several simulated wind cases) are stored as
//! `(n_cases, n_nodes)` matrices, one case per row.

mod field;
mod homogeneous;
mod skew;

pub use field::{NormalizationPolicy, WindFieldSynthesizer};
pub use homogeneous::{HomogeneousWind, LogProfileWind};
pub use skew::{skew_angles, t_gs_gw, SkewAngles};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, NwError, NwResult};
use crate::math::Mat;

/// Per-case field over the girder nodes, shape `(n_cases, n_nodes)`
pub type CaseField = Mat;

/// Mean wind at every girder node for one wind case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWindState {
    /// Mean wind speed (m/s)
    pub speed: Vec<f64>,
    /// Azimuth the wind blows towards, counter-clockwise from global X (rad)
    pub beta_0: Vec<f64>,
    /// Inclination of the wind, positive upwards (rad)
    pub theta_0: Vec<f64>,
}

impl NodeWindState {
    /// Create a wind state, checking that all fields have the same length
    pub fn new(speed: Vec<f64>, beta_0: Vec<f64>, theta_0: Vec<f64>) -> NwResult<Self> {
        ensure_len("wind directions", speed.len(), beta_0.len())?;
        ensure_len("wind inclinations", speed.len(), theta_0.len())?;
        if let Some(bad) = speed.iter().find(|u| !u.is_finite() || **u < 0.0) {
            return Err(NwError::InvalidInput(format!(
                "mean wind speed must be finite and non-negative, got {bad}"
            )));
        }
        Ok(Self {
            speed,
            beta_0,
            theta_0,
        })
    }

    /// Horizontal wind with the same direction at every node
    pub fn horizontal(speed: Vec<f64>, beta_0: f64) -> NwResult<Self> {
        let n = speed.len();
        Self::new(speed, vec![beta_0; n], vec![0.0; n])
    }

    /// Extract one case from batched speed, direction and inclination fields
    pub fn from_cases(speed: &CaseField, beta_0: &CaseField, theta_0: &CaseField, case: usize) -> NwResult<Self> {
        for (what, field) in [("wind direction cases", beta_0), ("wind inclination cases", theta_0)] {
            ensure_len(what, speed.nrows(), field.nrows())?;
        }
        if case >= speed.nrows() {
            return Err(NwError::InvalidInput(format!(
                "case {case} out of range for {} cases",
                speed.nrows()
            )));
        }
        let row = |m: &CaseField| m.row(case).iter().copied().collect::<Vec<f64>>();
        Self::new(row(speed), row(beta_0), row(theta_0))
    }

    pub fn n_nodes(&self) -> usize {
        self.speed.len()
    }
}

/// Mean of every row
pub(crate) fn row_means(field: &Mat) -> Vec<f64> {
    field.row_iter().map(|r| r.mean()).collect()
}

/// Mean of the squares of every row
pub(crate) fn row_mean_squares(field: &Mat) -> Vec<f64> {
    field
        .row_iter()
        .map(|r| r.iter().map(|u| u * u).sum::<f64>() / r.len() as f64)
        .collect()
}

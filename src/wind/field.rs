//! Nonhomogeneous mean wind speed field along the girder

use serde::{Deserialize, Serialize};

use super::{row_mean_squares, row_means, CaseField};
use crate::error::{ensure_len, NwError, NwResult};
use crate::interpolation::ArcInterpolator;
use crate::math::Mat;

/// Relative tolerance of the runtime statistic checks
const STAT_RTOL: f64 = 1e-8;
const STAT_ATOL: f64 = 1e-12;

/// Which aggregate a nonhomogeneous field shares with its homogeneous reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPolicy {
    /// Keep the interpolated field as it is
    #[default]
    None,
    /// Same spatial mean of U
    Mean,
    /// Same spatial mean of U², i.e. the same kinetic-energy proxy
    Energy,
}

/// Builds mean wind speed fields at the girder nodes from reference-grid samples
#[derive(Debug, Clone)]
pub struct WindFieldSynthesizer {
    interpolator: ArcInterpolator,
}

impl WindFieldSynthesizer {
    pub fn new(interpolator: ArcInterpolator) -> Self {
        Self { interpolator }
    }

    pub fn interpolator(&self) -> &ArcInterpolator {
        &self.interpolator
    }

    /// Nonhomogeneous mean wind speed at the girder nodes.
    ///
    /// # Arguments
    /// * `samples` - Mean speeds at the reference nodes, `(n_cases, n_reference)`
    /// * `homogeneous` - Homogeneous reference speed at each girder node
    /// * `policy` - Normalization against the homogeneous reference
    ///
    /// With [`NormalizationPolicy::Mean`] the output is `U_hom * r` with
    /// `r = raw * mean(U_hom) / mean(U_hom * raw)`, so every case keeps the
    /// spatial mean of `homogeneous` even when it varies along the span. With
    /// [`NormalizationPolicy::Energy`] it is `U_hom * sqrt(r)` with
    /// `r = raw * mean(U_hom²) / mean(U_hom² * raw)`, keeping the mean square.
    pub fn mean_speed(
        &self,
        samples: &CaseField,
        homogeneous: &[f64],
        policy: NormalizationPolicy,
    ) -> NwResult<CaseField> {
        ensure_len("homogeneous wind nodes", self.interpolator.n_target(), homogeneous.len())?;
        check_speeds(samples.iter())?;
        check_speeds(homogeneous.iter())?;

        let raw = self.interpolator.interpolate_cases(samples)?;
        let energy = match policy {
            NormalizationPolicy::None => return Ok(raw),
            NormalizationPolicy::Mean => false,
            NormalizationPolicy::Energy => true,
        };

        let u_hom = Mat::from_fn(raw.nrows(), raw.ncols(), |_, n| homogeneous[n]);
        if let Some(case) = row_means(&raw).iter().position(|m| *m <= 0.0) {
            return Err(NwError::InvalidInput(format!(
                "case {case} has a non-positive mean wind speed and cannot be normalized"
            )));
        }

        // Weight the ratio by U_hom (or U_hom²) so the weighted statistic of
        // U_hom * r (or U_hom * sqrt(r)) is exactly that of U_hom.
        let weight = if energy { u_hom.map(|u| u * u) } else { u_hom.clone() };
        let target = row_means(&weight);
        let weighted = row_means(&weight.component_mul(&raw));
        let ratio = Mat::from_fn(raw.nrows(), raw.ncols(), |c, n| {
            if weighted[c] > 0.0 {
                raw[(c, n)] * target[c] / weighted[c]
            } else {
                0.0
            }
        });

        let (nw, hom_stat): (Mat, fn(&Mat) -> Vec<f64>) = if energy {
            (u_hom.component_mul(&ratio.map(f64::sqrt)), row_mean_squares)
        } else {
            (u_hom.component_mul(&ratio), row_means)
        };
        let expected = hom_stat(&u_hom);
        let found = hom_stat(&nw);
        for (case, (e, f)) in expected.iter().zip(&found).enumerate() {
            check_statistic(policy, case, *e, *f)?;
        }

        Ok(nw)
    }

    /// Nonhomogeneous mean wind speed for a single case
    pub fn mean_speed_single(
        &self,
        samples: &[f64],
        homogeneous: &[f64],
        policy: NormalizationPolicy,
    ) -> NwResult<Vec<f64>> {
        let field = self.mean_speed(&Mat::from_row_slice(1, samples.len(), samples), homogeneous, policy)?;
        Ok(field.row(0).iter().copied().collect())
    }

    /// Wind directions (rad) at the girder nodes, interpolated on their
    /// sine/cosine pair. Shape `(n_cases, n_reference)` -> `(n_cases, n_nodes)`.
    pub fn direction_field(&self, samples: &CaseField) -> NwResult<CaseField> {
        self.interpolator.interpolate_directions(samples)
    }

    /// Homogeneous field equivalent to `nw` under `policy`.
    ///
    /// * `None` - the homogeneous reference itself, repeated for every case
    /// * `Mean` - per case, a uniform field equal to the case mean
    /// * `Energy` - per case, a uniform field equal to the case root mean square
    pub fn equivalent_homogeneous(
        nw: &CaseField,
        policy: NormalizationPolicy,
        homogeneous: &[f64],
    ) -> NwResult<CaseField> {
        let (n_cases, n_nodes) = nw.shape();
        match policy {
            NormalizationPolicy::None => {
                ensure_len("homogeneous wind nodes", n_nodes, homogeneous.len())?;
                Ok(Mat::from_fn(n_cases, n_nodes, |_, n| homogeneous[n]))
            }
            NormalizationPolicy::Mean => {
                let means = row_means(nw);
                let eq = Mat::from_fn(n_cases, n_nodes, |c, _| means[c]);
                for (case, (e, f)) in means.iter().zip(row_means(&eq)).enumerate() {
                    check_statistic(policy, case, *e, f)?;
                }
                Ok(eq)
            }
            NormalizationPolicy::Energy => {
                let energy = row_mean_squares(nw);
                let eq = Mat::from_fn(n_cases, n_nodes, |c, _| energy[c].sqrt());
                for (case, (e, f)) in energy.iter().zip(row_mean_squares(&eq)).enumerate() {
                    check_statistic(policy, case, *e, f)?;
                }
                Ok(eq)
            }
        }
    }
}

fn check_speeds<'a>(mut speeds: impl Iterator<Item = &'a f64>) -> NwResult<()> {
    match speeds.find(|u| !u.is_finite() || **u < 0.0) {
        Some(bad) => Err(NwError::InvalidInput(format!(
            "mean wind speed must be finite and non-negative, got {bad}"
        ))),
        None => Ok(()),
    }
}

fn check_statistic(policy: NormalizationPolicy, case: usize, expected: f64, found: f64) -> NwResult<()> {
    log::debug!("{policy:?} statistic for case {case}: expected {expected}, found {found}");
    if (expected - found).abs() <= STAT_ATOL + STAT_RTOL * expected.abs() {
        Ok(())
    } else {
        Err(NwError::InvariantViolated(format!(
            "{policy:?} statistic of case {case} is {found}, expected {expected}"
        )))
    }
}

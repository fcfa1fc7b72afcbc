//! Turbulence spectra at the girder nodes
//!
//! Spectral inputs only: one-point Kaimal auto-spectra of u, v, w at every
//! node and cross-spectra between nodes with Davenport coherence. Both use
//! the nonhomogeneous mean speed and the looked-up intensities node by node.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::NodeSet;
use crate::math::Mat;

/// Kaimal and coherence parameters for the u, v and w components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralParameters {
    /// Kaimal spectrum constants A
    pub kaimal_a: [f64; 3],
    /// Integral length scales xL (m)
    pub length_scales: [f64; 3],
    /// Davenport decay coefficients for separations along the girder
    pub decay: [f64; 3],
}

impl SpectralParameters {
    /// Parameters at height `z` (m), with `xLu = 100 (z / 10)^0.3`,
    /// `xLv = xLu / 4` and `xLw = xLu / 12`
    pub fn at_height(z: f64) -> Self {
        let xlu = 100.0 * (z / 10.0).powf(0.3);
        Self {
            kaimal_a: [6.8, 9.4, 9.4],
            length_scales: [xlu, xlu / 4.0, xlu / 12.0],
            decay: [10.0, 6.5, 6.5],
        }
    }
}

impl Default for SpectralParameters {
    fn default() -> Self {
        Self::at_height(14.5)
    }
}

/// One-sided Kaimal spectrum of one component (m²/s² per Hz)
fn kaimal(freq: f64, speed: f64, intensity: f64, a: f64, length_scale: f64) -> f64 {
    if speed <= 0.0 {
        return 0.0;
    }
    let sigma = intensity * speed;
    let f = freq * length_scale / speed;
    sigma * sigma * a * f / freq / (1.0 + 1.5 * a * f).powf(5.0 / 3.0)
}

fn check_inputs(freqs: &[f64], speed: &[f64], intensities: &[[f64; 3]]) -> NwResult<()> {
    ensure_len("turbulence intensities", speed.len(), intensities.len())?;
    match freqs.iter().find(|f| !(**f > 0.0) || !f.is_finite()) {
        Some(f) => Err(NwError::InvalidInput(format!(
            "spectral frequencies must be positive, got {f}"
        ))),
        None => Ok(()),
    }
}

/// Auto-spectra per frequency, each `(n_nodes, 3)` with columns u, v, w
pub fn kaimal_auto_spectra(
    freqs: &[f64],
    speed: &[f64],
    intensities: &[[f64; 3]],
    params: &SpectralParameters,
) -> NwResult<Vec<Mat>> {
    check_inputs(freqs, speed, intensities)?;
    Ok(freqs
        .iter()
        .map(|&n| {
            Mat::from_fn(speed.len(), 3, |node, c| {
                kaimal(
                    n,
                    speed[node],
                    intensities[node][c],
                    params.kaimal_a[c],
                    params.length_scales[c],
                )
            })
        })
        .collect())
}

/// Cross-spectra per frequency, `[S_uu, S_vv, S_ww]` each `(n_nodes, n_nodes)`.
///
/// `S_ij = sqrt(S_i S_j) exp(-C n d_ij / U_ij)` with `d_ij` the distance
/// between the nodes and `U_ij` their average mean speed.
pub fn cross_spectra(
    freqs: &[f64],
    nodes: &NodeSet,
    speed: &[f64],
    intensities: &[[f64; 3]],
    params: &SpectralParameters,
) -> NwResult<Vec<[Mat; 3]>> {
    ensure_len("wind speeds", nodes.len(), speed.len())?;
    let auto = kaimal_auto_spectra(freqs, speed, intensities, params)?;
    let c = nodes.coords();
    let n_nodes = c.len();
    let distance = Mat::from_fn(n_nodes, n_nodes, |i, j| (c[i] - c[j]).norm());

    Ok(freqs
        .iter()
        .zip(&auto)
        .map(|(&n, s)| {
            [0, 1, 2].map(|comp| {
                Mat::from_fn(n_nodes, n_nodes, |i, j| {
                    let u_mean = 0.5 * (speed[i] + speed[j]);
                    let coherence = if u_mean > 0.0 {
                        (-params.decay[comp] * n * distance[(i, j)] / u_mean).exp()
                    } else {
                        0.0
                    };
                    (s[(i, comp)] * s[(j, comp)]).sqrt() * coherence
                })
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kaimal_variance() {
        // integrate n S(n) over ln n: the area approaches sigma²
        let params = SpectralParameters::default();
        let freqs: Vec<f64> = (0..4000).map(|k| 10f64.powf(-6.0 + 8.0 * k as f64 / 3999.0)).collect();
        let s = kaimal_auto_spectra(&freqs, &[25.0], &[[0.1, 0.075, 0.05]], &params).unwrap();

        let mut variance = 0.0;
        for k in 1..freqs.len() {
            let df = freqs[k] - freqs[k - 1];
            variance += 0.5 * (s[k][(0, 0)] + s[k - 1][(0, 0)]) * df;
        }
        assert_relative_eq!(variance, (0.1f64 * 25.0).powi(2), max_relative = 0.02);
    }

    #[test]
    fn test_cross_spectra_diagonal_is_auto() {
        let nodes = NodeSet::from_rows(&[[0.0, 0.0, 14.5], [50.0, 0.0, 14.5], [500.0, 0.0, 14.5]]);
        let speed = [20.0, 22.0, 30.0];
        let iu = [[0.1, 0.075, 0.05], [0.12, 0.09, 0.06], [0.08, 0.06, 0.04]];
        let params = SpectralParameters::default();
        let auto = kaimal_auto_spectra(&[0.1], &speed, &iu, &params).unwrap();
        let cross = cross_spectra(&[0.1], &nodes, &speed, &iu, &params).unwrap();

        for comp in 0..3 {
            for node in 0..3 {
                assert_relative_eq!(cross[0][comp][(node, node)], auto[0][(node, comp)], max_relative = 1e-12);
            }
            // coherence decays with separation
            let near = cross[0][comp][(0, 1)] / (auto[0][(0, comp)] * auto[0][(1, comp)]).sqrt();
            let far = cross[0][comp][(0, 2)] / (auto[0][(0, comp)] * auto[0][(2, comp)]).sqrt();
            assert!(near > far);
            assert_relative_eq!(cross[0][comp][(0, 2)], cross[0][comp][(2, 0)]);
        }
    }

    #[test]
    fn test_calm_and_invalid_frequencies() {
        let params = SpectralParameters::default();
        let s = kaimal_auto_spectra(&[0.5], &[0.0], &[[0.1, 0.1, 0.1]], &params).unwrap();
        assert_eq!(s[0][(0, 1)], 0.0);

        assert!(kaimal_auto_spectra(&[0.0], &[10.0], &[[0.1; 3]], &params).is_err());
        assert!(kaimal_auto_spectra(&[0.1], &[10.0, 11.0], &[[0.1; 3]], &params).is_err());
    }
}

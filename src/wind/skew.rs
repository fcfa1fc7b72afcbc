//! Wind direction relative to the local structural axes

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, NwResult};
use crate::math::{Mat3, Vec3};

/// Horizontal wind magnitude below which a wind is treated as vertical
const VERTICAL_TOL: f64 = 1e-12;

/// Skew and inclination of the mean wind at every girder node.
///
/// The skew is measured from the local transverse axis (local y, normal to
/// the girder in the deck plane), the axis the section coefficients are
/// given for. Wind along local +y has `beta_bar = 0`, wind along local +x
/// has `beta_bar = -π/2`, and wind along local -y has `beta_bar = ±π`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewAngles {
    /// Skew angle from the local transverse axis, in the local x-y plane (rad)
    pub beta_bar: Vec<f64>,
    /// Inclination out of the local x-y plane (rad)
    pub theta_bar: Vec<f64>,
}

impl SkewAngles {
    pub fn len(&self) -> usize {
        self.beta_bar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beta_bar.is_empty()
    }
}

/// Transformation from wind axes to global structural axes.
///
/// The wind x-axis is the mean wind velocity: azimuth `beta_0`
/// counter-clockwise from global X, inclination `theta_0` positive upwards.
/// Equal to `Rz(beta_0) * Ry(-theta_0)`.
pub fn t_gs_gw(beta_0: f64, theta_0: f64) -> Mat3 {
    let (sb, cb) = beta_0.sin_cos();
    let (st, ct) = theta_0.sin_cos();
    Mat3::new(
        cb * ct, -sb, -cb * st,
        sb * ct, cb, -sb * st,
        st, 0.0, ct,
    )
}

/// Skew angles of the mean wind at every node.
///
/// `frames` are the local structural frames (rows = local axes in global
/// coordinates). Zero skew is wind along the local y-axis, normal to the
/// girder; wind blowing along local +x gives `-π/2`.
pub fn skew_angles(frames: &[Mat3], beta_0: &[f64], theta_0: &[f64]) -> NwResult<SkewAngles> {
    ensure_len("wind directions", frames.len(), beta_0.len())?;
    ensure_len("wind inclinations", frames.len(), theta_0.len())?;

    let (beta_bar, theta_bar) = frames
        .iter()
        .zip(beta_0.iter().zip(theta_0))
        .map(|(t_ls_gs, (&b, &t))| {
            let u = t_ls_gs * t_gs_gw(b, t) * Vec3::x();
            local_angles(&u)
        })
        .unzip();

    Ok(SkewAngles {
        beta_bar,
        theta_bar,
    })
}

/// Skew and inclination of a unit wind vector in local coordinates
fn local_angles(u: &Vec3) -> (f64, f64) {
    let u_xy = u.x.hypot(u.y);
    let beta_bar = if u_xy < VERTICAL_TOL {
        0.0
    } else {
        let sign = if u.x < 0.0 { -1.0 } else { 1.0 };
        -(u.y / u_xy).clamp(-1.0, 1.0).acos() * sign
    };
    let theta_bar = u.z.clamp(-1.0, 1.0).asin();
    (beta_bar, theta_bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NwError;
    use crate::geometry::{girder_node_frames, BridgeGeometry, GeometryProvider, NodeSet};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn straight_frames(n: usize, alpha: f64) -> Vec<Mat3> {
        let rows: Vec<[f64; 3]> = (0..n).map(|i| [i as f64 * 10.0, 0.0, 14.5]).collect();
        girder_node_frames(&NodeSet::from_rows(&rows), &vec![alpha; n]).unwrap()
    }

    #[test]
    fn test_t_gs_gw_maps_wind_axis() {
        let (b, t) = (0.7, 0.2);
        let u = t_gs_gw(b, t) * Vec3::x();

        assert_relative_eq!(u, Vec3::new(b.cos() * t.cos(), b.sin() * t.cos(), t.sin()), epsilon = 1e-14);
        let t = t_gs_gw(b, t);
        assert_relative_eq!(t * t.transpose(), Mat3::identity(), epsilon = 1e-14);
    }

    #[test]
    fn test_normal_wind_has_no_skew() {
        let frames = straight_frames(3, 0.0);
        let angles = skew_angles(&frames, &[FRAC_PI_2; 3], &[0.0; 3]).unwrap();

        for n in 0..3 {
            assert_relative_eq!(angles.beta_bar[n], 0.0, epsilon = 1e-12);
            assert_relative_eq!(angles.theta_bar[n], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normal_wind_on_curved_girder() {
        let bridge = BridgeGeometry::curved(5000.0, 5000.0, 21, 14.5, &[], 0.0).unwrap();
        let frames = bridge.local_frames(&[0.0; 21]).unwrap();
        let beta_0: Vec<f64> = frames.iter().map(|f| f[(1, 1)].atan2(f[(1, 0)])).collect();
        let angles = skew_angles(&frames, &beta_0, &[0.0; 21]).unwrap();

        for b in angles.beta_bar {
            assert_relative_eq!(b, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_wind_along_girder() {
        let frames = straight_frames(2, 0.0);
        let along = skew_angles(&frames, &[0.0; 2], &[0.0; 2]).unwrap();
        let against = skew_angles(&frames, &[PI; 2], &[0.0; 2]).unwrap();

        assert_relative_eq!(along.beta_bar[0], -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(against.beta_bar[0], FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_inclination_and_torsion() {
        let inclined = skew_angles(&straight_frames(2, 0.0), &[FRAC_PI_2; 2], &[0.1; 2]).unwrap();
        assert_relative_eq!(inclined.theta_bar[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(inclined.beta_bar[1], 0.0, epsilon = 1e-12);

        let twisted = skew_angles(&straight_frames(2, 0.05), &[FRAC_PI_2; 2], &[0.0; 2]).unwrap();
        assert_relative_eq!(twisted.theta_bar[0], -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_wind() {
        let angles = skew_angles(&straight_frames(2, 0.0), &[1.0; 2], &[FRAC_PI_2; 2]).unwrap();
        assert_eq!(angles.beta_bar[0], 0.0);
        assert_relative_eq!(angles.theta_bar[0], FRAC_PI_2, epsilon = 1e-7);
    }

    #[test]
    fn test_length_mismatch() {
        let frames = straight_frames(3, 0.0);
        assert!(matches!(
            skew_angles(&frames, &[0.0; 2], &[0.0; 3]),
            Err(NwError::ShapeMismatch { .. })
        ));
    }
}

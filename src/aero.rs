//! Quasi-steady aerodynamic load matrices of the girder
//!
//! A load matrix maps the wind velocity components `(u, v, w)` at a node to
//! the 6 global force/moment DOFs of that node. For the mean wind `(U, 0, 0)`
//! the static force is `Pb * (U, 0, 0) / 2`, i.e. `ρ U² C L B / 2`.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::NodeSet;
use crate::math::{LoadMatrix, Mat3, Vec3};
use crate::wind::SkewAngles;

/// Variation of the static coefficients with the skew angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AeroMethod {
    /// Coefficients independent of skew apart from the wind side
    #[default]
    Constant,
    /// Coefficients scaled by `cos²(beta_bar)`, keeping the sign of
    /// `cos(beta_bar)` for the loads that follow the wind side
    CosineRule,
}

/// How skew wind is resolved on the section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkewApproach {
    /// Only the wind component normal to the girder acts, on the section plane
    #[serde(rename = "2D")]
    TwoD,
    /// Full skewed wind with coefficients in all local axes
    #[default]
    #[serde(rename = "3D")]
    ThreeD,
}

/// Settings for building the load matrices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroSettings {
    pub method: AeroMethod,
    pub skew_approach: SkewApproach,
    /// Number of static coefficients used: 3 (drag, lift, moment) or 6
    pub n_coef: usize,
}

impl Default for AeroSettings {
    fn default() -> Self {
        Self {
            method: AeroMethod::Constant,
            skew_approach: SkewApproach::ThreeD,
            n_coef: 6,
        }
    }
}

impl AeroSettings {
    pub fn validate(&self) -> NwResult<()> {
        match self.n_coef {
            3 | 6 => Ok(()),
            n => Err(NwError::InvalidInput(format!(
                "number of aerodynamic coefficients must be 3 or 6, got {n}"
            ))),
        }
    }
}

/// Provider of the aerodynamic load matrix of every girder node
pub trait AeroLoadProvider {
    /// One global 6x3 load matrix per girder node
    fn load_matrices(
        &self,
        skew: &SkewAngles,
        frames: &[Mat3],
        speed: &[f64],
        settings: &AeroSettings,
    ) -> NwResult<Vec<LoadMatrix>>;
}

/// Static coefficients of the girder section in local axes
/// `(x, y, z, rx, ry, rz)`.
///
/// The y force is normalized by the section depth, the other forces by the
/// width and the moments by the width squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroCoefficients {
    pub values: [f64; 6],
    /// Derivatives with respect to the inclination theta_bar (1/rad)
    pub theta_slopes: [f64; 6],
}

impl AeroCoefficients {
    /// Section coefficients from drag, lift and moment only
    pub fn from_section(c_d: f64, c_l: f64, c_m: f64) -> Self {
        Self {
            values: [0.0, c_d, c_l, c_m, 0.0, 0.0],
            theta_slopes: [0.0; 6],
        }
    }

    pub fn with_theta_slopes(mut self, slopes: [f64; 6]) -> Self {
        self.theta_slopes = slopes;
        self
    }

    /// Coefficient and its derivatives `(C, dC/dbeta, dC/dtheta)` for one DOF
    fn evaluate(&self, dof: usize, beta_bar: f64, theta_bar: f64, method: AeroMethod) -> (f64, f64, f64) {
        let c = self.values[dof] + self.theta_slopes[dof] * theta_bar;
        let (f, df_dbeta) = skew_factor(dof, beta_bar, method);
        (c * f, c * df_dbeta, self.theta_slopes[dof] * f)
    }
}

/// DOFs whose load reverses when the wind blows from the other side of the
/// girder: lateral drag, torsion and the moment about the vertical axis
fn reverses_with_wind(dof: usize) -> bool {
    matches!(dof, 1 | 3 | 5)
}

/// Skew scaling of a coefficient and its derivative with respect to beta_bar.
///
/// Reversing DOFs are odd in `cos(beta_bar)`, the others even, so
/// `beta_bar = ±π` loads the girder opposite to `beta_bar = 0`.
fn skew_factor(dof: usize, beta_bar: f64, method: AeroMethod) -> (f64, f64) {
    let (s, co) = beta_bar.sin_cos();
    let odd = reverses_with_wind(dof);
    match method {
        AeroMethod::Constant if odd => (co.signum(), 0.0),
        AeroMethod::Constant => (1.0, 0.0),
        AeroMethod::CosineRule if odd => (co * co.abs(), -2.0 * s * co.abs()),
        AeroMethod::CosineRule => (co * co, -2.0 * s * co),
    }
}

impl Default for AeroCoefficients {
    fn default() -> Self {
        Self::from_section(0.8, 0.1, 0.02).with_theta_slopes([0.0, 0.0, 3.0, 0.8, 0.0, 0.0])
    }
}

/// Quasi-steady load model of a box girder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuasiSteadyAero {
    /// Section width B (m)
    pub width: f64,
    /// Section depth D (m)
    pub depth: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    pub coefficients: AeroCoefficients,
    /// Girder length carried by each node (m)
    pub tributary: Vec<f64>,
}

impl QuasiSteadyAero {
    pub fn new(width: f64, depth: f64, coefficients: AeroCoefficients, g_nodes: &NodeSet) -> Self {
        Self {
            width,
            depth,
            air_density: 1.25,
            coefficients,
            tributary: tributary_lengths(g_nodes),
        }
    }

    pub fn with_air_density(mut self, air_density: f64) -> Self {
        self.air_density = air_density;
        self
    }

    /// Reference length multiplying each coefficient
    fn reference_lengths(&self) -> [f64; 6] {
        let b = self.width;
        [b, self.depth, b, b * b, b * b, b * b]
    }

    /// Load matrix of one node in local axes
    fn local_matrix(&self, beta_bar: f64, theta_bar: f64, speed: f64, length: f64, settings: &AeroSettings) -> LoadMatrix {
        let refs = self.reference_lengths();
        let q = self.air_density * speed * length;
        let mut pb = LoadMatrix::zeros();

        for dof in 0..6 {
            if !active_dof(dof, settings) {
                continue;
            }
            let (c, dc_dbeta, dc_dtheta) = match settings.skew_approach {
                SkewApproach::ThreeD => self.coefficients.evaluate(dof, beta_bar, theta_bar, settings.method),
                SkewApproach::TwoD => {
                    let (c, _, dc_dtheta) = self.coefficients.evaluate(dof, 0.0, theta_bar, AeroMethod::Constant);
                    let (f, df_dbeta) = skew_factor(dof, beta_bar, AeroMethod::CosineRule);
                    (c * f, c * df_dbeta, dc_dtheta * f)
                }
            };
            pb[(dof, 0)] = q * refs[dof] * c;
            pb[(dof, 1)] = 0.5 * q * refs[dof] * dc_dbeta / theta_bar.cos();
            pb[(dof, 2)] = 0.5 * q * refs[dof] * dc_dtheta;
        }
        pb
    }
}

/// Whether a local DOF carries load under the given settings
fn active_dof(dof: usize, settings: &AeroSettings) -> bool {
    let section_dof = matches!(dof, 1..=3);
    match (settings.n_coef, settings.skew_approach) {
        (3, _) | (_, SkewApproach::TwoD) => section_dof,
        _ => true,
    }
}

impl AeroLoadProvider for QuasiSteadyAero {
    fn load_matrices(
        &self,
        skew: &SkewAngles,
        frames: &[Mat3],
        speed: &[f64],
        settings: &AeroSettings,
    ) -> NwResult<Vec<LoadMatrix>> {
        settings.validate()?;
        let n = frames.len();
        ensure_len("skew angles", n, skew.len())?;
        ensure_len("skew inclinations", n, skew.theta_bar.len())?;
        ensure_len("wind speeds", n, speed.len())?;
        ensure_len("tributary lengths", n, self.tributary.len())?;

        Ok((0..n)
            .map(|i| {
                let local = self.local_matrix(skew.beta_bar[i], skew.theta_bar[i], speed[i], self.tributary[i], settings);
                to_global(&local, &frames[i])
            })
            .collect())
    }
}

/// Rotate the force and moment rows of a local load matrix to global axes
fn to_global(local: &LoadMatrix, t_ls_gs: &Mat3) -> LoadMatrix {
    let r_t = t_ls_gs.transpose();
    let mut global = LoadMatrix::zeros();
    for block in [0, 3] {
        let rotated = r_t * local.fixed_view::<3, 3>(block, 0);
        global.fixed_view_mut::<3, 3>(block, 0).copy_from(&rotated);
    }
    global
}

/// Half the length of the elements on either side of each node
pub fn tributary_lengths(g_nodes: &NodeSet) -> Vec<f64> {
    let c = g_nodes.coords();
    let element: Vec<f64> = c.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
    (0..c.len())
        .map(|n| {
            let left = if n > 0 { element[n - 1] } else { 0.0 };
            let right = element.get(n).copied().unwrap_or(0.0);
            0.5 * (left + right)
        })
        .collect()
}

/// Static wind force of every node, `Pb * (U, 0, 0) / 2`, in global axes
pub fn static_forces(load_matrices: &[LoadMatrix], speed: &[f64]) -> NwResult<Vec<[f64; 6]>> {
    ensure_len("wind speeds", load_matrices.len(), speed.len())?;
    Ok(load_matrices
        .iter()
        .zip(speed)
        .map(|(pb, &u)| {
            let f = pb * Vec3::new(u, 0.0, 0.0) / 2.0;
            [f[0], f[1], f[2], f[3], f[4], f[5]]
        })
        .collect())
}

//! Static response of the bridge to a nonhomogeneous mean wind

use nalgebra::{Dyn, LU};

use super::StaticWindOptions;
use crate::aero::{static_forces, AeroLoadProvider};
use crate::elements::StiffnessProvider;
use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::GeometryProvider;
use crate::math::{Mat, Mat3, Vec, Vec3};
use crate::results::{NodeDisplacement, StaticResponse};
use crate::wind::{skew_angles, CaseField, NodeWindState};

type Factorized = LU<f64, Dyn, Dyn>;

/// Linear static solver for the mean wind load.
///
/// The geometry, stiffness and aerodynamic models are read-only inputs.
pub struct StaticWindSolver<'a> {
    geometry: &'a dyn GeometryProvider,
    stiffness: &'a dyn StiffnessProvider,
    aero: &'a dyn AeroLoadProvider,
}

impl<'a> StaticWindSolver<'a> {
    pub fn new(
        geometry: &'a dyn GeometryProvider,
        stiffness: &'a dyn StiffnessProvider,
        aero: &'a dyn AeroLoadProvider,
    ) -> Self {
        Self {
            geometry,
            stiffness,
            aero,
        }
    }

    /// Displacements of the bridge under one mean wind state.
    ///
    /// The static force at each girder node is `Pb (U, 0, 0) / 2` with `Pb`
    /// built from the skew angles of the wind; pontoon nodes carry no wind
    /// load. Fails with [`NwError::SingularSystem`] if `K D = F` has no
    /// unique solution.
    pub fn solve(&self, wind: &NodeWindState, options: &StaticWindOptions) -> NwResult<StaticResponse> {
        let (frames, lu, n_dofs) = self.factorize(options)?;
        let force = self.force_vector(wind, &frames, options, n_dofs)?;
        let d = solve_factorized(&lu, &force)?;
        self.response(d)
    }

    /// Displacements for every case of batched `(n_cases, n_nodes)` wind
    /// fields, reusing one factorization of the stiffness matrix.
    pub fn solve_cases(
        &self,
        speed: &CaseField,
        beta_0: &CaseField,
        theta_0: &CaseField,
        options: &StaticWindOptions,
    ) -> NwResult<std::vec::Vec<StaticResponse>> {
        let (frames, lu, n_dofs) = self.factorize(options)?;
        (0..speed.nrows())
            .map(|case| {
                let wind = NodeWindState::from_cases(speed, beta_0, theta_0, case)?;
                let force = self.force_vector(&wind, &frames, options, n_dofs)?;
                self.response(solve_factorized(&lu, &force)?)
            })
            .collect()
    }

    /// Local frames, factorized stiffness and the number of DOFs
    fn factorize(&self, options: &StaticWindOptions) -> NwResult<(std::vec::Vec<Mat3>, Factorized, usize)> {
        options.aero_settings().validate()?;
        let n_g = self.geometry.g_nodes().len();
        let alpha = options.alpha_for(n_g);
        ensure_len("torsional rotations alpha", n_g, alpha.len())?;

        let frames = self.geometry.local_frames(&alpha)?;
        let k = self.stiffness.global_stiffness(self.geometry, &alpha)?;
        ensure_len("stiffness matrix columns", k.nrows(), k.ncols())?;
        let n_dofs = 6 * (n_g + self.geometry.p_nodes().len());
        ensure_len("stiffness matrix order", n_dofs, k.nrows())?;

        log::debug!("Factorizing {}x{} stiffness matrix", k.nrows(), k.ncols());
        Ok((frames, Mat::lu(k), n_dofs))
    }

    /// Global force vector: girder node loads, zeros on the pontoon DOFs
    fn force_vector(
        &self,
        wind: &NodeWindState,
        frames: &[Mat3],
        options: &StaticWindOptions,
        n_dofs: usize,
    ) -> NwResult<Vec> {
        ensure_len("wind state nodes", frames.len(), wind.n_nodes())?;
        let skew = skew_angles(frames, &wind.beta_0, &wind.theta_0)?;
        let pb = self
            .aero
            .load_matrices(&skew, frames, &wind.speed, &options.aero_settings())?;
        let nodal = static_forces(&pb, &wind.speed)?;

        let mut force = Vec::zeros(n_dofs);
        for (node, f) in nodal.iter().enumerate() {
            force.rows_mut(node * 6, 6).copy_from_slice(f);
        }
        log::debug!("Static wind force norm {:.3e} N over {} girder nodes", force.norm(), nodal.len());
        Ok(force)
    }

    fn response(&self, d: Vec) -> NwResult<StaticResponse> {
        let displacements: std::vec::Vec<NodeDisplacement> = d
            .as_slice()
            .chunks_exact(6)
            .map(|c| NodeDisplacement::from_array([c[0], c[1], c[2], c[3], c[4], c[5]]))
            .collect();
        let translations: std::vec::Vec<Vec3> = displacements.iter().map(NodeDisplacement::translation).collect();

        let g_nodes = self.geometry.g_nodes();
        let (g_trans, p_trans) = translations.split_at(g_nodes.len());
        Ok(StaticResponse {
            g_node_coor: g_nodes.displaced(g_trans)?,
            p_node_coor: self.geometry.p_nodes().displaced(p_trans)?,
            displacements,
            displacement_vector: d,
        })
    }
}

fn solve_factorized(lu: &Factorized, force: &Vec) -> NwResult<Vec> {
    let d = lu.solve(force).ok_or(NwError::SingularSystem)?;
    if d.iter().all(|x| x.is_finite()) {
        Ok(d)
    } else {
        Err(NwError::SingularSystem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::{AeroCoefficients, AeroSettings, QuasiSteadyAero, SkewApproach};
    use crate::elements::GirderFrame;
    use crate::geometry::BridgeGeometry;
    use crate::math::LoadMatrix;
    use crate::wind::SkewAngles;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn bridge() -> BridgeGeometry {
        BridgeGeometry::curved(5000.0, 1000.0, 11, 14.5, &[300.0, 500.0, 700.0], 0.0).unwrap()
    }

    fn aero(bridge: &BridgeGeometry) -> QuasiSteadyAero {
        QuasiSteadyAero::new(31.0, 3.5, AeroCoefficients::default(), bridge.g_nodes())
    }

    /// Zero stiffness everywhere
    struct Floppy;

    impl StiffnessProvider for Floppy {
        fn global_stiffness(&self, geometry: &dyn GeometryProvider, _alpha: &[f64]) -> NwResult<Mat> {
            let n = 6 * (geometry.g_nodes().len() + geometry.p_nodes().len());
            Ok(Mat::zeros(n, n))
        }
    }

    /// Returns a matrix of the wrong order
    struct Truncated;

    impl StiffnessProvider for Truncated {
        fn global_stiffness(&self, _geometry: &dyn GeometryProvider, _alpha: &[f64]) -> NwResult<Mat> {
            Ok(Mat::identity(6, 6))
        }
    }

    /// Unit lateral load at every node regardless of wind
    struct UnitLateral;

    impl AeroLoadProvider for UnitLateral {
        fn load_matrices(
            &self,
            skew: &SkewAngles,
            _frames: &[Mat3],
            _speed: &[f64],
            _settings: &AeroSettings,
        ) -> NwResult<std::vec::Vec<LoadMatrix>> {
            let mut pb = LoadMatrix::zeros();
            pb[(1, 0)] = 2.0;
            Ok(vec![pb; skew.len()])
        }
    }

    #[test]
    fn test_zero_wind_gives_zero_displacement() {
        let bridge = bridge();
        let frame = GirderFrame::default();
        let aero = aero(&bridge);
        let solver = StaticWindSolver::new(&bridge, &frame, &aero);
        let wind = NodeWindState::horizontal(vec![0.0; 11], FRAC_PI_2).unwrap();
        let response = solver.solve(&wind, &StaticWindOptions::default()).unwrap();

        assert!(response.displacement_vector.iter().all(|d| *d == 0.0));
        assert_eq!(response.g_node_coor, *bridge.g_nodes());
        assert_eq!(response.p_node_coor, *bridge.p_nodes());
    }

    #[test]
    fn test_lateral_wind_pushes_girder_downwind() {
        let bridge = bridge();
        let frame = GirderFrame::default();
        let aero = aero(&bridge);
        let solver = StaticWindSolver::new(&bridge, &frame, &aero);
        let frames = bridge.local_frames(&[0.0; 11]).unwrap();
        // wind along each node's local y
        let beta_0: std::vec::Vec<f64> = frames.iter().map(|f| f[(1, 1)].atan2(f[(1, 0)])).collect();
        let wind = NodeWindState::new(vec![30.0; 11], beta_0, vec![0.0; 11]).unwrap();
        let response = solver
            .solve(&wind, &StaticWindOptions::default().with_n_aero_coef(3))
            .unwrap();

        let mid = response.displacements[5];
        let local_y = frames[5].row(1).transpose();
        assert!(mid.translation().dot(&local_y) > 0.0);
        assert_eq!(response.displacements.len(), 14);
        assert_relative_eq!(
            response.g_node_coor.coords()[5],
            bridge.g_nodes().coords()[5] + mid.translation(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_linear_in_load() {
        let bridge = bridge();
        let frame = GirderFrame::default();
        let solver = StaticWindSolver::new(&bridge, &frame, &UnitLateral);
        let one = NodeWindState::horizontal(vec![1.0; 11], 0.0).unwrap();
        let two = NodeWindState::horizontal(vec![2.0; 11], 0.0).unwrap();
        let opts = StaticWindOptions::default();

        let d1 = solver.solve(&one, &opts).unwrap().displacement_vector;
        let d2 = solver.solve(&two, &opts).unwrap().displacement_vector;
        assert_relative_eq!(d2, d1 * 2.0, max_relative = 1e-9, epsilon = 1e-15);
    }

    #[test]
    fn test_batched_cases_match_single_solves() {
        let bridge = bridge();
        let frame = GirderFrame::default();
        let aero = aero(&bridge);
        let solver = StaticWindSolver::new(&bridge, &frame, &aero);
        let speed = CaseField::from_fn(2, 11, |c, n| 20.0 + 5.0 * c as f64 + n as f64);
        let beta = CaseField::from_element(2, 11, 1.2);
        let theta = CaseField::zeros(2, 11);
        let opts = StaticWindOptions::default().with_skew_approach(SkewApproach::TwoD);

        let batch = solver.solve_cases(&speed, &beta, &theta, &opts).unwrap();
        let single = solver
            .solve(&NodeWindState::from_cases(&speed, &beta, &theta, 1).unwrap(), &opts)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_relative_eq!(batch[1].displacement_vector, single.displacement_vector, max_relative = 1e-12);
    }

    #[test]
    fn test_singular_system() {
        let bridge = bridge();
        let aero = aero(&bridge);
        let solver = StaticWindSolver::new(&bridge, &Floppy, &aero);
        let wind = NodeWindState::horizontal(vec![10.0; 11], 0.0).unwrap();

        assert!(matches!(
            solver.solve(&wind, &StaticWindOptions::default()),
            Err(NwError::SingularSystem)
        ));
    }

    #[test]
    fn test_shape_checks() {
        let bridge = bridge();
        let frame = GirderFrame::default();
        let aero = aero(&bridge);
        let wind = NodeWindState::horizontal(vec![10.0; 11], 0.0).unwrap();

        let truncated = StaticWindSolver::new(&bridge, &Truncated, &aero);
        assert!(matches!(
            truncated.solve(&wind, &StaticWindOptions::default()),
            Err(NwError::ShapeMismatch { .. })
        ));

        let solver = StaticWindSolver::new(&bridge, &frame, &aero);
        let short = NodeWindState::horizontal(vec![10.0; 10], 0.0).unwrap();
        assert!(matches!(
            solver.solve(&short, &StaticWindOptions::default()),
            Err(NwError::ShapeMismatch { .. })
        ));
        assert!(solver
            .solve(&wind, &StaticWindOptions::default().with_n_aero_coef(5))
            .is_err());
    }
}

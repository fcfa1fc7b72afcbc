//! Mathematical utilities for the structural and wind calculations
//!
//! Global structural axes are right-handed with Z pointing up. Local frames
//! are stored as direction cosine matrices whose rows are the local x, y and
//! z axes expressed in global coordinates, so `local = R * global`.

pub mod angles;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6x3, SMatrix, Vector3};

use crate::error::{NwError, NwResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for frame member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// Aerodynamic load matrix of one node: 6 DOFs by 3 wind components (u, v, w)
pub type LoadMatrix = Matrix6x3<f64>;

const PARALLEL_TOL: f64 = 1e-10;

/// Direction cosine matrix of a local frame whose x-axis follows `tangent`,
/// rotated by `rotation` (radians) about that axis.
///
/// Without rotation the local y-axis is horizontal (`Z x tangent`) and the
/// local z-axis completes the right-handed triad. Vertical tangents use
/// global Y as the reference for local y.
pub fn frame_from_tangent(tangent: &Vec3, rotation: f64) -> NwResult<Mat3> {
    let length = tangent.norm();
    if length < PARALLEL_TOL {
        return Err(NwError::InvalidInput(
            "cannot build a local frame from a zero-length tangent".to_string(),
        ));
    }
    let x = tangent / length;

    let horizontal = Vec3::z().cross(&x);
    let y = if horizontal.norm() < PARALLEL_TOL {
        Vec3::y()
    } else {
        horizontal.normalize()
    };
    let z = x.cross(&y);

    let (y, z) = if rotation.abs() > PARALLEL_TOL {
        let (sin_r, cos_r) = rotation.sin_cos();
        (y * cos_r + z * sin_r, -y * sin_r + z * cos_r)
    } else {
        (y, z)
    };

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Direction cosine matrix of a frame member running from `i_node` to `j_node`
pub fn member_direction_cosines(i_node: &Vec3, j_node: &Vec3, rotation: f64) -> NwResult<Mat3> {
    frame_from_tangent(&(j_node - i_node), rotation).map_err(|_| {
        NwError::InvalidInput(format!(
            "member has zero length between {:?} and {:?}",
            i_node.as_slice(),
            j_node.as_slice()
        ))
    })
}

/// Expand a 3x3 direction cosine matrix to the 12x12 member transformation
pub fn member_transformation_matrix(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(r);
    }
    t
}

/// Local stiffness matrix of a 3D Euler-Bernoulli frame member
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let mut k = Mat12::zeros();

    // Axial and torsion: two-node bars on DOFs 0/6 and 3/9
    for (dof, stiffness) in [(0, e * a / l), (3, g * j / l)] {
        k[(dof, dof)] = stiffness;
        k[(dof + 6, dof + 6)] = stiffness;
        k[(dof, dof + 6)] = -stiffness;
        k[(dof + 6, dof)] = -stiffness;
    }

    // Bending in the local x-y plane (v, theta_z) and x-z plane (w, theta_y).
    // The x-z plane has the opposite rotation sign convention.
    for (v, theta, ei, sign) in [(1, 5, e * iz, 1.0), (2, 4, e * iy, -1.0)] {
        let k_vv = 12.0 * ei / l.powi(3);
        let k_vt = sign * 6.0 * ei / l.powi(2);
        let k_tt = 4.0 * ei / l;
        let k_tt_far = 2.0 * ei / l;

        let (vi, ti, vj, tj) = (v, theta, v + 6, theta + 6);

        k[(vi, vi)] = k_vv;
        k[(vj, vj)] = k_vv;
        k[(vi, vj)] = -k_vv;
        k[(vj, vi)] = -k_vv;

        for (row, col, value) in [
            (vi, ti, k_vt),
            (vi, tj, k_vt),
            (vj, ti, -k_vt),
            (vj, tj, -k_vt),
        ] {
            k[(row, col)] = value;
            k[(col, row)] = value;
        }

        k[(ti, ti)] = k_tt;
        k[(tj, tj)] = k_tt;
        k[(ti, tj)] = k_tt_far;
        k[(tj, ti)] = k_tt_far;
    }

    k
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_along_global_x() {
        let r = frame_from_tangent(&Vec3::new(10.0, 0.0, 0.0), 0.0).unwrap();

        // local x = X, local y = Y, local z = Z
        assert_relative_eq!(r, Mat3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_along_global_y() {
        let r = frame_from_tangent(&Vec3::new(0.0, 5.0, 0.0), 0.0).unwrap();

        assert_relative_eq!(r[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_member_frame_is_orthonormal() {
        let r = member_direction_cosines(&Vec3::new(0.0, 0.0, 10.0), &Vec3::zeros(), 0.0).unwrap();

        assert_relative_eq!(r[(0, 2)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(r * r.transpose(), Mat3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_member_axis() {
        let r = frame_from_tangent(&Vec3::x(), std::f64::consts::FRAC_PI_2).unwrap();

        // local y turns into global Z
        assert_relative_eq!(r[(1, 2)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[(2, 1)], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_member_is_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(member_direction_cosines(&p, &p, 0.0).is_err());
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = member_local_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0);

        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_local_stiffness_cantilever_tip() {
        // Tip deflection of a cantilever: P L^3 / (3 E I)
        let (e, iz, l, p) = (200e9, 2e-4, 10.0, 1000.0);
        let k = member_local_stiffness(e, 77e9, 0.01, 1e-4, iz, 1e-5, l);

        let free = [7, 11];
        let mut k_ff = Mat::zeros(2, 2);
        for (a, &ra) in free.iter().enumerate() {
            for (b, &rb) in free.iter().enumerate() {
                k_ff[(a, b)] = k[(ra, rb)];
            }
        }
        let d = solve_linear_system(&k_ff, &Vec::from_vec(vec![p, 0.0])).unwrap();

        assert_relative_eq!(d[0], p * l.powi(3) / (3.0 * e * iz), max_relative = 1e-9);
    }

    #[test]
    fn test_transformation_blocks() {
        let r = frame_from_tangent(&Vec3::new(1.0, 1.0, 0.0), 0.3).unwrap();
        let t = member_transformation_matrix(&r);

        assert_relative_eq!(t.fixed_view::<3, 3>(9, 9).into_owned(), r, epsilon = 1e-15);
        assert_relative_eq!(t.fixed_view::<3, 3>(0, 3).into_owned(), Mat3::zeros());
    }
}

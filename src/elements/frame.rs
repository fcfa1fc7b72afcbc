//! Global stiffness of the girder-on-pontoons frame model

use serde::{Deserialize, Serialize};

use super::{Material, Section, SpringSupport};
use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::GeometryProvider;
use crate::math::{self, Mat, Mat12, Vec3};

/// Provider of the global stiffness matrix.
///
/// DOFs are ordered g-nodes first then p-nodes, 6 per node
/// `[DX, DY, DZ, RX, RY, RZ]` in global axes.
pub trait StiffnessProvider {
    fn global_stiffness(&self, geometry: &dyn GeometryProvider, alpha: &[f64]) -> NwResult<Mat>;
}

/// 3D frame model: girder members between consecutive g-nodes, a vertical
/// column from each pontoon's g-node down to its p-node, springs at the
/// pontoons and at both girder ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GirderFrame {
    pub girder_material: Material,
    pub girder_section: Section,
    pub column_material: Material,
    pub column_section: Section,
    pub pontoon_spring: SpringSupport,
    pub abutment_spring: SpringSupport,
}

impl Default for GirderFrame {
    fn default() -> Self {
        Self {
            girder_material: Material::steel(),
            girder_section: Section::girder(),
            column_material: Material::steel(),
            column_section: Section::pipe(3.0, 0.04),
            pontoon_spring: SpringSupport::pontoon(),
            abutment_spring: SpringSupport::abutment(),
        }
    }
}

impl GirderFrame {
    pub fn with_pontoon_spring(mut self, spring: SpringSupport) -> Self {
        self.pontoon_spring = spring;
        self
    }

    pub fn with_abutment_spring(mut self, spring: SpringSupport) -> Self {
        self.abutment_spring = spring;
        self
    }

    /// Global stiffness of one member, `T^T k T`
    fn member_global_stiffness(
        material: &Material,
        section: &Section,
        i_node: &Vec3,
        j_node: &Vec3,
        rotation: f64,
    ) -> NwResult<Mat12> {
        let r = math::member_direction_cosines(i_node, j_node, rotation)?;
        let k_local = math::member_local_stiffness(
            material.e,
            material.g,
            section.a,
            section.iy,
            section.iz,
            section.j,
            (j_node - i_node).norm(),
        );
        let t = math::member_transformation_matrix(&r);
        Ok(t.transpose() * k_local * t)
    }
}

impl StiffnessProvider for GirderFrame {
    fn global_stiffness(&self, geometry: &dyn GeometryProvider, alpha: &[f64]) -> NwResult<Mat> {
        let g = geometry.g_nodes().coords();
        let p = geometry.p_nodes().coords();
        let hangers = geometry.pontoon_girder_nodes();
        ensure_len("torsional rotations alpha", g.len(), alpha.len())?;
        ensure_len("pontoon girder nodes", p.len(), hangers.len())?;
        if g.len() < 2 {
            return Err(NwError::shape("girder nodes (minimum)", 2, g.len()));
        }
        let on_pontoons = !hangers.is_empty() && self.pontoon_spring.is_supported();
        if !self.abutment_spring.is_supported() && !on_pontoons {
            return Err(NwError::InvalidInput(
                "frame has no restrained DOF at the abutments or the pontoons".to_string(),
            ));
        }

        let n_dofs = (g.len() + p.len()) * 6;
        let mut k_global = Mat::zeros(n_dofs, n_dofs);

        for (i, pair) in g.windows(2).enumerate() {
            let rotation = 0.5 * (alpha[i] + alpha[i + 1]);
            let k = Self::member_global_stiffness(
                &self.girder_material,
                &self.girder_section,
                &pair[0],
                &pair[1],
                rotation,
            )?;
            assemble_member(&mut k_global, &k, i * 6, (i + 1) * 6);
        }

        for (pontoon, &girder_node) in hangers.iter().enumerate() {
            let top = g.get(girder_node).ok_or_else(|| {
                NwError::InvalidInput(format!(
                    "pontoon {pontoon} hangs from girder node {girder_node}, but there are {} girder nodes",
                    g.len()
                ))
            })?;
            let k = Self::member_global_stiffness(
                &self.column_material,
                &self.column_section,
                top,
                &p[pontoon],
                0.0,
            )?;
            let p_dof = (g.len() + pontoon) * 6;
            assemble_member(&mut k_global, &k, girder_node * 6, p_dof);
            add_spring(&mut k_global, &self.pontoon_spring, p_dof);
        }

        add_spring(&mut k_global, &self.abutment_spring, 0);
        add_spring(&mut k_global, &self.abutment_spring, (g.len() - 1) * 6);

        log::debug!(
            "Assembled global stiffness: {} girder members, {} columns, {} DOFs",
            g.len() - 1,
            p.len(),
            n_dofs
        );
        Ok(k_global)
    }
}

/// Add a 12x12 member matrix into the global matrix at the two node offsets
fn assemble_member(k_global: &mut Mat, k_member: &Mat12, i_dof: usize, j_dof: usize) {
    let offsets = [i_dof, j_dof];
    for (bi, &row0) in offsets.iter().enumerate() {
        for (bj, &col0) in offsets.iter().enumerate() {
            for a in 0..6 {
                for b in 0..6 {
                    k_global[(row0 + a, col0 + b)] += k_member[(bi * 6 + a, bj * 6 + b)];
                }
            }
        }
    }
}

fn add_spring(k_global: &mut Mat, spring: &SpringSupport, dof: usize) {
    for (d, k) in spring.stiffness.iter().enumerate() {
        k_global[(dof + d, dof + d)] += k;
    }
}

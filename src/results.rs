//! Result types of the static wind analysis

use serde::{Deserialize, Serialize};

use crate::geometry::NodeSet;
use crate::math::{Vec, Vec3};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Translational part as a vector
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.dx, self.dy, self.dz)
    }

    pub fn translation_magnitude(&self) -> f64 {
        self.translation().norm()
    }

    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Static response of the bridge to one mean wind case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticResponse {
    /// Displaced girder nodes
    pub g_node_coor: NodeSet,
    /// Displaced pontoon nodes
    pub p_node_coor: NodeSet,
    /// Per-node displacements, g-nodes first then p-nodes
    pub displacements: std::vec::Vec<NodeDisplacement>,
    /// Flat displacement vector, 6 DOFs per node
    pub displacement_vector: Vec,
}

impl StaticResponse {
    /// Number of girder nodes
    pub fn n_g_nodes(&self) -> usize {
        self.g_node_coor.len()
    }

    /// Displacements of the girder nodes only
    pub fn girder_displacements(&self) -> &[NodeDisplacement] {
        &self.displacements[..self.n_g_nodes()]
    }

    /// Largest translation and the index of its node
    pub fn max_displacement(&self) -> (usize, f64) {
        self.displacements
            .iter()
            .map(NodeDisplacement::translation_magnitude)
            .enumerate()
            .fold((0, 0.0), |best, (i, d)| if d > best.1 { (i, d) } else { best })
    }

    pub fn summary(&self) -> AnalysisSummary {
        let (max_disp_node, max_displacement) = self.max_displacement();
        let max_lateral = self
            .girder_displacements()
            .iter()
            .map(|d| d.dy.abs())
            .fold(0.0, f64::max);
        let max_torsion = self
            .girder_displacements()
            .iter()
            .map(|d| d.rx.abs())
            .fold(0.0, f64::max);

        AnalysisSummary {
            max_displacement,
            max_disp_node,
            max_lateral,
            max_torsion,
            num_g_nodes: self.n_g_nodes(),
            num_p_nodes: self.p_node_coor.len(),
            total_dofs: self.displacement_vector.len(),
        }
    }
}

/// Summary of a static wind analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation over all nodes
    pub max_displacement: f64,
    /// Node with maximum translation (g-nodes first, then p-nodes)
    pub max_disp_node: usize,
    /// Largest |DY| of the girder
    pub max_lateral: f64,
    /// Largest |RX| of the girder
    pub max_torsion: f64,
    pub num_g_nodes: usize,
    pub num_p_nodes: usize,
    pub total_dofs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_max_displacement() {
        let displacements = vec![
            NodeDisplacement::from_array([0.0, 0.1, 0.0, 0.0, 0.0, 0.0]),
            NodeDisplacement::from_array([0.3, 0.4, 0.0, 0.01, 0.0, 0.0]),
            NodeDisplacement::from_array([0.0, 0.0, -0.2, 0.0, 0.0, 0.0]),
        ];
        let response = StaticResponse {
            g_node_coor: NodeSet::from_rows(&[[0.0; 3], [1.0, 0.0, 0.0]]),
            p_node_coor: NodeSet::from_rows(&[[1.0, 0.0, -10.0]]),
            displacements,
            displacement_vector: Vec::zeros(18),
        };

        let (node, max) = response.max_displacement();
        assert_eq!(node, 1);
        assert_relative_eq!(max, 0.5, max_relative = 1e-12);
        let summary = response.summary();
        assert_eq!(summary.max_lateral, 0.4);
        assert_eq!(summary.max_torsion, 0.01);
        assert_eq!(summary.num_p_nodes, 1);
    }
}

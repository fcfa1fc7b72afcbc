//! Node sets along the bridge arc and the geometry provider seam

mod bridge;

pub use bridge::BridgeGeometry;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_len, NwError, NwResult};
use crate::math::{self, Mat3, Vec3};

/// `np.allclose`-style tolerances used for coincident endpoints
const ENDPOINT_ATOL: f64 = 1e-8;
const ENDPOINT_RTOL: f64 = 1e-5;

/// An ordered set of 3D points that follow one arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSet {
    coords: Vec<Vec3>,
}

impl NodeSet {
    /// Create a node set from coordinates
    pub fn new(coords: Vec<Vec3>) -> Self {
        Self { coords }
    }

    /// Create a node set from `[X, Y, Z]` rows
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self::new(rows.iter().map(|r| Vec3::new(r[0], r[1], r[2])).collect())
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[Vec3] {
        &self.coords
    }

    pub fn first(&self) -> Option<&Vec3> {
        self.coords.first()
    }

    pub fn last(&self) -> Option<&Vec3> {
        self.coords.last()
    }

    /// Positions along the arc by uniform subdivision of `arc_length`.
    ///
    /// Intermediate spacing of the points is deliberately ignored; only the
    /// order and the total length matter.
    pub fn arc_positions(&self, arc_length: f64) -> Vec<f64> {
        linspace(0.0, arc_length, self.len())
    }

    /// Check that the first and last points coincide with those of `other`
    pub fn check_shared_endpoints(&self, other: &NodeSet) -> NwResult<()> {
        let ends = [
            ("first", self.first(), other.first()),
            ("last", self.last(), other.last()),
        ];
        for (label, a, b) in ends {
            match (a, b) {
                (Some(a), Some(b)) if all_close(a, b) => {}
                (Some(a), Some(b)) => {
                    return Err(NwError::GeometryMismatch(format!(
                        "{label} nodes differ: {:?} vs {:?}",
                        a.as_slice(),
                        b.as_slice()
                    )))
                }
                _ => {
                    return Err(NwError::GeometryMismatch(
                        "cannot compare endpoints of an empty node set".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// New node set with each point moved by the matching offset
    pub fn displaced(&self, offsets: &[Vec3]) -> NwResult<NodeSet> {
        ensure_len("node offsets", self.len(), offsets.len())?;
        Ok(NodeSet::new(
            self.coords.iter().zip(offsets).map(|(c, d)| c + d).collect(),
        ))
    }
}

fn all_close(a: &Vec3, b: &Vec3) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() <= ENDPOINT_ATOL + ENDPOINT_RTOL * y.abs())
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Provider of the bridge geometry: girder nodes, pontoon nodes and the
/// local structural frames of the girder.
pub trait GeometryProvider {
    /// Girder nodes, in order along the arc
    fn g_nodes(&self) -> &NodeSet;

    /// Pontoon (support) nodes
    fn p_nodes(&self) -> &NodeSet;

    /// Total arc length of the girder
    fn arc_length(&self) -> f64;

    /// Girder node each pontoon node hangs from
    fn pontoon_girder_nodes(&self) -> &[usize];

    /// Local structural frame of every girder node for the torsional
    /// rotation `alpha` (one angle per girder node).
    fn local_frames(&self, alpha: &[f64]) -> NwResult<Vec<Mat3>> {
        girder_node_frames(self.g_nodes(), alpha)
    }
}

/// Local frames of the girder nodes.
///
/// The x-axis of a node follows the mean direction of its two adjacent
/// elements (the single adjacent element at the girder ends), then the frame
/// is rotated by the node's `alpha` about that axis.
pub fn girder_node_frames(g_nodes: &NodeSet, alpha: &[f64]) -> NwResult<Vec<Mat3>> {
    ensure_len("torsional rotations alpha", g_nodes.len(), alpha.len())?;
    if g_nodes.len() < 2 {
        return Err(NwError::shape("girder nodes (minimum)", 2, g_nodes.len()));
    }

    let c = g_nodes.coords();
    let element_axes = c
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            let length = d.norm();
            if length < 1e-10 {
                Err(NwError::InvalidInput(
                    "girder has coincident consecutive nodes".to_string(),
                ))
            } else {
                Ok(d / length)
            }
        })
        .collect::<NwResult<Vec<Vec3>>>()?;

    (0..c.len())
        .map(|n| {
            let tangent = match n {
                0 => element_axes[0],
                n if n == c.len() - 1 => element_axes[n - 1],
                n => element_axes[n - 1] + element_axes[n],
            };
            math::frame_from_tangent(&tangent, alpha[n])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let s = linspace(0.0, 5000.0, 3);
        assert_eq!(s, vec![0.0, 2500.0, 5000.0]);
        assert_eq!(linspace(0.0, 1.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(2.0, 1.0, 1), vec![2.0]);
    }

    #[test]
    fn test_endpoint_check() {
        let a = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [5.0, 1.0, 0.0], [10.0, 0.0, 0.0]]);
        let b = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        let c = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [10.0, 0.1, 0.0]]);

        assert!(a.check_shared_endpoints(&b).is_ok());
        assert!(matches!(
            a.check_shared_endpoints(&c),
            Err(NwError::GeometryMismatch(_))
        ));
        assert!(a.check_shared_endpoints(&NodeSet::new(vec![])).is_err());
    }

    #[test]
    fn test_node_frames_follow_mean_tangent() {
        let nodes = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let frames = girder_node_frames(&nodes, &[0.0; 3]).unwrap();

        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(frames[0][(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(frames[1][(0, 0)], h, epsilon = 1e-12);
        assert_relative_eq!(frames[1][(0, 1)], h, epsilon = 1e-12);
        assert_relative_eq!(frames[2][(0, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_node_frames_check_alpha_length() {
        let nodes = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(matches!(
            girder_node_frames(&nodes, &[0.0]),
            Err(NwError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_displaced() {
        let nodes = NodeSet::from_rows(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let moved = nodes
            .displaced(&[Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, -1.0)])
            .unwrap();
        assert_eq!(moved.coords()[1], Vec3::new(1.0, 0.0, -1.0));
    }
}

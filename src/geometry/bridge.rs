//! Reference bridge geometry: a horizontally curved girder on pontoons

use serde::{Deserialize, Serialize};

use super::{linspace, GeometryProvider, NodeSet};
use crate::error::{NwError, NwResult};
use crate::math::Vec3;

/// A girder following a circular arc in the horizontal plane, with pontoon
/// nodes directly below selected girder nodes.
///
/// The arc starts at the origin heading along +X and curves towards +Y.
/// An infinite radius gives a straight girder along X.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeGeometry {
    /// Horizontal radius of curvature (m)
    pub radius: f64,
    /// Girder arc length (m)
    pub arc_length: f64,
    /// Height of the girder above sea level (m)
    pub girder_height: f64,
    /// Height of the pontoon nodes (m)
    pub pontoon_height: f64,
    g_nodes: NodeSet,
    p_nodes: NodeSet,
    pontoon_girder_nodes: Vec<usize>,
}

impl BridgeGeometry {
    /// Build the geometry
    ///
    /// # Arguments
    /// * `radius` - Horizontal radius of curvature (`f64::INFINITY` for straight)
    /// * `arc_length` - Girder arc length
    /// * `n_g_nodes` - Number of girder nodes, evenly spaced along the arc
    /// * `girder_height` - Girder height
    /// * `pontoons_s` - Arc positions of the pontoons; each snaps to the nearest girder node
    /// * `pontoon_height` - Height of the pontoon nodes
    pub fn curved(
        radius: f64,
        arc_length: f64,
        n_g_nodes: usize,
        girder_height: f64,
        pontoons_s: &[f64],
        pontoon_height: f64,
    ) -> NwResult<Self> {
        if !(radius > 0.0) {
            return Err(NwError::InvalidInput(format!("radius must be positive, got {radius}")));
        }
        if !(arc_length > 0.0) || !arc_length.is_finite() {
            return Err(NwError::InvalidInput(format!(
                "arc length must be positive and finite, got {arc_length}"
            )));
        }
        if n_g_nodes < 2 {
            return Err(NwError::shape("girder nodes (minimum)", 2, n_g_nodes));
        }

        let g_nodes = Self::nodes_on_arc(radius, arc_length, n_g_nodes, girder_height);
        let spacing = arc_length / (n_g_nodes - 1) as f64;

        let mut pontoon_girder_nodes = Vec::with_capacity(pontoons_s.len());
        let mut p_coords = Vec::with_capacity(pontoons_s.len());
        for &s in pontoons_s {
            if !(0.0..=arc_length).contains(&s) {
                return Err(NwError::InvalidInput(format!(
                    "pontoon at s = {s} lies outside the girder arc [0, {arc_length}]"
                )));
            }
            let g = (s / spacing).round() as usize;
            let above = g_nodes.coords()[g];
            pontoon_girder_nodes.push(g);
            p_coords.push(Vec3::new(above.x, above.y, pontoon_height));
        }

        Ok(Self {
            radius,
            arc_length,
            girder_height,
            pontoon_height,
            g_nodes,
            p_nodes: NodeSet::new(p_coords),
            pontoon_girder_nodes,
        })
    }

    /// Points evenly spaced along the same arc as the girder.
    ///
    /// Used for the sparse reference (weather model) grid, whose endpoints
    /// then coincide with the girder endpoints.
    pub fn reference_nodes(&self, n_nodes: usize) -> NodeSet {
        Self::nodes_on_arc(self.radius, self.arc_length, n_nodes, self.girder_height)
    }

    fn nodes_on_arc(radius: f64, arc_length: f64, n: usize, z: f64) -> NodeSet {
        let coords = linspace(0.0, arc_length, n)
            .into_iter()
            .map(|s| {
                if radius.is_infinite() {
                    Vec3::new(s, 0.0, z)
                } else {
                    let phi = s / radius;
                    Vec3::new(radius * phi.sin(), radius * (1.0 - phi.cos()), z)
                }
            })
            .collect();
        NodeSet::new(coords)
    }
}

impl GeometryProvider for BridgeGeometry {
    fn g_nodes(&self) -> &NodeSet {
        &self.g_nodes
    }

    fn p_nodes(&self) -> &NodeSet {
        &self.p_nodes
    }

    fn arc_length(&self) -> f64 {
        self.arc_length
    }

    fn pontoon_girder_nodes(&self) -> &[usize] {
        &self.pontoon_girder_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_bridge() {
        let bridge = BridgeGeometry::curved(f64::INFINITY, 100.0, 5, 14.5, &[50.0], 0.0).unwrap();

        assert_eq!(bridge.g_nodes().len(), 5);
        assert_relative_eq!(bridge.g_nodes().coords()[2].x, 50.0);
        assert_eq!(bridge.pontoon_girder_nodes(), &[2]);
        assert_eq!(bridge.p_nodes().coords()[0], Vec3::new(50.0, 0.0, 0.0));
    }

    #[test]
    fn test_curved_bridge_keeps_radius() {
        let r = 5000.0;
        let bridge = BridgeGeometry::curved(r, 5000.0, 11, 14.5, &[], 0.0).unwrap();
        let centre = Vec3::new(0.0, r, 14.5);

        for p in bridge.g_nodes().coords() {
            assert_relative_eq!((p - centre).norm(), r, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_reference_nodes_share_endpoints() {
        let bridge = BridgeGeometry::curved(5000.0, 5000.0, 101, 14.5, &[], 0.0).unwrap();
        let reference = bridge.reference_nodes(11);

        assert_eq!(reference.len(), 11);
        assert!(bridge.g_nodes().check_shared_endpoints(&reference).is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(BridgeGeometry::curved(-1.0, 100.0, 5, 0.0, &[], 0.0).is_err());
        assert!(BridgeGeometry::curved(100.0, 100.0, 1, 0.0, &[], 0.0).is_err());
        assert!(BridgeGeometry::curved(100.0, 100.0, 5, 0.0, &[120.0], 0.0).is_err());
    }
}

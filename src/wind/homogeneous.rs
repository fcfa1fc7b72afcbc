//! Homogeneous reference wind

use serde::{Deserialize, Serialize};

use crate::geometry::NodeSet;

/// Provider of the homogeneous reference wind at the girder nodes
pub trait HomogeneousWind {
    /// Mean wind speed at each node (m/s)
    fn mean_speed(&self, nodes: &NodeSet) -> Vec<f64>;

    /// Mean wind azimuth at each node (rad)
    fn mean_direction(&self, nodes: &NodeSet) -> Vec<f64>;
}

/// Logarithmic mean wind profile with a single direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogProfileWind {
    /// Mean wind speed at the reference height (m/s)
    pub reference_speed: f64,
    /// Reference height (m)
    pub reference_height: f64,
    /// Terrain roughness length z0 (m)
    pub roughness_length: f64,
    /// Heights below this are evaluated at this height (m)
    pub min_height: f64,
    /// Azimuth the wind blows towards (rad)
    pub beta_0: f64,
}

impl LogProfileWind {
    pub fn new(reference_speed: f64, reference_height: f64, roughness_length: f64, beta_0: f64) -> Self {
        Self {
            reference_speed,
            reference_height,
            roughness_length,
            min_height: 2.0,
            beta_0,
        }
    }

    /// Set the minimum evaluation height
    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    /// Mean wind speed at height `z`
    pub fn speed_at_height(&self, z: f64) -> f64 {
        let z = z.max(self.min_height).max(self.roughness_length);
        self.reference_speed * (z / self.roughness_length).ln()
            / (self.reference_height / self.roughness_length).ln()
    }
}

impl Default for LogProfileWind {
    fn default() -> Self {
        Self::new(30.0, 10.0, 0.01, 0.0)
    }
}

impl HomogeneousWind for LogProfileWind {
    fn mean_speed(&self, nodes: &NodeSet) -> Vec<f64> {
        nodes.coords().iter().map(|p| self.speed_at_height(p.z)).collect()
    }

    fn mean_direction(&self, nodes: &NodeSet) -> Vec<f64> {
        vec![self.beta_0; nodes.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_height_gives_reference_speed() {
        let wind = LogProfileWind::new(25.0, 10.0, 0.01, 0.0);
        assert_relative_eq!(wind.speed_at_height(10.0), 25.0, max_relative = 1e-12);
        assert!(wind.speed_at_height(14.5) > 25.0);
        assert_relative_eq!(wind.speed_at_height(0.0), wind.speed_at_height(2.0));
    }

    #[test]
    fn test_uniform_along_level_girder() {
        let wind = LogProfileWind::default();
        let nodes = NodeSet::from_rows(&[[0.0, 0.0, 14.5], [100.0, 0.0, 14.5]]);
        let u = wind.mean_speed(&nodes);

        assert_eq!(u[0], u[1]);
        assert_eq!(wind.mean_direction(&nodes), vec![0.0, 0.0]);
    }
}

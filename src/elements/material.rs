//! Material properties

use serde::{Deserialize, Serialize};

/// Linear elastic material of a frame member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
}

impl Material {
    pub fn new(e: f64, g: f64) -> Self {
        Self { e, g }
    }

    /// Isotropic material from Poisson's ratio, G = E / (2 (1 + nu))
    pub fn isotropic(e: f64, nu: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)))
    }

    /// Structural steel of the girder and columns
    pub fn steel() -> Self {
        Self::isotropic(210e9, 0.3)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(200e9, 0.3);
        assert_relative_eq!(mat.g, 200e9 / 2.6, max_relative = 1e-12);
    }

    #[test]
    fn test_steel_properties() {
        let steel = Material::steel();
        assert_eq!(steel.e, 210e9);
        assert_relative_eq!(steel.g, 80.769e9, max_relative = 1e-4);
    }
}

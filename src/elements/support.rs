//! Spring supports

use serde::{Deserialize, Serialize};

/// Uncoupled linear springs on the 6 DOFs of a node, in global axes
/// `[DX, DY, DZ, RX, RY, RZ]` (N/m and Nm/rad)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringSupport {
    pub stiffness: [f64; 6],
}

impl SpringSupport {
    pub fn new(stiffness: [f64; 6]) -> Self {
        Self { stiffness }
    }

    /// No restraint
    pub fn free() -> Self {
        Self::new([0.0; 6])
    }

    /// Same stiffness on every translation and every rotation
    pub fn uniform(translational: f64, rotational: f64) -> Self {
        Self::new([
            translational,
            translational,
            translational,
            rotational,
            rotational,
            rotational,
        ])
    }

    /// Stiff abutment, close to a fixed support
    pub fn abutment() -> Self {
        Self::uniform(1e12, 1e14)
    }

    /// Floating pontoon: hydrostatic heave and pitch/roll restoring with
    /// soft horizontal mooring
    pub fn pontoon() -> Self {
        Self::new([1e6, 1e6, 8e6, 2e9, 1e9, 1e8])
    }

    /// Whether any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.stiffness.iter().any(|k| *k > 0.0)
    }
}

impl Default for SpringSupport {
    fn default() -> Self {
        Self::free()
    }
}

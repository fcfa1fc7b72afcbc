//! Section properties for frame members

use serde::{Deserialize, Serialize};

/// Cross-section properties for frame members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Thin-walled closed box of constant wall thickness.
    ///
    /// Bending about local y is vertical bending (`depth` direction),
    /// bending about local z is lateral bending (`width` direction).
    pub fn box_section(width: f64, depth: f64, wall_thickness: f64) -> Self {
        let t = wall_thickness;
        let (b, d) = (width, depth);
        let (bi, di) = (b - 2.0 * t, d - 2.0 * t);

        let a = b * d - bi * di;
        let iy = (b * d.powi(3) - bi * di.powi(3)) / 12.0;
        let iz = (d * b.powi(3) - di * bi.powi(3)) / 12.0;

        // Bredt: 4 Am² t / s
        let am = (b - t) * (d - t);
        let s = 2.0 * (b + d) - 4.0 * t;
        let j = 4.0 * am.powi(2) * t / s;

        Self { a, iy, iz, j }
    }

    /// Hollow circular section, used for the pontoon columns
    pub fn pipe(outer_diameter: f64, wall_thickness: f64) -> Self {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;
        let pi = std::f64::consts::PI;

        let i = pi * (r_o.powi(4) - r_i.powi(4)) / 4.0;
        Self {
            a: pi * (r_o.powi(2) - r_i.powi(2)),
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }

    /// Default floating bridge girder: a 31 m by 3.5 m steel box
    pub fn girder() -> Self {
        Self::box_section(31.0, 3.5, 0.05)
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::girder()
    }
}

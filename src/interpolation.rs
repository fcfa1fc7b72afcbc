//! Arc-length interpolation from a sparse reference grid to the girder nodes
//!
//! Both node sets are assumed to follow the same arc. Each set is given a
//! position along the arc by uniform subdivision of the total arc length and
//! values are interpolated linearly in that single coordinate. A 2D scheme is
//! not used: the girder nodes need not lie inside the convex hull of the
//! sparse reference points and 2D extrapolation is unreliable.

use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::NodeSet;
use crate::math::{angles, Mat};

/// Linear interpolator along a shared arc
#[derive(Debug, Clone)]
pub struct ArcInterpolator {
    reference_s: Vec<f64>,
    target_s: Vec<f64>,
}

impl ArcInterpolator {
    /// Create an interpolator from the reference nodes onto the target nodes.
    ///
    /// Fails with [`NwError::GeometryMismatch`] unless the first and last
    /// nodes of both sets coincide.
    pub fn new(reference: &NodeSet, target: &NodeSet, arc_length: f64) -> NwResult<Self> {
        if reference.len() < 2 {
            return Err(NwError::shape("reference nodes (minimum)", 2, reference.len()));
        }
        if target.is_empty() {
            return Err(NwError::shape("target nodes (minimum)", 1, 0));
        }
        target.check_shared_endpoints(reference)?;

        Ok(Self {
            reference_s: reference.arc_positions(arc_length),
            target_s: target.arc_positions(arc_length),
        })
    }

    pub fn n_reference(&self) -> usize {
        self.reference_s.len()
    }

    pub fn n_target(&self) -> usize {
        self.target_s.len()
    }

    /// Interpolate one field known at the reference nodes
    pub fn interpolate(&self, field: &[f64]) -> NwResult<Vec<f64>> {
        ensure_len("reference field", self.n_reference(), field.len())?;
        Ok(self
            .target_s
            .iter()
            .map(|&s| self.interpolate_at(field, s))
            .collect())
    }

    /// Interpolate a batch of fields, one case per row:
    /// `(n_cases, n_reference)` -> `(n_cases, n_target)`
    pub fn interpolate_cases(&self, fields: &Mat) -> NwResult<Mat> {
        ensure_len("reference field columns", self.n_reference(), fields.ncols())?;
        let mut out = Mat::zeros(fields.nrows(), self.n_target());
        for (case, row) in fields.row_iter().enumerate() {
            let row: Vec<f64> = row.iter().copied().collect();
            for (t, &s) in self.target_s.iter().enumerate() {
                out[(case, t)] = self.interpolate_at(&row, s);
            }
        }
        Ok(out)
    }

    /// Interpolate direction fields (radians), one case per row.
    ///
    /// Cosines and sines are interpolated separately and recombined into
    /// `[0, 2π)`, so directions either side of the wrap blend correctly.
    pub fn interpolate_directions(&self, directions: &Mat) -> NwResult<Mat> {
        let cos = self.interpolate_cases(&directions.map(f64::cos))?;
        let sin = self.interpolate_cases(&directions.map(f64::sin))?;
        Ok(cos.zip_map(&sin, angles::from_cos_sin_to_0_2pi))
    }

    fn interpolate_at(&self, field: &[f64], s: f64) -> f64 {
        let xs = &self.reference_s;
        // first segment whose right end is at or beyond s
        let seg = xs[1..]
            .partition_point(|&x| x < s)
            .min(xs.len() - 2);
        let (x0, x1) = (xs[seg], xs[seg + 1]);
        let (y0, y1) = (field[seg], field[seg + 1]);

        if s <= x0 {
            return y0;
        }
        if s >= x1 {
            return y1;
        }
        let t = (s - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }
}

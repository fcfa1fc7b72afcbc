//! Nonhomogeneous Wind - static response of long-span bridges to a mean wind
//! field that varies along the span
//!
//! This library takes sparse weather-model wind estimates along a bridge and
//! computes the static structural response:
//! - Arc-length interpolation from the reference grid to the girder nodes
//! - Mean- or energy-preserving nonhomogeneous wind speed fields
//! - Skew angles of the wind relative to the local girder axes
//! - Linear static solve of the girder-on-pontoons frame under the mean wind
//! - Direction-dependent turbulence intensity tables at the girder nodes
//!
//! ## Example
//! ```rust
//! use nonhomogeneous_wind::prelude::*;
//!
//! let bridge = BridgeGeometry::curved(5000.0, 1000.0, 21, 14.5, &[250.0, 500.0, 750.0], 0.0).unwrap();
//! let frame = GirderFrame::default();
//! let aero = QuasiSteadyAero::new(31.0, 3.5, AeroCoefficients::default(), bridge.g_nodes());
//!
//! // Weather model speeds at 5 reference points along the same arc
//! let reference = bridge.reference_nodes(5);
//! let interpolator = ArcInterpolator::new(&reference, bridge.g_nodes(), bridge.arc_length).unwrap();
//! let synthesizer = WindFieldSynthesizer::new(interpolator);
//! let homogeneous = LogProfileWind::default().mean_speed(bridge.g_nodes());
//! let speed = synthesizer
//!     .mean_speed_single(&[18.0, 22.0, 27.0, 24.0, 20.0], &homogeneous, NormalizationPolicy::Mean)
//!     .unwrap();
//!
//! // Wind towards +Y at every node
//! let wind = NodeWindState::horizontal(speed, std::f64::consts::FRAC_PI_2).unwrap();
//! let solver = StaticWindSolver::new(&bridge, &frame, &aero);
//! let response = solver.solve(&wind, &StaticWindOptions::default()).unwrap();
//!
//! let summary = response.summary();
//! println!("max displacement {:.3} m", summary.max_displacement);
//! ```

pub mod aero;
pub mod analysis;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod math;
pub mod results;
pub mod turbulence;
pub mod wind;

// Re-export common types
pub mod prelude {
    pub use crate::aero::{
        AeroCoefficients, AeroLoadProvider, AeroMethod, AeroSettings, QuasiSteadyAero, SkewApproach,
    };
    pub use crate::analysis::{StaticWindOptions, StaticWindSolver, TurbulenceConfig};
    pub use crate::elements::{GirderFrame, Material, Section, SpringSupport, StiffnessProvider};
    pub use crate::error::{NwError, NwResult};
    pub use crate::geometry::{BridgeGeometry, GeometryProvider, NodeSet};
    pub use crate::interpolation::ArcInterpolator;
    pub use crate::results::{AnalysisSummary, NodeDisplacement, StaticResponse};
    pub use crate::turbulence::{
        CachePolicy, IntensityModel, IntensityTable, SectorTable, TurbulenceDatabase,
        TurbulenceRatios, TurbulenceStore, SECTORS,
    };
    pub use crate::wind::{
        skew_angles, CaseField, HomogeneousWind, LogProfileWind, NodeWindState,
        NormalizationPolicy, SkewAngles, WindFieldSynthesizer,
    };
}

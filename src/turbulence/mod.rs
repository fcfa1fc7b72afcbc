//! Direction-dependent turbulence intensity along the girder
//!
//! Reference-node predictions of the along-wind turbulence intensity Iu,
//! one value per 1° wind sector, are moved to the bridge height with a
//! transfer function and interpolated onto the girder nodes. The resulting
//! table is persisted and looked up by nearest sector.

mod database;
mod spectra;
mod store;
mod table;

pub use database::{nearest_sector, CachePolicy, TurbulenceDatabase};
pub use spectra::{cross_spectra, kaimal_auto_spectra, SpectralParameters};
pub use store::{ArtifactNames, TurbulenceStore};
pub use table::{transfer_to_height, IntensityTable, SectorTable};

use serde::{Deserialize, Serialize};

/// Number of wind direction sectors of the intensity tables
pub const SECTORS: usize = 360;

/// Source of the turbulence intensity predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityModel {
    /// Neural network predictions, moved to the bridge height
    #[serde(rename = "ANN")]
    Ann,
    /// Eurocode EN 1991-1-4 predictions at the bridge height
    #[serde(rename = "EN")]
    En,
}

/// Cross-wind and vertical intensities as fractions of Iu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulenceRatios {
    /// Iv / Iu
    pub v: f64,
    /// Iw / Iu
    pub w: f64,
}

impl Default for TurbulenceRatios {
    fn default() -> Self {
        Self { v: 0.75, w: 0.5 }
    }
}

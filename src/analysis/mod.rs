//! Analysis options and the static wind solver

mod static_wind;

pub use static_wind::StaticWindSolver;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aero::{AeroMethod, AeroSettings, SkewApproach};
use crate::error::NwResult;
use crate::turbulence::{ArtifactNames, TurbulenceRatios};

/// Options for the static wind analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticWindOptions {
    /// Variation of the aerodynamic coefficients with skew
    pub aero_method: AeroMethod,
    /// How skew wind is resolved on the section
    pub skew_approach: SkewApproach,
    /// Number of static coefficients, 3 or 6
    pub n_aero_coef: usize,
    /// Torsional rotation of each girder node (rad); empty for none
    pub alpha: Vec<f64>,
}

impl Default for StaticWindOptions {
    fn default() -> Self {
        Self {
            aero_method: AeroMethod::Constant,
            skew_approach: SkewApproach::ThreeD,
            n_aero_coef: 6,
            alpha: Vec::new(),
        }
    }
}

impl StaticWindOptions {
    pub fn with_aero_method(mut self, method: AeroMethod) -> Self {
        self.aero_method = method;
        self
    }

    pub fn with_skew_approach(mut self, approach: SkewApproach) -> Self {
        self.skew_approach = approach;
        self
    }

    pub fn with_n_aero_coef(mut self, n: usize) -> Self {
        self.n_aero_coef = n;
        self
    }

    pub fn with_alpha(mut self, alpha: Vec<f64>) -> Self {
        self.alpha = alpha;
        self
    }

    /// Aerodynamic settings for the load provider
    pub fn aero_settings(&self) -> AeroSettings {
        AeroSettings {
            method: self.aero_method,
            skew_approach: self.skew_approach,
            n_coef: self.n_aero_coef,
        }
    }

    /// Torsional rotations for `n_nodes` girder nodes: zeros when none were given
    pub fn alpha_for(&self, n_nodes: usize) -> Vec<f64> {
        if self.alpha.is_empty() {
            vec![0.0; n_nodes]
        } else {
            self.alpha.clone()
        }
    }

    pub fn from_json_str(json: &str) -> NwResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> NwResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Configuration of the turbulence intensity database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulenceConfig {
    /// Directory holding the prediction files and the built tables
    pub store_dir: PathBuf,
    pub artifacts: ArtifactNames,
    pub ratios: TurbulenceRatios,
}

impl Default for TurbulenceConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("intensities"),
            artifacts: ArtifactNames::default(),
            ratios: TurbulenceRatios::default(),
        }
    }
}

impl TurbulenceConfig {
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    pub fn with_ratios(mut self, ratios: TurbulenceRatios) -> Self {
        self.ratios = ratios;
        self
    }

    pub fn from_json_str(json: &str) -> NwResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> NwResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_json() {
        let opts = StaticWindOptions::from_json_str(r#"{"skew_approach": "2D", "n_aero_coef": 3}"#).unwrap();

        assert_eq!(opts.skew_approach, SkewApproach::TwoD);
        assert_eq!(opts.n_aero_coef, 3);
        assert_eq!(opts.aero_method, AeroMethod::Constant);
        assert_eq!(opts.alpha_for(3), vec![0.0; 3]);
    }

    #[test]
    fn test_options_builder() {
        let opts = StaticWindOptions::default()
            .with_aero_method(AeroMethod::CosineRule)
            .with_alpha(vec![0.01, 0.02]);
        let settings = opts.aero_settings();

        assert_eq!(settings.method, AeroMethod::CosineRule);
        assert_eq!(opts.alpha_for(2), vec![0.01, 0.02]);
    }

    #[test]
    fn test_turbulence_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turbulence.json");
        std::fs::write(&path, r#"{"store_dir": "/tmp/iu", "ratios": {"v": 0.8, "w": 0.6}}"#).unwrap();
        let config = TurbulenceConfig::from_json_file(&path).unwrap();

        assert_eq!(config.store_dir, PathBuf::from("/tmp/iu"));
        assert_eq!(config.ratios.w, 0.6);
        assert_eq!(config.artifacts, ArtifactNames::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(TurbulenceConfig::from_json_str("{ not json").is_err());
    }
}

//! Build, persist and query the girder turbulence intensity table

use serde::{Deserialize, Serialize};

use super::{
    transfer_to_height, IntensityModel, IntensityTable, TurbulenceRatios, TurbulenceStore, SECTORS,
};
use crate::analysis::TurbulenceConfig;
use crate::error::{ensure_len, NwError, NwResult};
use crate::geometry::NodeSet;
use crate::interpolation::ArcInterpolator;

/// Height (m) the bridge-level Eurocode predictions were produced for
pub const PREDICTION_HEIGHT: f64 = 14.5;

/// Whether an existing built table may be reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CachePolicy {
    /// Load the persisted table if there is one, build it otherwise
    #[default]
    UseExisting,
    /// Always rebuild and overwrite the persisted table
    Rebuild,
}

/// Sector of a wind direction: nearest whole degree, with 360° folded onto 0°
pub fn nearest_sector(beta: f64) -> usize {
    (beta.to_degrees().round() as i64).rem_euclid(SECTORS as i64) as usize
}

/// Turbulence intensity of every girder node for any wind direction
#[derive(Debug, Clone)]
pub struct TurbulenceDatabase {
    model: IntensityModel,
    table: IntensityTable,
    ratios: TurbulenceRatios,
}

impl TurbulenceDatabase {
    /// Load or build the intensity table of `model`.
    ///
    /// `g_nodes` are the girder nodes the table is for and must all sit at
    /// [`PREDICTION_HEIGHT`]; `interpolator` maps the reference nodes of the
    /// predictions onto them. A persisted table with a different number of
    /// girder nodes is reported as a [`NwError::ShapeMismatch`]; rebuild it
    /// with [`CachePolicy::Rebuild`].
    pub fn initialize(
        config: &TurbulenceConfig,
        g_nodes: &NodeSet,
        interpolator: &ArcInterpolator,
        model: IntensityModel,
        policy: CachePolicy,
    ) -> NwResult<Self> {
        ensure_len("girder nodes of the interpolator", g_nodes.len(), interpolator.n_target())?;
        if let Some(node) = g_nodes.coords().iter().find(|c| (c.z - PREDICTION_HEIGHT).abs() > 1e-9) {
            return Err(NwError::ConfigurationMismatch(format!(
                "girder node at height {} m but the intensity predictions are for {PREDICTION_HEIGHT} m",
                node.z
            )));
        }
        let store = TurbulenceStore::new(&config.store_dir, config.artifacts.clone());

        if policy == CachePolicy::UseExisting {
            if let Some(table) = store.read_table(model)? {
                ensure_len("girder nodes of the cached intensity table", interpolator.n_target(), table.n_nodes())?;
                log::info!("Loaded {model:?} intensity table from {}", store.table_path(model).display());
                return Ok(Self::from_table(model, table, config.ratios));
            }
        }

        log::info!("Building {model:?} intensity table for {} girder nodes", interpolator.n_target());
        let table = Self::build(&store, interpolator, model)?;
        store.write_table(model, &table)?;
        Ok(Self::from_table(model, table, config.ratios))
    }

    /// Intensity table at the girder nodes from the reference predictions
    pub fn build(
        store: &TurbulenceStore,
        interpolator: &ArcInterpolator,
        model: IntensityModel,
    ) -> NwResult<IntensityTable> {
        let reference = match model {
            IntensityModel::Ann => transfer_to_height(
                &store.read_ann_reference()?,
                &store.read_en_reference()?,
                &store.read_en_bridge()?,
            )?,
            IntensityModel::En => store.read_en_bridge()?,
        };
        ensure_len("reference nodes with predictions", interpolator.n_reference(), reference.n_nodes())?;

        let at_girder = interpolator.interpolate_cases(&reference.sector_matrix())?;
        IntensityTable::from_matrix(at_girder.transpose())
    }

    /// Remove the persisted table of `model` so the next initialization rebuilds it
    pub fn invalidate(store: &TurbulenceStore, model: IntensityModel) -> NwResult<()> {
        if store.remove_table(model)? {
            log::info!("Removed {model:?} intensity table {}", store.table_path(model).display());
        } else {
            log::warn!(
                "No {model:?} intensity table to remove at {}",
                store.table_path(model).display()
            );
        }
        Ok(())
    }

    pub fn from_table(model: IntensityModel, table: IntensityTable, ratios: TurbulenceRatios) -> Self {
        Self {
            model,
            table,
            ratios,
        }
    }

    pub fn model(&self) -> IntensityModel {
        self.model
    }

    pub fn table(&self) -> &IntensityTable {
        &self.table
    }

    pub fn n_nodes(&self) -> usize {
        self.table.n_nodes()
    }

    /// Iu at every girder node for the per-node wind directions `beta_db` (rad)
    pub fn iu(&self, beta_db: &[f64]) -> NwResult<Vec<f64>> {
        ensure_len("wind directions", self.n_nodes(), beta_db.len())?;
        beta_db
            .iter()
            .enumerate()
            .map(|(node, &beta)| {
                if !beta.is_finite() {
                    return Err(NwError::InvalidInput(format!(
                        "wind direction at node {node} is {beta}"
                    )));
                }
                let sector = nearest_sector(beta);
                self.table.iu(node, sector).ok_or_else(|| {
                    NwError::InvariantViolated(format!("no intensity for node {node}, sector {sector}"))
                })
            })
            .collect()
    }

    /// `(Iu, Iv, Iw)` at every girder node
    pub fn intensities(&self, beta_db: &[f64]) -> NwResult<Vec<[f64; 3]>> {
        let TurbulenceRatios { v, w } = self.ratios;
        Ok(self
            .iu(beta_db)?
            .into_iter()
            .map(|iu| [iu, v * iu, w * iu])
            .collect())
    }
}

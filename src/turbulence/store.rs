//! Files of the turbulence intensity database

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{IntensityModel, IntensityTable, SectorTable};
use crate::error::NwResult;

/// File names inside the store directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    /// Network predictions at the reference height
    pub ann_reference: String,
    /// Eurocode predictions at the reference height
    pub en_reference: String,
    /// Eurocode predictions at the bridge height
    pub en_bridge: String,
    /// Built network table at the girder nodes
    pub ann_girder: String,
    /// Built Eurocode table at the girder nodes
    pub en_girder: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            ann_reference: "Iu_48m_ANN_preds.json".to_string(),
            en_reference: "Iu_48m_EN_preds.json".to_string(),
            en_bridge: "Iu_14m_EN_preds.json".to_string(),
            ann_girder: "Iu_14m_ANN_preds_g_nodes.json".to_string(),
            en_girder: "Iu_14m_EN_preds_g_nodes.json".to_string(),
        }
    }
}

/// A directory of prediction inputs and built intensity tables
#[derive(Debug, Clone)]
pub struct TurbulenceStore {
    dir: PathBuf,
    names: ArtifactNames,
}

impl TurbulenceStore {
    pub fn new(dir: impl Into<PathBuf>, names: ArtifactNames) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> &ArtifactNames {
        &self.names
    }

    /// Path of the built table of `model`
    pub fn table_path(&self, model: IntensityModel) -> PathBuf {
        let name = match model {
            IntensityModel::Ann => &self.names.ann_girder,
            IntensityModel::En => &self.names.en_girder,
        };
        self.dir.join(name)
    }

    pub fn read_ann_reference(&self) -> NwResult<SectorTable> {
        read_json(&self.dir.join(&self.names.ann_reference))
    }

    pub fn read_en_reference(&self) -> NwResult<SectorTable> {
        read_json(&self.dir.join(&self.names.en_reference))
    }

    pub fn read_en_bridge(&self) -> NwResult<SectorTable> {
        read_json(&self.dir.join(&self.names.en_bridge))
    }

    /// Persist reference-node predictions under `name`
    pub fn write_sector_table(&self, name: &str, table: &SectorTable) -> NwResult<()> {
        write_json(&self.dir.join(name), table)
    }

    /// The built table of `model`, or `None` when it has not been built
    pub fn read_table(&self, model: IntensityModel) -> NwResult<Option<IntensityTable>> {
        let path = self.table_path(model);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn write_table(&self, model: IntensityModel, table: &IntensityTable) -> NwResult<()> {
        write_json(&self.table_path(model), table)
    }

    /// Delete the built table of `model`. Returns whether a file was removed.
    pub fn remove_table(&self, model: IntensityModel) -> NwResult<bool> {
        let path = self.table_path(model);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> NwResult<T> {
    log::debug!("Reading {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Pretty JSON with four-space indentation
fn write_json<T: Serialize>(path: &Path, value: &T) -> NwResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut ser)?;
    writer.flush()?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat;
    use crate::turbulence::SECTORS;

    #[test]
    fn test_table_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = TurbulenceStore::new(dir.path(), ArtifactNames::default());
        let table = IntensityTable::from_matrix(Mat::from_fn(3, SECTORS, |n, s| 0.1 + 1e-3 * (n + s) as f64)).unwrap();

        assert!(store.read_table(IntensityModel::En).unwrap().is_none());
        store.write_table(IntensityModel::En, &table).unwrap();

        let text = std::fs::read_to_string(store.table_path(IntensityModel::En)).unwrap();
        assert!(text.starts_with("[\n    [\n        0.1"));
        assert_eq!(store.read_table(IntensityModel::En).unwrap(), Some(table));
        assert!(store.read_table(IntensityModel::Ann).unwrap().is_none());
    }

    #[test]
    fn test_remove_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = TurbulenceStore::new(dir.path().join("nested"), ArtifactNames::default());
        let table = IntensityTable::from_matrix(Mat::zeros(1, SECTORS)).unwrap();
        store.write_table(IntensityModel::Ann, &table).unwrap();

        assert!(store.remove_table(IntensityModel::Ann).unwrap());
        assert!(!store.remove_table(IntensityModel::Ann).unwrap());
    }

    #[test]
    fn test_sector_table_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = TurbulenceStore::new(dir.path(), ArtifactNames::default());
        let table = SectorTable::from_rows(vec![vec![0.12; SECTORS]; 2]).unwrap();
        store.write_sector_table("Iu_48m_EN_preds.json", &table).unwrap();

        assert_eq!(store.read_en_reference().unwrap(), table);
        assert!(store.read_ann_reference().is_err());
    }
}

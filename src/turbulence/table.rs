//! Sector tables of turbulence intensity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SECTORS;
use crate::error::{ensure_len, NwError, NwResult};
use crate::math::Mat;

/// On-disk record of one reference node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSectors {
    sector: Vec<usize>,
    #[serde(rename = "Iu")]
    iu: Vec<f64>,
}

/// Iu for every wind sector at a set of reference nodes, keyed by node index.
///
/// Stored as `{"<node>": {"sector": [0, 1, ..., 359], "Iu": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<usize, RawSectors>",
    into = "BTreeMap<usize, RawSectors>"
)]
pub struct SectorTable {
    nodes: BTreeMap<usize, Vec<f64>>,
}

impl SectorTable {
    /// Build a table, checking every node has exactly one value per sector
    pub fn new(nodes: BTreeMap<usize, Vec<f64>>) -> NwResult<Self> {
        for (node, iu) in &nodes {
            if iu.len() != SECTORS {
                return Err(NwError::ConfigurationMismatch(format!(
                    "node {node} has {} sectors, expected {SECTORS}",
                    iu.len()
                )));
            }
        }
        Ok(Self { nodes })
    }

    /// Table with nodes numbered by their position in `rows`
    pub fn from_rows(rows: Vec<Vec<f64>>) -> NwResult<Self> {
        Self::new(rows.into_iter().enumerate().collect())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, node: usize) -> Option<&[f64]> {
        self.nodes.get(&node).map(Vec::as_slice)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.nodes.iter().map(|(n, iu)| (*n, iu.as_slice()))
    }

    /// Values as a `(SECTORS, n_nodes)` matrix, nodes in ascending index.
    ///
    /// Each row is one sector across the reference nodes, ready to be
    /// interpolated along the arc as a batch.
    pub fn sector_matrix(&self) -> Mat {
        let columns: Vec<&Vec<f64>> = self.nodes.values().collect();
        Mat::from_fn(SECTORS, columns.len(), |s, n| columns[n][s])
    }

    fn same_nodes(&self, other: &SectorTable, what: &str) -> NwResult<()> {
        ensure_len(what, self.n_nodes(), other.n_nodes())?;
        if self.nodes.keys().eq(other.nodes.keys()) {
            Ok(())
        } else {
            Err(NwError::ConfigurationMismatch(format!(
                "{what} are not predicted at the same reference nodes"
            )))
        }
    }
}

impl TryFrom<BTreeMap<usize, RawSectors>> for SectorTable {
    type Error = NwError;

    fn try_from(raw: BTreeMap<usize, RawSectors>) -> NwResult<Self> {
        let mut nodes = BTreeMap::new();
        for (node, record) in raw {
            let all_sectors = record.sector.len() == SECTORS
                && record.sector.iter().enumerate().all(|(i, s)| i == *s);
            if !all_sectors {
                return Err(NwError::ConfigurationMismatch(format!(
                    "node {node} must list all {SECTORS} sectors in order"
                )));
            }
            nodes.insert(node, record.iu);
        }
        Self::new(nodes)
    }
}

impl From<SectorTable> for BTreeMap<usize, RawSectors> {
    fn from(table: SectorTable) -> Self {
        table
            .nodes
            .into_iter()
            .map(|(node, iu)| {
                let record = RawSectors {
                    sector: (0..SECTORS).collect(),
                    iu,
                };
                (node, record)
            })
            .collect()
    }
}

/// Move predictions from height Z1 to Z2.
///
/// `ANN(Z2) = ANN(Z1) * EN(Z2) / EN(Z1)` per node and sector: the
/// Eurocode ratio between the two heights carries the direction-dependent
/// terrain roughness over to the network predictions.
pub fn transfer_to_height(
    ann_z1: &SectorTable,
    en_z1: &SectorTable,
    en_z2: &SectorTable,
) -> NwResult<SectorTable> {
    ann_z1.same_nodes(en_z1, "EN predictions at Z1")?;
    ann_z1.same_nodes(en_z2, "EN predictions at Z2")?;

    let mut nodes = BTreeMap::new();
    for (node, ann) in ann_z1.nodes() {
        let (Some(z1), Some(z2)) = (en_z1.get(node), en_z2.get(node)) else {
            return Err(NwError::ConfigurationMismatch(format!(
                "missing EN prediction for node {node}"
            )));
        };
        let moved = ann
            .iter()
            .zip(z1.iter().zip(z2))
            .enumerate()
            .map(|(sector, (a, (e1, e2)))| {
                if *e1 > 0.0 {
                    Ok(a * e2 / e1)
                } else {
                    Err(NwError::InvalidInput(format!(
                        "EN intensity at Z1 is {e1} for node {node}, sector {sector}"
                    )))
                }
            })
            .collect::<NwResult<Vec<f64>>>()?;
        nodes.insert(node, moved);
    }
    SectorTable::new(nodes)
}

/// Iu at every girder node and sector, `(n_nodes, SECTORS)`.
///
/// Stored as a JSON list of rows, one row per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct IntensityTable {
    iu: Mat,
}

impl IntensityTable {
    pub fn from_matrix(iu: Mat) -> NwResult<Self> {
        ensure_len("intensity table sectors", SECTORS, iu.ncols())?;
        Ok(Self { iu })
    }

    pub fn n_nodes(&self) -> usize {
        self.iu.nrows()
    }

    /// Iu of `node` in `sector`
    pub fn iu(&self, node: usize, sector: usize) -> Option<f64> {
        (node < self.iu.nrows() && sector < SECTORS).then(|| self.iu[(node, sector)])
    }

    pub fn matrix(&self) -> &Mat {
        &self.iu
    }
}

impl TryFrom<Vec<Vec<f64>>> for IntensityTable {
    type Error = NwError;

    fn try_from(rows: Vec<Vec<f64>>) -> NwResult<Self> {
        for row in &rows {
            ensure_len("intensity table sectors", SECTORS, row.len())?;
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_matrix(Mat::from_row_slice(rows.len(), SECTORS, &flat))
    }
}

impl From<IntensityTable> for Vec<Vec<f64>> {
    fn from(table: IntensityTable) -> Self {
        table
            .iu
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect()
    }
}

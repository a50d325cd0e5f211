use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::GeoPoint;
use scene::feature::Country;

use crate::energy::{EnergyTable, EnergyTableError};
use crate::manifest::{KIND_BOUNDARIES, KIND_ENERGY, KIND_TRADE};
use crate::package::{AtlasPackage, AtlasPackageError};
use crate::topology::{Topology, TopologyError};
use crate::trade::{TradeTable, TradeTableError};

pub const DEFAULT_BOUNDARY_OBJECT: &str = "countries";

/// Everything the interactive map needs, loaded up front. Loading fails
/// if any dataset the manifest lists fails to read or decode, so a map
/// never comes up over partial data.
#[derive(Debug, Clone, Default)]
pub struct AtlasData {
    pub countries: Vec<Country>,
    pub borders: Vec<Vec<GeoPoint>>,
    pub trade: Option<TradeTable>,
    pub energy: Option<EnergyTable>,
}

#[derive(Debug)]
pub enum AtlasLoadError {
    Package(AtlasPackageError),
    DatasetIo {
        path: PathBuf,
        source: std::io::Error,
    },
    Boundaries {
        dataset_id: String,
        source: TopologyError,
    },
    Trade {
        dataset_id: String,
        source: TradeTableError,
    },
    Energy {
        dataset_id: String,
        source: EnergyTableError,
    },
    MissingBoundaries,
}

impl std::fmt::Display for AtlasLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasLoadError::Package(e) => write!(f, "atlas package error: {e}"),
            AtlasLoadError::DatasetIo { path, source } => {
                write!(f, "failed to read dataset {}: {source}", path.display())
            }
            AtlasLoadError::Boundaries { dataset_id, source } => {
                write!(f, "failed to decode boundaries dataset {dataset_id}: {source}")
            }
            AtlasLoadError::Trade { dataset_id, source } => {
                write!(f, "failed to decode trade dataset {dataset_id}: {source}")
            }
            AtlasLoadError::Energy { dataset_id, source } => {
                write!(f, "failed to decode energy dataset {dataset_id}: {source}")
            }
            AtlasLoadError::MissingBoundaries => {
                write!(f, "manifest lists no boundaries dataset")
            }
        }
    }
}

impl std::error::Error for AtlasLoadError {}

pub fn load_atlas_from_package_dir(root: impl AsRef<Path>) -> Result<AtlasData, AtlasLoadError> {
    let package = AtlasPackage::load(root).map_err(AtlasLoadError::Package)?;
    load_atlas_from_package(&package)
}

pub fn load_atlas_from_package(package: &AtlasPackage) -> Result<AtlasData, AtlasLoadError> {
    let mut data = AtlasData::default();
    let mut saw_boundaries = false;

    for entry in &package.manifest().datasets {
        let path = package.root().join(&entry.path);
        match entry.kind.as_str() {
            KIND_BOUNDARIES => {
                let payload = read_dataset(&path)?;
                let topology =
                    Topology::from_json_str(&payload).map_err(|e| AtlasLoadError::Boundaries {
                        dataset_id: entry.id.clone(),
                        source: e,
                    })?;
                let object = entry.object.as_deref().unwrap_or(DEFAULT_BOUNDARY_OBJECT);
                let countries =
                    topology
                        .features(object)
                        .map_err(|e| AtlasLoadError::Boundaries {
                            dataset_id: entry.id.clone(),
                            source: e,
                        })?;
                let borders =
                    topology
                        .inner_borders(object)
                        .map_err(|e| AtlasLoadError::Boundaries {
                            dataset_id: entry.id.clone(),
                            source: e,
                        })?;
                data.countries.extend(countries);
                data.borders.extend(borders);
                saw_boundaries = true;
            }
            KIND_TRADE => {
                let table = TradeTable::from_reader(open_dataset(&path)?).map_err(|e| {
                    AtlasLoadError::Trade {
                        dataset_id: entry.id.clone(),
                        source: e,
                    }
                })?;
                match &mut data.trade {
                    Some(existing) => existing.merge(table),
                    None => data.trade = Some(table),
                }
            }
            KIND_ENERGY => {
                let table = EnergyTable::from_reader(open_dataset(&path)?).map_err(|e| {
                    AtlasLoadError::Energy {
                        dataset_id: entry.id.clone(),
                        source: e,
                    }
                })?;
                match &mut data.energy {
                    Some(existing) => existing.merge(table),
                    None => data.energy = Some(table),
                }
            }
            _ => {}
        }
    }

    if !saw_boundaries {
        return Err(AtlasLoadError::MissingBoundaries);
    }
    Ok(data)
}

fn read_dataset(path: &Path) -> Result<String, AtlasLoadError> {
    fs::read_to_string(path).map_err(|e| AtlasLoadError::DatasetIo {
        path: path.to_path_buf(),
        source: e,
    })
}

fn open_dataset(path: &Path) -> Result<fs::File, AtlasLoadError> {
    fs::File::open(path).map_err(|e| AtlasLoadError::DatasetIo {
        path: path.to_path_buf(),
        source: e,
    })
}

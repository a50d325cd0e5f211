use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

/// Dataset kinds the loader understands. Entries with other kinds are
/// carried in the manifest but skipped at load time.
pub const KIND_BOUNDARIES: &str = "boundaries";
pub const KIND_TRADE: &str = "trade";
pub const KIND_ENERGY: &str = "energy";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasManifest {
    pub version: String,
    pub package_id: String,
    pub name: Option<String>,
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    pub id: String,
    pub kind: String,
    /// Path relative to the package root.
    pub path: String,
    /// Topology object holding the boundary geometries. Only read for
    /// boundaries datasets; `None` selects the default object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

impl AtlasManifest {
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            package_id: package_id.into(),
            name: None,
            datasets: Vec::new(),
        }
    }
}

impl DatasetEntry {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            path: path.into(),
            object: None,
        }
    }
}

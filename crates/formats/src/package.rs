use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::{AtlasManifest, MANIFEST_VERSION};

pub const MANIFEST_FILE_NAME: &str = "atlas.manifest.json";

/// An atlas package on disk: a directory holding `atlas.manifest.json`
/// plus the dataset files it references.
#[derive(Debug, Clone)]
pub struct AtlasPackage {
    root: PathBuf,
    manifest: AtlasManifest,
}

#[derive(Debug)]
pub enum AtlasPackageError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnsupportedVersion { found: String },
}

impl fmt::Display for AtlasPackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasPackageError::Io(err) => write!(f, "I/O error: {err}"),
            AtlasPackageError::Parse(err) => write!(f, "Manifest parse error: {err}"),
            AtlasPackageError::UnsupportedVersion { found } => {
                write!(f, "Unsupported manifest version: {found}")
            }
        }
    }
}

impl std::error::Error for AtlasPackageError {}

impl AtlasPackage {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, AtlasPackageError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let payload = fs::read_to_string(&manifest_path).map_err(AtlasPackageError::Io)?;
        let manifest: AtlasManifest =
            serde_json::from_str(&payload).map_err(AtlasPackageError::Parse)?;

        if manifest.version != MANIFEST_VERSION {
            return Err(AtlasPackageError::UnsupportedVersion {
                found: manifest.version,
            });
        }

        Ok(Self { root, manifest })
    }

    pub fn manifest(&self) -> &AtlasManifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::{AtlasPackage, AtlasPackageError, MANIFEST_FILE_NAME};
    use crate::manifest::{AtlasManifest, DatasetEntry, KIND_BOUNDARIES, MANIFEST_VERSION};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = format!("worldmap_package_{label}_{}", std::process::id());
        dir.push(id);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn load_atlas_package_manifest() {
        let root = temp_dir("load");
        let mut manifest = AtlasManifest::new("demo-package");
        manifest.name = Some("Demo".to_string());
        manifest
            .datasets
            .push(DatasetEntry::new("world", KIND_BOUNDARIES, "world.topo.json"));

        let payload = serde_json::to_string_pretty(&manifest).expect("serialize manifest");
        fs::write(root.join(MANIFEST_FILE_NAME), payload).expect("write manifest");

        let package = AtlasPackage::load(&root).expect("load package");
        assert_eq!(package.root(), root.as_path());
        assert_eq!(package.manifest(), &manifest);
    }

    #[test]
    fn rejects_unsupported_manifest_version() {
        let root = temp_dir("version");
        let mut manifest = AtlasManifest::new("demo-package");
        manifest.version = "2.0".to_string();

        let payload = serde_json::to_string_pretty(&manifest).expect("serialize manifest");
        fs::write(root.join(MANIFEST_FILE_NAME), payload).expect("write manifest");

        let err = AtlasPackage::load(&root).expect_err("expect version error");
        match err {
            AtlasPackageError::UnsupportedVersion { found } => {
                assert_eq!(found, "2.0");
                assert_ne!(found, MANIFEST_VERSION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_manifest_surfaces_an_io_error() {
        let root = temp_dir("missing");
        let err = AtlasPackage::load(&root).expect_err("expect I/O error");
        assert!(matches!(err, AtlasPackageError::Io(_)));
    }
}

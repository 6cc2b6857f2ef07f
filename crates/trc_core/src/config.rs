use crate::consts::{DEFAULT_DATA_PATH, DEFAULT_INDEX_PATH};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where to find the trace. JSON on disk, missing fields fall back to defaults:
///
/// ```json
/// { "data_path": "saucisse.data", "index_path": "saucisse.index" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub data_path: PathBuf,
    pub index_path: PathBuf,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
        }
    }
}

impl ReaderConfig {
    pub fn new(data_path: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self { data_path: data_path.into(), index_path: index_path.into() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: ReaderConfig = serde_json::from_str(&s)?;
        Ok(cfg)
    }
}

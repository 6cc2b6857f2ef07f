use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("index {}: {source}", .path.display())]
    IndexLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record {0} not found in the index")]
    NotFound(u32),

    #[error("data {}: {source}", .path.display())]
    DataOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Short read while decoding; `offset` is where the record starts.
    #[error("truncated record at offset {offset} reading {step}: {source}")]
    Truncated {
        offset: u64,
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),
}

impl TraceError {
    pub fn is_not_found(&self) -> bool { matches!(self, TraceError::NotFound(_)) }

    pub fn is_truncated(&self) -> bool { matches!(self, TraceError::Truncated { .. }) }
}

pub type Result<T> = std::result::Result<T, TraceError>;

pub mod consts;
pub mod errors;
pub mod utils;
pub mod index;
pub mod record;
pub mod decoder;
pub mod config;
pub mod store;
#[cfg(feature = "fixtures")]
pub mod fixture;

pub use consts::RecordKind;
pub use config::ReaderConfig;
pub use decoder::{decode_at, decode_record};
pub use errors::{Result, TraceError};
pub use index::{load_index, load_index_with_stats, resolve, IndexEntry, IndexMap, LoadStats};
pub use record::{Frame, IntegerChange, Record};
pub use store::TraceStore;

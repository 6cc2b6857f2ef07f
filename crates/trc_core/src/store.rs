use crate::config::ReaderConfig;
use crate::decoder::decode_record;
use crate::errors::{Result, TraceError};
use crate::index::{load_index, IndexMap};
use crate::record::Record;
use std::path::{Path, PathBuf};

/// Loaded index plus the data file it points into.
///
/// The index is read once at `open`; each `read` opens the data file on its
/// own, so a store can serve lookups from several threads.
#[derive(Debug, Clone)]
pub struct TraceStore {
    data_path: PathBuf,
    index: IndexMap,
}

impl TraceStore {
    pub fn open(cfg: &ReaderConfig) -> Result<Self> {
        let index = load_index(&cfg.index_path)?;
        tracing::info!(index = %cfg.index_path.display(), entries = index.len(), "trace store opened");
        Ok(Self { data_path: cfg.data_path.clone(), index })
    }

    pub fn with_index(data_path: impl Into<PathBuf>, index: IndexMap) -> Self {
        Self { data_path: data_path.into(), index }
    }

    pub fn index(&self) -> &IndexMap { &self.index }
    pub fn data_path(&self) -> &Path { &self.data_path }
    pub fn len(&self) -> usize { self.index.len() }
    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    #[inline]
    pub fn resolve(&self, record: u32) -> Option<u64> { self.index.resolve(record) }

    /// Decode record `record`. `NotFound` means no seek was attempted.
    pub fn read(&self, record: u32) -> Result<Record> {
        let offset = self.resolve(record).ok_or(TraceError::NotFound(record))?;
        decode_record(&self.data_path, offset)
    }

    /// One outcome per requested number; a failure never affects the others.
    pub fn read_many<I>(&self, records: I) -> Vec<(u32, Result<Record>)>
    where
        I: IntoIterator<Item = u32>,
    {
        records.into_iter().map(|n| (n, self.read(n))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::record::IntegerChange;
    use crate::utils::pad_fixed;
    use std::fs;

    fn int_change(old: &str, new: &str) -> Vec<u8> {
        let mut buf = vec![b'I'];
        buf.extend_from_slice(&[0u8; 15]);
        buf.extend(pad_fixed(old, 32));
        buf.extend(pad_fixed(new, 32));
        buf
    }

    fn store(dir: &Path, entries: &[(u32, u64)]) -> TraceStore {
        let data = dir.join("t.data");
        let mut bytes = int_change("0", "1");
        bytes.extend(int_change("1", "2"));
        fs::write(&data, bytes).unwrap();
        let index = entries.iter().map(|&(record, offset)| IndexEntry { record, offset }).collect();
        TraceStore::with_index(data, index)
    }

    #[test]
    fn read_resolves_then_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(dir.path(), &[(10, 0), (11, 80)]);
        assert_eq!(
            s.read(11).unwrap(),
            Record::IntegerChange(IntegerChange { old_value: "1".into(), new_value: "2".into() })
        );
    }

    #[test]
    fn not_found_is_distinct_from_io() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(dir.path(), &[(10, 0), (12, 4096)]);
        let err = s.read(11).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record 11 not found in the index");

        let err = s.read(12).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_on_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(dir.path(), &[]);
        assert!(s.is_empty());
        assert!(s.read(0).unwrap_err().is_not_found());
    }

    #[test]
    fn read_many_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(dir.path(), &[(0, 0), (1, 80), (2, 1 << 20)]);
        let out = s.read_many([0, 5, 2, 1]);
        assert_eq!(out.len(), 4);
        assert!(out[0].1.is_ok());
        assert!(out[1].1.as_ref().unwrap_err().is_not_found());
        assert!(out[2].1.as_ref().unwrap_err().is_truncated());
        assert!(out[3].1.is_ok());
    }

    #[test]
    fn read_many_from_several_threads() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(dir.path(), &[(0, 0), (1, 80), (2, 1 << 20)]);
        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| s.read_many([1, 0, 7, 2, 1])))
                .collect();
            for w in workers {
                let out = w.join().unwrap();
                assert_eq!(out.len(), 5);
                assert!(matches!(
                    out[0].1,
                    Ok(Record::IntegerChange(ref ic)) if ic.new_value == "2"
                ));
                assert!(matches!(
                    out[1].1,
                    Ok(Record::IntegerChange(ref ic)) if ic.new_value == "1"
                ));
                assert!(out[2].1.as_ref().unwrap_err().is_not_found());
                assert!(out[3].1.as_ref().unwrap_err().is_truncated());
                assert_eq!(out[0].1.as_ref().unwrap(), out[4].1.as_ref().unwrap());
            }
        });
    }

    #[test]
    fn open_reports_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ReaderConfig::new(dir.path().join("t.data"), dir.path().join("t.index"));
        assert!(matches!(TraceStore::open(&cfg), Err(TraceError::IndexLoad { .. })));
    }
}

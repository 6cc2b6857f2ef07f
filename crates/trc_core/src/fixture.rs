//! Trace writer for tests and benchmarks (feature `fixtures`).
//!
//! Produces index/data pairs in exactly the layout `load_index` and
//! `decode_record` read. Both files are built in temp files next to their
//! targets and published on `finalize`.

use crate::config::ReaderConfig;
use crate::consts::{RecordKind, FIELD_SIZE, FILLER_SIZE};
use crate::errors::Result;
use crate::utils::{pad_fixed, write_u32, write_u64};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct TraceWriter {
    data_final: PathBuf,
    index_final: PathBuf,
    data: NamedTempFile,
    index: NamedTempFile,
}

fn temp_beside(path: &Path, prefix: &str) -> std::io::Result<NamedTempFile> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    tempfile::Builder::new().prefix(prefix).tempfile_in(dir)
}

impl TraceWriter {
    pub fn create(data_path: impl AsRef<Path>, index_path: impl AsRef<Path>) -> Result<Self> {
        let data_final = data_path.as_ref().to_path_buf();
        let index_final = index_path.as_ref().to_path_buf();
        Ok(Self {
            data: temp_beside(&data_final, "trc_data_")?,
            index: temp_beside(&index_final, "trc_index_")?,
            data_final,
            index_final,
        })
    }

    /// Append raw record bytes and index them under `record`. Returns the offset.
    pub fn append_raw(&mut self, record: u32, bytes: &[u8]) -> Result<u64> {
        let f = self.data.as_file_mut();
        let off = f.seek(SeekFrom::End(0))?;
        f.write_all(bytes)?;
        self.push_index(record, off)?;
        Ok(off)
    }

    /// Index entry only; lets tests point at arbitrary offsets or add duplicates.
    pub fn push_index(&mut self, record: u32, offset: u64) -> Result<()> {
        let f = self.index.as_file_mut();
        write_u32(f, record)?;
        write_u64(f, offset)?;
        Ok(())
    }

    pub fn begin_frame(&mut self, record: u32, class: &str, method: &str, ty: &str) -> Result<u64> {
        self.append_raw(record, &encode(RecordKind::BeginFrame.tag(), &[class, method, ty]))
    }

    pub fn end_frame(&mut self, record: u32, class: &str, method: &str, ty: &str) -> Result<u64> {
        self.append_raw(record, &encode(RecordKind::EndFrame.tag(), &[class, method, ty]))
    }

    pub fn integer_change(&mut self, record: u32, old: &str, new: &str) -> Result<u64> {
        self.append_raw(record, &encode(RecordKind::IntegerChange.tag(), &[old, new]))
    }

    /// Header-only record with an arbitrary tag byte.
    pub fn tagged(&mut self, record: u32, tag: u8) -> Result<u64> {
        self.append_raw(record, &encode(tag, &[]))
    }

    pub fn finalize(mut self) -> Result<ReaderConfig> {
        self.data.as_file_mut().sync_all()?;
        self.index.as_file_mut().sync_all()?;
        self.data.persist(&self.data_final).map_err(|e| e.error)?;
        self.index.persist(&self.index_final).map_err(|e| e.error)?;
        Ok(ReaderConfig::new(self.data_final, self.index_final))
    }
}

/// Header plus space-padded fields.
pub fn encode(tag: u8, fields: &[&str]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + FILLER_SIZE + fields.len() * FIELD_SIZE);
    buf.push(tag);
    buf.resize(1 + FILLER_SIZE, 0);
    for f in fields {
        buf.extend(pad_fixed(f, FIELD_SIZE));
    }
    buf
}

/// The demo capture: record 0 begins a `java/lang/String.getBytes` frame,
/// records 1..=n count an integer up from 0, record n+1 ends the frame.
pub fn capture_demo(dir: &Path, n: u32) -> Result<ReaderConfig> {
    let end = n.checked_add(1).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("demo capture of {n} records leaves no end record number"))
    })?;
    let (class, method, ty) = ("java/lang/String", "getBytes", "()[B");
    let mut w = TraceWriter::create(
        dir.join(crate::consts::DEFAULT_DATA_PATH),
        dir.join(crate::consts::DEFAULT_INDEX_PATH),
    )?;
    w.begin_frame(0, class, method, ty)?;
    let mut old = String::from("0");
    for i in 1..=n {
        let new = i.to_string();
        w.integer_change(i, &old, &new)?;
        old = new;
    }
    w.end_frame(end, class, method, ty)?;
    w.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FRAME_RECORD_SIZE, INT_CHANGE_RECORD_SIZE};
    use crate::errors::TraceError;
    use crate::record::{IntegerChange, Record};
    use crate::store::TraceStore;

    #[test]
    fn demo_capture_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = capture_demo(dir.path(), 100).unwrap();
        let s = TraceStore::open(&cfg).unwrap();
        assert_eq!(s.len(), 102);
        assert_eq!(s.resolve(1), Some(FRAME_RECORD_SIZE as u64));
        assert_eq!(s.resolve(2), Some((FRAME_RECORD_SIZE + INT_CHANGE_RECORD_SIZE) as u64));

        assert!(matches!(s.read(0).unwrap(), Record::BeginFrame(ref f) if f.class == "java/lang/String"));
        assert_eq!(
            s.read(57).unwrap(),
            Record::IntegerChange(IntegerChange { old_value: "56".into(), new_value: "57".into() })
        );
        match s.read(101).unwrap() {
            Record::EndFrame(f) => assert_eq!((f.method.as_str(), f.r#type.as_str()), ("getBytes", "()[B")),
            other => panic!("expected end frame, got {other:?}"),
        }
    }

    #[test]
    fn demo_capture_rejects_max_count() {
        let dir = tempfile::tempdir().unwrap();
        let err = capture_demo(dir.path(), u32::MAX).unwrap_err();
        assert!(matches!(err, TraceError::Io(ref e) if e.kind() == std::io::ErrorKind::InvalidInput));
        assert!(!dir.path().join(crate::consts::DEFAULT_INDEX_PATH).exists());
    }

    #[test]
    fn duplicate_index_entries_last_wins_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = TraceWriter::create(dir.path().join("d"), dir.path().join("i")).unwrap();
        w.integer_change(3, "a", "b").unwrap();
        w.tagged(3, b'z').unwrap();
        let s = TraceStore::open(&w.finalize().unwrap()).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.read(3).unwrap(), Record::UnknownKind { tag: b'z' });
    }
}

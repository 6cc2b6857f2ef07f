//! Index file loader.
//!
//! Layout (LE, no header, no footer):
//!   repeat { record_number: u32, offset: u64 }   // 12 bytes each
//!
//! Loading stops when fewer than 12 bytes remain; a trailing partial group is
//! dropped without error. Duplicate record numbers resolve last-wins.

use crate::consts::INDEX_ENTRY_SIZE;
use crate::errors::{Result, TraceError};
use crate::utils::read_upto;
use byteorder::{ByteOrder, LittleEndian as LE};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// One (record number, offset) pair as stored in the index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub record: u32,
    pub offset: u64,
}

impl IndexEntry {
    pub fn decode(group: &[u8; INDEX_ENTRY_SIZE]) -> Self {
        Self { record: LE::read_u32(&group[..4]), offset: LE::read_u64(&group[4..]) }
    }
}

/// Counters from a single load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub groups: usize,
    pub overwritten: usize,
    pub trailing_bytes: usize,
}

/// In-memory record number -> data offset map. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    offsets: HashMap<u32, u64>,
}

impl IndexMap {
    /// Parse an index byte stream. Same rules as `load_index`.
    pub fn from_reader<R: Read>(r: R) -> io::Result<Self> {
        Self::from_reader_with_stats(r).map(|(m, _)| m)
    }

    pub fn from_reader_with_stats<R: Read>(mut r: R) -> io::Result<(Self, LoadStats)> {
        let mut offsets = HashMap::new();
        let mut stats = LoadStats::default();
        let mut group = [0u8; INDEX_ENTRY_SIZE];
        loop {
            let n = read_upto(&mut r, &mut group)?;
            if n < INDEX_ENTRY_SIZE {
                stats.trailing_bytes = n;
                break;
            }
            let e = IndexEntry::decode(&group);
            stats.groups += 1;
            if offsets.insert(e.record, e.offset).is_some() {
                stats.overwritten += 1;
            }
        }
        Ok((Self { offsets }, stats))
    }

    /// Offset for `record`, or `None` if the index has no such entry.
    #[inline]
    pub fn resolve(&self, record: u32) -> Option<u64> { self.offsets.get(&record).copied() }

    pub fn get(&self, record: u32) -> Option<IndexEntry> {
        self.resolve(record).map(|offset| IndexEntry { record, offset })
    }

    pub fn len(&self) -> usize { self.offsets.len() }
    pub fn is_empty(&self) -> bool { self.offsets.is_empty() }

    /// Record numbers, ascending.
    pub fn record_numbers(&self) -> Vec<u32> {
        let mut v: Vec<u32> = self.offsets.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn first(&self) -> Option<u32> { self.offsets.keys().min().copied() }
    pub fn last(&self) -> Option<u32> { self.offsets.keys().max().copied() }

    /// Entries sorted by record number.
    pub fn iter(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.record_numbers()
            .into_iter()
            .map(move |record| IndexEntry { record, offset: self.offsets[&record] })
    }
}

impl FromIterator<IndexEntry> for IndexMap {
    fn from_iter<I: IntoIterator<Item = IndexEntry>>(iter: I) -> Self {
        Self { offsets: iter.into_iter().map(|e| (e.record, e.offset)).collect() }
    }
}

/// Load the whole index file into memory.
pub fn load_index(path: impl AsRef<Path>) -> Result<IndexMap> {
    load_index_with_stats(path).map(|(m, _)| m)
}

pub fn load_index_with_stats(path: impl AsRef<Path>) -> Result<(IndexMap, LoadStats)> {
    let path = path.as_ref();
    let load_err = |source| TraceError::IndexLoad { path: path.to_path_buf(), source };
    let f = File::open(path).map_err(load_err)?;
    let (map, stats) = IndexMap::from_reader_with_stats(BufReader::new(f)).map_err(load_err)?;

    tracing::debug!(
        path = %path.display(),
        entries = map.len(),
        groups = stats.groups,
        "index loaded"
    );
    if stats.overwritten > 0 {
        tracing::warn!(path = %path.display(), overwritten = stats.overwritten, "duplicate record numbers in index, last entry wins");
    }
    if stats.trailing_bytes > 0 {
        tracing::warn!(path = %path.display(), bytes = stats.trailing_bytes, "ignoring trailing partial index entry");
    }
    Ok((map, stats))
}

/// Free-function form of `IndexMap::resolve`.
#[inline]
pub fn resolve(index: &IndexMap, record: u32) -> Option<u64> { index.resolve(record) }

// crates/trc_core/src/consts.rs

/// Index entry: u32 record number + u64 offset, both LE.
pub const INDEX_ENTRY_SIZE: usize = 12;

pub const KIND_SIZE: usize = 1;
pub const FILLER_SIZE: usize = 15;
pub const HDR_SIZE: usize = KIND_SIZE + FILLER_SIZE;

/// Width of every fixed text field in a record body.
pub const FIELD_SIZE: usize = 32;

pub const FRAME_RECORD_SIZE: usize = HDR_SIZE + 3 * FIELD_SIZE;
pub const INT_CHANGE_RECORD_SIZE: usize = HDR_SIZE + 2 * FIELD_SIZE;

pub const DEFAULT_DATA_PATH: &str = "saucisse.data";
pub const DEFAULT_INDEX_PATH: &str = "saucisse.index";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    BeginFrame    = b'B',
    IntegerChange = b'I',
    EndFrame      = b'E',
}

impl RecordKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'B' => Some(Self::BeginFrame),
            b'I' => Some(Self::IntegerChange),
            b'E' => Some(Self::EndFrame),
            _ => None,
        }
    }

    #[inline]
    pub fn tag(self) -> u8 { self as u8 }
}

const _: () = { assert!(FRAME_RECORD_SIZE == 112 && INT_CHANGE_RECORD_SIZE == 80); };

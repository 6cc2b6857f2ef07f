use crate::consts::RecordKind;
use serde::Serialize;
use std::fmt;

/// Class/method/type triplet shared by Begin and End Frame records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub class: String,
    pub method: String,
    pub r#type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegerChange {
    pub old_value: String,
    pub new_value: String,
}

/// A decoded data record. Each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    BeginFrame(Frame),
    EndFrame(Frame),
    IntegerChange(IntegerChange),
    /// Tag byte outside the known set; no body was read.
    UnknownKind { tag: u8 },
}

impl Record {
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Record::BeginFrame(_) => Some(RecordKind::BeginFrame),
            Record::EndFrame(_) => Some(RecordKind::EndFrame),
            Record::IntegerChange(_) => Some(RecordKind::IntegerChange),
            Record::UnknownKind { .. } => None,
        }
    }

    /// Raw tag byte as found in the data file.
    pub fn kind_tag(&self) -> u8 {
        match self {
            Record::UnknownKind { tag } => *tag,
            other => other.kind().map(RecordKind::tag).unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Record::BeginFrame(_) => "Begin Frame",
            Record::EndFrame(_) => "End Frame",
            Record::IntegerChange(_) => "Integer Change",
            Record::UnknownKind { .. } => "Unknown",
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::BeginFrame(fr) | Record::EndFrame(fr) => {
                writeln!(f, "{}:", self.label())?;
                writeln!(f, "  Class: {}", fr.class)?;
                writeln!(f, "  Method: {}", fr.method)?;
                write!(f, "  Type: {}", fr.r#type)
            }
            Record::IntegerChange(ic) => {
                writeln!(f, "{}:", self.label())?;
                writeln!(f, "  Old Value: {}", ic.old_value)?;
                write!(f, "  New Value: {}", ic.new_value)
            }
            Record::UnknownKind { tag } => write!(f, "Unknown record type: {tag:02x}"),
        }
    }
}

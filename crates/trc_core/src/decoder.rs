//! Tagged record decoder.
//!
//! At each record offset:
//!   kind[1]   = 'B' | 'I' | 'E' | other
//!   filler[15]  (ignored)
//!   body:
//!     'B','E' -> class[32] method[32] type[32]
//!     'I'     -> old_value[32] new_value[32]
//!     other   -> nothing
//!
//! Decoding is all-or-nothing: any short read fails the whole record.

use crate::consts::{RecordKind, FIELD_SIZE, FILLER_SIZE};
use crate::errors::{Result, TraceError};
use crate::record::{Frame, IntegerChange, Record};
use crate::utils::trim_fixed;
use byteorder::ReadBytesExt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Open `data_path`, decode the record at `offset`, close the file.
pub fn decode_record(data_path: impl AsRef<Path>, offset: u64) -> Result<Record> {
    let path = data_path.as_ref();
    let f = File::open(path)
        .map_err(|source| TraceError::DataOpen { path: path.to_path_buf(), source })?;
    let mut rdr = BufReader::new(f);
    decode_at(&mut rdr, offset)
}

/// Decode the record at `offset` from any seekable byte source.
pub fn decode_at<R: Read + Seek>(r: &mut R, offset: u64) -> Result<Record> {
    r.seek(SeekFrom::Start(offset))?;
    let mut rd = FieldReader { r, offset };

    let tag = rd.tag()?;
    rd.skip_filler()?;

    let rec = match RecordKind::from_tag(tag) {
        Some(RecordKind::BeginFrame) => Record::BeginFrame(rd.frame()?),
        Some(RecordKind::EndFrame) => Record::EndFrame(rd.frame()?),
        Some(RecordKind::IntegerChange) => Record::IntegerChange(IntegerChange {
            old_value: rd.field("old_value")?,
            new_value: rd.field("new_value")?,
        }),
        None => Record::UnknownKind { tag },
    };
    tracing::debug!(offset, kind = %char::from(tag).escape_default(), "record decoded");
    Ok(rec)
}

struct FieldReader<'a, R> {
    r: &'a mut R,
    offset: u64,
}

impl<R: Read> FieldReader<'_, R> {
    /// Short reads become `Truncated`; anything else stays `Io`.
    fn truncated(&self, step: &'static str) -> impl FnOnce(io::Error) -> TraceError {
        let offset = self.offset;
        move |source| match source.kind() {
            io::ErrorKind::UnexpectedEof => TraceError::Truncated { offset, step, source },
            _ => TraceError::Io(source),
        }
    }

    fn tag(&mut self) -> Result<u8> {
        let e = self.truncated("kind");
        self.r.read_u8().map_err(e)
    }

    fn skip_filler(&mut self) -> Result<()> {
        let mut filler = [0u8; FILLER_SIZE];
        let e = self.truncated("filler");
        self.r.read_exact(&mut filler).map_err(e)
    }

    fn field(&mut self, step: &'static str) -> Result<String> {
        let mut buf = [0u8; FIELD_SIZE];
        let e = self.truncated(step);
        self.r.read_exact(&mut buf).map_err(e)?;
        Ok(trim_fixed(&buf))
    }

    /// Begin and End Frame share this body shape.
    fn frame(&mut self) -> Result<Frame> {
        Ok(Frame {
            class: self.field("class")?,
            method: self.field("method")?,
            r#type: self.field("type")?,
        })
    }
}

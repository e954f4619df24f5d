//! Fortran unformatted record framing.
//!
//! Files written by Fortran `form='unformatted'` I/O are sequences of
//! records, each bracketed by a 32-bit big-endian byte count:
//!
//! ```text
//! | head: i32 | payload: head bytes | tail: i32 (== head) |
//! ```
//!
//! This crate handles only the bracketing. It has no opinion on what the
//! payload means — decoding is the consumer's job.

use std::io::{self, Read, Write};

use tracing::trace;

//  Error

#[derive(Debug, thiserror::Error)]
pub enum FortioError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid record length: {0}")]
    InvalidRecordLength(i64),

    #[error("record tail ({tail}) does not match head ({head})")]
    TailMismatch { head: i32, tail: i32 },

    #[error("unexpected end of file inside a record")]
    UnexpectedEof,
}

pub type Result<T> = std::result::Result<T, FortioError>;

//  Reading

/// Read one record, returning its payload.
///
/// `Ok(None)` means the reader was exhausted at a record boundary — the
/// normal end of a well-formed file. Running out of bytes anywhere inside
/// a record (head, payload, or tail) is [`FortioError::UnexpectedEof`].
pub fn read_record(reader: &mut impl Read) -> Result<Option<Vec<u8>>> {
    let head = match read_head(reader)? {
        Some(head) => head,
        None => return Ok(None),
    };

    if head < 0 {
        return Err(FortioError::InvalidRecordLength(i64::from(head)));
    }

    let mut payload = vec![0u8; head as usize];
    reader
        .read_exact(&mut payload)
        .map_err(eof_in_record)?;

    let mut tail = [0u8; 4];
    reader.read_exact(&mut tail).map_err(eof_in_record)?;
    let tail = i32::from_be_bytes(tail);

    if tail != head {
        return Err(FortioError::TailMismatch { head, tail });
    }

    trace!(len = head, "record read");
    Ok(Some(payload))
}

/// Read the 4-byte record head, distinguishing a clean EOF (no bytes at
/// all) from truncation mid-head.
fn read_head(reader: &mut impl Read) -> Result<Option<i32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(FortioError::UnexpectedEof),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(i32::from_be_bytes(buf)))
}

fn eof_in_record(e: io::Error) -> FortioError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        FortioError::UnexpectedEof
    } else {
        FortioError::Io(e)
    }
}

//  Writing

/// Write one record: head, payload, matching tail.
pub fn write_record(writer: &mut impl Write, payload: &[u8]) -> Result<()> {
    let head = i32::try_from(payload.len())
        .map_err(|_| FortioError::InvalidRecordLength(payload.len() as i64))?;

    writer.write_all(&head.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.write_all(&head.to_be_bytes())?;
    Ok(())
}

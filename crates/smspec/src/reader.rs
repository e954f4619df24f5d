//! Streaming reader for keyword arrays.
//!
//! An SMSPEC file is a flat sequence of keyword arrays, each stored as one
//! 16-byte header record followed by body records of at most
//! [`block_size`](crate::types::TypeId::block_size) elements. All values
//! are big-endian.

use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::types::{ArrayValues, HEADER_LEN, KEYWORD_WIDTH, KeywordRecord, SmspecError, TypeId};

/// A decoding session over one file (or any byte source).
///
/// Iterating yields keyword arrays in file order; [`Stream::keywords`]
/// collects them all.
pub struct Stream<R> {
    inner: R,
}

impl Stream<BufReader<fs::File>> {
    /// Open a buffered stream over `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SmspecError> {
        let file = fs::File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Stream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Collect every remaining keyword array, in file order.
    pub fn keywords(self) -> Result<Vec<KeywordRecord>, SmspecError> {
        self.collect()
    }

    fn next_keyword(&mut self) -> Result<Option<KeywordRecord>, SmspecError> {
        let header = match fortio::read_record(&mut self.inner)? {
            Some(record) => record,
            None => return Ok(None),
        };
        if header.len() != HEADER_LEN {
            return Err(SmspecError::InvalidHeaderLength(header.len()));
        }

        let keyword = String::from_utf8_lossy(&header[..KEYWORD_WIDTH]).into_owned();
        let count = be_i32(&header[8..12]);
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&header[12..16]);
        let type_id = TypeId::from_tag(tag)?;

        if count < 0 {
            return Err(SmspecError::NegativeCount { keyword, count });
        }

        let values = self.read_body(&keyword, type_id, count as usize)?;
        debug!(keyword = keyword.trim(), ty = ?type_id, count, "keyword array decoded");

        Ok(Some(KeywordRecord {
            keyword,
            type_id,
            values,
        }))
    }

    fn read_body(
        &mut self,
        keyword: &str,
        type_id: TypeId,
        count: usize,
    ) -> Result<ArrayValues, SmspecError> {
        if type_id == TypeId::Mess {
            // MESS carries no data; a count would have nowhere to live.
            if count > 0 {
                return Err(SmspecError::Unsupported("MESS with elements"));
            }
            return Ok(ArrayValues::Mess);
        }
        let Some(elem_size) = type_id.elem_size() else {
            return Err(SmspecError::Unsupported("X231"));
        };

        let mut raw = Vec::with_capacity(count.saturating_mul(elem_size).min(1 << 20));
        let mut decoded = 0usize;
        while decoded < count {
            let block = fortio::read_record(&mut self.inner)?.ok_or_else(|| {
                SmspecError::TruncatedArray {
                    keyword: keyword.to_owned(),
                    expected: count,
                    got: decoded,
                }
            })?;

            if block.len() % elem_size != 0 {
                return Err(SmspecError::MisalignedBlock {
                    keyword: keyword.to_owned(),
                    len: block.len(),
                    elem_size,
                });
            }
            let elems = block.len() / elem_size;
            if elems > count - decoded {
                return Err(SmspecError::OversizedBlock {
                    keyword: keyword.to_owned(),
                    remaining: count - decoded,
                    got: elems,
                });
            }

            raw.extend_from_slice(&block);
            decoded += elems;
        }

        Ok(decode_values(type_id, elem_size, &raw))
    }
}

impl<R: Read> Iterator for Stream<R> {
    type Item = Result<KeywordRecord, SmspecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_keyword().transpose()
    }
}

//  Element decoding

fn decode_values(type_id: TypeId, elem_size: usize, raw: &[u8]) -> ArrayValues {
    match type_id {
        TypeId::Inte => ArrayValues::Inte(raw.chunks_exact(4).map(be_i32).collect()),
        TypeId::Real => ArrayValues::Real(raw.chunks_exact(4).map(be_f32).collect()),
        TypeId::Doub => ArrayValues::Doub(raw.chunks_exact(8).map(be_f64).collect()),
        // Fortran logicals: zero is false, anything else true.
        TypeId::Logi => ArrayValues::Logi(raw.chunks_exact(4).map(|c| be_i32(c) != 0).collect()),
        TypeId::Char | TypeId::C0nn(_) => ArrayValues::Char(
            raw.chunks_exact(elem_size)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect(),
        ),
        // Handled before decoding.
        TypeId::Mess | TypeId::X231 => ArrayValues::Mess,
    }
}

fn be_i32(c: &[u8]) -> i32 {
    i32::from_be_bytes([c[0], c[1], c[2], c[3]])
}

fn be_f32(c: &[u8]) -> f32 {
    f32::from_be_bytes([c[0], c[1], c[2], c[3]])
}

fn be_f64(c: &[u8]) -> f64 {
    f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
}

//! Keyword array emission.
//!
//! The write side of the format: one header record, then body records
//! chunked at the type's block size. String payloads are always emitted
//! as CHAR (8-character, space-padded elements).

use std::io::Write;

use crate::types::{ArrayValues, KEYWORD_WIDTH, SmspecError};

/// Write one keyword array.
pub fn write_keyword(
    out: &mut impl Write,
    keyword: &str,
    values: &ArrayValues,
) -> Result<(), SmspecError> {
    if keyword.len() > KEYWORD_WIDTH {
        return Err(SmspecError::KeywordTooLong(keyword.to_owned()));
    }
    let count =
        i32::try_from(values.len()).map_err(|_| SmspecError::OversizedArray(values.len()))?;
    let type_id = values.type_id();

    let mut header = Vec::with_capacity(16);
    header.extend_from_slice(format!("{keyword:<width$}", width = KEYWORD_WIDTH).as_bytes());
    header.extend_from_slice(&count.to_be_bytes());
    header.extend_from_slice(&type_id.tag());
    fortio::write_record(out, &header)?;

    let block = type_id.block_size();
    match values {
        ArrayValues::Inte(v) => write_blocks(out, v, block, |x, buf| {
            buf.extend_from_slice(&x.to_be_bytes());
            Ok(())
        }),
        ArrayValues::Real(v) => write_blocks(out, v, block, |x, buf| {
            buf.extend_from_slice(&x.to_be_bytes());
            Ok(())
        }),
        ArrayValues::Doub(v) => write_blocks(out, v, block, |x, buf| {
            buf.extend_from_slice(&x.to_be_bytes());
            Ok(())
        }),
        // Fortran .TRUE. is all bits set.
        ArrayValues::Logi(v) => write_blocks(out, v, block, |x, buf| {
            let encoded: i32 = if *x { -1 } else { 0 };
            buf.extend_from_slice(&encoded.to_be_bytes());
            Ok(())
        }),
        ArrayValues::Char(v) => write_blocks(out, v, block, |s, buf| {
            if s.len() > 8 {
                return Err(SmspecError::StringTooLong(s.clone()));
            }
            buf.extend_from_slice(format!("{s:<8}").as_bytes());
            Ok(())
        }),
        ArrayValues::Mess => Ok(()),
    }
}

fn write_blocks<T>(
    out: &mut impl Write,
    items: &[T],
    block_size: usize,
    encode: impl Fn(&T, &mut Vec<u8>) -> Result<(), SmspecError>,
) -> Result<(), SmspecError> {
    for chunk in items.chunks(block_size) {
        let mut payload = Vec::new();
        for item in chunk {
            encode(item, &mut payload)?;
        }
        fortio::write_record(out, &payload)?;
    }
    Ok(())
}

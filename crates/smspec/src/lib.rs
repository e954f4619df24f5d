//! Pure-Rust reader for Eclipse summary-specification (`.SMSPEC`) files.
//!
//! These files are Fortran unformatted record streams holding a flat
//! sequence of typed keyword arrays. Two layers are exposed:
//!
//! * [`Stream`] — iterates the raw keyword arrays, decoding record
//!   framing, 16-byte array headers, and big-endian typed blocks.
//! * [`summary`] — distils a [`Summary`] of the case's static structure:
//!   grid dimensions, result-variable mnemonics, well/group names, and a
//!   full index of every keyword for ad-hoc lookup.

pub mod reader;
pub mod summary;
pub mod types;
pub mod writer;

pub use reader::Stream;
pub use summary::{
    Intehead, SMSPEC_KEYWORDS, Simulator, Summary, UnitSystem, is_smspec_keyword, summary,
};
pub use types::{ArrayValues, KeywordRecord, SmspecError, TypeId};
pub use writer::write_keyword;

//! SMSPEC format types and constants.

use serde::{Deserialize, Serialize};

/// Byte length of an array header record.
pub const HEADER_LEN: usize = 16;

/// Width of the keyword name field in an array header.
pub const KEYWORD_WIDTH: usize = 8;

/// Elements per body record for numeric arrays.
pub const NUMERIC_BLOCK_SIZE: usize = 1000;

/// Elements per body record for string arrays.
pub const STRING_BLOCK_SIZE: usize = 105;

//  Type tag

/// The 4-byte ASCII type tag carried in every array header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeId {
    /// 32-bit integer.
    Inte,
    /// 32-bit float.
    Real,
    /// 64-bit float.
    Doub,
    /// 8-character string.
    Char,
    /// Message; carries no data.
    Mess,
    /// 32-bit logical.
    Logi,
    /// Reserved extension type. Recognized but not decodable.
    X231,
    /// `C0NN` — string of explicit width NN (01..=99).
    C0nn(u8),
}

impl TypeId {
    pub fn from_tag(tag: [u8; 4]) -> Result<Self, SmspecError> {
        match &tag {
            b"INTE" => Ok(Self::Inte),
            b"REAL" => Ok(Self::Real),
            b"DOUB" => Ok(Self::Doub),
            b"CHAR" => Ok(Self::Char),
            b"MESS" => Ok(Self::Mess),
            b"LOGI" => Ok(Self::Logi),
            b"X231" => Ok(Self::X231),
            [b'C', b'0', hi @ b'0'..=b'9', lo @ b'0'..=b'9'] => {
                let width = (hi - b'0') * 10 + (lo - b'0');
                if width == 0 {
                    return Err(SmspecError::InvalidTypeTag(tag));
                }
                Ok(Self::C0nn(width))
            }
            _ => Err(SmspecError::InvalidTypeTag(tag)),
        }
    }

    pub fn tag(&self) -> [u8; 4] {
        match self {
            Self::Inte => *b"INTE",
            Self::Real => *b"REAL",
            Self::Doub => *b"DOUB",
            Self::Char => *b"CHAR",
            Self::Mess => *b"MESS",
            Self::Logi => *b"LOGI",
            Self::X231 => *b"X231",
            Self::C0nn(w) => [b'C', b'0', b'0' + w / 10, b'0' + w % 10],
        }
    }

    /// On-disk bytes per element, or `None` for X231 which cannot be
    /// decoded.
    pub fn elem_size(&self) -> Option<usize> {
        match self {
            Self::Inte | Self::Real | Self::Logi => Some(4),
            Self::Doub | Self::Char => Some(8),
            Self::Mess => Some(0),
            Self::C0nn(w) => Some(usize::from(*w)),
            Self::X231 => None,
        }
    }

    /// Maximum elements per body record.
    pub fn block_size(&self) -> usize {
        match self {
            Self::Char | Self::C0nn(_) => STRING_BLOCK_SIZE,
            _ => NUMERIC_BLOCK_SIZE,
        }
    }
}

//  Decoded array

/// Decoded array payload. Element type follows the header tag; CHAR and
/// C0NN both decode to strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayValues {
    Inte(Vec<i32>),
    Real(Vec<f32>),
    Doub(Vec<f64>),
    Logi(Vec<bool>),
    Char(Vec<String>),
    Mess,
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Inte(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Doub(v) => v.len(),
            Self::Logi(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::Mess => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_inte(&self) -> Option<&[i32]> {
        match self {
            Self::Inte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<&[f32]> {
        match self {
            Self::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doub(&self) -> Option<&[f64]> {
        match self {
            Self::Doub(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_logi(&self) -> Option<&[bool]> {
        match self {
            Self::Logi(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<&[String]> {
        match self {
            Self::Char(v) => Some(v),
            _ => None,
        }
    }

    /// Tag written for this payload. String payloads always write back as
    /// CHAR, regardless of the tag they were read under.
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Inte(_) => TypeId::Inte,
            Self::Real(_) => TypeId::Real,
            Self::Doub(_) => TypeId::Doub,
            Self::Logi(_) => TypeId::Logi,
            Self::Char(_) => TypeId::Char,
            Self::Mess => TypeId::Mess,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Inte(_) => "INTE",
            Self::Real(_) => "REAL",
            Self::Doub(_) => "DOUB",
            Self::Logi(_) => "LOGI",
            Self::Char(_) => "CHAR",
            Self::Mess => "MESS",
        }
    }
}

//  Keyword record

/// One keyword array as read from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Raw keyword name as stored — 8 characters, space-padded.
    pub keyword: String,
    pub type_id: TypeId,
    pub values: ArrayValues,
}

impl KeywordRecord {
    /// Keyword name with the fixed-width padding trimmed.
    pub fn name(&self) -> &str {
        self.keyword.trim()
    }
}

//  Error

#[derive(Debug, thiserror::Error)]
pub enum SmspecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record framing: {0}")]
    Fortio(#[from] fortio::FortioError),

    #[error("Invalid type tag: '{}'", String::from_utf8_lossy(.0))]
    InvalidTypeTag([u8; 4]),

    #[error("Array header record is {0} bytes, expected {HEADER_LEN}")]
    InvalidHeaderLength(usize),

    #[error("Keyword '{keyword}' declares a negative element count ({count})")]
    NegativeCount { keyword: String, count: i32 },

    #[error(
        "Keyword '{keyword}': body record of {len} bytes is not a multiple \
         of the {elem_size}-byte element size"
    )]
    MisalignedBlock {
        keyword: String,
        len: usize,
        elem_size: usize,
    },

    #[error("Keyword '{keyword}': body record holds {got} elements, only {remaining} remain")]
    OversizedBlock {
        keyword: String,
        remaining: usize,
        got: usize,
    },

    #[error("Keyword '{keyword}' ended after {got} of {expected} elements")]
    TruncatedArray {
        keyword: String,
        expected: usize,
        got: usize,
    },

    #[error("Unsupported array type: {0}")]
    Unsupported(&'static str),

    #[error("Required keyword '{0}' not present")]
    MissingKeyword(&'static str),

    #[error("Keyword '{keyword}' has {got} values, expected at least {expected}")]
    TruncatedKeyword {
        keyword: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Keyword '{keyword}' decoded as {got}, expected {expected}")]
    WrongType {
        keyword: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Keyword name '{0}' is longer than {KEYWORD_WIDTH} characters")]
    KeywordTooLong(String),

    #[error("String '{0}' does not fit an 8-character CHAR element")]
    StringTooLong(String),

    #[error("Array of {0} elements does not fit the 32-bit count field")]
    OversizedArray(usize),
}

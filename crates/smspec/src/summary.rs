//! Summary-specification extraction.
//!
//! Distils the static structure of a simulation case — grid dimensions,
//! result-variable mnemonics, well/group names — out of the keyword
//! arrays of an `.SMSPEC` file.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reader::Stream;
use crate::types::{ArrayValues, SmspecError};

/// Keywords defined by the summary-specification format.
pub const SMSPEC_KEYWORDS: &[&str] = &[
    "INTEHEAD", "RESTART", "DIMENS", "KEYWORDS", "WGNAMES", "NAMES", "NUMS", "LGRS", "NUMLX",
    "NUMLY", "NUMLZ", "MEASRMNT", "UNITS", "STARTDAT", "LGRNAMES", "LGRVEC", "LGRTIMES",
    "RUNTIMEI", "RUNTIMED", "STEPRESN", "XCOORD", "YCOORD", "TIMESTMP",
];

/// Is `name` (padded or not) a keyword defined by the format?
pub fn is_smspec_keyword(name: &str) -> bool {
    SMSPEC_KEYWORDS.contains(&name.trim())
}

//  INTEHEAD identifiers

/// Unit system identifier from `INTEHEAD[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    Metric,
    Field,
    Lab,
    PvtM,
}

impl UnitSystem {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Metric),
            2 => Some(Self::Field),
            3 => Some(Self::Lab),
            4 => Some(Self::PvtM),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Metric => "METRIC",
            Self::Field => "FIELD",
            Self::Lab => "LAB",
            Self::PvtM => "PVT-M",
        }
    }
}

/// Simulation program identifier from `INTEHEAD[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Simulator {
    Eclipse100,
    Eclipse300,
    Eclipse300Thermal,
    Intersect,
    FrontSim,
}

impl Simulator {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            100 => Some(Self::Eclipse100),
            300 => Some(Self::Eclipse300),
            500 => Some(Self::Eclipse300Thermal),
            700 => Some(Self::Intersect),
            800 => Some(Self::FrontSim),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eclipse100 => "ECLIPSE 100",
            Self::Eclipse300 => "ECLIPSE 300",
            Self::Eclipse300Thermal => "ECLIPSE 300 (thermal option)",
            Self::Intersect => "INTERSECT",
            Self::FrontSim => "FrontSim",
        }
    }
}

/// Decoded `INTEHEAD` array. The keyword itself is optional, and
/// identifiers outside the known tables decode to `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Intehead {
    pub unit_system: Option<UnitSystem>,
    pub simulator: Option<Simulator>,
}

//  Summary

/// Static structure of a simulation case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of entries in the summary vectors (`DIMENS[0]`).
    pub nlist: i32,
    /// Grid extents in I, J, K (`DIMENS[1..=3]`).
    pub gridshape: (i32, i32, i32),
    /// Restart flag (`DIMENS[5]`).
    pub istar: i32,
    /// Result-variable mnemonics, trimmed, in file order.
    pub keywords: Vec<String>,
    /// Well/group names, trimmed, in file order.
    pub wgnames: Vec<String>,
    /// Unit system and simulator, when the file carries `INTEHEAD`.
    pub intehead: Option<Intehead>,
    /// Every keyword in the file, keyed by trimmed name, with untrimmed
    /// values — for fields not promoted to named attributes. A name that
    /// occurs more than once keeps its last occurrence in file order.
    pub index: HashMap<String, ArrayValues>,
}

/// Read the summary specification at `path`.
///
/// Fails if the file cannot be opened or decoded, or if any of `DIMENS`,
/// `KEYWORDS`, or `WGNAMES` is absent or malformed. There are no partial
/// results.
pub fn summary(path: impl AsRef<Path>) -> Result<Summary, SmspecError> {
    from_stream(Stream::open(path)?)
}

/// Extract a [`Summary`] from an already-open stream.
pub fn from_stream<R: Read>(stream: Stream<R>) -> Result<Summary, SmspecError> {
    let mut index: HashMap<String, ArrayValues> = HashMap::new();
    for record in stream {
        let record = record?;
        // Last occurrence wins on duplicate names.
        index.insert(record.name().to_owned(), record.values);
    }

    let dimens = require_inte(&index, "DIMENS")?;
    if dimens.len() < 6 {
        return Err(SmspecError::TruncatedKeyword {
            keyword: "DIMENS",
            expected: 6,
            got: dimens.len(),
        });
    }
    let nlist = dimens[0];
    let gridshape = (dimens[1], dimens[2], dimens[3]);
    let istar = dimens[5];

    let keywords = trimmed(require_char(&index, "KEYWORDS")?);
    let wgnames = trimmed(require_char(&index, "WGNAMES")?);

    let intehead = match index.get("INTEHEAD").and_then(ArrayValues::as_inte) {
        Some(v) if v.len() >= 2 => Some(Intehead {
            unit_system: UnitSystem::from_id(v[0]),
            simulator: Simulator::from_id(v[1]),
        }),
        _ => None,
    };

    debug!(
        nlist,
        ni = gridshape.0,
        nj = gridshape.1,
        nk = gridshape.2,
        "summary extracted"
    );

    Ok(Summary {
        nlist,
        gridshape,
        istar,
        keywords,
        wgnames,
        intehead,
        index,
    })
}

fn require_inte<'a>(
    index: &'a HashMap<String, ArrayValues>,
    keyword: &'static str,
) -> Result<&'a [i32], SmspecError> {
    let values = index
        .get(keyword)
        .ok_or(SmspecError::MissingKeyword(keyword))?;
    values.as_inte().ok_or_else(|| SmspecError::WrongType {
        keyword,
        expected: "INTE",
        got: values.type_name(),
    })
}

fn require_char<'a>(
    index: &'a HashMap<String, ArrayValues>,
    keyword: &'static str,
) -> Result<&'a [String], SmspecError> {
    let values = index
        .get(keyword)
        .ok_or(SmspecError::MissingKeyword(keyword))?;
    values.as_char().ok_or_else(|| SmspecError::WrongType {
        keyword,
        expected: "CHAR",
        got: values.type_name(),
    })
}

fn trimmed(values: &[String]) -> Vec<String> {
    values.iter().map(|s| s.trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write_keyword;
    use std::io::Cursor;

    fn inte(values: &[i32]) -> ArrayValues {
        ArrayValues::Inte(values.to_vec())
    }

    fn chars(values: &[&str]) -> ArrayValues {
        ArrayValues::Char(values.iter().map(|s| s.to_string()).collect())
    }

    fn build(arrays: &[(&str, ArrayValues)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, values) in arrays {
            write_keyword(&mut out, name, values).unwrap();
        }
        out
    }

    fn extract(arrays: &[(&str, ArrayValues)]) -> Result<Summary, SmspecError> {
        from_stream(Stream::new(Cursor::new(build(arrays))))
    }

    fn minimal() -> Vec<(&'static str, ArrayValues)> {
        vec![
            ("DIMENS", inte(&[10, 2, 3, 4, 0, 1])),
            ("KEYWORDS", chars(&["WOPR    "])),
            ("WGNAMES", chars(&["WELL1   "])),
        ]
    }

    #[test]
    fn promotes_the_named_fields() {
        let s = extract(&minimal()).unwrap();
        assert_eq!(s.nlist, 10);
        assert_eq!(s.gridshape, (2, 3, 4));
        assert_eq!(s.istar, 1);
        assert_eq!(s.keywords, vec!["WOPR"]);
        assert_eq!(s.wgnames, vec!["WELL1"]);
    }

    #[test]
    fn untrimmed_values_stay_in_the_index() {
        let s = extract(&minimal()).unwrap();
        assert_eq!(
            s.index["KEYWORDS"].as_char().unwrap(),
            &["WOPR    ".to_string()]
        );
        assert_eq!(
            s.index["WGNAMES"].as_char().unwrap(),
            &["WELL1   ".to_string()]
        );
    }

    #[test]
    fn duplicate_keywords_keep_the_last_occurrence() {
        let mut arrays = minimal();
        arrays.push(("UNITS", chars(&["SM3     "])));
        arrays.push(("UNITS", chars(&["STB     "])));
        let s = extract(&arrays).unwrap();
        assert_eq!(s.index["UNITS"].as_char().unwrap(), &["STB     ".to_string()]);
    }

    #[test]
    fn missing_dimens_is_a_hard_failure() {
        let arrays = vec![
            ("KEYWORDS", chars(&["WOPR    "])),
            ("WGNAMES", chars(&["WELL1   "])),
        ];
        let err = extract(&arrays).unwrap_err();
        assert!(matches!(err, SmspecError::MissingKeyword("DIMENS")));
    }

    #[test]
    fn missing_wgnames_is_a_hard_failure() {
        let arrays = vec![
            ("DIMENS", inte(&[10, 2, 3, 4, 0, 1])),
            ("KEYWORDS", chars(&["WOPR    "])),
        ];
        let err = extract(&arrays).unwrap_err();
        assert!(matches!(err, SmspecError::MissingKeyword("WGNAMES")));
    }

    #[test]
    fn short_dimens_is_a_hard_failure() {
        let mut arrays = minimal();
        arrays[0] = ("DIMENS", inte(&[10, 2, 3, 4, 0]));
        let err = extract(&arrays).unwrap_err();
        assert!(matches!(
            err,
            SmspecError::TruncatedKeyword {
                keyword: "DIMENS",
                expected: 6,
                got: 5,
            }
        ));
    }

    #[test]
    fn dimens_with_the_wrong_type_is_a_hard_failure() {
        let mut arrays = minimal();
        arrays[0] = ("DIMENS", chars(&["10      "]));
        let err = extract(&arrays).unwrap_err();
        assert!(matches!(
            err,
            SmspecError::WrongType {
                keyword: "DIMENS",
                expected: "INTE",
                ..
            }
        ));
    }

    #[test]
    fn index_covers_every_keyword() {
        let mut arrays = minimal();
        arrays.push(("UNITS", chars(&["SM3     "])));
        arrays.push(("STARTDAT", inte(&[1, 1, 2020])));
        let s = extract(&arrays).unwrap();
        assert_eq!(s.index.len(), 5);
        assert_eq!(s.index["STARTDAT"].as_inte().unwrap(), &[1, 1, 2020]);
    }

    #[test]
    fn intehead_is_optional() {
        assert!(extract(&minimal()).unwrap().intehead.is_none());

        let mut arrays = minimal();
        arrays.insert(0, ("INTEHEAD", inte(&[2, 100])));
        let head = extract(&arrays).unwrap().intehead.unwrap();
        assert_eq!(head.unit_system, Some(UnitSystem::Field));
        assert_eq!(head.simulator, Some(Simulator::Eclipse100));
    }

    #[test]
    fn unknown_intehead_identifiers_degrade_to_none() {
        let mut arrays = minimal();
        arrays.insert(0, ("INTEHEAD", inte(&[9, 999])));
        let head = extract(&arrays).unwrap().intehead.unwrap();
        assert_eq!(head.unit_system, None);
        assert_eq!(head.simulator, None);
    }

    #[test]
    fn identifier_names_match_the_format_tables() {
        assert_eq!(UnitSystem::from_id(1).unwrap().name(), "METRIC");
        assert_eq!(UnitSystem::from_id(4).unwrap().name(), "PVT-M");
        assert_eq!(Simulator::from_id(500).unwrap().name(), "ECLIPSE 300 (thermal option)");
        assert_eq!(Simulator::from_id(800).unwrap().name(), "FrontSim");
    }

    #[test]
    fn summary_reads_from_a_path() {
        let path = std::env::temp_dir().join(format!("smspec-test-{}.SMSPEC", std::process::id()));
        std::fs::write(&path, build(&minimal())).unwrap();

        let s = summary(&path).unwrap();
        assert_eq!(s.nlist, 10);
        assert_eq!(s.wgnames, vec!["WELL1"]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = summary("/no/such/dir/CASE.SMSPEC").unwrap_err();
        assert!(matches!(err, SmspecError::Io(_)));
    }

    #[test]
    fn known_keyword_table() {
        assert!(is_smspec_keyword("DIMENS"));
        assert!(is_smspec_keyword("WGNAMES "));
        assert!(!is_smspec_keyword("WOPR"));
    }
}

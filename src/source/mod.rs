pub mod bundled;
pub mod csv_file;
#[cfg(feature = "network")]
pub mod remote;

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BuildError;

/// One vocabulary row: source-language term, accepted translation(s), chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    pub term: String,
    pub translation: String,
    pub chapter: String,
}

/// One numeric drill row. The chapter is assigned when the quiz is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillRecord {
    pub term: String,
    pub translation: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{origin} not found")]
    NotFound { origin: String },
    #[error("{origin}, line {line}: {reason}")]
    Malformed {
        origin: String,
        line: u64,
        reason: String,
    },
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
    #[error("failed to fetch {origin}: {reason}")]
    Network { origin: String, reason: String },
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

pub trait RecordProvider {
    /// Human-readable name of where the records come from.
    fn describe(&self) -> String;
    fn load_vocabulary(&self) -> Result<Vec<VocabRecord>, SourceError>;
    fn load_numeric_drill_pool(&self) -> Result<Vec<DrillRecord>, SourceError>;
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter);
    builder
}

fn read_rows<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &str,
    min_columns: usize,
) -> Result<Vec<(u64, Vec<String>)>, SourceError> {
    let mut rows = Vec::new();
    for result in reader_builder(delimiter).from_reader(reader).records() {
        let record = result.map_err(|source| SourceError::Csv {
            origin: origin.to_string(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < min_columns {
            return Err(SourceError::Malformed {
                origin: origin.to_string(),
                line,
                reason: format!(
                    "expected at least {min_columns} columns, found {}",
                    record.len()
                ),
            });
        }
        let cells: Vec<String> = record.iter().take(min_columns).map(str::to_string).collect();
        if let Some(col) = cells.iter().position(String::is_empty) {
            return Err(SourceError::Malformed {
                origin: origin.to_string(),
                line,
                reason: format!("column {} is empty", col + 1),
            });
        }
        rows.push((line, cells));
    }
    Ok(rows)
}

/// Parse headerless `term, translation, chapter` rows.
pub fn parse_vocabulary<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &str,
) -> Result<Vec<VocabRecord>, SourceError> {
    let rows = read_rows(reader, delimiter, origin, 3)?;
    Ok(rows
        .into_iter()
        .map(|(_, mut cells)| {
            let chapter = cells.pop().unwrap_or_default();
            let translation = cells.pop().unwrap_or_default();
            let term = cells.pop().unwrap_or_default();
            VocabRecord {
                term,
                translation,
                chapter,
            }
        })
        .collect())
}

/// Parse headerless `term, translation` rows. Extra columns are ignored.
pub fn parse_drill_pool<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &str,
) -> Result<Vec<DrillRecord>, SourceError> {
    let rows = read_rows(reader, delimiter, origin, 2)?;
    Ok(rows
        .into_iter()
        .map(|(_, mut cells)| {
            let translation = cells.pop().unwrap_or_default();
            let term = cells.pop().unwrap_or_default();
            DrillRecord { term, translation }
        })
        .collect())
}

/// Minimum row counts that must hold before a quiz can be offered at all.
pub fn check_row_counts(
    vocabulary: &[VocabRecord],
    drill_pool: &[DrillRecord],
    drill_count: usize,
) -> Result<(), BuildError> {
    if vocabulary.is_empty() {
        return Err(BuildError::EmptySource);
    }
    if drill_pool.len() < drill_count {
        return Err(BuildError::InsufficientDrillSource {
            available: drill_pool.len(),
            required: drill_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary_rows() {
        let data = "xin chào, 안녕하세요, 1\ncảm ơn,감사합니다,1\n\nnước,물,2\n";
        let rows = parse_vocabulary(data.as_bytes(), b',', "vocab.csv").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].term, "xin chào");
        assert_eq!(rows[0].translation, "안녕하세요");
        assert_eq!(rows[2].chapter, "2");
    }

    #[test]
    fn test_quoted_translation_keeps_alternates() {
        let data = "chào,\"안녕, 안녕하세요\",1\n";
        let rows = parse_vocabulary(data.as_bytes(), b',', "vocab.csv").unwrap();
        assert_eq!(rows[0].translation, "안녕, 안녕하세요");
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let data = "một,일,1\nhai,이\n";
        let err = parse_vocabulary(data.as_bytes(), b',', "vocab.csv").unwrap_err();
        match err {
            SourceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_cell_is_malformed() {
        let data = "một,,1\n";
        let err = parse_vocabulary(data.as_bytes(), b',', "vocab.csv").unwrap_err();
        assert!(err.to_string().contains("column 2 is empty"));
    }

    #[test]
    fn test_drill_pool_ignores_extra_columns() {
        let data = "mười\t십\tignored\n";
        let rows = parse_drill_pool(data.as_bytes(), b'\t', "numbers.tsv").unwrap();
        assert_eq!(
            rows,
            vec![DrillRecord {
                term: "mười".to_string(),
                translation: "십".to_string()
            }]
        );
    }

    #[test]
    fn test_check_row_counts() {
        let vocab = vec![VocabRecord {
            term: "a".into(),
            translation: "b".into(),
            chapter: "1".into(),
        }];
        let pool = vec![DrillRecord {
            term: "1".into(),
            translation: "일".into(),
        }];
        assert!(check_row_counts(&vocab, &pool, 1).is_ok());
        assert_eq!(
            check_row_counts(&vocab, &pool, 10),
            Err(BuildError::InsufficientDrillSource {
                available: 1,
                required: 10
            })
        );
        assert_eq!(
            check_row_counts(&[], &pool, 0),
            Err(BuildError::EmptySource)
        );
    }
}

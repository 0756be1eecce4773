use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::source::{
    DrillRecord, RecordProvider, SourceError, VocabRecord, parse_drill_pool, parse_vocabulary,
};

/// Reads vocabulary and drill rows from delimited text files (`.csv` or `.tsv`).
pub struct CsvProvider {
    vocabulary_path: PathBuf,
    drill_pool_path: PathBuf,
}

impl CsvProvider {
    pub fn new(vocabulary_path: impl Into<PathBuf>, drill_pool_path: impl Into<PathBuf>) -> Self {
        Self {
            vocabulary_path: vocabulary_path.into(),
            drill_pool_path: drill_pool_path.into(),
        }
    }

    fn open(path: &Path) -> Result<File, SourceError> {
        File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SourceError::NotFound {
                    origin: path.display().to_string(),
                }
            } else {
                SourceError::Io {
                    origin: path.display().to_string(),
                    source,
                }
            }
        })
    }
}

/// Tab for `.tsv`/`.tab` files, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

impl RecordProvider for CsvProvider {
    fn describe(&self) -> String {
        self.vocabulary_path.display().to_string()
    }

    fn load_vocabulary(&self) -> Result<Vec<VocabRecord>, SourceError> {
        let file = Self::open(&self.vocabulary_path)?;
        parse_vocabulary(
            file,
            delimiter_for(&self.vocabulary_path),
            &self.vocabulary_path.display().to_string(),
        )
    }

    fn load_numeric_drill_pool(&self) -> Result<Vec<DrillRecord>, SourceError> {
        let file = Self::open(&self.drill_pool_path)?;
        parse_drill_pool(
            file,
            delimiter_for(&self.drill_pool_path),
            &self.drill_pool_path.display().to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let provider = CsvProvider::new(dir.path().join("nope.csv"), dir.path().join("n.csv"));
        let err = provider.load_vocabulary().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_loads_tsv_by_extension() {
        let dir = TempDir::new().unwrap();
        let vocab = dir.path().join("vocab.tsv");
        let numbers = dir.path().join("numbers.csv");
        fs::write(&vocab, "nhà\t집\t1\n").unwrap();
        fs::write(&numbers, "một,일\nhai,이\n").unwrap();

        let provider = CsvProvider::new(&vocab, &numbers);
        let rows = provider.load_vocabulary().unwrap();
        assert_eq!(rows[0].translation, "집");
        assert_eq!(provider.load_numeric_drill_pool().unwrap().len(), 2);
    }

    #[test]
    fn test_delimiter_detection() {
        assert_eq!(delimiter_for(Path::new("a.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("a.csv")), b',');
        assert_eq!(delimiter_for(Path::new("noext")), b',');
    }
}

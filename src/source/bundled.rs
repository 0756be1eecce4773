use rust_embed::Embed;

use crate::source::{
    DrillRecord, RecordProvider, SourceError, VocabRecord, parse_drill_pool, parse_vocabulary,
};

#[derive(Embed)]
#[folder = "assets/data/"]
struct DataAssets;

pub const BUNDLED_VOCABULARY: &str = "vocabulary.csv";
pub const BUNDLED_DRILL_POOL: &str = "numbers.csv";

/// Sample Vietnamese-Korean data compiled into the binary.
#[derive(Default)]
pub struct BundledProvider;

impl BundledProvider {
    fn asset(name: &str) -> Result<Vec<u8>, SourceError> {
        DataAssets::get(name)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| SourceError::NotFound {
                origin: format!("bundled {name}"),
            })
    }
}

impl RecordProvider for BundledProvider {
    fn describe(&self) -> String {
        format!("bundled {BUNDLED_VOCABULARY}")
    }

    fn load_vocabulary(&self) -> Result<Vec<VocabRecord>, SourceError> {
        let data = Self::asset(BUNDLED_VOCABULARY)?;
        parse_vocabulary(data.as_slice(), b',', BUNDLED_VOCABULARY)
    }

    fn load_numeric_drill_pool(&self) -> Result<Vec<DrillRecord>, SourceError> {
        let data = Self::asset(BUNDLED_DRILL_POOL)?;
        parse_drill_pool(data.as_slice(), b',', BUNDLED_DRILL_POOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::chapter_order::order_chapters;

    #[test]
    fn test_bundled_data_parses() {
        let provider = BundledProvider;
        let vocab = provider.load_vocabulary().unwrap();
        assert!(!vocab.is_empty());
        let chapters = order_chapters(vocab.iter().map(|r| r.chapter.as_str()));
        assert!(chapters.len() >= 2);

        let pool = provider.load_numeric_drill_pool().unwrap();
        assert!(pool.len() >= 10, "bundled pool must cover the default drill");
    }
}

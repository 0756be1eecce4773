pub mod sino_numbers;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::source::DrillRecord;

/// Where numeric drill rows come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillSource {
    /// Only the rows of the drill pool file.
    #[default]
    File,
    /// Only synthesized Sino-Korean numbers.
    Generated,
    /// File rows followed by synthesized numbers.
    Mixed,
}

impl DrillSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DrillSource::File => "file",
            DrillSource::Generated => "generated",
            DrillSource::Mixed => "mixed",
        }
    }

    pub fn needs_file(self) -> bool {
        !matches!(self, DrillSource::Generated)
    }
}

/// Assemble the drill pool once per process. The quiz builder samples from it
/// with the session seed, so the pool itself must stay fixed afterwards.
pub fn compose_drill_pool(
    source: DrillSource,
    file_rows: Vec<DrillRecord>,
    generated_count: usize,
    max_value: u64,
    rng: &mut SmallRng,
) -> Vec<DrillRecord> {
    match source {
        DrillSource::File => file_rows,
        DrillSource::Generated => {
            sino_numbers::generate_drill_records(generated_count, max_value, rng)
        }
        DrillSource::Mixed => {
            let mut pool = file_rows;
            pool.extend(sino_numbers::generate_drill_records(
                generated_count,
                max_value,
                rng,
            ));
            pool
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn file_rows() -> Vec<DrillRecord> {
        vec![DrillRecord {
            term: "mười".to_string(),
            translation: "십".to_string(),
        }]
    }

    #[test]
    fn test_compose_by_source() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            compose_drill_pool(DrillSource::File, file_rows(), 5, 100, &mut rng),
            file_rows()
        );
        let generated = compose_drill_pool(DrillSource::Generated, file_rows(), 5, 100, &mut rng);
        assert_eq!(generated.len(), 5);
        assert!(!generated.contains(&file_rows()[0]));
        let mixed = compose_drill_pool(DrillSource::Mixed, file_rows(), 5, 100, &mut rng);
        assert_eq!(mixed.len(), 6);
        assert_eq!(mixed[0], file_rows()[0]);
    }

    #[test]
    fn test_drill_source_serde_names() {
        let parsed: DrillSource = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(parsed, DrillSource::Mixed);
        assert_eq!(DrillSource::Generated.as_str(), "generated");
        assert!(!DrillSource::Generated.needs_file());
    }
}

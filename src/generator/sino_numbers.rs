use std::collections::BTreeSet;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::source::DrillRecord;

const DIGITS: [&str; 10] = ["", "일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const UNITS: [&str; 4] = ["", "십", "백", "천"];
const GROUP_UNITS: [&str; 5] = ["", "만", "억", "조", "경"];

/// Prefix of generated drill terms ("Sino number").
pub const TERM_PREFIX: &str = "Số hán";

/// Sino-Korean reading of `n`.
///
/// Digits are read in groups of four (만, 억, 조, 경). Inside a group a 1 in
/// front of 십/백/천 is silent, so 10 is 십 and 1000 is 천, while 10000 reads 일만.
pub fn sino_korean(n: u64) -> String {
    if n == 0 {
        return "영".to_string();
    }
    let digits: Vec<usize> = n.to_string().bytes().map(|b| (b - b'0') as usize).collect();
    let group_count = digits.len().div_ceil(4);
    let padded: Vec<usize> = std::iter::repeat_n(0, group_count * 4 - digits.len())
        .chain(digits)
        .collect();

    let mut reading = String::new();
    for (group_idx, group) in padded.chunks(4).enumerate() {
        let mut group_reading = String::new();
        for (pos, &digit) in group.iter().enumerate() {
            if digit == 0 {
                continue;
            }
            let unit = UNITS[3 - pos];
            if digit == 1 && pos != 3 {
                group_reading.push_str(unit);
            } else {
                group_reading.push_str(DIGITS[digit]);
                group_reading.push_str(unit);
            }
        }
        if !group_reading.is_empty() {
            reading.push_str(&group_reading);
            reading.push_str(GROUP_UNITS[group_count - group_idx - 1]);
        }
    }
    reading
}

/// `count` drill records for distinct random integers in `1..=max_value`.
pub fn generate_drill_records(count: usize, max_value: u64, rng: &mut SmallRng) -> Vec<DrillRecord> {
    let max_value = max_value.max(1);
    let count = count.min(usize::try_from(max_value).unwrap_or(usize::MAX));
    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(count);
    while records.len() < count {
        let n = rng.gen_range(1..=max_value);
        if seen.insert(n) {
            records.push(DrillRecord {
                term: format!("{TERM_PREFIX} {n}"),
                translation: sino_korean(n),
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_small_numbers() {
        assert_eq!(sino_korean(0), "영");
        assert_eq!(sino_korean(1), "일");
        assert_eq!(sino_korean(10), "십");
        assert_eq!(sino_korean(15), "십오");
        assert_eq!(sino_korean(20), "이십");
        assert_eq!(sino_korean(100), "백");
        assert_eq!(sino_korean(1234), "천이백삼십사");
    }

    #[test]
    fn test_group_units() {
        assert_eq!(sino_korean(10_000), "일만");
        assert_eq!(sino_korean(25_000), "이만오천");
        assert_eq!(sino_korean(100_000), "십만");
        assert_eq!(sino_korean(1_000_000), "백만");
        assert_eq!(sino_korean(100_000_001), "일억일");
        assert_eq!(sino_korean(1_000_000_000_000), "일조");
    }

    #[test]
    fn test_generated_records_are_unique() {
        let mut rng = SmallRng::seed_from_u64(42);
        let records = generate_drill_records(50, 100, &mut rng);
        assert_eq!(records.len(), 50);
        let unique: BTreeSet<&str> = records.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(unique.len(), 50);
        assert!(records.iter().all(|r| r.term.starts_with(TERM_PREFIX)));
    }

    #[test]
    fn test_count_capped_by_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        let records = generate_drill_records(10, 3, &mut rng);
        assert_eq!(records.len(), 3);
    }
}

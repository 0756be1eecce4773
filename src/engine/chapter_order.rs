use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Chapter label reserved for the numeric drill appended after the selection.
pub const DRILL_CHAPTER: &str = "Numbers";

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ChapterKey<'a> {
    Numeric(i64, &'a str),
    Symbolic(&'a str),
}

fn chapter_key(label: &str) -> ChapterKey<'_> {
    match label.trim().parse::<i64>() {
        Ok(n) => ChapterKey::Numeric(n, label),
        Err(_) => ChapterKey::Symbolic(label),
    }
}

/// Numeric labels first by value, then symbolic labels by codepoint order.
/// Labels with the same numeric value ("1" and "01") fall back to string order.
pub fn compare_chapters(a: &str, b: &str) -> Ordering {
    chapter_key(a).cmp(&chapter_key(b))
}

/// Deduplicate and order chapter labels.
pub fn order_chapters<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = labels
        .into_iter()
        .map(|l| l.as_ref().to_string())
        .collect();
    let mut ordered: Vec<String> = unique.into_iter().collect();
    ordered.sort_by(|a, b| compare_chapters(a, b));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_labels_sort_by_value() {
        let ordered = order_chapters(["10", "2", "1"]);
        assert_eq!(ordered, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_symbolic_labels_follow_numeric() {
        let ordered = order_chapters(["Numbers", "3", "Greetings", "1"]);
        assert_eq!(ordered, vec!["1", "3", "Greetings", "Numbers"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let ordered = order_chapters(["2", "1", "2", "1"]);
        assert_eq!(ordered, vec!["1", "2"]);
    }

    #[test]
    fn test_negative_and_padded_numbers() {
        let ordered = order_chapters(["01", "-1", "1", "b", "a"]);
        assert_eq!(ordered, vec!["-1", "01", "1", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        let ordered = order_chapters(Vec::<String>::new());
        assert!(ordered.is_empty());
    }
}

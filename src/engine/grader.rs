use std::ops::Range;

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::error::GradingError;
use crate::session::ledger::AnswerLedger;
use crate::session::quiz::VocabItem;
use crate::session::result::{AnswerDetail, ReportScope, ScoreReport, Verdict};

/// NFC, trimmed, lowercased. Decomposed Hangul jamo compose to syllables first.
pub fn normalize_answer(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(text).trim().to_lowercase()
}

/// The comma-separated alternates of a translation, normalized. Empty
/// alternates are dropped so a blank answer can never match.
pub fn accepted_answers(translation: &str) -> Vec<String> {
    translation
        .split(',')
        .map(normalize_answer)
        .filter(|a| !a.is_empty())
        .collect()
}

pub fn judge(answer: &str, translation: &str) -> Verdict {
    let normalized = normalize_answer(answer);
    if normalized.is_empty() {
        Verdict::Blank
    } else if accepted_answers(translation).contains(&normalized) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Grade `range` of the quiz. Pure, so grading a chapter and then the whole
/// quiz from the same ledger gives consistent reports.
pub fn score_range(
    ledger: &AnswerLedger,
    items: &[VocabItem],
    range: Range<usize>,
    scope: ReportScope,
) -> Result<ScoreReport, GradingError> {
    if ledger.len() != items.len() {
        return Err(GradingError::LedgerMismatch {
            ledger: ledger.len(),
            items: items.len(),
        });
    }
    if range.end > items.len() || range.start > range.end {
        return Err(GradingError::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            len: items.len(),
        });
    }
    if range.is_empty() {
        return Err(GradingError::EmptyRange);
    }

    let total = range.len();
    let mut correct_count = 0;
    let mut details = Vec::new();
    for (item, answer) in items[range.clone()].iter().zip(ledger.slice(range)) {
        match judge(answer, &item.translation) {
            Verdict::Correct => correct_count += 1,
            verdict => details.push(AnswerDetail {
                item: item.clone(),
                verdict,
                user_answer: answer.clone(),
            }),
        }
    }

    Ok(ScoreReport {
        scope,
        correct_count,
        total,
        percentage: correct_count as f64 / total as f64 * 100.0,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(i: usize, translation: &str) -> VocabItem {
        VocabItem {
            term: format!("term{i}"),
            translation: translation.to_string(),
            chapter: "1".to_string(),
            global_index: i,
        }
    }

    #[test]
    fn test_case_and_space_insensitive_alternates() {
        assert_eq!(judge("  Xin  ", "xin, chào"), Verdict::Correct);
        assert_eq!(judge("CHÀO", "xin, chào"), Verdict::Correct);
        assert_eq!(judge("xin chào", "xin, chào"), Verdict::Incorrect);
    }

    #[test]
    fn test_blank_never_correct() {
        assert_eq!(judge("", "a, , b"), Verdict::Blank);
        assert_eq!(judge("   ", ""), Verdict::Blank);
        assert!(accepted_answers("a, , b").iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_decomposed_hangul_matches() {
        // 한 written as conjoining jamo
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        assert_eq!(judge(decomposed, "한"), Verdict::Correct);
    }

    #[test]
    fn test_score_range_counts_and_details() {
        let items = vec![item(0, "물"), item(1, "밥"), item(2, "차, 녹차")];
        let mut ledger = AnswerLedger::new(3);
        ledger.set(0, "물").unwrap();
        ledger.set(1, "빵").unwrap();
        ledger.set(2, "녹차").unwrap();

        let report = score_range(&ledger, &items, 0..3, ReportScope::Quiz).unwrap();
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.total, 3);
        assert!((report.percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].verdict, Verdict::Incorrect);
        assert_eq!(report.details[0].user_answer, "빵");

        let chapter = score_range(&ledger, &items, 1..2, ReportScope::Chapter("1".into())).unwrap();
        assert_eq!(chapter.correct_count, 0);
        assert_eq!(chapter.total, 1);
    }

    #[test]
    fn test_score_range_is_idempotent() {
        let items = vec![item(0, "a"), item(1, "b")];
        let mut ledger = AnswerLedger::new(2);
        ledger.set(1, "B").unwrap();
        let first = score_range(&ledger, &items, 0..2, ReportScope::Quiz).unwrap();
        let second = score_range(&ledger, &items, 0..2, ReportScope::Quiz).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_range_errors() {
        let items = vec![item(0, "a")];
        let ledger = AnswerLedger::new(1);
        assert_eq!(
            score_range(&ledger, &items, 0..0, ReportScope::Quiz),
            Err(GradingError::EmptyRange)
        );
        assert_eq!(
            score_range(&ledger, &items, 0..2, ReportScope::Quiz),
            Err(GradingError::RangeOutOfBounds {
                start: 0,
                end: 2,
                len: 1
            })
        );
        assert_eq!(
            score_range(&AnswerLedger::new(2), &items, 0..1, ReportScope::Quiz),
            Err(GradingError::LedgerMismatch {
                ledger: 2,
                items: 1
            })
        );
    }
}

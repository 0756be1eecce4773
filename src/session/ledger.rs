use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The learner's current raw answer for every item, addressed by global index.
///
/// Sized once when the quiz is built and never shrinks. Pages write their
/// slice back through [`AnswerLedger::write_page`], so answers on pages that
/// are not on screen are never touched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLedger {
    answers: Vec<String>,
}

impl AnswerLedger {
    pub fn new(len: usize) -> Self {
        Self {
            answers: vec![String::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn slice(&self, range: Range<usize>) -> &[String] {
        let end = range.end.min(self.answers.len());
        let start = range.start.min(end);
        &self.answers[start..end]
    }

    pub fn set(&mut self, index: usize, answer: &str) -> Result<(), LedgerError> {
        let len = self.answers.len();
        let slot = self
            .answers
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfBounds { index, len })?;
        slot.clear();
        slot.push_str(answer);
        Ok(())
    }

    /// Replace the answers of one page. The update must cover the page exactly.
    pub fn write_page(&mut self, range: Range<usize>, updated: &[String]) -> Result<(), LedgerError> {
        if range.end > self.answers.len() {
            return Err(LedgerError::IndexOutOfBounds {
                index: range.end.saturating_sub(1),
                len: self.answers.len(),
            });
        }
        if updated.len() != range.len() {
            return Err(LedgerError::AnswerCountMismatch {
                expected: range.len(),
                got: updated.len(),
            });
        }
        for (slot, answer) in self.answers[range].iter_mut().zip(updated) {
            slot.clone_from(answer);
        }
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.trim().is_empty()).count()
    }
}

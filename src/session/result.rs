use serde::{Deserialize, Serialize};

use crate::session::quiz::VocabItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "label")]
pub enum ReportScope {
    Quiz,
    Chapter(String),
}

/// One item the learner did not get right.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub item: VocabItem,
    pub verdict: Verdict,
    pub user_answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub scope: ReportScope,
    pub correct_count: usize,
    pub total: usize,
    pub percentage: f64,
    pub details: Vec<AnswerDetail>,
}

impl ScoreReport {
    pub fn is_perfect(&self) -> bool {
        self.correct_count == self.total
    }

    pub fn blank_count(&self) -> usize {
        self.details
            .iter()
            .filter(|d| d.verdict == Verdict::Blank)
            .count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.details
            .iter()
            .filter(|d| d.verdict == Verdict::Incorrect)
            .count()
    }
}

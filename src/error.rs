use thiserror::Error;

/// Reasons a quiz cannot be built. All of them send the learner back to
/// chapter selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("select at least one chapter to start the quiz")]
    EmptySelection,
    #[error("the selected chapters contain no vocabulary")]
    EmptySource,
    #[error("numeric drill source has {available} entries, at least {required} are required")]
    InsufficientDrillSource { available: usize, required: usize },
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("page {requested} does not exist (quiz has {total} pages)")]
    NoSuchPage { requested: usize, total: usize },
    #[error("cannot submit from page {page}, the quiz ends on page {total}")]
    NotOnLastPage { page: usize, total: usize },
}

/// Grading faults point at a broken builder invariant, never at learner input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GradingError {
    #[error("cannot grade an empty range")]
    EmptyRange,
    #[error("range {start}..{end} exceeds {len} items")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    #[error("ledger holds {ledger} answers for {items} items")]
    LedgerMismatch { ledger: usize, items: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("page expects {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },
    #[error("answer slot {index} is outside the ledger ({len} entries)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A stored session whose layout no longer matches its items.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("session has {pages} page spans but records {total} pages")]
    PageCount { pages: usize, total: usize },
    #[error("ledger holds {ledger} answers for {items} items")]
    LedgerLength { ledger: usize, items: usize },
    #[error("page {page} does not start where the previous page ended")]
    PageGap { page: usize },
    #[error("pages cover {covered} of {items} items")]
    PageCoverage { covered: usize, items: usize },
    #[error("chapter {label:?} does not line up with its pages")]
    ChapterMisaligned { label: String },
    #[error("chapter boundaries {boundaries:?} do not end on page {total}")]
    Boundaries { boundaries: Vec<usize>, total: usize },
    #[error("current page {page} is outside 1..={total}")]
    CurrentPage { page: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("internal grading failure: {0}")]
    Grading(#[from] GradingError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("no quiz is in progress")]
    NotStarted,
    #[error("session store failure: {0:#}")]
    Store(anyhow::Error),
}

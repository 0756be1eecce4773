use serde::{Deserialize, Serialize};

use crate::engine::grader::score_range;
use crate::error::{NavigationError, QuizError};
use crate::session::builder::{BuildOptions, build_quiz};
use crate::session::quiz::{PageMove, QuizSession};
use crate::session::result::{ReportScope, ScoreReport};
use crate::source::{DrillRecord, VocabRecord};
use crate::store::SessionStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Restart draws a new numeric drill.
    #[default]
    FreshSeed,
    /// Restart reuses the previous quiz's drill seed.
    KeepSeed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAction {
    Previous,
    Next,
    Submit,
    Restart,
}

/// What the presentation layer sends back after each interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnInput {
    pub updated_answers: Vec<String>,
    pub action: TurnAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageItem {
    pub global_index: usize,
    pub term: String,
}

/// Everything needed to render one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    pub page_number: usize,
    pub total_pages: usize,
    pub chapter: String,
    pub items: Vec<PageItem>,
    pub current_answers: Vec<String>,
    pub chapter_boundaries: Vec<usize>,
    pub answered: usize,
    pub total_items: usize,
}

impl PageView {
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            page_number: session.current_page,
            total_pages: session.total_pages,
            chapter: session
                .chapter_of_page(session.current_page)
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            items: session
                .current_items()
                .iter()
                .map(|item| PageItem {
                    global_index: item.global_index,
                    term: item.term.clone(),
                })
                .collect(),
            current_answers: session.current_answers().to_vec(),
            chapter_boundaries: session.chapter_boundaries.clone(),
            answered: session.ledger.answered_count(),
            total_items: session.items.len(),
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.page_number <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number >= self.total_pages
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    Page {
        view: PageView,
        /// Set when Next just moved off a chapter's last page.
        completed_chapter: Option<ScoreReport>,
        /// Set when the requested move was out of range and got clamped.
        clamped: Option<NavigationError>,
    },
    Finished {
        view: PageView,
        quiz: ScoreReport,
        last_chapter: Option<ScoreReport>,
    },
    Restarted,
}

/// Owns the session store and drives quiz turns against it.
///
/// Each call loads the session, applies one learner action and saves the
/// result, so the store is the only place the quiz lives between turns.
pub struct SessionLifecycle<S: SessionStore> {
    store: S,
    restart_policy: RestartPolicy,
    retained_seed: Option<u64>,
}

impl<S: SessionStore> SessionLifecycle<S> {
    pub fn new(store: S, restart_policy: RestartPolicy) -> Self {
        Self {
            store,
            restart_policy,
            retained_seed: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seed the next `start` falls back to when no explicit seed is given.
    pub fn retained_seed(&self) -> Option<u64> {
        self.retained_seed
    }

    fn load(&self) -> Result<Option<QuizSession>, QuizError> {
        self.store.load().map_err(QuizError::Store)
    }

    fn save(&mut self, session: &QuizSession) -> Result<(), QuizError> {
        self.store.save(session).map_err(QuizError::Store)
    }

    pub fn is_active(&self) -> Result<bool, QuizError> {
        Ok(self.load()?.is_some_and(|s| s.is_active()))
    }

    /// Build and store a new quiz. On a build error nothing is stored.
    pub fn start<I>(
        &mut self,
        vocabulary: &[VocabRecord],
        selected: I,
        drill_pool: &[DrillRecord],
        opts: &BuildOptions,
    ) -> Result<PageView, QuizError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let opts = BuildOptions {
            seed: opts.seed.or(self.retained_seed),
            ..*opts
        };
        let session = build_quiz(vocabulary, selected, drill_pool, &opts)?;
        self.retained_seed = session.sampling_seed;
        self.save(&session)?;
        Ok(PageView::from_session(&session))
    }

    pub fn view(&self) -> Result<Option<PageView>, QuizError> {
        Ok(self.load()?.map(|s| PageView::from_session(&s)))
    }

    pub fn session(&self) -> Result<Option<QuizSession>, QuizError> {
        self.load()
    }

    /// Apply one learner action. The displayed page's answers are recorded
    /// before navigating or grading; Restart discards them with the quiz.
    pub fn turn(&mut self, input: TurnInput) -> Result<TurnOutcome, QuizError> {
        let mut session = match input.action {
            TurnAction::Restart => {
                self.restart()?;
                return Ok(TurnOutcome::Restarted);
            }
            _ => self.load()?.ok_or(QuizError::NotStarted)?,
        };
        let range = session.current_range();
        session.ledger.write_page(range, &input.updated_answers)?;
        log::debug!(
            "turn {:?} on page {}/{}",
            input.action,
            session.current_page,
            session.total_pages
        );

        let outcome = match input.action {
            TurnAction::Next => navigate(&mut session, QuizSession::go_next)?,
            TurnAction::Previous => navigate(&mut session, QuizSession::go_previous)?,
            TurnAction::Submit => submit(&mut session)?,
            TurnAction::Restart => TurnOutcome::Restarted,
        };

        self.save(&session)?;
        Ok(outcome)
    }

    /// Drop the quiz and return to "not started".
    pub fn restart(&mut self) -> Result<(), QuizError> {
        let previous_seed = self.load()?.and_then(|s| s.sampling_seed);
        self.retained_seed = match self.restart_policy {
            RestartPolicy::KeepSeed => previous_seed.or(self.retained_seed),
            RestartPolicy::FreshSeed => None,
        };
        self.store.clear().map_err(QuizError::Store)?;
        log::info!("session restarted ({:?})", self.restart_policy);
        Ok(())
    }
}

fn navigate(
    session: &mut QuizSession,
    step: fn(&mut QuizSession) -> Result<PageMove, NavigationError>,
) -> Result<TurnOutcome, QuizError> {
    match step(session) {
        Ok(mv) => {
            let completed_chapter = match mv.completed_chapter {
                Some(idx) => Some(grade_chapter(session, idx)?),
                None => None,
            };
            Ok(TurnOutcome::Page {
                view: PageView::from_session(session),
                completed_chapter,
                clamped: None,
            })
        }
        Err(e) => {
            log::warn!("clamping navigation: {e}");
            Ok(TurnOutcome::Page {
                view: PageView::from_session(session),
                completed_chapter: None,
                clamped: Some(e),
            })
        }
    }
}

fn submit(session: &mut QuizSession) -> Result<TurnOutcome, QuizError> {
    if !session.is_last_page() {
        let e = NavigationError::NotOnLastPage {
            page: session.current_page,
            total: session.total_pages,
        };
        log::warn!("ignoring submit: {e}");
        return Ok(TurnOutcome::Page {
            view: PageView::from_session(session),
            completed_chapter: None,
            clamped: Some(e),
        });
    }

    let quiz = grade(session, 0..session.items.len(), ReportScope::Quiz)?;
    let last_chapter = match session.chapter_ending_on(session.current_page) {
        Some(idx) => Some(grade_chapter(session, idx)?),
        None => None,
    };
    session.submitted = true;
    log::info!(
        "quiz submitted: {}/{} ({:.2}%)",
        quiz.correct_count,
        quiz.total,
        quiz.percentage
    );
    Ok(TurnOutcome::Finished {
        view: PageView::from_session(session),
        quiz,
        last_chapter,
    })
}

fn grade(
    session: &QuizSession,
    range: std::ops::Range<usize>,
    scope: ReportScope,
) -> Result<ScoreReport, QuizError> {
    score_range(&session.ledger, &session.items, range, scope).map_err(|e| {
        log::error!("grading failed: {e}");
        QuizError::Grading(e)
    })
}

fn grade_chapter(session: &QuizSession, chapter: usize) -> Result<ScoreReport, QuizError> {
    let span = &session.chapters[chapter];
    grade(
        session,
        span.items(),
        ReportScope::Chapter(span.label.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::session::result::Verdict;
    use crate::store::MemoryStore;

    fn vocab() -> Vec<VocabRecord> {
        let mut rows = Vec::new();
        for (chapter, n) in [("2", 3), ("1", 12)] {
            for i in 0..n {
                rows.push(VocabRecord {
                    term: format!("{chapter}.{i}"),
                    translation: format!("ans{chapter}.{i}, alt{chapter}.{i}"),
                    chapter: chapter.to_string(),
                });
            }
        }
        rows
    }

    fn pool() -> Vec<DrillRecord> {
        (1..=30)
            .map(|n| DrillRecord {
                term: format!("số {n}"),
                translation: format!("{n}"),
            })
            .collect()
    }

    fn opts(seed: Option<u64>) -> BuildOptions {
        BuildOptions {
            drill_count: 10,
            page_size: 10,
            seed,
        }
    }

    fn lifecycle() -> SessionLifecycle<MemoryStore> {
        SessionLifecycle::new(MemoryStore::default(), RestartPolicy::FreshSeed)
    }

    fn blanks(n: usize) -> Vec<String> {
        vec![String::new(); n]
    }

    fn next(answers: Vec<String>) -> TurnInput {
        TurnInput {
            updated_answers: answers,
            action: TurnAction::Next,
        }
    }

    #[test]
    fn test_start_renders_first_page() {
        let mut lc = lifecycle();
        let view = lc.start(&vocab(), ["1", "2"], &pool(), &opts(Some(1))).unwrap();
        assert_eq!(view.page_number, 1);
        assert_eq!(view.total_pages, 4);
        assert_eq!(view.chapter, "1");
        assert_eq!(view.items.len(), 10);
        assert_eq!(view.current_answers, blanks(10));
    }

    #[test]
    fn test_failed_start_leaves_store_empty() {
        let mut lc = lifecycle();
        let err = lc
            .start(&vocab(), Vec::<&str>::new(), &pool(), &opts(None))
            .unwrap_err();
        assert!(matches!(err, QuizError::Build(BuildError::EmptySelection)));
        assert!(lc.view().unwrap().is_none());
    }

    #[test]
    fn test_turn_without_quiz_is_not_started() {
        let mut lc = lifecycle();
        let err = lc.turn(next(Vec::new())).unwrap_err();
        assert!(matches!(err, QuizError::NotStarted));
    }

    #[test]
    fn test_answers_survive_navigation() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1", "2"], &pool(), &opts(Some(1))).unwrap();
        let mut answers = blanks(10);
        answers[3] = "ans1.3".to_string();
        lc.turn(next(answers.clone())).unwrap();

        let outcome = lc
            .turn(TurnInput {
                updated_answers: vec!["x".to_string(), String::new()],
                action: TurnAction::Previous,
            })
            .unwrap();
        let TurnOutcome::Page { view, .. } = outcome else {
            panic!("expected a page");
        };
        assert_eq!(view.page_number, 1);
        assert_eq!(view.current_answers, answers);

        lc.turn(next(answers)).unwrap();
        let view = lc.view().unwrap().unwrap();
        assert_eq!(view.current_answers, vec!["x".to_string(), String::new()]);
    }

    #[test]
    fn test_next_off_boundary_grades_chapter() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1", "2"], &pool(), &opts(Some(1))).unwrap();
        let page1: Vec<String> = (0..10).map(|i| format!("ALT1.{i}")).collect();
        let outcome = lc.turn(next(page1)).unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Page {
                completed_chapter: None,
                ..
            }
        ));

        let outcome = lc.turn(next(vec!["ans1.10".into(), String::new()])).unwrap();
        let TurnOutcome::Page {
            completed_chapter: Some(report),
            view,
            ..
        } = outcome
        else {
            panic!("expected chapter report");
        };
        assert_eq!(report.scope, ReportScope::Chapter("1".to_string()));
        assert_eq!(report.correct_count, 11);
        assert_eq!(report.total, 12);
        assert_eq!(report.details[0].verdict, Verdict::Blank);
        assert_eq!(view.chapter, "2");
    }

    #[test]
    fn test_clamped_navigation_keeps_answers() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1", "2"], &pool(), &opts(Some(1))).unwrap();
        let mut answers = blanks(10);
        answers[0] = "kept".to_string();
        let outcome = lc
            .turn(TurnInput {
                updated_answers: answers,
                action: TurnAction::Previous,
            })
            .unwrap();
        let TurnOutcome::Page { view, clamped, .. } = outcome else {
            panic!("expected a page");
        };
        assert!(clamped.is_some());
        assert_eq!(view.page_number, 1);
        assert_eq!(view.current_answers[0], "kept");
    }

    #[test]
    fn test_submit_only_on_last_page() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1", "2"], &pool(), &opts(Some(1))).unwrap();
        let outcome = lc
            .turn(TurnInput {
                updated_answers: blanks(10),
                action: TurnAction::Submit,
            })
            .unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Page {
                clamped: Some(NavigationError::NotOnLastPage { .. }),
                ..
            }
        ));

        lc.turn(next(blanks(10))).unwrap();
        lc.turn(next(blanks(2))).unwrap();
        lc.turn(next(blanks(3))).unwrap();
        let outcome = lc
            .turn(TurnInput {
                updated_answers: blanks(10),
                action: TurnAction::Submit,
            })
            .unwrap();
        let TurnOutcome::Finished {
            quiz, last_chapter, ..
        } = outcome
        else {
            panic!("expected results");
        };
        assert_eq!(quiz.correct_count, 0);
        assert_eq!(quiz.total, 25);
        assert!(quiz.details.iter().all(|d| d.verdict == Verdict::Blank));
        assert_eq!(
            last_chapter.map(|r| r.scope),
            Some(ReportScope::Chapter("Numbers".to_string()))
        );
        assert!(lc.session().unwrap().unwrap().submitted);
    }

    #[test]
    fn test_restart_policies() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1"], &pool(), &opts(Some(5))).unwrap();
        let outcome = lc
            .turn(TurnInput {
                updated_answers: blanks(10),
                action: TurnAction::Restart,
            })
            .unwrap();
        assert_eq!(outcome, TurnOutcome::Restarted);
        assert!(lc.view().unwrap().is_none());
        assert_eq!(lc.retained_seed(), None);

        let mut keep = SessionLifecycle::new(MemoryStore::default(), RestartPolicy::KeepSeed);
        keep.start(&vocab(), ["1"], &pool(), &opts(None)).unwrap();
        let seed = keep.session().unwrap().unwrap().sampling_seed;
        keep.restart().unwrap();
        assert_eq!(keep.retained_seed(), seed);
        keep.start(&vocab(), ["1"], &pool(), &opts(None)).unwrap();
        assert_eq!(keep.session().unwrap().unwrap().sampling_seed, seed);
    }

    #[test]
    fn test_vocab_numbers_chapter_graded_by_its_own_span() {
        let rows: Vec<VocabRecord> = (0..3)
            .map(|i| VocabRecord {
                term: format!("word {i}"),
                translation: format!("w{i}"),
                chapter: "Numbers".to_string(),
            })
            .collect();
        let mut lc = lifecycle();
        let options = BuildOptions {
            drill_count: 5,
            ..opts(Some(4))
        };
        lc.start(&rows, ["Numbers"], &pool(), &options).unwrap();

        let outcome = lc
            .turn(next(vec!["w0".into(), String::new(), "nope".into()]))
            .unwrap();
        let TurnOutcome::Page {
            completed_chapter: Some(report),
            view,
            ..
        } = outcome
        else {
            panic!("expected chapter report");
        };
        assert_eq!(report.scope, ReportScope::Chapter("Numbers".to_string()));
        assert_eq!(report.total, 3);
        assert_eq!(report.correct_count, 1);
        assert!(report.details.iter().all(|d| d.item.global_index < 3));
        assert_eq!(view.page_number, 2);
        assert_eq!(view.items.len(), 5);
    }

    #[test]
    fn test_wrong_answer_count_is_rejected() {
        let mut lc = lifecycle();
        lc.start(&vocab(), ["1"], &pool(), &opts(Some(1))).unwrap();
        let err = lc.turn(next(blanks(3))).unwrap_err();
        assert!(matches!(err, QuizError::Ledger(_)));
        assert_eq!(lc.view().unwrap().unwrap().page_number, 1);
    }
}

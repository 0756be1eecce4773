use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use vocab_quiz::config::{Config, SessionStoreKind};
use vocab_quiz::engine::chapter_order::order_chapters;
use vocab_quiz::error::{NavigationError, QuizError};
use vocab_quiz::generator::compose_drill_pool;
use vocab_quiz::session::lifecycle::{
    PageView, SessionLifecycle, TurnAction, TurnInput, TurnOutcome,
};
use vocab_quiz::session::result::{ScoreReport, Verdict};
use vocab_quiz::source::{DrillRecord, VocabRecord, check_row_counts};
use vocab_quiz::store::json_store::JsonStore;
use vocab_quiz::store::{MemoryStore, SessionStore};

use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    ChapterSelect,
    Quiz,
    ChapterReview,
    Results,
    LoadError,
}

/// Vocabulary and drill rows validated at startup.
struct SourceData {
    description: String,
    vocabulary: Vec<VocabRecord>,
    drill_pool: Vec<DrillRecord>,
}

fn load_sources(config: &Config, seed: Option<u64>) -> Result<SourceData> {
    let provider = config.provider()?;
    let vocabulary = provider.load_vocabulary()?;
    let file_rows = if config.drill_source.needs_file() {
        provider.load_numeric_drill_pool()?
    } else {
        Vec::new()
    };
    let mut rng = SmallRng::seed_from_u64(seed.unwrap_or_else(rand::random));
    let drill_pool = compose_drill_pool(
        config.drill_source,
        file_rows,
        config.generated_pool_size,
        config.generated_max_value,
        &mut rng,
    );
    check_row_counts(&vocabulary, &drill_pool, config.drill_count)?;
    log::info!(
        "loaded {} vocabulary rows and {} {} drill rows from {}",
        vocabulary.len(),
        drill_pool.len(),
        config.drill_source.as_str(),
        provider.describe()
    );
    Ok(SourceData {
        description: provider.describe(),
        vocabulary,
        drill_pool,
    })
}

/// Only the file store outlives the process, so only it can resume.
fn resume_unavailable(config: &Config, resume: bool) -> bool {
    resume && config.session_store == SessionStoreKind::Memory
}

/// Human-readable line for one graded miss.
pub fn feedback_line(detail: &vocab_quiz::session::result::AnswerDetail) -> String {
    let item = &detail.item;
    match detail.verdict {
        Verdict::Blank => t!(
            "report.blank",
            term = &item.term,
            chapter = &item.chapter,
            translation = &item.translation
        )
        .to_string(),
        _ => t!(
            "report.entered",
            term = &item.term,
            chapter = &item.chapter,
            translation = &item.translation,
            answer = &detail.user_answer
        )
        .to_string(),
    }
}

pub fn score_line(report: &ScoreReport) -> String {
    t!(
        "report.score",
        correct = report.correct_count,
        total = report.total,
        percent = format!("{:.2}", report.percentage)
    )
    .to_string()
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub source_description: String,
    pub load_error: Option<String>,
    pub chapters: Vec<String>,
    pub selected_chapters: Vec<bool>,
    pub chapter_cursor: usize,
    pub page: Option<PageView>,
    pub inputs: Vec<LineInput>,
    pub focused_input: usize,
    pub chapter_report: Option<ScoreReport>,
    pub quiz_report: Option<ScoreReport>,
    pub last_chapter_report: Option<ScoreReport>,
    pub results_scroll: usize,
    pub status: Option<String>,
    pub should_quit: bool,
    lifecycle: SessionLifecycle<Box<dyn SessionStore>>,
    vocabulary: Vec<VocabRecord>,
    drill_pool: Vec<DrillRecord>,
    seed: Option<u64>,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>, resume: bool) -> Result<Self> {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let store: Box<dyn SessionStore> = match config.session_store {
            SessionStoreKind::Memory => Box::new(MemoryStore::default()),
            SessionStoreKind::File => Box::new(JsonStore::new(&config.session_key)?),
        };
        let lifecycle = SessionLifecycle::new(store, config.restart_policy);

        let mut app = Self {
            screen: AppScreen::ChapterSelect,
            config,
            theme,
            source_description: String::new(),
            load_error: None,
            chapters: Vec::new(),
            selected_chapters: Vec::new(),
            chapter_cursor: 0,
            page: None,
            inputs: Vec::new(),
            focused_input: 0,
            chapter_report: None,
            quiz_report: None,
            last_chapter_report: None,
            results_scroll: 0,
            status: None,
            should_quit: false,
            lifecycle,
            vocabulary: Vec::new(),
            drill_pool: Vec::new(),
            seed,
        };

        match load_sources(&app.config, seed) {
            Ok(data) => {
                app.chapters = order_chapters(data.vocabulary.iter().map(|r| r.chapter.as_str()));
                app.selected_chapters = vec![true; app.chapters.len()];
                app.source_description = data.description;
                app.vocabulary = data.vocabulary;
                app.drill_pool = data.drill_pool;
            }
            Err(e) => {
                log::error!("source validation failed: {e:#}");
                app.load_error = Some(format!("{e:#}"));
                app.screen = AppScreen::LoadError;
                return Ok(app);
            }
        }

        if resume_unavailable(&app.config, resume) {
            log::warn!("--resume ignored: the memory session store keeps nothing between runs");
            app.status = Some(t!("quiz.resume_needs_file").to_string());
            app.lifecycle.restart()?;
        } else if resume && app.lifecycle.is_active()? {
            if let Some(view) = app.lifecycle.view()? {
                log::info!("resuming saved quiz at page {}", view.page_number);
                app.show_page(view);
                app.status = Some(t!("quiz.resumed").to_string());
            }
        } else {
            app.lifecycle.restart()?;
        }
        Ok(app)
    }

    pub fn selected_labels(&self) -> Vec<&str> {
        self.chapters
            .iter()
            .zip(&self.selected_chapters)
            .filter(|(_, on)| **on)
            .map(|(label, _)| label.as_str())
            .collect()
    }

    pub fn toggle_chapter(&mut self) {
        if let Some(on) = self.selected_chapters.get_mut(self.chapter_cursor) {
            *on = !*on;
        }
    }

    pub fn select_all_chapters(&mut self, on: bool) {
        self.selected_chapters.iter_mut().for_each(|s| *s = on);
    }

    pub fn move_chapter_cursor(&mut self, down: bool) {
        if self.chapters.is_empty() {
            return;
        }
        let len = self.chapters.len();
        self.chapter_cursor = if down {
            (self.chapter_cursor + 1) % len
        } else {
            (self.chapter_cursor + len - 1) % len
        };
    }

    pub fn start_quiz(&mut self) {
        let selected: Vec<String> = self.selected_labels().iter().map(|s| s.to_string()).collect();
        let opts = self.config.build_options(self.seed);
        match self
            .lifecycle
            .start(&self.vocabulary, &selected, &self.drill_pool, &opts)
        {
            Ok(view) => {
                self.status = None;
                self.quiz_report = None;
                self.last_chapter_report = None;
                self.chapter_report = None;
                self.show_page(view);
            }
            Err(QuizError::Build(e)) => {
                log::warn!("quiz not started: {e}");
                self.status = Some(if selected.is_empty() {
                    t!("select.none_selected").to_string()
                } else {
                    e.to_string()
                });
            }
            Err(e) => self.fail(e),
        }
    }

    fn show_page(&mut self, view: PageView) {
        self.inputs = view
            .current_answers
            .iter()
            .map(|a| LineInput::new(a))
            .collect();
        self.focused_input = 0;
        self.page = Some(view);
        self.screen = AppScreen::Quiz;
    }

    fn current_answers(&self) -> Vec<String> {
        self.inputs.iter().map(|i| i.value().to_string()).collect()
    }

    fn fail(&mut self, e: QuizError) {
        log::error!("{e}");
        self.status = Some(t!("error.quiz_failed", error = e.to_string()).to_string());
    }

    pub fn act(&mut self, action: TurnAction) {
        let input = TurnInput {
            updated_answers: self.current_answers(),
            action,
        };
        match self.lifecycle.turn(input) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(e) => self.fail(e),
        }
    }

    fn apply_outcome(&mut self, outcome: TurnOutcome) {
        self.status = None;
        match outcome {
            TurnOutcome::Page {
                view,
                completed_chapter,
                clamped,
            } => {
                if let Some(e) = clamped {
                    self.status = Some(clamp_message(&e));
                }
                let same_page = self
                    .page
                    .as_ref()
                    .is_some_and(|p| p.page_number == view.page_number);
                if same_page {
                    self.page = Some(view);
                } else {
                    self.show_page(view);
                }
                if let Some(report) = completed_chapter {
                    self.chapter_report = Some(report);
                    self.screen = AppScreen::ChapterReview;
                }
            }
            TurnOutcome::Finished {
                view,
                quiz,
                last_chapter,
            } => {
                self.page = Some(view);
                self.quiz_report = Some(quiz);
                self.last_chapter_report = last_chapter;
                self.results_scroll = 0;
                self.screen = AppScreen::Results;
            }
            TurnOutcome::Restarted => {
                self.page = None;
                self.inputs.clear();
                self.screen = AppScreen::ChapterSelect;
            }
        }
    }

    pub fn focus_next_input(&mut self) -> bool {
        if self.focused_input + 1 < self.inputs.len() {
            self.focused_input += 1;
            true
        } else {
            false
        }
    }

    pub fn focus_previous_input(&mut self) {
        self.focused_input = self.focused_input.saturating_sub(1);
    }

    /// Route an editing key to the focused answer field.
    pub fn edit_focused(&mut self, key: crossterm::event::KeyEvent) -> InputResult {
        match self.inputs.get_mut(self.focused_input) {
            Some(input) => input.handle(key),
            None => InputResult::Ignored,
        }
    }

    /// Enter moves to the next field, and past the last field to the next page.
    pub fn advance(&mut self) {
        if self.focus_next_input() {
            return;
        }
        let on_last_page = self.page.as_ref().is_some_and(PageView::is_last_page);
        if on_last_page {
            self.act(TurnAction::Submit);
        } else {
            self.act(TurnAction::Next);
        }
    }

    pub fn dismiss_chapter_review(&mut self) {
        self.chapter_report = None;
        self.screen = AppScreen::Quiz;
    }

    /// Leave the results screen. The finished quiz is removed from the store.
    pub fn finish(&mut self, quit: bool) {
        if let Err(e) = self.lifecycle.restart() {
            self.fail(e);
        }
        self.page = None;
        self.inputs.clear();
        self.quiz_report = None;
        self.last_chapter_report = None;
        if quit {
            self.should_quit = true;
        } else {
            self.screen = AppScreen::ChapterSelect;
        }
    }

    pub fn results_lines(&self) -> Vec<String> {
        let Some(report) = &self.quiz_report else {
            return Vec::new();
        };
        if report.is_perfect() {
            return vec![t!("report.perfect").to_string()];
        }
        report.details.iter().map(feedback_line).collect()
    }

    pub fn scroll_results(&mut self, down: bool) {
        let max = self.results_lines().len().saturating_sub(1);
        self.results_scroll = if down {
            (self.results_scroll + 1).min(max)
        } else {
            self.results_scroll.saturating_sub(1)
        };
    }
}

fn clamp_message(e: &NavigationError) -> String {
    match e {
        NavigationError::NoSuchPage { requested: 0, .. } => t!("quiz.first_page").to_string(),
        NavigationError::NoSuchPage { .. } => t!("quiz.last_page").to_string(),
        NavigationError::NotOnLastPage { page, total } => {
            t!("quiz.submit_not_last", page = page, total = total).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_needs_file_store() {
        let mut config = Config::default();
        assert!(resume_unavailable(&config, true));
        assert!(!resume_unavailable(&config, false));
        config.session_store = SessionStoreKind::File;
        assert!(!resume_unavailable(&config, true));
    }
}

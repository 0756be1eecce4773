mod app;
mod event;
mod ui;

use std::fs::OpenOptions;
use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use rust_i18n::t;

use vocab_quiz::config::Config;
use vocab_quiz::session::lifecycle::TurnAction;

use app::{App, AppScreen, feedback_line, score_line};
use event::{AppEvent, EventHandler};
use ui::components::chapter_select::ChapterSelect;
use ui::components::progress_bar::ProgressBar;
use ui::components::quiz_page::QuizPage;
use ui::components::score_panel::ScorePanel;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "en");

const LANGUAGES: [&str; 2] = ["en", "vi"];

#[derive(Parser)]
#[command(
    name = "vocab-quiz",
    version,
    about = "Terminal vocabulary quiz with chapter selection and per-chapter grading"
)]
struct Cli {
    #[arg(long, help = "Vocabulary file or URL (term, translation, chapter)")]
    vocab: Option<String>,

    #[arg(long, help = "Numeric drill pool file or URL (term, translation)")]
    drill_pool: Option<String>,

    #[arg(long, help = "Items per page")]
    page_size: Option<usize>,

    #[arg(long, help = "Number of numeric drill items appended to the quiz")]
    drill_count: Option<usize>,

    #[arg(long, help = "Seed for the numeric drill subset")]
    seed: Option<u64>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, vi)")]
    language: Option<String>,

    #[arg(long, help = "Continue the quiz saved in the file session store")]
    resume: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if self.vocab.is_some() {
            config.vocabulary_path = self.vocab;
        }
        if self.drill_pool.is_some() {
            config.drill_pool_path = self.drill_pool;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(drill_count) = self.drill_count {
            config.drill_count = drill_count;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
    }
}

/// Log to a file under the data dir so output never lands on the TUI.
fn init_logging(level: &str) {
    let Some(dir) = dirs::data_dir().map(|d| d.join("vocab-quiz")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("vocab-quiz.log"))
    else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let seed = cli.seed;
    let resume = cli.resume;

    let mut config = Config::load().unwrap_or_default();
    cli.apply(&mut config);
    let themes = Theme::available_themes();
    let theme_names: Vec<&str> = themes.iter().map(String::as_str).collect();
    config.validate(&theme_names, &LANGUAGES);

    init_logging(&config.log_level);
    rust_i18n::set_locale(&config.language);

    let mut app = App::new(config, seed, resume)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new();

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::ChapterSelect => handle_select_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::ChapterReview => handle_review_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::LoadError => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                app.should_quit = true;
            }
        }
    }
}

fn handle_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_chapter_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_chapter_cursor(true),
        KeyCode::Char(' ') => app.toggle_chapter(),
        KeyCode::Char('a') => app.select_all_chapters(true),
        KeyCode::Char('n') => app.select_all_chapters(false),
        KeyCode::Enter => app.start_quiz(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::PageDown => return app.act(TurnAction::Next),
        KeyCode::PageUp => return app.act(TurnAction::Previous),
        KeyCode::Char('n') if ctrl => return app.act(TurnAction::Next),
        KeyCode::Char('p') if ctrl => return app.act(TurnAction::Previous),
        KeyCode::Char('s') if ctrl => return app.act(TurnAction::Submit),
        KeyCode::Char('r') if ctrl => return app.act(TurnAction::Restart),
        KeyCode::Tab | KeyCode::Down => {
            app.focus_next_input();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => return app.focus_previous_input(),
        _ => {}
    }

    match app.edit_focused(key) {
        InputResult::Submit => app.advance(),
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue | InputResult::Ignored => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => app.dismiss_chapter_review(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.finish(true),
        KeyCode::Char('r') | KeyCode::Enter => app.finish(false),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results(false),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results(true),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::ChapterSelect => render_select(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::ChapterReview => {
            render_quiz(frame, app);
            render_chapter_review(frame, app);
        }
        AppScreen::Results => render_results(frame, app),
        AppScreen::LoadError => render_load_error(frame, app),
    }
}

fn hints(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| t!(*k).to_string()).collect()
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t!("app.title")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .block(Block::default().style(Style::default().bg(colors.header_bg())));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, lines: Vec<String>) {
    let colors = &app.theme.colors;
    let mut text: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        text.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    text.extend(
        lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted())))),
    );
    let footer = Paragraph::new(text).block(
        Block::bordered().border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(footer, area);
}

fn footer_lines(keys: &[&str], width: u16) -> Vec<String> {
    pack_hint_lines(&hints(keys), width.saturating_sub(2) as usize)
}

fn render_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let keys = ["hint.toggle", "hint.all", "hint.none", "hint.start", "hint.quit"];
    let lines = footer_lines(&keys, area.width);
    let status_lines = u16::from(app.status.is_some());
    let layout = AppLayout::new(area, lines.len() as u16 + status_lines);

    render_header(
        frame,
        app,
        layout.header,
        &t!("app.source", source = &app.source_description),
    );

    let list_area = centered_rect(50, 80, layout.main);
    let select = ChapterSelect::new(
        &app.chapters,
        &app.selected_chapters,
        app.chapter_cursor,
        app.config.drill_count,
        &app.theme,
    );
    frame.render_widget(&select, list_area);
    render_footer(frame, app, layout.footer, lines);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(view) = &app.page else {
        return;
    };

    let mut keys = vec!["hint.move"];
    if !view.is_last_page() {
        keys.push("hint.next");
    }
    if !view.is_first_page() {
        keys.push("hint.previous");
    }
    if view.is_last_page() {
        keys.push("hint.submit");
    }
    keys.extend(["hint.restart", "hint.esc_quit"]);
    let lines = footer_lines(&keys, area.width);
    let status_lines = u16::from(app.status.is_some());
    let layout = AppLayout::new(area, lines.len() as u16 + status_lines);

    let info = format!(
        "{}  ·  {}",
        t!(
            "quiz.header",
            page = view.page_number,
            total = view.total_pages,
            chapter = &view.chapter
        ),
        t!("quiz.answered", answered = view.answered, total = view.total_items)
    );
    render_header(frame, app, layout.header, &info);

    let page = QuizPage::new(view, &app.inputs, app.focused_input, &app.theme);
    frame.render_widget(&page, layout.main);

    if let Some(progress_area) = layout.progress {
        let bar = ProgressBar::new(
            &t!("quiz.progress"),
            view.page_number,
            view.total_pages,
            &view.chapter_boundaries,
            &app.theme,
        );
        frame.render_widget(bar, progress_area);
    }

    render_footer(frame, app, layout.footer, lines);
}

fn render_chapter_review(frame: &mut ratatui::Frame, app: &App) {
    let Some(report) = &app.chapter_report else {
        return;
    };
    let area = centered_rect(70, 70, frame.area());
    let label = match &report.scope {
        vocab_quiz::session::result::ReportScope::Chapter(label) => label.clone(),
        vocab_quiz::session::result::ReportScope::Quiz => String::new(),
    };
    let feedback = if report.is_perfect() {
        vec![t!("report.perfect").to_string()]
    } else {
        report.details.iter().map(feedback_line).collect()
    };
    frame.render_widget(ratatui::widgets::Clear, area);
    let panel = ScorePanel::new(
        t!("report.chapter_title", chapter = label).to_string(),
        report,
        score_line(report),
        feedback,
        &app.theme,
    )
    .footnote(Some(format!("  {}", t!("hint.continue"))));
    frame.render_widget(panel, area);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(report) = &app.quiz_report else {
        return;
    };
    let keys = ["hint.scroll", "hint.new_quiz", "hint.quit"];
    let lines = footer_lines(&keys, area.width);
    let status_lines = u16::from(app.status.is_some());
    let layout = AppLayout::new(area, lines.len() as u16 + status_lines);

    render_header(frame, app, layout.header, &score_line(report));

    let last_chapter = app.last_chapter_report.as_ref().map(|chapter| {
        let label = match &chapter.scope {
            vocab_quiz::session::result::ReportScope::Chapter(label) => label.as_str(),
            vocab_quiz::session::result::ReportScope::Quiz => "",
        };
        format!(
            "  {}  {}",
            t!("report.last_chapter", chapter = label),
            score_line(chapter)
        )
    });

    let panel = ScorePanel::new(
        t!("report.quiz_title").to_string(),
        report,
        score_line(report),
        app.results_lines(),
        &app.theme,
    )
    .footnote(last_chapter)
    .scroll(app.results_scroll);
    frame.render_widget(panel, layout.main);

    render_footer(frame, app, layout.footer, lines);
}

fn render_load_error(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = centered_rect(60, 40, frame.area());
    let message = app.load_error.clone().unwrap_or_default();
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(colors.error()))),
        Line::from(""),
        Line::from(Span::styled(
            t!("hint.quit").to_string(),
            Style::default().fg(colors.muted()),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::bordered()
            .title(format!(" {} ", t!("error.load_title")))
            .border_style(Style::default().fg(colors.error())),
    );
    frame.render_widget(body, area);
}

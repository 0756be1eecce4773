use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use vocab_quiz::session::result::ScoreReport;

use crate::ui::theme::Theme;

/// Score summary plus one line per missed item.
pub struct ScorePanel<'a> {
    pub title: String,
    pub report: &'a ScoreReport,
    pub score_line: String,
    pub feedback: Vec<String>,
    pub footnote: Option<String>,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> ScorePanel<'a> {
    pub fn new(
        title: String,
        report: &'a ScoreReport,
        score_line: String,
        feedback: Vec<String>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            report,
            score_line,
            feedback,
            footnote: None,
            scroll: 0,
            theme,
        }
    }

    pub fn footnote(mut self, footnote: Option<String>) -> Self {
        self.footnote = footnote;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for ScorePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let footnote_height = if self.footnote.is_some() { 2 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(footnote_height),
            ])
            .split(inner);

        let score_color = if self.report.is_perfect() {
            colors.success()
        } else if self.report.percentage >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(Span::styled(
            self.score_line,
            Style::default()
                .fg(score_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let detail_style = if self.report.is_perfect() {
            Style::default().fg(colors.success())
        } else {
            Style::default().fg(colors.fg())
        };
        let lines: Vec<Line> = self
            .feedback
            .into_iter()
            .map(|l| Line::from(Span::styled(format!("  {l}"), detail_style)))
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0))
            .render(layout[1], buf);

        if let Some(note) = self.footnote {
            Paragraph::new(Line::from(Span::styled(
                note,
                Style::default().fg(colors.muted()),
            )))
            .render(layout[2], buf);
        }
    }
}

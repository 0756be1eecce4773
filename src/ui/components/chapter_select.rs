use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

/// Multi-select list of chapter labels, in quiz order.
pub struct ChapterSelect<'a> {
    pub chapters: &'a [String],
    pub selected: &'a [bool],
    pub cursor: usize,
    pub drill_count: usize,
    pub theme: &'a Theme,
}

impl<'a> ChapterSelect<'a> {
    pub fn new(
        chapters: &'a [String],
        selected: &'a [bool],
        cursor: usize,
        drill_count: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            chapters,
            selected,
            cursor,
            drill_count,
            theme,
        }
    }
}

impl Widget for &ChapterSelect<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("select.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let visible = layout[0].height as usize;
        let first = self.cursor.saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = self
            .chapters
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, label)| {
                let is_cursor = i == self.cursor;
                let checked = self.selected.get(i).copied().unwrap_or(false);
                let indicator = if is_cursor { ">" } else { " " };
                let mark = if checked { "[x]" } else { "[ ]" };
                let style = Style::default()
                    .fg(if is_cursor { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_cursor {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });
                Line::from(Span::styled(
                    format!(" {indicator} {mark} {}", t!("select.chapter", chapter = label)),
                    style,
                ))
            })
            .collect();
        Paragraph::new(lines).render(layout[0], buf);

        if self.drill_count > 0 {
            Paragraph::new(Line::from(Span::styled(
                t!("select.drill_note", count = self.drill_count).to_string(),
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
        }
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use vocab_quiz::session::lifecycle::PageView;

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Terms of the current page, each followed by its answer field.
pub struct QuizPage<'a> {
    pub view: &'a PageView,
    pub inputs: &'a [LineInput],
    pub focused: usize,
    pub theme: &'a Theme,
}

impl<'a> QuizPage<'a> {
    pub fn new(
        view: &'a PageView,
        inputs: &'a [LineInput],
        focused: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            inputs,
            focused,
            theme,
        }
    }

    fn term_width(&self) -> usize {
        self.view
            .items
            .iter()
            .map(|item| item.term.chars().count())
            .max()
            .unwrap_or(0)
            .min(40)
    }

    fn answer_spans(&self, input: &'a LineInput, is_focused: bool) -> Vec<Span<'a>> {
        let colors = &self.theme.colors;
        let field = Style::default().fg(colors.fg()).bg(colors.input_bg());
        if !is_focused {
            return vec![Span::styled(input.value(), field)];
        }
        let (before, cursor, after) = input.render_parts();
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
        vec![
            Span::styled(before, field),
            Span::styled(cursor_text, cursor_style),
            Span::styled(after, field),
        ]
    }
}

impl Widget for &QuizPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let number_width = self.view.total_items.to_string().len();
        let term_width = self.term_width();

        let lines: Vec<Line> = self
            .view
            .items
            .iter()
            .zip(self.inputs)
            .enumerate()
            .map(|(i, (item, input))| {
                let is_focused = i == self.focused;
                let marker = if is_focused { ">" } else { " " };
                let term_style = if is_focused {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let mut spans = vec![
                    Span::styled(
                        format!(" {marker} {:>number_width$}. ", item.global_index + 1),
                        Style::default().fg(colors.muted()),
                    ),
                    Span::styled(format!("{:<term_width$}", item.term), term_style),
                    Span::styled("  ", Style::default()),
                ];
                spans.extend(self.answer_spans(input, is_focused));
                Line::from(spans)
            })
            .collect();

        // Keep the focused row visible on short terminals.
        let height = inner.height as usize;
        let scroll = self.focused.saturating_sub(height.saturating_sub(1));
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Page progress with a tick after each chapter's last page.
pub struct ProgressBar<'a> {
    pub label: String,
    pub page: usize,
    pub total_pages: usize,
    pub boundaries: &'a [usize],
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(
        label: &str,
        page: usize,
        total_pages: usize,
        boundaries: &'a [usize],
        theme: &'a Theme,
    ) -> Self {
        Self {
            label: label.to_string(),
            page,
            total_pages,
            boundaries,
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.page as f64 / self.total_pages as f64).clamp(0.0, 1.0)
    }
}

/// Column offset of the right edge of `page` within `width` cells.
fn page_edge(page: usize, total_pages: usize, width: u16) -> u16 {
    if total_pages == 0 {
        return 0;
    }
    ((page as f64 / total_pages as f64) * width as f64).round() as u16
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} {}/{} ", self.label, self.page, self.total_pages))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio() * inner.width as f64) as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        // The last boundary is the end of the bar itself.
        for &boundary in self.boundaries.iter().filter(|&&b| b < self.total_pages) {
            let offset = page_edge(boundary, self.total_pages, inner.width);
            if offset == 0 || offset >= inner.width {
                continue;
            }
            let cell = &mut buf[(inner.x + offset, inner.y)];
            cell.set_char('┃');
            cell.set_fg(colors.boundary());
        }
    }
}

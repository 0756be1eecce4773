use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header, body and footer rows, with the quiz progress bar between body and
/// footer when the terminal is tall enough.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub progress: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let show_progress = area.height >= 16;
        let footer_height = footer_lines.max(1) + 2;

        let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
        if show_progress {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(footer_height));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        if show_progress {
            Self {
                header: rows[0],
                main: rows[1],
                progress: Some(rows[2]),
                footer: rows[3],
            }
        } else {
            Self {
                header: rows[0],
                main: rows[1],
                progress: None,
                footer: rows[2],
            }
        }
    }
}

/// Greedily pack key hints into as few footer lines as fit in `width`.
pub fn pack_hint_lines(hints: &[String], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 56;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

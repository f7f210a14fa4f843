use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use objview_core::Row;

use crate::app::App;
use crate::scroll::Clock;
use crate::theme::Theme;

const TAB_WIDTH: usize = 8;
/// Widest location gutter, including the separating space
const LOCATION_WIDTH: usize = 28;

/// Kind of disassembly line, used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    /// `0000000000001139 <main>:`
    Label,
    /// `    1139:\t55   \tpush %rbp`
    Instruction,
    Other,
}

pub struct ListingWidget;

impl ListingWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let gutter = if app.config.ui.show_locations {
            LOCATION_WIDTH.min(usize::from(area.width) / 3)
        } else {
            0
        };

        let lines: Vec<Line> = app
            .listing
            .rows()
            .iter()
            .enumerate()
            .skip(app.scroll_top())
            .take(usize::from(area.height))
            .map(|(i, row)| Self::render_row(row, i == app.cur_row(), gutter, theme))
            .collect();

        let paragraph =
            Paragraph::new(lines).style(Style::default().fg(theme.fg0).bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }

    fn render_row(row: &Row, selected: bool, gutter: usize, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::with_capacity(3);

        if gutter > 0 {
            let text = row
                .location
                .as_ref()
                .map(|loc| fit_left(&loc.to_string(), gutter - 1))
                .unwrap_or_else(|| " ".repeat(gutter - 1));
            spans.push(Span::styled(text, Style::default().fg(theme.location)));
            spans.push(Span::raw(" "));
        }

        let text = expand_tabs(&row.text);
        let dim = if row.location.is_some() {
            theme.fg0
        } else {
            theme.grey1
        };
        match classify(&row.text) {
            RowKind::Label => spans.push(Span::styled(
                text,
                Style::default().fg(theme.label).add_modifier(Modifier::BOLD),
            )),
            RowKind::Instruction => {
                // Address column up to and including the first ':'
                let split = text.find(':').map(|i| i + 1).unwrap_or(0);
                let (address, rest) = text.split_at(split);
                spans.push(Span::styled(address.to_string(), Style::default().fg(theme.address)));
                spans.push(Span::styled(rest.to_string(), Style::default().fg(dim)));
            }
            RowKind::Other => spans.push(Span::styled(text, Style::default().fg(dim))),
        }

        let line = Line::from(spans);
        if selected {
            line.style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD))
        } else {
            line
        }
    }
}

fn classify(text: &str) -> RowKind {
    if text.ends_with(">:") && !text.starts_with(char::is_whitespace) {
        return RowKind::Label;
    }
    if text.starts_with(char::is_whitespace) {
        if let Some((address, _)) = text.trim_start().split_once(':') {
            if !address.is_empty() && address.chars().all(|c| c.is_ascii_hexdigit()) {
                return RowKind::Instruction;
            }
        }
    }
    RowKind::Other
}

/// Replace tabs with spaces up to the next tab stop
fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(ch);
            column += UnicodeWidthChar::width(ch).unwrap_or(0);
        }
    }
    out
}

/// Right-align `text` in exactly `width` columns, cutting from the left
///
/// Paths are long but their tail (`file.c:12`) is what matters.
fn fit_left(text: &str, width: usize) -> String {
    let text_width: usize = text.chars().map(|c| UnicodeWidthChar::width(c).unwrap_or(0)).sum();
    if text_width <= width {
        return format!("{}{}", " ".repeat(width - text_width), text);
    }
    if width == 0 {
        return String::new();
    }

    // Keep as much of the tail as fits after the ellipsis
    let mut tail = Vec::new();
    let mut used = 1;
    for ch in text.chars().rev() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        tail.push(ch);
    }
    let mut out = " ".repeat(width - used);
    out.push('…');
    out.extend(tail.into_iter().rev());
    out
}

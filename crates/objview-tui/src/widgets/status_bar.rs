use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::scroll::Clock;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Help => "HELP",
        };

        let location = app
            .current_location()
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "-".to_string());

        let (status_text, status_style) = if let Some(msg) = &app.status_message {
            (
                format!(" {} | {}", mode_str, msg),
                Style::default().fg(theme.error).bg(theme.bg2),
            )
        } else {
            (
                format!(
                    " {} | {}/{} | {}",
                    mode_str,
                    app.cur_row() + 1,
                    app.listing.len(),
                    location
                ),
                Style::default().fg(theme.fg0).bg(theme.bg2),
            )
        };

        let help_hint = " q:quit j/k:move gg/G:top/bottom ?:help ";
        let padding_len = usize::from(area.width)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}

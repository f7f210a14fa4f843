use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::scroll::Clock;

/// Key reference shown over the listing
pub struct HelpWidget;

impl HelpWidget {
    pub fn render<C: Clock>(frame: &mut Frame, app: &App<C>) {
        let theme = &app.theme;
        let keys = &app.config.keymap;
        let entries = [
            (format!("{} / Down", keys.move_down), "next row"),
            (format!("{} / Up", keys.move_up), "previous row"),
            (format!("{} / PageDown", keys.page_down), "page down"),
            (format!("{} / PageUp", keys.page_up), "page up"),
            (format!("{} / Home", keys.jump_to_top), "first row"),
            (format!("{} / End", keys.jump_to_bottom), "last row"),
            (keys.reveal.clone(), "open source location"),
            ("wheel".to_string(), "scroll"),
            ("click".to_string(), "select row"),
            (keys.help.clone(), "toggle help"),
            (keys.quit.clone(), "quit"),
        ];

        let key_width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let lines: Vec<Line> = entries
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:>width$} ", key, width = key_width),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(desc.to_string(), Style::default().fg(theme.fg0)),
                ])
            })
            .collect();

        let area = frame.area();
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

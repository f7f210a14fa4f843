use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{info, warn};

use objview_core::{config::HostOutput, host::open_output, AppConfig};
use objview_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    keymap::Keymap,
    load_theme,
    scroll::ScrollConfigExt,
    widgets::{split_screen, HelpWidget, ListingWidget, StatusBarWidget},
};

use super::source::SourceArgs;

type StderrTerminal = Terminal<CrosstermBackend<io::Stderr>>;

pub async fn run(config: Arc<AppConfig>, source: &SourceArgs) -> Result<()> {
    let listing = source.load(&config).await?;
    info!("Loaded listing with {} rows", listing.len());

    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);
    let requested = config.host.output();
    let output = interactive_output(requested.clone(), io::stdout().is_terminal());
    let sink = open_output(output.clone())?;
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(listing, config.clone(), theme, sink)?;
    if output != requested {
        warn!("stdout is a terminal, host messages disabled");
        app.set_status("stdout is a terminal: host messages disabled (set [host] output)");
    }

    let event_handler = EventHandler::new(
        Duration::from_millis(config.ui.tick_rate_ms),
        config.scroll.animation_tick_duration(),
    );

    // Setup terminal on stderr; stdout carries host messages
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture, SetTitle("objview"))?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app, &keymap, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Host messages written to the terminal the UI draws on would corrupt the
/// screen, so stdout only carries them when it is redirected
fn interactive_output(output: HostOutput, stdout_is_tty: bool) -> HostOutput {
    match output {
        HostOutput::Stdout if stdout_is_tty => HostOutput::Disabled,
        other => other,
    }
}

fn main_loop(
    terminal: &mut StderrTerminal,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
) -> Result<()> {
    let mut listing_area = Rect::default();
    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    loop {
        // Advance the scroll animation before drawing
        app.on_frame();

        terminal.draw(|frame| {
            let (listing, status) = split_screen(frame.area());
            listing_area = listing;
            app.resize(listing.height);

            ListingWidget::render(frame, listing, app);
            StatusBarWidget::render(frame, status, app);

            if app.mode == Mode::Help {
                HelpWidget::render(frame, app);
            }
        })?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    handle_action(app, action);
                }
                AppEvent::Mouse(mouse) => handle_mouse(app, mouse, listing_area),
                // The next draw picks up the new size
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.is_animating();

        if app.should_quit {
            info!("Quitting");
            return Ok(());
        }
    }
}

fn handle_action(app: &mut App, action: Action) {
    if action != Action::PendingG {
        app.clear_pending_key();
    }

    match action {
        Action::Quit => app.should_quit = true,
        Action::MoveDown => app.move_down(),
        Action::MoveUp => app.move_up(),
        Action::PageDown => app.page_down(),
        Action::PageUp => app.page_up(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::PendingG => app.pending_key = Some('g'),
        Action::Reveal => app.reveal(),
        Action::ToggleHelp => app.toggle_help(),
        Action::ExitMode => {
            app.mode = Mode::Normal;
            app.clear_status();
        }
        Action::None => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, listing_area: Rect) {
    if app.mode == Mode::Help {
        return;
    }

    let wheel_lines = i32::from(app.config.scroll.wheel_lines);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row >= listing_area.y && mouse.row < listing_area.bottom() {
                app.click(mouse.row - listing_area.y);
            }
        }
        MouseEventKind::ScrollDown => app.wheel(wheel_lines),
        MouseEventKind::ScrollUp => app.wheel(-wheel_lines),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use objview_core::{host::NullSink, Listing};
    use objview_tui::Theme;

    use super::*;

    fn app(rows: usize, height: u16) -> App {
        let text = (0..rows)
            .map(|i| format!("f.c:{i}\n  {i:x}:\tnop"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut app = App::new(
            Listing::parse(&text),
            Arc::new(AppConfig::default()),
            Theme::default(),
            Box::new(NullSink),
        )
        .unwrap();
        app.resize(height);
        app
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 5,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_stdout_output_disabled_on_terminal() {
        assert_eq!(
            interactive_output(HostOutput::Stdout, true),
            HostOutput::Disabled
        );
        assert_eq!(
            interactive_output(HostOutput::Stdout, false),
            HostOutput::Stdout
        );

        let file = HostOutput::File(std::path::PathBuf::from("/tmp/objview.jsonl"));
        assert_eq!(interactive_output(file.clone(), true), file);
        assert_eq!(
            interactive_output(HostOutput::Disabled, false),
            HostOutput::Disabled
        );
    }

    #[test]
    fn test_pending_g_cleared_by_other_action() {
        let mut app = app(50, 10);
        handle_action(&mut app, Action::PendingG);
        assert_eq!(app.pending_key, Some('g'));
        handle_action(&mut app, Action::MoveDown);
        assert_eq!(app.pending_key, None);
        assert_eq!(app.cur_row(), 1);
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = app(50, 10);
        handle_action(&mut app, Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Help);
        handle_action(&mut app, Action::ExitMode);
        assert_eq!(app.mode, Mode::Normal);
        handle_action(&mut app, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_mouse_click_and_wheel() {
        let mut app = app(50, 10);
        let area = Rect::new(0, 0, 80, 10);

        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, 0), area);
        assert_eq!(app.scroll_top(), 3);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2), area);
        assert_eq!(app.cur_row(), 5);

        // Status bar row is outside the listing area
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 10), area);
        assert_eq!(app.cur_row(), 5);

        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 0), area);
        assert_eq!(app.scroll_top(), 0);
    }
}

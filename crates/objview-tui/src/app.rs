use std::sync::Arc;

use objview_core::{AppConfig, Error, HostMessage, HostSink, Listing, Result, SourceLocation};
use tracing::{debug, trace, warn};

use crate::scroll::{
    Clock, FrameQueue, MonotonicClock, ScrollConfigExt, ScrollDimensions, ScrollEvent,
    ScrollRequest, Scrollable, Viewport,
};
use crate::theme::Theme;

/// Listing area of the terminal, measured in rows
///
/// Every listing row is one terminal line tall, so content height is the
/// row count.
#[derive(Debug, Clone, Default)]
pub struct TerminalViewport {
    height: u16,
    rows: usize,
    scroll_top: i32,
}

impl TerminalViewport {
    pub fn new(height: u16, rows: usize) -> Self {
        Self {
            height,
            rows,
            scroll_top: 0,
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// First visible row
    pub fn scroll_top(&self) -> usize {
        self.scroll_top.max(0) as usize
    }
}

impl Viewport for TerminalViewport {
    fn client_height(&self) -> f64 {
        f64::from(self.height)
    }

    fn scroll_height(&self) -> f64 {
        self.rows as f64
    }

    fn set_scroll_top(&mut self, scroll_top: i32) {
        self.scroll_top = scroll_top;
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Browsing the listing
    Normal,
    /// Help overlay
    Help,
}

/// Application state
pub struct App<C = MonotonicClock> {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Parsed objdump listing (never empty)
    pub listing: Listing,
    /// Color theme
    pub theme: Theme,
    /// Currently selected row
    cur_row: usize,
    scroller: Scrollable<TerminalViewport, FrameQueue, C>,
    sink: Box<dyn HostSink>,
    /// Current application mode
    pub mode: Mode,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App<MonotonicClock> {
    pub fn new(
        listing: Listing,
        config: Arc<AppConfig>,
        theme: Theme,
        sink: Box<dyn HostSink>,
    ) -> Result<Self> {
        Self::with_clock(listing, config, theme, sink, MonotonicClock)
    }
}

impl<C: Clock> App<C> {
    /// Create the app with an explicit time source
    ///
    /// The viewport starts zero rows tall; call `resize` once the terminal
    /// layout is known.
    pub fn with_clock(
        listing: Listing,
        config: Arc<AppConfig>,
        theme: Theme,
        sink: Box<dyn HostSink>,
        clock: C,
    ) -> Result<Self> {
        if listing.is_empty() {
            return Err(Error::EmptyListing);
        }

        let viewport = TerminalViewport::new(0, listing.len());
        let mut scroller = Scrollable::with_parts(
            viewport,
            config.scroll.smooth_scroll_duration(),
            FrameQueue::new(),
            clock,
        )
        .with_easing(config.scroll.easing);
        scroller.set_scroll_listener(|event: &ScrollEvent| {
            trace!(
                "scroll_top {} -> {}",
                event.previous.scroll_top(),
                event.current.scroll_top()
            );
            None
        });

        debug!("App created with {} rows", listing.len());

        Ok(Self {
            config,
            listing,
            theme,
            cur_row: 0,
            scroller,
            sink,
            mode: Mode::Normal,
            status_message: None,
            pending_key: None,
            should_quit: false,
        })
    }

    /// Change the selected row, optionally scrolling it to the middle of
    /// the viewport
    ///
    /// Moves of more than one row scroll smoothly. A row with a source
    /// location is reported to the host.
    pub fn select_row(&mut self, next: usize, scroll: bool) {
        let next = next.min(self.last_row());
        if next == self.cur_row {
            return;
        }

        if scroll {
            let target = next as f64 - f64::from(self.scroller.state().viewport_height()) / 2.0;
            if next.abs_diff(self.cur_row) > 1 {
                self.scroller.set_scroll_position_smooth(target);
            } else {
                self.scroller.set_scroll_position_now(target);
            }
        }

        self.cur_row = next;
        self.post_current_location();
    }

    /// Select the next row
    pub fn move_down(&mut self) {
        self.select_row((self.cur_row + 1).min(self.last_row()), true);
    }

    /// Select the previous row
    pub fn move_up(&mut self) {
        self.select_row(self.cur_row.saturating_sub(1), true);
    }

    /// Move the selection forward by a page
    pub fn page_down(&mut self) {
        let next = (self.cur_row as f64 + self.page_step()).floor();
        self.select_row((next as usize).min(self.last_row()), true);
    }

    /// Move the selection back by a page
    pub fn page_up(&mut self) {
        let next = (self.cur_row as f64 - self.page_step()).floor().max(0.0);
        self.select_row(next as usize, true);
    }

    /// Select the first row
    pub fn jump_to_top(&mut self) {
        self.select_row(0, true);
    }

    /// Select the last row
    pub fn jump_to_bottom(&mut self) {
        self.select_row(self.last_row(), true);
    }

    /// Select the row drawn at `screen_row` of the listing area
    ///
    /// The viewport is left where it is.
    pub fn click(&mut self, screen_row: u16) {
        let row = self.scroll_top() + usize::from(screen_row);
        if row < self.listing.len() && screen_row < self.viewport_height() {
            self.select_row(row, false);
        }
    }

    /// Scroll the viewport by `lines` without touching the selection
    pub fn wheel(&mut self, lines: i32) {
        let top = self.scroller.state().scroll_top().saturating_add(lines);
        self.scroller.set_scroll_position_now(f64::from(top));
    }

    /// Post the current row's location to the host again
    pub fn reveal(&mut self) {
        if self.current_location().is_none() {
            self.set_status("No source location for this row");
            return;
        }
        self.post_current_location();
    }

    /// New listing area height
    pub fn resize(&mut self, viewport_height: u16) {
        if self.viewport_height() == viewport_height {
            return;
        }
        debug!("Viewport resized to {} rows", viewport_height);
        self.scroller.viewport_mut().height = viewport_height;
        self.scroller.set_scroll_dimensions(ScrollDimensions::new(
            viewport_height,
            self.listing.len() as f64,
        ));
    }

    /// Advance the running scroll animation, once per rendered frame
    pub fn on_frame(&mut self) {
        self.scroller.run_pending_frames();
    }

    pub fn is_animating(&self) -> bool {
        self.scroller.is_animating()
    }

    /// Observe every committed scroll position, replacing the tracing
    /// listener
    ///
    /// A returned request runs before the commit finishes, so an embedder
    /// can stop or redirect the animation from inside a frame.
    pub fn set_scroll_listener(
        &mut self,
        listener: impl FnMut(&ScrollEvent) -> Option<ScrollRequest> + 'static,
    ) {
        self.scroller.set_scroll_listener(listener);
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Normal => Mode::Help,
            Mode::Help => Mode::Normal,
        };
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Clear the pending key
    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    #[inline]
    pub fn cur_row(&self) -> usize {
        self.cur_row
    }

    pub fn current_location(&self) -> Option<&SourceLocation> {
        self.listing.location(self.cur_row)
    }

    /// First visible row
    pub fn scroll_top(&self) -> usize {
        self.scroller.viewport().scroll_top()
    }

    pub fn viewport_height(&self) -> u16 {
        self.scroller.viewport().height()
    }

    pub fn scroller(&self) -> &Scrollable<TerminalViewport, FrameQueue, C> {
        &self.scroller
    }

    #[inline]
    fn last_row(&self) -> usize {
        self.listing.len() - 1
    }

    fn page_step(&self) -> f64 {
        f64::from(self.viewport_height()) * self.config.scroll.page_fraction
    }

    fn post_current_location(&mut self) {
        let Some(location) = self.listing.location(self.cur_row) else {
            return;
        };
        let message = HostMessage::open_document(location);

        match self.sink.post(&message) {
            Ok(()) => {
                trace!("Posted {:?}", message);
                self.clear_status();
            }
            Err(e) => {
                warn!("Failed to post {:?}: {}", message, e);
                self.set_status(format!("Host error: {}", e));
            }
        }
    }
}

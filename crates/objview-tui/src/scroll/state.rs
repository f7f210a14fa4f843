//! L4 Atomic Layer: Immutable scroll position snapshot
//!
//! A `ScrollState` is always valid: its offset lies inside the range allowed
//! by its viewport and content heights. Every derivation re-clamps.

/// New viewport and content sizes reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollDimensions {
    /// Rendered height of the viewport
    pub height: f64,
    /// Total height of the scrollable content
    pub content_height: f64,
}

impl ScrollDimensions {
    pub fn new(height: impl Into<f64>, content_height: impl Into<f64>) -> Self {
        Self {
            height: height.into(),
            content_height: content_height.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollState {
    viewport_height: i32,
    content_height: i32,
    scroll_top: i32,
}

impl ScrollState {
    /// Build a clamped state
    ///
    /// Inputs are truncated toward zero. The offset is first pulled back so
    /// the viewport does not run past the content, then floored at zero, so
    /// a viewport taller than its content always sits at the top.
    pub fn new(viewport_height: f64, content_height: f64, scroll_top: f64) -> Self {
        let viewport_height = (viewport_height as i32).max(0);
        let content_height = (content_height as i32).max(0);
        let mut scroll_top = scroll_top as i32;

        if scroll_top.saturating_add(viewport_height) > content_height {
            scroll_top = content_height - viewport_height;
        }
        if scroll_top < 0 {
            scroll_top = 0;
        }

        Self {
            viewport_height,
            content_height,
            scroll_top,
        }
    }

    /// Same requested offset, new sizes
    pub fn with_scroll_dimensions(&self, dimensions: ScrollDimensions) -> Self {
        Self::new(
            dimensions.height,
            dimensions.content_height,
            self.scroll_top as f64,
        )
    }

    /// Same sizes, new requested offset
    pub fn with_scroll_position(&self, scroll_top: f64) -> Self {
        Self::new(
            self.viewport_height as f64,
            self.content_height as f64,
            scroll_top,
        )
    }

    #[inline]
    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    #[inline]
    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    #[inline]
    pub fn scroll_top(&self) -> i32 {
        self.scroll_top
    }

    /// Largest offset these dimensions allow
    pub fn max_scroll_top(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_offset_kept() {
        let state = ScrollState::new(500.0, 10000.0, 9000.0);
        assert_eq!(state.scroll_top(), 9000);
    }

    #[test]
    fn test_offset_pulled_back_to_bottom() {
        let state = ScrollState::new(500.0, 10000.0, 9800.0);
        assert_eq!(state.scroll_top(), 9500);
    }

    #[test]
    fn test_negative_offset_floored() {
        let state = ScrollState::new(500.0, 10000.0, -40.0);
        assert_eq!(state.scroll_top(), 0);
    }

    #[test]
    fn test_viewport_taller_than_content() {
        // bottom alignment would give -200, the floor wins
        let state = ScrollState::new(500.0, 300.0, 100.0);
        assert_eq!(state.scroll_top(), 0);
    }

    #[test]
    fn test_fractions_truncate() {
        let state = ScrollState::new(500.9, 10000.7, 1234.99);
        assert_eq!(state.viewport_height(), 500);
        assert_eq!(state.content_height(), 10000);
        assert_eq!(state.scroll_top(), 1234);

        // toward zero, not floor
        let state = ScrollState::new(10.0, 100.0, -0.9);
        assert_eq!(state.scroll_top(), 0);
    }

    #[test]
    fn test_negative_heights() {
        let state = ScrollState::new(-10.0, -5.0, 3.0);
        assert_eq!(state.viewport_height(), 0);
        assert_eq!(state.content_height(), 0);
        assert_eq!(state.scroll_top(), 0);
    }

    #[test]
    fn test_clamp_invariant_grid() {
        for viewport in [0.0, 1.0, 7.0, 500.0, 1200.0] {
            for content in [0.0, 3.0, 499.0, 500.0, 10000.0] {
                for top in [-1e6, -3.0, 0.0, 250.5, 9999.0, 1e9] {
                    let s = ScrollState::new(viewport, content, top);
                    assert!(s.scroll_top() >= 0, "{s:?}");
                    if s.content_height() >= s.viewport_height() {
                        assert!(s.scroll_top() + s.viewport_height() <= s.content_height(), "{s:?}");
                    } else {
                        assert_eq!(s.scroll_top(), 0, "{s:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_with_scroll_dimensions_reclamps_requested_top() {
        let state = ScrollState::new(500.0, 10000.0, 9000.0);
        let shrunk = state.with_scroll_dimensions(ScrollDimensions::new(500, 6000));
        assert_eq!(shrunk.scroll_top(), 5500);
        assert_eq!(shrunk.content_height(), 6000);

        let grown = state.with_scroll_dimensions(ScrollDimensions::new(200, 20000));
        assert_eq!(grown.scroll_top(), 9000);
    }

    #[test]
    fn test_with_scroll_position() {
        let state = ScrollState::new(500.0, 10000.0, 0.0);
        assert_eq!(state.with_scroll_position(4000.0).scroll_top(), 4000);
        assert_eq!(state.with_scroll_position(1e7).scroll_top(), 9500);
        assert_eq!(state.with_scroll_position(4000.0).viewport_height(), 500);
    }

    #[test]
    fn test_structural_equality() {
        let a = ScrollState::new(500.0, 10000.0, 9800.0);
        let b = ScrollState::new(500.0, 10000.0, 9500.0);
        assert_eq!(a, b);
        assert_ne!(a, a.with_scroll_position(0.0));
    }

    #[test]
    fn test_max_scroll_top() {
        assert_eq!(ScrollState::new(500.0, 10000.0, 0.0).max_scroll_top(), 9500);
        assert_eq!(ScrollState::new(500.0, 100.0, 0.0).max_scroll_top(), 0);
    }
}

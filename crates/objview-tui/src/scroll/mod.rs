//! Smooth scrolling engine for the listing viewport
//!
//! Time-based, interruptible scrolling: a request either moves the viewport
//! at once or starts an animation that is advanced once per rendered frame
//! until it lands exactly on its target. Animations can be redirected or
//! retargeted mid-flight without jumps in position.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (cubic, quintic, exponential)
//! - `timing` - Time source and completion/interpolation helpers
//! - `state` - Clamped scroll position snapshot
//! - `frame` - Frame scheduling and animation identity
//! - `config` - Configuration types and defaults (re-exported from objview-core)
//!
//! ## L3 Molecular Layer
//! - `animation` - Animation curves and the running animation
//!
//! ## L2 Organism Layer
//! - `scrollable` - Orchestrator owning state, animation and viewport
//!
//! # Usage
//!
//! ```ignore
//! use objview_tui::scroll::{Scrollable, ScrollDimensions};
//!
//! let mut scroller = Scrollable::new(viewport, Duration::from_millis(135));
//! scroller.set_scroll_dimensions(ScrollDimensions::new(40, 12_000));
//! scroller.set_scroll_position_smooth(4_000.0);
//!
//! // In the render loop, once per frame
//! scroller.run_pending_frames();
//! ```

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod frame;
pub mod state;
pub mod timing;

// L3 Molecular Layer
pub mod animation;

// L2 Organism Layer
pub mod scrollable;

// Re-exports for convenient access
pub use animation::{AnimationCurve, ScrollAnimation, ScrollUpdate};
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
pub use frame::{AnimationToken, FrameHandle, FrameQueue, FrameScheduler};
pub use scrollable::{ScrollEvent, ScrollRequest, Scrollable, Viewport};
pub use state::{ScrollDimensions, ScrollState};
pub use timing::{Clock, MonotonicClock};

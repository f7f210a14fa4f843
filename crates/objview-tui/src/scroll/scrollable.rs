//! L2 Organism Layer: Scroll orchestrator for one viewport
//!
//! `Scrollable` owns the authoritative `ScrollState` and at most one running
//! `ScrollAnimation`. Smooth scrolls are driven by frames requested from a
//! `FrameScheduler`; each frame carries the token of the animation that asked
//! for it, so frames belonging to a replaced or cancelled animation do
//! nothing.
//!
//! Committing a new state notifies the scroll listener synchronously. The
//! listener may answer with a `ScrollRequest` which is executed before the
//! commit returns, so the active animation can change underneath a frame.
//! Frames re-check their token after every commit for that reason.

use std::time::Duration;

use tracing::{debug, trace};

use super::animation::ScrollAnimation;
use super::easing::EasingType;
use super::frame::{AnimationToken, FrameQueue, FrameScheduler};
use super::state::{ScrollDimensions, ScrollState};
use super::timing::{Clock, MonotonicClock};

/// Element being scrolled
pub trait Viewport {
    /// Current rendered height
    fn client_height(&self) -> f64;
    /// Current total height of the content
    fn scroll_height(&self) -> f64;
    /// Write the committed offset
    fn set_scroll_top(&mut self, scroll_top: i32);
}

/// Emitted after every committed state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub previous: ScrollState,
    pub current: ScrollState,
}

/// What a scroll listener may ask for in response to an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Drop the running animation and stay where we are
    Stop,
    /// `set_scroll_position_now`
    JumpTo(f64),
    /// `set_scroll_position_smooth`
    SmoothTo(f64),
}

/// Scroll listener callback
///
/// Must not answer every event with a request that changes the position
/// again, or commits recurse without end.
pub type ScrollListener = Box<dyn FnMut(&ScrollEvent) -> Option<ScrollRequest>>;

#[derive(Debug)]
struct ActiveAnimation {
    token: AnimationToken,
    animation: ScrollAnimation,
}

pub struct Scrollable<V, F = FrameQueue, C = MonotonicClock> {
    viewport: V,
    scheduler: F,
    clock: C,
    state: ScrollState,
    smooth_scroll_duration: Duration,
    easing: EasingType,
    smooth_scrolling: Option<ActiveAnimation>,
    next_token: u64,
    listener: Option<ScrollListener>,
}

impl<V: Viewport> Scrollable<V> {
    /// Scrollable driven by a `FrameQueue` and the system clock
    ///
    /// A zero `smooth_scroll_duration` turns every smooth request into an
    /// instant jump.
    pub fn new(viewport: V, smooth_scroll_duration: Duration) -> Self {
        Self::with_parts(
            viewport,
            smooth_scroll_duration,
            FrameQueue::new(),
            MonotonicClock,
        )
    }
}

impl<V: Viewport, F: FrameScheduler, C: Clock> Scrollable<V, F, C> {
    pub fn with_parts(viewport: V, smooth_scroll_duration: Duration, scheduler: F, clock: C) -> Self {
        let state = ScrollState::new(viewport.client_height(), viewport.scroll_height(), 0.0);
        debug!(
            "Scrollable created: viewport={} content={} smooth={:?}",
            state.viewport_height(),
            state.content_height(),
            smooth_scroll_duration
        );

        Self {
            viewport,
            scheduler,
            clock,
            state,
            smooth_scroll_duration,
            easing: EasingType::default(),
            smooth_scrolling: None,
            next_token: 0,
            listener: None,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn set_scroll_listener(
        &mut self,
        listener: impl FnMut(&ScrollEvent) -> Option<ScrollRequest> + 'static,
    ) {
        self.listener = Some(Box::new(listener));
    }

    pub fn set_scroll_dimensions(&mut self, dimensions: ScrollDimensions) {
        let new_state = self.state.with_scroll_dimensions(dimensions);
        self.set_state(new_state);

        // Keep an outstanding animation inside the new bounds
        if let Some(active) = self.smooth_scrolling.as_mut() {
            active.animation.accept_scroll_dimensions(&self.state);
            trace!(
                "Animation retargeted to {} after resize",
                active.animation.to().scroll_top()
            );
        }
    }

    pub fn set_scroll_position_now(&mut self, scroll_top: f64) {
        let new_state = self.state.with_scroll_position(scroll_top);

        if let Some(active) = self.smooth_scrolling.take() {
            debug!("Smooth scroll {} cancelled by instant jump", active.token.id());
        }
        self.set_state(new_state);
    }

    pub fn set_scroll_position_smooth(&mut self, scroll_top: f64) {
        if self.smooth_scroll_duration.is_zero() {
            return self.set_scroll_position_now(scroll_top);
        }

        let valid_target = self.state.with_scroll_position(scroll_top);
        let now = self.clock.now();

        let animation = match &self.smooth_scrolling {
            Some(active) => {
                if active.animation.to().scroll_top() == valid_target.scroll_top() {
                    // Already heading there
                    return;
                }
                debug!(
                    "Redirecting smooth scroll {}: {} -> {}",
                    active.token.id(),
                    self.state.scroll_top(),
                    valid_target.scroll_top()
                );
                active
                    .animation
                    .combine(self.state, valid_target, self.smooth_scroll_duration, now)
            }
            None => {
                debug!(
                    "Starting smooth scroll: {} -> {}",
                    self.state.scroll_top(),
                    valid_target.scroll_top()
                );
                ScrollAnimation::start(
                    self.state,
                    valid_target,
                    self.smooth_scroll_duration,
                    now,
                    self.easing,
                )
            }
        };

        let token = self.issue_token();
        self.smooth_scrolling = Some(ActiveAnimation { token, animation });
        self.schedule_frame(token);
    }

    /// Drop the running animation, keeping the current position
    pub fn stop(&mut self) {
        if let Some(active) = self.smooth_scrolling.take() {
            debug!("Smooth scroll {} stopped", active.token.id());
        }
    }

    /// Frame callback for the animation identified by `token`
    pub fn run_frame(&mut self, token: AnimationToken) {
        match self.smooth_scrolling.as_mut() {
            Some(active) if active.token == token => active.animation.set_frame_handle(None),
            _ => {
                trace!("Ignoring stale frame for animation {}", token.id());
                return;
            }
        }
        self.perform_smooth_scrolling(token);
    }

    fn perform_smooth_scrolling(&mut self, token: AnimationToken) {
        let now = self.clock.now();
        let update = match &self.smooth_scrolling {
            Some(active) => active.animation.tick(now),
            None => return,
        };

        let new_state = self.state.with_scroll_position(update.scroll_top);
        self.set_state(new_state);

        if !self.is_current(token) {
            // The scroll listener replaced or cancelled the animation
            trace!("Animation {} superseded while applying a frame", token.id());
            return;
        }

        if update.is_done {
            debug!("Smooth scroll {} landed at {}", token.id(), self.state.scroll_top());
            self.smooth_scrolling = None;
            return;
        }

        self.schedule_frame(token);
    }

    fn schedule_frame(&mut self, token: AnimationToken) {
        let handle = self.scheduler.request_frame(token);
        if let Some(active) = self.smooth_scrolling.as_mut() {
            active.animation.set_frame_handle(Some(handle));
        }
    }

    fn issue_token(&mut self) -> AnimationToken {
        self.next_token += 1;
        AnimationToken::new(self.next_token)
    }

    #[inline]
    fn is_current(&self, token: AnimationToken) -> bool {
        self.smooth_scrolling
            .as_ref()
            .is_some_and(|active| active.token == token)
    }

    fn set_state(&mut self, new_state: ScrollState) {
        let previous = self.state;
        if previous == new_state {
            return;
        }

        self.state = new_state;
        self.viewport.set_scroll_top(new_state.scroll_top());
        self.notify(ScrollEvent {
            previous,
            current: new_state,
        });
    }

    fn notify(&mut self, event: ScrollEvent) {
        let Some(mut listener) = self.listener.take() else {
            return;
        };
        let request = listener(&event);
        if self.listener.is_none() {
            self.listener = Some(listener);
        }

        if let Some(request) = request {
            trace!("Scroll listener requested {:?}", request);
            match request {
                ScrollRequest::Stop => self.stop(),
                ScrollRequest::JumpTo(top) => self.set_scroll_position_now(top),
                ScrollRequest::SmoothTo(top) => self.set_scroll_position_smooth(top),
            }
        }
    }

    #[inline]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.smooth_scrolling.is_some()
    }

    /// Offset the viewport is heading to (current offset when idle)
    pub fn target_scroll_top(&self) -> i32 {
        self.smooth_scrolling
            .as_ref()
            .map(|active| active.animation.to().scroll_top())
            .unwrap_or(self.state.scroll_top())
    }

    pub fn animation(&self) -> Option<&ScrollAnimation> {
        self.smooth_scrolling.as_ref().map(|active| &active.animation)
    }

    pub fn active_token(&self) -> Option<AnimationToken> {
        self.smooth_scrolling.as_ref().map(|active| active.token)
    }

    pub fn smooth_scroll_duration(&self) -> Duration {
        self.smooth_scroll_duration
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

impl<V: Viewport, C: Clock> Scrollable<V, FrameQueue, C> {
    /// Run every frame requested since the last call
    pub fn run_pending_frames(&mut self) {
        for token in self.scheduler.take_pending() {
            self.run_frame(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::scroll::timing::ManualClock;

    /// Viewport that records every offset written to it
    #[derive(Debug, Clone)]
    struct RecordingViewport {
        height: f64,
        content: f64,
        writes: Rc<RefCell<Vec<i32>>>,
    }

    impl RecordingViewport {
        fn new(height: f64, content: f64) -> Self {
            Self {
                height,
                content,
                writes: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl Viewport for RecordingViewport {
        fn client_height(&self) -> f64 {
            self.height
        }

        fn scroll_height(&self) -> f64 {
            self.content
        }

        fn set_scroll_top(&mut self, scroll_top: i32) {
            self.writes.borrow_mut().push(scroll_top);
        }
    }

    type TestScrollable = Scrollable<RecordingViewport, FrameQueue, ManualClock>;

    fn scrollable(duration_ms: u64) -> (TestScrollable, ManualClock, Rc<RefCell<Vec<i32>>>) {
        let viewport = RecordingViewport::new(500.0, 10000.0);
        let writes = viewport.writes.clone();
        let clock = ManualClock::new();
        let scrollable = Scrollable::with_parts(
            viewport,
            Duration::from_millis(duration_ms),
            FrameQueue::new(),
            clock.clone(),
        );
        (scrollable, clock, writes)
    }

    /// Advance 16ms per frame until the animation finishes
    fn run_to_completion(s: &mut TestScrollable, clock: &ManualClock) -> usize {
        let mut frames = 0;
        while s.is_animating() {
            clock.advance_ms(16);
            s.run_pending_frames();
            frames += 1;
            assert!(frames < 100, "animation never finished");
        }
        frames
    }

    #[test]
    fn test_initial_state_from_viewport() {
        let (s, _, writes) = scrollable(135);
        assert_eq!(s.state().viewport_height(), 500);
        assert_eq!(s.state().content_height(), 10000);
        assert_eq!(s.state().scroll_top(), 0);
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn test_instant_scroll_in_bounds() {
        let (mut s, _, writes) = scrollable(135);
        s.set_scroll_position_now(9000.0);
        assert_eq!(s.state().scroll_top(), 9000);
        assert_eq!(*writes.borrow(), vec![9000]);
    }

    #[test]
    fn test_instant_scroll_clamped() {
        let (mut s, _, writes) = scrollable(135);
        s.set_scroll_position_now(9800.0);
        assert_eq!(s.state().scroll_top(), 9500);
        assert_eq!(*writes.borrow(), vec![9500]);
    }

    #[test]
    fn test_idempotent_apply() {
        let (mut s, _, writes) = scrollable(135);
        s.set_scroll_position_now(9800.0);
        s.set_scroll_position_now(9700.0);
        s.set_scroll_position_now(9500.0);
        assert_eq!(writes.borrow().len(), 1);

        s.set_scroll_dimensions(ScrollDimensions::new(500, 10000));
        assert_eq!(writes.borrow().len(), 1);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let (mut s, _, writes) = scrollable(0);
        s.set_scroll_position_smooth(4000.0);
        assert!(!s.is_animating());
        assert!(s.scheduler().is_empty());
        assert_eq!(s.state().scroll_top(), 4000);
        assert_eq!(*writes.borrow(), vec![4000]);
    }

    #[test]
    fn test_smooth_scroll_lands_on_target() {
        let (mut s, clock, writes) = scrollable(135);
        s.set_scroll_position_smooth(800.0);

        // nothing moves until a frame runs
        assert!(s.is_animating());
        assert_eq!(s.state().scroll_top(), 0);
        assert!(writes.borrow().is_empty());
        assert_eq!(s.target_scroll_top(), 800);

        let frames = run_to_completion(&mut s, &clock);
        assert!(frames >= 8, "finished after {frames} frames");
        assert_eq!(s.state().scroll_top(), 800);

        let writes = writes.borrow();
        assert_eq!(writes.last(), Some(&800));
        assert!(writes.windows(2).all(|w| w[0] <= w[1]), "{writes:?}");
        assert!(s.scheduler().is_empty());
    }

    #[test]
    fn test_long_jump_is_split() {
        let (mut s, clock, _) = scrollable(135);
        s.set_scroll_position_smooth(4000.0);
        assert!(s.animation().unwrap().curve().is_split());

        s.run_pending_frames();
        let first = s.state().scroll_top();
        assert!(first > 0 && first < 375, "{first}");

        clock.advance_ms(50);
        s.run_pending_frames();
        let later = s.state().scroll_top();
        assert!(later >= 3625 && later < 4000, "{later}");

        run_to_completion(&mut s, &clock);
        assert_eq!(s.state().scroll_top(), 4000);
    }

    #[test]
    fn test_same_target_is_ignored() {
        let (mut s, _, _) = scrollable(135);
        s.set_scroll_position_smooth(4000.0);
        let token = s.active_token();
        let start = s.animation().unwrap().start_time();

        s.set_scroll_position_smooth(4000.0);
        assert_eq!(s.active_token(), token);
        assert_eq!(s.animation().unwrap().start_time(), start);
        assert_eq!(s.scheduler().len(), 1);
    }

    #[test]
    fn test_same_clamped_target_is_ignored() {
        let (mut s, _, _) = scrollable(135);
        s.set_scroll_position_smooth(9500.0);
        let token = s.active_token();
        s.set_scroll_position_smooth(20000.0);
        assert_eq!(s.active_token(), token);
    }

    #[test]
    fn test_redirect_starts_from_current_position() {
        let (mut s, clock, writes) = scrollable(135);
        s.set_scroll_position_smooth(1000.0);
        let first_token = s.active_token().unwrap();

        s.run_pending_frames();
        clock.advance_ms(16);
        s.run_pending_frames();
        let here = *s.state();
        assert!(here.scroll_top() > 0 && here.scroll_top() < 1000);

        s.set_scroll_position_smooth(200.0);
        let second_token = s.active_token().unwrap();
        assert_ne!(first_token, second_token);
        assert_eq!(*s.animation().unwrap().from(), here);
        assert_eq!(s.target_scroll_top(), 200);

        // the old frame is still queued but must not move anything
        let before = writes.borrow().len();
        s.run_frame(first_token);
        assert_eq!(writes.borrow().len(), before);
        assert_eq!(s.active_token(), Some(second_token));

        run_to_completion(&mut s, &clock);
        assert_eq!(s.state().scroll_top(), 200);
    }

    #[test]
    fn test_instant_jump_cancels_animation() {
        let (mut s, clock, writes) = scrollable(135);
        s.set_scroll_position_smooth(4000.0);
        s.set_scroll_position_now(100.0);
        assert!(!s.is_animating());
        assert_eq!(*writes.borrow(), vec![100]);

        // the frame requested for the cancelled animation is a no-op
        clock.advance_ms(16);
        s.run_pending_frames();
        assert_eq!(*writes.borrow(), vec![100]);
        assert!(s.scheduler().is_empty());
    }

    #[test]
    fn test_resize_mid_animation_retargets() {
        let (mut s, clock, _) = scrollable(135);
        s.set_scroll_position_smooth(9000.0);
        s.run_pending_frames();
        clock.advance_ms(16);
        s.run_pending_frames();

        let start = s.animation().unwrap().start_time();
        let duration = s.animation().unwrap().duration();
        let from = *s.animation().unwrap().from();

        s.set_scroll_dimensions(ScrollDimensions::new(500, 5000));
        let anim = s.animation().unwrap();
        assert_eq!(anim.to().scroll_top(), 4500);
        assert_eq!(anim.start_time(), start);
        assert_eq!(anim.duration(), duration);
        assert_eq!(*anim.from(), from);

        run_to_completion(&mut s, &clock);
        assert_eq!(s.state().scroll_top(), 4500);
        assert_eq!(s.state().content_height(), 5000);
    }

    #[test]
    fn test_resize_clamps_current_position() {
        let (mut s, _, writes) = scrollable(135);
        s.set_scroll_position_now(9000.0);
        s.set_scroll_dimensions(ScrollDimensions::new(800, 6000));
        assert_eq!(s.state().scroll_top(), 5200);
        assert_eq!(*writes.borrow(), vec![9000, 5200]);
    }

    #[test]
    fn test_listener_sees_every_commit() {
        let (mut s, _, _) = scrollable(135);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        s.set_scroll_listener(move |event| {
            sink.borrow_mut().push(*event);
            None
        });

        s.set_scroll_position_now(300.0);
        s.set_scroll_position_now(300.0);
        s.set_scroll_position_now(600.0);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].previous.scroll_top(), 0);
        assert_eq!(events[0].current.scroll_top(), 300);
        assert_eq!(events[1].current.scroll_top(), 600);
    }

    #[test]
    fn test_listener_stop_during_frame() {
        let (mut s, clock, _) = scrollable(135);
        s.set_scroll_listener(|event| {
            (event.current.scroll_top() > 1000).then_some(ScrollRequest::Stop)
        });

        s.set_scroll_position_smooth(4000.0);
        s.run_pending_frames();
        assert!(s.is_animating());

        clock.advance_ms(50);
        s.run_pending_frames();
        assert!(!s.is_animating());
        assert!(s.scheduler().is_empty());

        let stopped_at = s.state().scroll_top();
        assert!(stopped_at > 1000 && stopped_at < 4000);
    }

    #[test]
    fn test_listener_redirect_during_frame() {
        let (mut s, clock, _) = scrollable(135);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        s.set_scroll_listener(move |event| {
            if !flag.get() && event.current.scroll_top() > 1000 {
                flag.set(true);
                return Some(ScrollRequest::SmoothTo(200.0));
            }
            None
        });

        s.set_scroll_position_smooth(4000.0);
        let first_token = s.active_token().unwrap();
        s.run_pending_frames();
        clock.advance_ms(50);
        s.run_pending_frames();

        assert!(fired.get());
        let second_token = s.active_token().unwrap();
        assert_ne!(first_token, second_token);

        // only the replacement asked for another frame
        let queued = s.scheduler_mut().take_pending();
        assert_eq!(queued, vec![second_token]);
        assert_eq!(*s.animation().unwrap().from(), *s.state());

        for token in queued {
            s.run_frame(token);
        }
        run_to_completion(&mut s, &clock);
        assert_eq!(s.state().scroll_top(), 200);
    }

    #[test]
    fn test_listener_jump_during_frame() {
        let (mut s, clock, writes) = scrollable(135);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        s.set_scroll_listener(move |event| {
            if !flag.get() && event.current.scroll_top() > 0 {
                flag.set(true);
                return Some(ScrollRequest::JumpTo(42.0));
            }
            None
        });

        s.set_scroll_position_smooth(800.0);
        s.run_pending_frames();
        assert!(!s.is_animating());
        assert_eq!(s.state().scroll_top(), 42);
        assert_eq!(writes.borrow().last(), Some(&42));

        clock.advance_ms(16);
        s.run_pending_frames();
        assert_eq!(s.state().scroll_top(), 42);
    }

    #[test]
    fn test_frame_handle_tracked() {
        let (mut s, _, _) = scrollable(135);
        s.set_scroll_position_smooth(800.0);
        assert!(s.animation().unwrap().frame_handle().is_some());
        s.run_pending_frames();
        // a fresh request replaced the consumed one
        assert!(s.animation().unwrap().frame_handle().is_some());
    }

    #[test]
    fn test_easing_is_configurable() {
        let viewport = RecordingViewport::new(500.0, 10000.0);
        let mut s = Scrollable::with_parts(
            viewport,
            Duration::from_millis(135),
            FrameQueue::new(),
            ManualClock::new(),
        )
        .with_easing(EasingType::Linear);
        s.set_scroll_position_smooth(1000.0);
        match s.animation().unwrap().curve() {
            crate::scroll::animation::AnimationCurve::Single(seg) => {
                assert_eq!(seg.easing, EasingType::Linear)
            }
            other => panic!("unexpected curve {other:?}"),
        }
    }
}

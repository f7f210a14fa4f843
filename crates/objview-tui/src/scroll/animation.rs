//! L3 Molecular Layer: Time-bounded scroll animation
//!
//! A `ScrollAnimation` interpolates the scroll offset from one `ScrollState`
//! to another over a fixed duration. Long jumps are split into a short
//! lead-out near the origin and a lead-in near the destination so the
//! motion stays calm at both ends whatever the distance.

use std::time::{Duration, Instant};

use super::easing::{EasingType, EasingTypeExt};
use super::frame::FrameHandle;
use super::state::ScrollState;
use super::timing::{completion, lerp};

/// Jumps longer than this many viewports are split in two
pub const LONG_JUMP_VIEWPORTS: f64 = 2.5;
/// Distance, in viewports, covered by each half of a split jump
pub const SPLIT_STOP_VIEWPORTS: f64 = 0.75;
/// Share of the completion range spent on the lead-out of a split jump
pub const SPLIT_CUT: f64 = 0.33;
/// Head start given to every animation so the first frame already moves
pub const START_LEAD: Duration = Duration::from_millis(10);

/// One eased interpolation between two offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: f64,
    pub to: f64,
    pub easing: EasingType,
}

impl Segment {
    pub fn new(from: f64, to: f64, easing: EasingType) -> Self {
        Self { from, to, easing }
    }

    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        lerp(self.from, self.to, self.easing.apply(t))
    }
}

/// Offset as a function of completion in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCurve {
    Single(Segment),
    /// `lead_out` runs on [0, cut), `lead_in` on [cut, 1]
    Split {
        lead_out: Segment,
        lead_in: Segment,
        cut: f64,
    },
}

impl AnimationCurve {
    /// Curve for a jump from `from` to `to` in a viewport of `viewport_size`
    pub fn for_jump(from: f64, to: f64, viewport_size: f64, easing: EasingType) -> Self {
        let delta = (from - to).abs();
        if delta <= LONG_JUMP_VIEWPORTS * viewport_size {
            return AnimationCurve::Single(Segment::new(from, to, easing));
        }

        let stop = SPLIT_STOP_VIEWPORTS * viewport_size;
        let (stop1, stop2) = if from < to {
            (from + stop, to - stop)
        } else {
            (from - stop, to + stop)
        };

        AnimationCurve::Split {
            lead_out: Segment::new(from, stop1, easing),
            lead_in: Segment::new(stop2, to, easing),
            cut: SPLIT_CUT,
        }
    }

    pub fn at(&self, completion: f64) -> f64 {
        match self {
            AnimationCurve::Single(segment) => segment.at(completion),
            AnimationCurve::Split {
                lead_out,
                lead_in,
                cut,
            } => {
                if completion < *cut {
                    lead_out.at(completion / cut)
                } else {
                    lead_in.at((completion - cut) / (1.0 - cut))
                }
            }
        }
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self, AnimationCurve::Split { .. })
    }
}

/// Result of evaluating an animation at some instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub scroll_top: f64,
    pub is_done: bool,
}

/// A running smooth scroll
#[derive(Debug, Clone)]
pub struct ScrollAnimation {
    from: ScrollState,
    to: ScrollState,
    start_time: Instant,
    duration: Duration,
    easing: EasingType,
    curve: AnimationCurve,
    frame: Option<FrameHandle>,
}

impl ScrollAnimation {
    /// Start an animation at `now`
    ///
    /// The duration is extended by `START_LEAD` and the start time moved back
    /// by the same amount, so the first evaluated frame is already under way.
    pub fn start(
        from: ScrollState,
        to: ScrollState,
        duration: Duration,
        now: Instant,
        easing: EasingType,
    ) -> Self {
        let duration = duration + START_LEAD;
        let start_time = now.checked_sub(START_LEAD).unwrap_or(now);
        let curve = Self::curve_between(&from, &to, easing);

        Self {
            from,
            to,
            start_time,
            duration,
            easing,
            curve,
            frame: None,
        }
    }

    fn curve_between(from: &ScrollState, to: &ScrollState, easing: EasingType) -> AnimationCurve {
        AnimationCurve::for_jump(
            from.scroll_top() as f64,
            to.scroll_top() as f64,
            to.viewport_height() as f64,
            easing,
        )
    }

    /// Follow a change of viewport or content size
    ///
    /// The target keeps its requested offset, re-clamped to the new sizes.
    /// The curve is rebuilt from the original origin; elapsed time and
    /// duration are kept.
    pub fn accept_scroll_dimensions(&mut self, state: &ScrollState) {
        self.to = state.with_scroll_position(self.to.scroll_top() as f64);
        self.curve = Self::curve_between(&self.from, &self.to, self.easing);
    }

    /// Evaluate at `now`; lands exactly on the target once complete
    pub fn tick(&self, now: Instant) -> ScrollUpdate {
        let completion = completion(self.start_time, now, self.duration);

        if completion < 1.0 {
            return ScrollUpdate {
                scroll_top: self.curve.at(completion),
                is_done: false,
            };
        }

        ScrollUpdate {
            scroll_top: self.to.scroll_top() as f64,
            is_done: true,
        }
    }

    /// Replacement animation for a redirect
    ///
    /// Always a fresh start from `from`; nothing of this animation's
    /// progress is carried over besides its easing.
    pub fn combine(
        &self,
        from: ScrollState,
        to: ScrollState,
        duration: Duration,
        now: Instant,
    ) -> ScrollAnimation {
        ScrollAnimation::start(from, to, duration, now, self.easing)
    }

    pub fn from(&self) -> &ScrollState {
        &self.from
    }

    pub fn to(&self) -> &ScrollState {
        &self.to
    }

    pub fn curve(&self) -> &AnimationCurve {
        &self.curve
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub(crate) fn set_frame_handle(&mut self, handle: Option<FrameHandle>) {
        self.frame = handle;
    }
}

//! L4 Atomic Layer: Display-refresh scheduling
//!
//! A scheduled frame carries the `AnimationToken` of the animation that asked
//! for it. When the frame runs, the token is compared with the animation that
//! is active at that moment; a mismatch means the animation was replaced or
//! dropped in the meantime and the frame does nothing.

/// Identity of one animation instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Handle returned by the scheduler for a requested frame
///
/// Tracked for bookkeeping only. Cancellation happens by dropping the
/// animation the token refers to, never through this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Runs a callback before the next repaint
pub trait FrameScheduler {
    /// Ask for `Scrollable::run_frame(token)` to be called on the next frame
    fn request_frame(&mut self, token: AnimationToken) -> FrameHandle;
}

/// In-process scheduler for a render loop
///
/// The loop calls `take_pending()` once per rendered frame and runs every
/// returned token. Tokens requested while those run wait for the next frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: Vec<AnimationToken>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens due this frame, in request order
    pub fn take_pending(&mut self) -> Vec<AnimationToken> {
        std::mem::take(&mut self.pending)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, token: AnimationToken) -> FrameHandle {
        self.next_handle += 1;
        self.pending.push(token);
        FrameHandle(self.next_handle)
    }
}

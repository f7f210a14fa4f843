//! L4 Atomic Layer: Pure easing functions for smooth scrolling animations
//!
//! Provides mathematical easing functions that map input [0, 1] to output [0, 1]
//! with various deceleration curves. Every curve ends with zero velocity so a
//! scroll always settles into its target instead of stopping abruptly.

// Re-export EasingType from core
pub use objview_core::EasingType;

/// Extension trait for EasingType with calculation methods
pub trait EasingTypeExt {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingTypeExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::Cubic => ease_out_cubic(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::Exponential => exponential_ease_out(t),
        }
    }
}

/// Cubic ease-in: f(t) = t³
#[inline]
pub fn ease_in_cubic(t: f64) -> f64 {
    t.powi(3)
}

/// Cubic ease-out: f(t) = 1 - ease_in_cubic(1 - t)
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - ease_in_cubic(1.0 - t)
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

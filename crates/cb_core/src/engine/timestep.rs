//! Frame timestep policy
//!
//! One simulation step per rendered frame. The incoming frame delta is clamped
//! before it reaches any component so a stalled frame cannot tunnel bodies
//! through walls or blow up the integrator.

/// Largest delta a single tick may integrate (100ms)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Nominal frame delta used by headless runs (60 FPS)
pub const NOMINAL_DT: f32 = 1.0 / 60.0;

/// Clamp a raw frame delta into `[0, MAX_FRAME_DT]`.
///
/// NaN collapses to 0 so the tick is skipped rather than poisoning body state.
#[inline]
pub fn clamp_frame_dt(raw_dt: f32) -> f32 {
    if raw_dt.is_nan() {
        return 0.0;
    }
    raw_dt.clamp(0.0, MAX_FRAME_DT)
}

/// Number of nominal ticks covering `seconds`
#[inline]
pub fn ticks_for(seconds: f32) -> u32 {
    (seconds / NOMINAL_DT).round().max(0.0) as u32
}

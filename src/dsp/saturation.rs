//! Saturation and safety limiting.
//!
//! Two different jobs live here:
//!
//! - `saturate` is a musical waveshaper. It is `tanh(drive * x) / drive`,
//!   which has unity slope around zero for any drive, so turning drive
//!   down to 0 lands smoothly on the clean signal.
//! - `sanitize` is a guard for recursive state (feedback loops, filter
//!   integrators). It never shapes normal signals; it only catches NaN,
//!   infinities and runaway values before they get written back.

/// Magnitude beyond which recursive state is considered runaway.
pub const STATE_LIMIT: f32 = 8.0;

/// `tanh(drive * x) / drive`, or `x` unchanged when drive is zero.
#[inline]
pub fn saturate(sample: f32, drive: f32) -> f32 {
    if drive <= f32::EPSILON {
        sample
    } else {
        (sample * drive).tanh() / drive
    }
}

/// Flush non-finite values to zero and hard-limit to `±limit`.
#[inline]
pub fn sanitize(sample: f32, limit: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-limit, limit)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_drive_is_transparent() {
        assert_eq!(saturate(0.42, 0.0), 0.42);
    }

    #[test]
    fn test_small_signals_keep_unity_slope() {
        let output = saturate(0.001, 5.0);
        assert!((output - 0.001).abs() < 1e-5);
    }

    #[test]
    fn test_large_signals_are_bounded_by_inverse_drive() {
        let output = saturate(100.0, 4.0);
        assert!(output <= 0.25 + 1e-6);
    }

    #[test]
    fn test_sanitize_flushes_non_finite() {
        assert_eq!(sanitize(f32::NAN, STATE_LIMIT), 0.0);
        assert_eq!(sanitize(f32::INFINITY, STATE_LIMIT), 0.0);
        assert_eq!(sanitize(100.0, STATE_LIMIT), STATE_LIMIT);
        assert_eq!(sanitize(-0.5, STATE_LIMIT), -0.5);
    }
}

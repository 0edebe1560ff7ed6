use crate::error::{Error, Result};

/*
Parameter Ramping
=================

When a control value jumps between two samples, the waveform gets a
corner (or a step) that is heard as a click. A ramper spreads the change
over a short run of samples so the audio sees a straight line instead.

Vocabulary
----------

  current     The value the DSP code reads for the sample being rendered.

  target      Where the ramp is heading. Reached exactly, never passed.

  remaining   Samples left until current == target. Zero means settled.

  start       Snapshot of current at the moment the target was set. Every
              value reported during the ramp lies between start and target.


Retargeting
-----------

  value
    B ┤        ╱ ─ ─ ─ ─ (old target, never reached)
      │      ╱
      │    ●──────╮        ● = retarget point
      │  ╱         ╲
    C ┤╱             ╲_____ new target
      └──────────────────→ samples

A new target always starts from the in-flight value. Jumping to the old
target first would put back the very step the ramp exists to hide.


Why compute from the target?
----------------------------

Summing `current += increment` accumulates rounding error and can land a
hair off the target. Instead we evaluate

    current = target - increment * remaining

which hits `target` bit-exactly when `remaining` reaches zero and is
monotonic in `remaining`. The result is additionally clamped to the
[start, target] interval so float rounding can never overshoot.

Targets that are NaN or infinite are dropped on the floor. The value a
ramper reports is always finite as long as it was created finite.
*/

/// Linear per-sample smoother for a single control value.
#[derive(Debug, Clone)]
pub struct ParameterRamper {
    current: f32,
    target: f32,
    start: f32,
    increment: f32,
    remaining: u32,
    ramp_duration: u32,
}

impl ParameterRamper {
    /// Create a settled ramper holding `value`. Ramp duration starts at 0
    /// (changes apply immediately) until configured.
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            start: value,
            increment: 0.0,
            remaining: 0,
            ramp_duration: 0,
        }
    }

    pub fn with_ramp_duration(mut self, samples: u32) -> Self {
        self.ramp_duration = samples;
        self
    }

    /// Default duration used by [`ramp_to`](Self::ramp_to).
    pub fn ramp_duration(&self) -> u32 {
        self.ramp_duration
    }

    pub fn set_ramp_duration(&mut self, samples: u32) {
        self.ramp_duration = samples;
    }

    /// Head for `value` over `duration_samples` samples, starting from the
    /// current in-flight value. A duration of 0 jumps.
    ///
    /// Non-finite values are ignored and the ramper keeps its state.
    pub fn set_target(&mut self, value: f32, duration_samples: u32) {
        if !value.is_finite() {
            return;
        }
        if duration_samples == 0 {
            self.set_immediate(value);
            return;
        }

        self.start = self.current;
        self.target = value;
        self.remaining = duration_samples;
        self.increment = (value - self.current) / duration_samples as f32;
    }

    /// Head for `value` using the configured ramp duration.
    pub fn ramp_to(&mut self, value: f32) {
        self.set_target(value, self.ramp_duration);
    }

    /// Jump straight to `value`, cancelling any ramp in flight. Non-finite
    /// values are ignored.
    pub fn set_immediate(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.current = value;
        self.target = value;
        self.start = value;
        self.increment = 0.0;
        self.remaining = 0;
    }

    /// Advance by `samples`. Equivalent to `samples` calls to `tick`.
    pub fn advance(&mut self, samples: u32) {
        if self.remaining == 0 {
            return;
        }

        self.remaining -= samples.min(self.remaining);
        self.current = if self.remaining == 0 {
            self.target
        } else {
            self.interpolated()
        };
    }

    /// Advance one sample and return the value for that sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.advance(1);
        self.current
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    fn interpolated(&self) -> f32 {
        let value = self.target - self.increment * self.remaining as f32;
        let (lo, hi) = if self.start <= self.target {
            (self.start, self.target)
        } else {
            (self.target, self.start)
        };
        // max/min rather than clamp: an overflowed increment can make
        // `value` NaN, which must still land inside the interval
        value.max(lo).min(hi)
    }
}

impl Default for ParameterRamper {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Convert a ramp time in seconds to a whole number of samples.
///
/// Negative or non-finite times and non-positive sample rates are rejected.
/// Very long ramps saturate at `u32::MAX` samples.
pub fn ramp_samples(seconds: f64, sample_rate: f64) -> Result<u32> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Error::invalid(format!(
            "ramp duration must be a non-negative number of seconds, got {seconds}"
        )));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(Error::invalid(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }

    let samples = (seconds * sample_rate).round();
    Ok(samples.min(u32::MAX as f64) as u32)
}

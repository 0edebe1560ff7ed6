//! Low Frequency Oscillator used to sweep delay times.

use std::f32::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running below the audible range (roughly 0.01 Hz
to 20 Hz). It never reaches the output directly; it moves a parameter.

  bipolar     Output swings -1.0 .. +1.0. Used for delay modulation so
              the delay time moves above AND below its centre.

  phase       Position inside one cycle, kept in 0.0 .. 1.0 so the
              accumulator never loses precision on long runs.

Stereo spread
-------------

Running the same LFO with a fixed phase offset per channel keeps the two
delay taps out of step, which is what makes a chorus sound wide. A quarter
cycle (90 degrees) between left and right is the classic quadrature
setting.
*/

/// Sine LFO with a phase accumulator in cycles.
#[derive(Debug, Clone, Default)]
pub struct SineLfo {
    phase: f32,
}

impl SineLfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given phase (in cycles).
    pub fn with_phase(phase: f32) -> Self {
        Self {
            phase: phase.rem_euclid(1.0),
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Return the bipolar value for this sample, then advance.
    #[inline]
    pub fn next(&mut self, frequency_hz: f32, sample_rate: f32) -> f32 {
        let value = (self.phase * TAU).sin();

        self.phase += frequency_hz / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn reset(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }
}

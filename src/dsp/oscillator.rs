use std::f32::consts::TAU;

/*
Phase Distortion
================

Phase distortion (the Casio CZ trick) keeps the sine lookup but bends the
phase that drives it. The phase still sweeps 0 → 1 once per cycle, just
not at a constant speed:

  phase'
    1 ┤              ╱
      │            ╱
  0.5 ┤ ─ ─ ─ ─ ─●        ● = knee
      │        ╱╱
      │      ╱╱
    0 ┼────╱──────────→ phase
      0   knee        1

The first half of the sine is squeezed into [0, knee) and the second half
is stretched over [knee, 1). With the knee at 0.5 the mapping is the
identity and the output is a pure sine. Moving the knee towards either
edge sharpens one half-cycle, adding harmonics on the way to a saw-like
shape.

  distortion  -1.0 .. +1.0
  knee        0.5 * (1 - distortion), kept away from 0 and 1

The mapping is continuous in both phase and distortion, so a ramped
distortion amount sweeps the timbre without clicks.
*/

/// How close the knee may get to the cycle edges.
const MIN_KNEE: f32 = 0.01;

/// Bend a phase in cycles (0.0 .. 1.0) around a knee set by `distortion`.
#[inline]
pub fn distort_phase(phase: f32, distortion: f32) -> f32 {
    let knee = (0.5 * (1.0 - distortion)).clamp(MIN_KNEE, 1.0 - MIN_KNEE);
    if phase < knee {
        0.5 * phase / knee
    } else {
        0.5 + 0.5 * (phase - knee) / (1.0 - knee)
    }
}

/// Phase accumulator in cycles, wrapped to 0.0 .. 1.0.
#[derive(Debug, Clone, Default)]
pub struct PhaseAccumulator {
    phase: f32,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Return the phase for this sample, then advance by `frequency_hz`.
    #[inline]
    pub fn next(&mut self, frequency_hz: f32, sample_rate: f32) -> f32 {
        let phase = self.phase;
        self.phase += frequency_hz / sample_rate;
        if self.phase >= 1.0 || self.phase < 0.0 {
            self.phase = self.phase.rem_euclid(1.0);
        }
        phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Sine lookup through a distorted phase.
#[inline]
pub fn phase_distortion_sine(phase: f32, distortion: f32) -> f32 {
    (distort_phase(phase, distortion) * TAU).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distortion_is_identity() {
        for i in 0..100 {
            let phase = i as f32 / 100.0;
            assert!((distort_phase(phase, 0.0) - phase).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distorted_phase_stays_monotonic() {
        for &amount in &[-1.0, -0.5, 0.3, 1.0] {
            let mut previous = -1.0;
            for i in 0..1000 {
                let bent = distort_phase(i as f32 / 1000.0, amount);
                assert!(bent >= previous, "phase went backwards at amount {amount}");
                assert!((0.0..=1.0).contains(&bent));
                previous = bent;
            }
        }
    }

    #[test]
    fn test_knee_maps_to_half_cycle() {
        // distortion 0.5 puts the knee at 0.25
        assert!((distort_phase(0.25, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_accumulator_wraps() {
        let mut acc = PhaseAccumulator::new();
        for _ in 0..1000 {
            let phase = acc.next(1_000.0, 48_000.0);
            assert!((0.0..1.0).contains(&phase));
        }
    }

    #[test]
    fn test_pure_sine_matches_reference() {
        let sample_rate = 48_000.0;
        let freq = 440.0;
        let mut acc = PhaseAccumulator::new();
        let samples: Vec<f32> = (0..32)
            .map(|_| phase_distortion_sine(acc.next(freq, sample_rate), 0.0))
            .collect();

        let n = 12;
        let expected = (TAU * freq * n as f32 / sample_rate).sin();
        assert!((samples[n] - expected).abs() < 1e-4);
    }
}

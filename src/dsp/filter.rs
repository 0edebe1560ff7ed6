use std::f32::consts::PI;

use crate::dsp::saturation::{sanitize, saturate, STATE_LIMIT};

/*
Korg-35 Low-Pass
================

The MS-20 style low-pass is a second-order filter built from two one-pole
low-pass stages with a resonance loop that runs back through a one-pole
HIGH-pass. Because the feedback path is high-passed, the loop does nothing
at DC: the passband gain stays at 1.0 no matter how hard the resonance is
turned up. That is also why a step input settles on the step height.

        x ──► [LPF1] ──►(+)──► alpha0 ──► sat ──► [LPF2] ──┬──► y
                         ▲                                 │
                         │                                 × K
                         └────── [HPF1] ◄──────────────────┘

Each one-pole is a TPT (topology-preserving transform) integrator, the
same trick used for the state-variable filter: bilinear transform with
the cutoff pre-warped, and the delay-free loop solved analytically through
`alpha0` instead of inserting a unit delay.

  g       = tan(pi * fc / fs)         pre-warped integrator gain
  G       = g / (1 + g)               one-pole feed-forward gain
  alpha0  = 1 / (1 - K*G + K*G^2)     loop resolution factor

Resonance K runs 0.0 .. 2.0. Near 2.0 the filter approaches
self-oscillation; the integrator states are sanitized every sample so the
output can never grow without bound.
*/

/// Lowest cutoff the coefficient calculation will accept.
pub const MIN_CUTOFF_HZ: f32 = 10.0;
/// Cutoff ceiling as a fraction of the sample rate (just under Nyquist).
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
/// Resonance at which the loop would self-oscillate.
pub const MAX_RESONANCE: f32 = 2.0;

#[derive(Debug, Clone, Copy, Default)]
struct OnePole {
    z1: f32,
}

impl OnePole {
    #[inline]
    fn lowpass(&mut self, x: f32, gain: f32) -> f32 {
        let v = (x - self.z1) * gain;
        let lp = v + self.z1;
        self.z1 = sanitize(v + lp, STATE_LIMIT);
        lp
    }

    #[inline]
    fn highpass(&mut self, x: f32, gain: f32) -> f32 {
        x - self.lowpass(x, gain)
    }

    #[inline]
    fn feedback(&self, beta: f32) -> f32 {
        beta * self.z1
    }
}

/// Coefficients derived from cutoff, resonance and sample rate.
///
/// Cheap enough to recompute every sample while a parameter is ramping.
#[derive(Debug, Clone, Copy)]
pub struct Korg35Coefficients {
    gain: f32,
    lpf2_beta: f32,
    hpf1_beta: f32,
    alpha0: f32,
    k: f32,
}

impl Korg35Coefficients {
    pub fn new(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        // At very low sample rates the Nyquist ceiling wins over the floor
        let ceiling = MAX_CUTOFF_RATIO * sample_rate;
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ.min(ceiling), ceiling);
        let k = resonance.clamp(0.0, MAX_RESONANCE);

        let g = (PI * cutoff / sample_rate).tan();
        let gain = g / (1.0 + g);

        Self {
            gain,
            lpf2_beta: (k - k * gain) / (1.0 + g),
            hpf1_beta: -1.0 / (1.0 + g),
            alpha0: 1.0 / (1.0 - k * gain + k * gain * gain),
            k,
        }
    }
}

/// One channel of Korg-35 low-pass state.
#[derive(Debug, Clone, Default)]
pub struct Korg35Lowpass {
    lpf1: OnePole,
    lpf2: OnePole,
    hpf1: OnePole,
}

impl Korg35Lowpass {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32, coeffs: &Korg35Coefficients, saturation: f32) -> f32 {
        let y1 = self.lpf1.lowpass(x, coeffs.gain);

        let s35 = self.hpf1.feedback(coeffs.hpf1_beta) + self.lpf2.feedback(coeffs.lpf2_beta);
        let u = saturate(coeffs.alpha0 * (y1 + s35), saturation);

        let y = self.lpf2.lowpass(u, coeffs.gain);
        self.hpf1.highpass(coeffs.k * y, coeffs.gain);

        y
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

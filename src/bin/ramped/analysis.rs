use rustfft::{num_complex::Complex, FftPlanner};

/// Longest window used for pitch estimation.
const MAX_FFT_SIZE: usize = 1 << 16;

#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub peak: f32,
    pub rms: f32,
    /// Strongest spectral bin, `None` for silence or very short input.
    pub dominant_hz: Option<f32>,
}

pub fn analyze(samples: &[f32], sample_rate: f32) -> Report {
    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    let rms = if samples.is_empty() {
        0.0
    } else {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    };

    Report {
        peak,
        rms,
        dominant_hz: dominant_frequency(samples, sample_rate),
    }
}

/// Frequency of the largest magnitude bin of a Hann-windowed FFT over the
/// last power-of-two run of `samples`.
pub fn dominant_frequency(samples: &[f32], sample_rate: f32) -> Option<f32> {
    if samples.len() < 64 {
        return None;
    }
    let size = prev_power_of_two(samples.len()).min(MAX_FFT_SIZE);
    let tail = &samples[samples.len() - size..];

    let mut buffer: Vec<Complex<f32>> = tail
        .iter()
        .enumerate()
        .map(|(n, &s)| Complex::new(s * hann(n, size), 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(size).process(&mut buffer);

    let (bin, magnitude) = buffer[1..size / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm()))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;

    if magnitude < 1e-6 {
        return None;
    }
    Some(bin as f32 * sample_rate / size as f32)
}

fn hann(n: usize, size: usize) -> f32 {
    0.5 - 0.5 * (std::f32::consts::TAU * n as f32 / size as f32).cos()
}

fn prev_power_of_two(n: usize) -> usize {
    1 << (usize::BITS - 1 - n.leading_zeros())
}

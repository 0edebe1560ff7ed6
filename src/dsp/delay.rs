/// Circular delay buffer with fractional reads.
///
/// The buffer is empty until [`allocate`](DelayLine::allocate) is called, so
/// nodes can size it from the sample rate they receive at init time.
#[derive(Debug, Default)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(samples: usize) -> Self {
        let mut line = Self::new();
        line.allocate(samples);
        line
    }

    /// Replace the buffer with a zeroed one holding `samples` of history.
    /// The previous allocation is dropped first.
    pub fn allocate(&mut self, samples: usize) {
        self.release();
        self.buffer = vec![0.0; samples.max(2)];
    }

    /// Drop the buffer entirely.
    pub fn release(&mut self) {
        self.buffer = Vec::new();
        self.write_pos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_allocated(&self) -> bool {
        !self.buffer.is_empty()
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read the sample written `delay` writes ago (1 = most recent).
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        if len == 0 {
            return 0.0;
        }
        let delay = delay.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Linearly interpolated read for modulated delay times.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        if len < 2 {
            return 0.0;
        }

        let delay = delay_samples.clamp(1.0, (len - 1) as f32);
        let whole = delay.floor();
        let frac = delay - whole;
        let index = whole as usize;

        let a = self.read(index);
        let b = self.read(index + 1);
        a + (b - a) * frac
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

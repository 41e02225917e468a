//! xorshift64* generator for reproducible sample datasets
//!
//! Same seed, same sequence. Sample data must be reproducible so that demo
//! dashboards and tests see identical records on every run.

/// Deterministic random number generator using xorshift64*
#[derive(Debug, Clone)]
pub struct SampleRng {
    state: u64,
}

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        // xorshift state must never be zero
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform in [low, high)
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Uniform integer in [low, high], both inclusive
    pub fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high);
        let span = (high - low) as u64 + 1;
        low + (self.next_u64() % span) as u32
    }

    /// Pick one element of a non-empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_u64() % items.len() as u64) as usize;
        &items[idx]
    }
}

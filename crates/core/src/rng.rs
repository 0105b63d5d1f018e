//! RNG module - random source used by board generation
//!
//! The generator only needs a stream of `u32`s; everything else (bounded
//! draws, Fisher-Yates shuffles, sampling without replacement) is derived from
//! that in [`RandomSource`]'s provided methods.
//!
//! [`SimpleRng`] is a small seeded LCG so that a seed reproduces a board
//! exactly, which keeps tests and replays deterministic.

/// Source of randomness consumed by the board generator
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, max)
    fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0, "next_range needs a non-empty range");
        self.next_u32() % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick `count` distinct values from `0..population`
    ///
    /// Partial Fisher-Yates: only the first `count` slots are drawn.
    fn sample_distinct(&mut self, population: u32, count: usize) -> Vec<u32>
    where
        Self: Sized,
    {
        let mut pool: Vec<u32> = (0..population).collect();
        let count = count.min(pool.len());
        for i in 0..count {
            let j = i + self.next_range((pool.len() - i) as u32) as usize;
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state; feeding it back to [`SimpleRng::new`] resumes the sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<R: RandomSource> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

//! RNG module - injectable random sources for the piece factory
//!
//! The factory only ever asks for a uniform index below a bound, so every source
//! implements [`RandomSource`]:
//!
//! - [`SimpleRng`]: seeded LCG, deterministic and dependency free
//! - [`FastRng`]: `fastrand` generator, entropy seeded unless a seed is given
//! - [`SequenceSource`]: replays a fixed list of indices, for scripted tests

/// Source of uniformly distributed indices
pub trait RandomSource {
    /// Next index in `[0, bound)`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.next_range(bound as u32) as usize
    }
}

/// `fastrand`-backed source
#[derive(Debug, Clone)]
pub struct FastRng(fastrand::Rng);

impl FastRng {
    /// Entropy-seeded generator
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.usize(..bound)
    }
}

/// Replays a fixed list of indices, wrapping each into the requested bound and
/// cycling back to the start when exhausted. An empty list always yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.values.is_empty() || bound == 0 {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value % bound
    }
}

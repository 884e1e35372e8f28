//! Random sources consumed by the carver and the solver
//!
//! The algorithms never touch a global generator: every session borrows a
//! [`RandomSource`] from its caller, so a deterministic source gives
//! reproducible mazes and paths.
//!
//! [`SimpleLcg`] is a Park-Miller Linear Congruential Generator (MINSTD):
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Uniform choice among a non-empty set of candidates
pub trait RandomSource {
    /// Index in `[0, len)`; `len` is never zero
    fn choose_index(&mut self, len: usize) -> usize;

    /// Pick one element of a non-empty slice uniformly at random
    fn choose_one<'a, T>(&mut self, candidates: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        debug_assert!(!candidates.is_empty(), "choose_one on empty candidates");
        &candidates[self.choose_index(candidates.len())]
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

/// Always picks the first candidate
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl RandomSource for FirstCandidate {
    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Generates a deterministic sequence of pseudo-random numbers from a seed.
/// Same seed always produces the same sequence on every platform.
#[derive(Clone, Debug)]
pub struct SimpleLcg {
    state: u32,
}

impl SimpleLcg {
    const A: u64 = 48271;
    const M: u64 = 2147483647; // 2^31 - 1

    /// Create a new LCG with the given seed
    ///
    /// Seeds are reduced modulo `m`; a zero state is replaced with 1
    /// to avoid the degenerate sequence
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % Self::M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) {
        // u64 avoids overflow during multiplication
        self.state = ((self.state as u64 * Self::A) % Self::M) as u32;
    }

    /// Generate random integer in range [a, b] (inclusive)
    ///
    /// Pure integer arithmetic, no floating point
    pub fn randint(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(a <= b);
        self.advance();

        // a + (state * (b - a + 1)) / M
        let range = (b - a + 1) as u64;
        let scaled = (self.state as u64 * range) / Self::M;
        a + scaled as usize
    }

    /// Choose random index from a range [0, len)
    pub fn choice_index(&mut self, len: usize) -> usize {
        self.advance();

        // state < M, so the result is always < len
        let scaled = (self.state as u64 * len as u64) / Self::M;
        scaled as usize
    }
}

impl RandomSource for SimpleLcg {
    fn choose_index(&mut self, len: usize) -> usize {
        self.choice_index(len)
    }
}

/// Adapter for any `rand` generator
#[cfg(feature = "rand")]
#[derive(Clone, Debug)]
pub struct RandSource<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::Rng> RandomSource for RandSource<R> {
    fn choose_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

//! Random sampling of arrangements.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use super::Generate;
use crate::{Alphabet, Arrangement, Symbol};

/// SplitMix64 finalizer; scrambles nearby inputs into unrelated outputs.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Derives the seed of the given worker from `base`, or from the system clock if `base` is
/// `None`. Workers always receive different seeds for the same base.
#[must_use]
pub fn worker_seed(base: Option<u64>, worker: usize) -> u64 {
    let base = base.unwrap_or_else(clock_seed);
    let seed = mix(base ^ mix(worker as u64));
    log::trace!("Worker {} sampling with seed {}", worker, seed);
    seed
}

/// Produces independent uniformly random arrangements, possibly repeating.
///
/// Each call shuffles the same buffer in place, so it never allocates and never runs out.
#[derive(Debug, Clone)]
pub struct Sampling<R = ChaChaRng> {
    symbols: Vec<Symbol>,
    disks_count: usize,
    rng: R,
}

impl Sampling<ChaChaRng> {
    /// Constructs a sampler of `disks_count`-long arrangements of `alphabet` seeded with `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `disks_count` is lower than the stripe length.
    #[must_use]
    pub fn new(alphabet: Alphabet, disks_count: usize, seed: u64) -> Self {
        Self::with_rng(alphabet, disks_count, ChaChaRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampling<R> {
    /// Constructs a sampler drawing random numbers from `rng`.
    ///
    /// # Panics
    ///
    /// Panics if `disks_count` is lower than the stripe length.
    pub fn with_rng(alphabet: Alphabet, disks_count: usize, rng: R) -> Self {
        let symbols = alphabet.symbols();
        assert!(
            symbols.len() <= disks_count,
            "stripe of length {} does not fit on {} disks",
            symbols.len(),
            disks_count
        );
        Self {
            symbols,
            disks_count,
            rng,
        }
    }

    /// Shuffles and returns the next random stripe (without padding).
    pub fn sample(&mut self) -> &[Symbol] {
        self.symbols.shuffle(&mut self.rng);
        &self.symbols
    }
}

impl<R: Rng> Generate for Sampling<R> {
    fn next_into(&mut self, arrangement: &mut Arrangement) -> bool {
        let disks_count = self.disks_count;
        let stripe = self.sample();
        for disk in 0..disks_count {
            arrangement[disk] = stripe.get(disk).copied().unwrap_or(Symbol::Padding);
        }
        true
    }
}

impl<R: Rng> Iterator for Sampling<R> {
    type Item = Arrangement;
    fn next(&mut self) -> Option<Arrangement> {
        let mut arrangement = Arrangement::padding(self.disks_count);
        self.next_into(&mut arrangement);
        Some(arrangement)
    }
}

//! Search for declustered stripe layouts minimizing reconstruction load imbalance.
//!
//! A stripe consists of one empty slot (`E`), one global parity slot (`G`), and `group_len`
//! members of each of `groups_count` parity groups. The stripe is laid out over `disks_count`
//! disks and rotated by one disk at a time. For each rotation, one disk fails and the surviving
//! disks read whatever is needed to reconstruct it. The search looks for the arrangements whose
//! resulting per-disk read load is the most balanced.
//!
//! The pipeline is: [`Exhaustive`] or [`Sampling`] generator → [`LoadEvaluator`] → optional
//! [`LocalParityPlacer`] → [`Tracker`], driven by [`Search`] (single worker) or [`search`]
//! (multiple workers merged at the end).

#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::cast_precision_loss
)]
#![deny(unsafe_code)]

mod array;
mod config;
mod evaluator;
pub mod generator;
mod local_parity;
mod parallel;
mod progress;
mod report;
mod search;
mod symbol;
mod tracker;

pub use config::{Dimension, SearchBuilder, SearchConfig};
pub use evaluator::LoadEvaluator;
pub use generator::{Exhaustive, Generate, Mode, Sampling};
pub use local_parity::LocalParityPlacer;
pub use parallel::search;
pub use progress::{Progress, Silent, Snapshot};
pub use report::{render_stripe, Report, Row};
pub use search::{CancellationToken, Outcome, Search, State, StopReason};
pub use symbol::{Alphabet, GroupId, Symbol};
pub use tracker::{Consideration, Objective, Tracker};

/// Error type encompassing all configuration and search errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There must be at least one parity group.
    #[error("There must be at least one parity group.")]
    ZeroGroups,
    /// Every parity group must have at least one member.
    #[error("Every parity group must have at least one member.")]
    ZeroGroupLength,
    /// The stripe does not fit on the available disks.
    #[error("Stripe of length {stripe_len} does not fit on {disks_count} disks.")]
    StripeTooLong {
        /// Length of the stripe: `groups_count * group_len + 2`.
        stripe_len: usize,
        /// Number of available disks.
        disks_count: usize,
    },
    /// There must be at least one worker.
    #[error("There must be at least one worker.")]
    ZeroWorkers,
    /// Worker index is not lower than the number of workers.
    #[error("Worker {worker} out of range for {workers} workers.")]
    WorkerOutOfRange {
        /// Requested worker index.
        worker: usize,
        /// Number of workers.
        workers: usize,
    },
    /// Progress cannot be reported every 0 iterations.
    #[error("Progress interval must be positive.")]
    ZeroProgressInterval,
    /// Worker thread pool could not be created.
    #[error("Unable to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias using [`Error`](enum.Error.html).
pub type Result<T> = std::result::Result<T, Error>;

array_wrapper!(
    LoadVector,
    u32,
    "Extra reads absorbed by each disk over all single-failure rotations."
);
array_wrapper!(
    Arrangement,
    Symbol,
    "Symbols assigned to consecutive disks; positions past the stripe hold padding."
);

impl LoadVector {
    /// Vector of `disks_count` zeroes.
    #[must_use]
    pub fn zeros(disks_count: usize) -> Self {
        Self(ndarray::Array1::zeros(disks_count))
    }

    /// Highest load, or 0 if empty.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.iter().copied().max().unwrap_or(0)
    }

    /// Lowest load, or 0 if empty.
    #[must_use]
    pub fn min(&self) -> u32 {
        self.iter().copied().min().unwrap_or(0)
    }

    /// Sum of all loads.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.iter().map(|&load| u64::from(load)).sum()
    }
}

impl Arrangement {
    /// Arrangement of `disks_count` padding symbols.
    #[must_use]
    pub fn padding(disks_count: usize) -> Self {
        Self(ndarray::Array1::from_elem(disks_count, Symbol::Padding))
    }

    /// Position of the global parity symbol.
    #[must_use]
    pub fn global_parity(&self) -> Option<usize> {
        self.iter().position(|&s| s == Symbol::GlobalParity)
    }
}

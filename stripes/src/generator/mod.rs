//! Producers of stripe arrangements.

use crate::{Arrangement, SearchConfig};
use serde::{Deserialize, Serialize};

pub mod exhaustive;
pub mod sampling;

pub use exhaustive::Exhaustive;
pub use sampling::Sampling;

/// Type of arrangement generator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::ToString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// See [`Exhaustive`].
    Exhaustive,
    /// See [`Sampling`].
    Sampling,
}

/// Implementors produce stripe arrangements one at a time.
pub trait Generate {
    /// Overwrites `arrangement` with the next arrangement.
    ///
    /// Returns `false` if there are no more arrangements, in which case `arrangement` is left
    /// untouched.
    fn next_into(&mut self, arrangement: &mut Arrangement) -> bool;
}

/// Constructs the generator of the given worker, as requested by `config`.
///
/// Exhaustive workers enumerate disjoint partitions of all arrangements, while sampling workers
/// use independent seeds.
#[must_use]
pub fn generator(config: &SearchConfig, worker: usize) -> Box<dyn Generate + Send> {
    let alphabet = config.alphabet();
    match config.mode {
        Mode::Exhaustive => Box::new(
            Exhaustive::new(alphabet, config.disks_count).partition(worker, config.workers),
        ),
        Mode::Sampling => Box::new(Sampling::new(
            alphabet,
            config.disks_count,
            sampling::worker_seed(config.seed, worker),
        )),
    }
}

//! Reconstruction load model.

use crate::{Arrangement, LoadVector, Symbol};

/// Computes how many extra reads each disk performs when reconstructing a failed disk.
///
/// The arrangement is repeated `disks_count` times, each repetition shifted by `stripe_len`
/// disks, which makes every stripe slot land on every disk once when the two are coprime.
/// In each repetition (window), the slot placed on physical disk 0 is the failed one:
///
/// * if it is a group member, every other member of the same group is read;
/// * if it is the global parity, every other non-empty slot is read;
/// * otherwise (empty slot or padding), nothing is read.
///
/// Each read adds one to the load of the physical disk serving it.
#[derive(Debug, Clone, Copy)]
pub struct LoadEvaluator {
    disks_count: usize,
    stripe_len: usize,
}

impl LoadEvaluator {
    /// Constructs an evaluator for stripes of length `stripe_len` over `disks_count` disks.
    ///
    /// # Panics
    ///
    /// Panics if `stripe_len > disks_count`.
    #[must_use]
    pub fn new(disks_count: usize, stripe_len: usize) -> Self {
        assert!(
            stripe_len <= disks_count,
            "stripe of length {} does not fit on {} disks",
            stripe_len,
            disks_count
        );
        Self {
            disks_count,
            stripe_len,
        }
    }

    /// Index of the slot failing in the window starting at `pos`.
    fn failed_slot(&self, pos: usize) -> usize {
        let disks = self.disks_count;
        disks - ((pos + disks - 1) % disks + 1)
    }

    /// Writes the per-disk loads of `arrangement` into `loads`, overwriting its contents.
    ///
    /// Both vectors must have `disks_count` elements.
    pub fn evaluate(&self, arrangement: &Arrangement, loads: &mut LoadVector) {
        debug_assert_eq!(arrangement.len(), self.disks_count);
        debug_assert_eq!(loads.len(), self.disks_count);
        loads.vec_mut().fill(0);
        for window in 0..self.disks_count {
            let pos = window * self.stripe_len;
            let failed_slot = self.failed_slot(pos);
            let failed = arrangement[failed_slot];
            for slot in (0..self.stripe_len).filter(|&slot| slot != failed_slot) {
                let source = arrangement[slot];
                let read = match failed {
                    Symbol::Group(_) => source == failed,
                    Symbol::GlobalParity => source != Symbol::Empty,
                    _ => false,
                };
                if read {
                    loads[(pos + slot) % self.disks_count] += 1;
                }
            }
        }
    }

    /// Returns a fresh vector with the per-disk loads of `arrangement`.
    #[must_use]
    pub fn loads(&self, arrangement: &Arrangement) -> LoadVector {
        let mut loads = LoadVector::zeros(self.disks_count);
        self.evaluate(arrangement, &mut loads);
        loads
    }
}

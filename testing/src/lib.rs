//! Reference helpers shared by the tests of the workspace crates.

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

use std::collections::BTreeSet;

use itertools::Itertools;

/// Brute-force set of all distinct permutations of `items`.
///
/// This materializes all `n!` permutations before deduplicating them, so it is only meant for
/// checking generators on inputs of at most a handful of elements.
pub fn distinct_permutations<T: Clone + Ord>(items: &[T]) -> BTreeSet<Vec<T>> {
    items
        .iter()
        .cloned()
        .permutations(items.len())
        .collect()
}

/// Returns a sorted copy of `items`, so that two multisets can be compared with `assert_eq!`.
pub fn sorted<T, I>(items: I) -> Vec<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    items.into_iter().sorted().collect()
}

/// Greatest common divisor.
#[must_use]
pub fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

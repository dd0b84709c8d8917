//! Loopless enumeration of multiset permutations by prefix shifts.
//!
//! The symbols are kept in a singly linked list stored in an arena. Each step unlinks one node
//! and moves it to the front of the list, so producing the next permutation takes constant time
//! regardless of the stripe length. Starting from the non-increasing order, the sequence visits
//! every distinct permutation of the multiset exactly once.
//!
//! See: Aaron Williams. "Loopless generation of multiset permutations using a constant number of
//! variables by prefix shifts." SODA 2009.

use super::Generate;
use crate::{Alphabet, Arrangement, Symbol};

#[derive(Debug, Clone, Copy)]
struct Node {
    symbol: Symbol,
    next: Option<usize>,
}

/// Disjoint slice of the enumeration: every `workers`-th arrangement starting at `worker`.
#[derive(Debug, Clone, Copy)]
struct Partition {
    worker: usize,
    workers: usize,
}

/// Enumerates all distinct arrangements of an alphabet, each exactly once.
#[derive(Debug, Clone)]
pub struct Exhaustive {
    nodes: Vec<Node>,
    head: usize,
    i: usize,
    /// Successor of `i`; `None` once the enumeration is exhausted.
    after_i: Option<usize>,
    started: bool,
    /// Index of the current arrangement in the enumeration.
    index: usize,
    partition: Partition,
    disks_count: usize,
}

impl Exhaustive {
    /// Constructs a generator of `disks_count`-long arrangements of `alphabet`.
    ///
    /// # Panics
    ///
    /// Panics if `disks_count` is lower than the stripe length.
    #[must_use]
    pub fn new(alphabet: Alphabet, disks_count: usize) -> Self {
        let symbols = alphabet.symbols();
        let len = symbols.len();
        assert!(
            len <= disks_count,
            "stripe of length {} does not fit on {} disks",
            len,
            disks_count
        );
        let nodes = symbols
            .into_iter()
            .enumerate()
            .map(|(idx, symbol)| Node {
                symbol,
                next: if idx + 1 < len { Some(idx + 1) } else { None },
            })
            .collect();
        // Symbols are in non-increasing order, ending with `G` and `E`.
        Self {
            nodes,
            head: 0,
            i: len - 2,
            after_i: Some(len - 1),
            started: false,
            index: 0,
            partition: Partition {
                worker: 0,
                workers: 1,
            },
            disks_count,
        }
    }

    /// Restricts the generator to arrangements with index `j` such that `j % workers == worker`.
    ///
    /// # Panics
    ///
    /// Panics if `worker >= workers`.
    #[must_use]
    pub fn partition(mut self, worker: usize, workers: usize) -> Self {
        assert!(
            worker < workers,
            "worker {} out of bounds for {} workers",
            worker,
            workers
        );
        self.partition = Partition { worker, workers };
        self
    }

    fn rank(&self, node: usize) -> i32 {
        self.nodes[node].symbol.rank()
    }

    /// Moves to the next permutation. Returns `None` once all have been visited.
    fn advance(&mut self) -> Option<()> {
        if !self.started {
            self.started = true;
            return Some(());
        }
        let after_i = self.after_i?;
        let after_next = self.nodes[after_i].next;
        if after_next.is_none() && self.rank(after_i) >= self.rank(self.head) {
            self.after_i = None;
            return None;
        }
        let before_k = match after_next {
            Some(next) if self.rank(self.i) >= self.rank(next) => after_i,
            _ => self.i,
        };
        let k = self.nodes[before_k].next?;
        self.nodes[before_k].next = self.nodes[k].next;
        self.nodes[k].next = Some(self.head);
        if self.rank(k) < self.rank(self.head) {
            self.i = k;
        }
        self.after_i = self.nodes[self.i].next;
        self.head = k;
        self.index += 1;
        Some(())
    }

    fn fill(&self, arrangement: &mut Arrangement) {
        let mut node = Some(self.head);
        for disk in 0..self.disks_count {
            arrangement[disk] = match node {
                Some(idx) => {
                    node = self.nodes[idx].next;
                    self.nodes[idx].symbol
                }
                None => Symbol::Padding,
            };
        }
    }
}

impl Generate for Exhaustive {
    fn next_into(&mut self, arrangement: &mut Arrangement) -> bool {
        let Partition { worker, workers } = self.partition;
        while self.advance().is_some() {
            if self.index % workers == worker {
                self.fill(arrangement);
                return true;
            }
        }
        false
    }
}

impl Iterator for Exhaustive {
    type Item = Arrangement;
    fn next(&mut self) -> Option<Arrangement> {
        let mut arrangement = Arrangement::padding(self.disks_count);
        if self.next_into(&mut arrangement) {
            Some(arrangement)
        } else {
            None
        }
    }
}

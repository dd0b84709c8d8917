//! Stripe symbols and the fixed multiset (alphabet) every arrangement is drawn from.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Parity group identifier. Groups are numbered from 1.
pub type GroupId = u16;

/// Added to the rank of a group tagged as local parity; greater than any group ID.
const LOCAL_PARITY_RANK_OFFSET: i32 = 1 << 16;

/// The role of a single disk within a stripe.
///
/// Symbols are ordered by [`Symbol::rank`], which is also the order the exhaustive generator
/// enumerates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Unused slot.
    Empty,
    /// Whole-stripe parity.
    GlobalParity,
    /// Member of a parity group.
    Group(GroupId),
    /// Member of a parity group that also hosts the group's local parity.
    LocalParity(GroupId),
    /// Disk outside of the stripe.
    Padding,
}

impl Symbol {
    /// Integer rank of the symbol: `E < G < padding < 1 < 2 < ... < S1 < S2 < ...`.
    #[must_use]
    pub fn rank(self) -> i32 {
        match self {
            Self::Empty => -2,
            Self::GlobalParity => -1,
            Self::Padding => 0,
            Self::Group(group) => i32::from(group),
            Self::LocalParity(group) => i32::from(group) + LOCAL_PARITY_RANK_OFFSET,
        }
    }

    /// Returns the group ID if this is a plain group member.
    #[must_use]
    pub fn group(self) -> Option<GroupId> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Whether the symbol is drawn from the alphabet, i.e., it is not padding.
    #[must_use]
    pub fn is_stripe(self) -> bool {
        self != Self::Padding
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "E"),
            Self::GlobalParity => write!(f, "G"),
            Self::Group(group) => write!(f, "{}", group),
            Self::LocalParity(group) => write!(f, "S{}", group),
            Self::Padding => write!(f, "0"),
        }
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The multiset of symbols making up one stripe: one [`Symbol::Empty`], one
/// [`Symbol::GlobalParity`], and `group_len` copies of each of the `groups_count` groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    groups_count: GroupId,
    group_len: u16,
}

impl Alphabet {
    /// Constructs the alphabet for `groups_count` groups of `group_len` disks each.
    #[must_use]
    pub fn new(groups_count: GroupId, group_len: u16) -> Self {
        Self {
            groups_count,
            group_len,
        }
    }

    /// Number of parity groups.
    #[must_use]
    pub fn groups_count(&self) -> usize {
        usize::from(self.groups_count)
    }

    /// Number of disks in each group.
    #[must_use]
    pub fn group_len(&self) -> usize {
        usize::from(self.group_len)
    }

    /// Number of symbols in the alphabet: all group members plus the two markers.
    #[must_use]
    pub fn stripe_len(&self) -> usize {
        self.groups_count() * self.group_len() + 2
    }

    /// Iterates over group IDs `1..=groups_count`.
    #[must_use]
    pub fn groups(&self) -> std::ops::RangeInclusive<GroupId> {
        1..=self.groups_count
    }

    /// All symbols of the alphabet in non-increasing rank order:
    /// the highest group first and `E` last.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let group_len = self.group_len();
        self.groups()
            .rev()
            .flat_map(|group| std::iter::repeat(Symbol::Group(group)).take(group_len))
            .chain(vec![Symbol::GlobalParity, Symbol::Empty])
            .collect()
    }

    /// Number of distinct permutations of the alphabet:
    /// `stripe_len! / (group_len!)^groups_count`.
    ///
    /// Factors of `group_len!` are divided out as soon as they divide the running factorial, which
    /// keeps the intermediate values small. Returns `None` if the count does not fit in `u128`.
    #[must_use]
    pub fn distinct_permutations(&self) -> Option<u128> {
        let group_len_fac = (2..=self.group_len() as u128)
            .try_fold(1_u128, |acc, factor| acc.checked_mul(factor))?;
        let mut remaining = self.groups_count();
        let mut count = 1_u128;
        for factor in 2..=self.stripe_len() as u128 {
            count = count.checked_mul(factor)?;
            while remaining > 0 && count % group_len_fac == 0 {
                remaining -= 1;
                count /= group_len_fac;
            }
        }
        Some(count)
    }

    /// Checks whether the non-padding symbols of `symbols` form exactly this alphabet.
    #[must_use]
    pub fn is_permutation(&self, symbols: &[Symbol]) -> bool {
        let mut actual: Vec<_> = symbols.iter().copied().filter(|s| s.is_stripe()).collect();
        let mut expected = self.symbols();
        actual.sort();
        expected.sort();
        actual == expected
    }
}

//! Tracking of the best arrangements found by a search.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::{Arrangement, LoadVector};

/// Metric minimized by the search.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::ToString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Highest load of any disk.
    Max,
    /// Difference between the highest and the lowest load.
    Spread,
}

impl Objective {
    /// Computes the objective value of `loads`.
    #[must_use]
    pub fn score(self, loads: &LoadVector) -> u32 {
        match self {
            Self::Max => loads.max(),
            Self::Spread => loads.max() - loads.min(),
        }
    }

    /// Lowest value worth looking for: once reached, the search may stop early.
    #[must_use]
    pub fn floor(self) -> u32 {
        match self {
            Self::Max => 1,
            Self::Spread => 0,
        }
    }
}

/// What happened to the arrangement passed to [`Tracker::consider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consideration {
    /// Strictly better than all previous ones; replaced the result set.
    Improved,
    /// As good as the best; added to the result set.
    Tied,
    /// Worse than the best; dropped.
    Rejected,
}

/// Keeps the best objective value seen so far along with the arrangements reaching it.
#[derive(Debug, Clone)]
pub struct Tracker {
    objective: Objective,
    best: u32,
    tied: usize,
    retain: Option<usize>,
    entries: Vec<(LoadVector, Arrangement)>,
}

impl Tracker {
    /// Constructs an empty tracker. The initial best is `disks_count`, which no arrangement
    /// can exceed, so the first one considered is always recorded.
    #[must_use]
    pub fn new(objective: Objective, disks_count: usize) -> Self {
        Self {
            objective,
            best: u32::try_from(disks_count).unwrap_or(u32::MAX),
            tied: 0,
            retain: None,
            entries: Vec::new(),
        }
    }

    /// Keeps at most `limit` entries in memory. Ties past the limit are still counted.
    #[must_use]
    pub fn retain(mut self, limit: Option<usize>) -> Self {
        self.retain = limit;
        self
    }

    /// Objective used to score arrangements.
    #[must_use]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Best objective value seen so far.
    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Number of arrangements reaching the best value, including those not retained.
    #[must_use]
    pub fn tied(&self) -> usize {
        self.tied
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tied == 0
    }

    /// Retained load vectors and arrangements, in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[(LoadVector, Arrangement)] {
        &self.entries
    }

    /// Whether the floor of the objective has been reached by at least `target` arrangements.
    #[must_use]
    pub fn reached(&self, target: usize) -> bool {
        !self.is_empty() && self.best <= self.objective.floor() && self.tied >= target
    }

    fn has_room(&self) -> bool {
        self.retain.map_or(true, |limit| self.entries.len() < limit)
    }

    /// Scores `loads` and records the pair if it is at least as good as the best.
    pub fn consider(&mut self, arrangement: &Arrangement, loads: &LoadVector) -> Consideration {
        let score = self.objective.score(loads);
        if score < self.best {
            self.best = score;
            self.tied = 1;
            self.entries.clear();
            if self.has_room() {
                self.entries.push((loads.clone(), arrangement.clone()));
            }
            Consideration::Improved
        } else if score == self.best {
            self.tied += 1;
            if self.has_room() {
                self.entries.push((loads.clone(), arrangement.clone()));
            }
            Consideration::Tied
        } else {
            Consideration::Rejected
        }
    }

    /// Combines the results of two trackers as if all arrangements were considered by one.
    ///
    /// Entries of `self` come first. The retain limit of `self` applies.
    pub fn merge(&mut self, other: Self) {
        if other.is_empty() || other.best > self.best {
            return;
        }
        if other.best < self.best || self.is_empty() {
            self.best = other.best;
            self.tied = 0;
            self.entries.clear();
        }
        self.tied += other.tied;
        for entry in other.entries {
            if !self.has_room() {
                break;
            }
            self.entries.push(entry);
        }
    }
}

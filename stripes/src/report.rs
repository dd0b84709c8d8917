//! Final report of a search.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::{Arrangement, Outcome, SearchConfig, StopReason};

/// Renders the symbols of all disks as one string, e.g. `11GE0`.
#[must_use]
pub fn render_stripe(arrangement: &Arrangement) -> String {
    arrangement.iter().map(ToString::to_string).collect()
}

/// One of the best arrangements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Per-disk loads.
    pub loads: Vec<u32>,
    /// Rendered arrangement.
    pub stripe: String,
}

/// Final results of a search, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Configuration the search ran with.
    pub config: SearchConfig,
    /// Best objective value.
    pub best: u32,
    /// Number of arrangements reaching the best value.
    pub tied: usize,
    /// Number of arrangements evaluated.
    pub iterations: u64,
    /// Why the search stopped.
    pub reason: StopReason,
    /// Up to `limit` of the retained best arrangements.
    pub rows: Vec<Row>,
}

impl Report {
    /// Collects the report of `outcome`, listing at most `limit` arrangements.
    #[must_use]
    pub fn new(config: &SearchConfig, outcome: &Outcome, limit: usize) -> Self {
        let rows = outcome
            .tracker
            .entries()
            .iter()
            .take(limit)
            .map(|(loads, arrangement)| Row {
                loads: loads.to_vec(),
                stripe: render_stripe(arrangement),
            })
            .collect();
        Self {
            config: config.clone(),
            best: outcome.tracker.best(),
            tied: outcome.tracker.tied(),
            iterations: outcome.iterations,
            reason: outcome.reason,
            rows,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} with {}={}",
            self.tied,
            self.config.objective.to_string(),
            self.best
        )?;
        for row in &self.rows {
            writeln!(f, "{}\t{}", row.loads.iter().join(" "), row.stripe)?;
        }
        Ok(())
    }
}

//! Search configuration and its builder.

use crate::{Alphabet, Error, GroupId, Mode, Objective, Result};
use serde::{Deserialize, Serialize};

/// Default number of iterations between two progress snapshots.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Dimension of a layout problem.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Number of disks the stripe is rotated over.
    pub disks_count: usize,
    /// Number of parity groups in a stripe.
    pub groups_count: GroupId,
    /// Number of members in each parity group.
    pub group_len: u16,
}

/// Validated parameters of a single search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of disks the stripe is rotated over.
    pub disks_count: usize,
    /// Number of parity groups in a stripe.
    pub groups_count: GroupId,
    /// Number of members in each parity group.
    pub group_len: u16,
    /// Minimized metric.
    pub objective: Objective,
    /// How arrangements are produced.
    pub mode: Mode,
    /// Stop once the objective reaches its floor and this many arrangements tie for it.
    pub target: Option<usize>,
    /// Number of independent workers.
    pub workers: usize,
    /// Whether to assign local parity to the most loaded member of each group.
    pub local_parity: bool,
    /// Maximum number of iterations of each worker.
    pub max_iterations: Option<u64>,
    /// Base seed for sampling; derived from the clock if missing.
    pub seed: Option<u64>,
    /// Maximum number of tied arrangements kept in memory by each worker.
    pub retain: Option<usize>,
    /// Number of iterations between two progress snapshots.
    pub progress_interval: u64,
}

impl SearchConfig {
    /// Symbols a stripe is made of.
    #[must_use]
    pub fn alphabet(&self) -> Alphabet {
        Alphabet::new(self.groups_count, self.group_len)
    }

    /// Number of symbols in a stripe.
    #[must_use]
    pub fn stripe_len(&self) -> usize {
        self.alphabet().stripe_len()
    }

    /// Checks the relationships between the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the counts is zero or the stripe is longer than the number of
    /// disks.
    pub fn validate(&self) -> Result<()> {
        if self.groups_count == 0 {
            return Err(Error::ZeroGroups);
        }
        if self.group_len == 0 {
            return Err(Error::ZeroGroupLength);
        }
        if self.workers == 0 {
            return Err(Error::ZeroWorkers);
        }
        if self.progress_interval == 0 {
            return Err(Error::ZeroProgressInterval);
        }
        let stripe_len = self.stripe_len();
        if stripe_len > self.disks_count {
            return Err(Error::StripeTooLong {
                stripe_len,
                disks_count: self.disks_count,
            });
        }
        Ok(())
    }
}

/// Builds the configuration of a search.
#[derive(Debug, Clone)]
pub struct SearchBuilder {
    dimension: Dimension,
    objective: Option<Objective>,
    mode: Option<Mode>,
    target: Option<usize>,
    workers: Option<usize>,
    local_parity: Option<bool>,
    max_iterations: Option<u64>,
    seed: Option<u64>,
    retain: Option<usize>,
    progress_interval: Option<u64>,
}

macro_rules! builder_property {
    ($prop:ident, $t:ty, $doc:literal) => {
        #[doc = $doc]
        pub fn $prop(&mut self, $prop: $t) -> &mut Self {
            self.$prop = Some($prop);
            self
        }
    };
}

impl SearchBuilder {
    /// Initializes a builder for a problem of the given dimension.
    ///
    /// # Defaults
    ///
    /// By default, the search minimizes the maximum load by enumerating all arrangements in a
    /// single worker, without local parity, and runs until the enumeration is exhausted.
    #[must_use]
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            objective: None,
            mode: None,
            target: None,
            workers: None,
            local_parity: None,
            max_iterations: None,
            seed: None,
            retain: None,
            progress_interval: None,
        }
    }

    builder_property!(objective, Objective, "Sets the minimized metric.");
    builder_property!(mode, Mode, "Sets the arrangement generator.");
    builder_property!(
        target,
        usize,
        "Sets the number of tied optimal results to stop at."
    );
    builder_property!(workers, usize, "Sets the number of workers.");
    builder_property!(
        local_parity,
        bool,
        "Enables or disables local parity placement."
    );
    builder_property!(
        max_iterations,
        u64,
        "Sets the iteration budget of each worker."
    );
    builder_property!(seed, u64, "Sets the base sampling seed.");
    builder_property!(
        retain,
        usize,
        "Caps the number of tied results kept by each worker."
    );
    builder_property!(
        progress_interval,
        u64,
        "Sets the number of iterations between progress snapshots."
    );

    /// Returns the validated configuration.
    ///
    /// # Errors
    ///
    /// See [`SearchConfig::validate`].
    pub fn build(&self) -> Result<SearchConfig> {
        let Dimension {
            disks_count,
            groups_count,
            group_len,
        } = self.dimension;
        let config = SearchConfig {
            disks_count,
            groups_count,
            group_len,
            objective: self.objective.unwrap_or(Objective::Max),
            mode: self.mode.unwrap_or(Mode::Exhaustive),
            target: self.target,
            workers: self.workers.unwrap_or(1),
            local_parity: self.local_parity.unwrap_or(false),
            max_iterations: self.max_iterations,
            seed: self.seed,
            retain: self.retain,
            progress_interval: self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dimension(disks_count: usize, groups_count: GroupId, group_len: u16) -> Dimension {
        Dimension {
            disks_count,
            groups_count,
            group_len,
        }
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = SearchBuilder::new(dimension(15, 3, 4)).build()?;
        assert_eq!(config.stripe_len(), 14);
        assert_eq!(config.objective, Objective::Max);
        assert_eq!(config.mode, Mode::Exhaustive);
        assert_eq!(config.workers, 1);
        assert_eq!(config.target, None);
        assert!(!config.local_parity);
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
        Ok(())
    }

    #[test]
    fn test_properties() -> Result<()> {
        let config = SearchBuilder::new(dimension(6, 1, 2))
            .objective(Objective::Spread)
            .mode(Mode::Sampling)
            .target(3)
            .workers(4)
            .local_parity(true)
            .max_iterations(100)
            .seed(17)
            .retain(10)
            .progress_interval(5)
            .build()?;
        assert_eq!(config.objective, Objective::Spread);
        assert_eq!(config.mode, Mode::Sampling);
        assert_eq!(config.target, Some(3));
        assert_eq!(config.workers, 4);
        assert!(config.local_parity);
        assert_eq!(config.max_iterations, Some(100));
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.retain, Some(10));
        assert_eq!(config.progress_interval, 5);
        Ok(())
    }

    #[test]
    fn test_stripe_too_long() {
        match SearchBuilder::new(dimension(13, 3, 4)).build() {
            Err(Error::StripeTooLong {
                stripe_len,
                disks_count,
            }) => {
                assert_eq!(stripe_len, 14);
                assert_eq!(disks_count, 13);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_stripe_fills_all_disks() {
        assert!(SearchBuilder::new(dimension(4, 1, 2)).build().is_ok());
    }

    #[test]
    fn test_zero_counts() {
        assert!(matches!(
            SearchBuilder::new(dimension(6, 0, 2)).build(),
            Err(Error::ZeroGroups)
        ));
        assert!(matches!(
            SearchBuilder::new(dimension(6, 1, 0)).build(),
            Err(Error::ZeroGroupLength)
        ));
        assert!(matches!(
            SearchBuilder::new(dimension(6, 1, 2)).workers(0).build(),
            Err(Error::ZeroWorkers)
        ));
        assert!(matches!(
            SearchBuilder::new(dimension(6, 1, 2))
                .progress_interval(0)
                .build(),
            Err(Error::ZeroProgressInterval)
        ));
    }

    #[test]
    fn test_serialize() -> Result<()> {
        let config = SearchBuilder::new(dimension(6, 1, 2)).build()?;
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""objective":"max""#));
        assert!(json.contains(r#""mode":"exhaustive""#));
        let parsed: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        Ok(())
    }
}

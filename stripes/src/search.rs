//! Single-worker search driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::generator::{self, Generate};
use crate::{
    Arrangement, Consideration, Error, LoadEvaluator, LoadVector, LocalParityPlacer, Progress,
    Result, SearchConfig, Snapshot, Tracker,
};

/// Shared flag telling all workers to stop at their next iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Constructs a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Cannot be undone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a search stopped.
///
/// When outcomes of several workers are merged, the greatest reason wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::ToString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// All arrangements were visited.
    Exhausted,
    /// The objective floor was reached by the requested number of arrangements.
    TargetReached,
    /// The iteration budget was used up.
    BudgetExhausted,
    /// The cancellation token was set.
    Cancelled,
}

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// More iterations can be done.
    Running,
    /// Terminal state.
    Stopped(StopReason),
}

/// Results of a finished search.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Best arrangements found.
    pub tracker: Tracker,
    /// Number of arrangements evaluated.
    pub iterations: u64,
    /// Why the search stopped.
    pub reason: StopReason,
}

impl Outcome {
    /// Folds the outcome of another worker into this one.
    pub fn merge(&mut self, other: Self) {
        self.tracker.merge(other.tracker);
        self.iterations += other.iterations;
        self.reason = self.reason.max(other.reason);
    }
}

/// Drives a single worker: pulls arrangements from a generator, evaluates them, optionally
/// places local parity, and tracks the best ones.
pub struct Search<'a> {
    worker: usize,
    generator: Box<dyn Generate + Send>,
    evaluator: LoadEvaluator,
    placer: Option<LocalParityPlacer>,
    tracker: Tracker,
    arrangement: Arrangement,
    loads: LoadVector,
    iterations: u64,
    reported: u64,
    target: Option<usize>,
    max_iterations: Option<u64>,
    progress_interval: u64,
    state: State,
    token: CancellationToken,
    progress: &'a dyn Progress,
}

impl<'a> Search<'a> {
    /// Constructs the driver of `worker` out of `config.workers`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or `worker` is out of range.
    pub fn new(
        config: &SearchConfig,
        worker: usize,
        token: CancellationToken,
        progress: &'a dyn Progress,
    ) -> Result<Self> {
        config.validate()?;
        if worker >= config.workers {
            return Err(Error::WorkerOutOfRange {
                worker,
                workers: config.workers,
            });
        }
        let disks_count = config.disks_count;
        Ok(Self {
            worker,
            generator: generator::generator(config, worker),
            evaluator: LoadEvaluator::new(disks_count, config.stripe_len()),
            placer: if config.local_parity {
                Some(LocalParityPlacer::new(config.groups_count))
            } else {
                None
            },
            tracker: Tracker::new(config.objective, disks_count).retain(config.retain),
            arrangement: Arrangement::padding(disks_count),
            loads: LoadVector::zeros(disks_count),
            iterations: 0,
            reported: 0,
            target: config.target,
            max_iterations: config.max_iterations,
            progress_interval: config.progress_interval,
            state: State::Running,
            token,
            progress,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Best arrangements found so far.
    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Number of arrangements evaluated so far.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    fn report(&mut self) {
        self.progress.report(&Snapshot {
            worker: self.worker,
            best: self.tracker.best(),
            tied: self.tracker.tied(),
            iterations: self.iterations,
            delta: self.iterations - self.reported,
        });
        self.reported = self.iterations;
    }

    fn stop(&mut self, reason: StopReason) -> State {
        self.report();
        log::info!(
            "Worker {} stopped ({}) after {} iterations: best={} tied={}",
            self.worker,
            reason.to_string(),
            self.iterations,
            self.tracker.best(),
            self.tracker.tied()
        );
        self.state = State::Stopped(reason);
        self.state
    }

    /// Performs a single iteration, unless the search should stop first.
    ///
    /// Once stopped, further calls do nothing.
    pub fn step(&mut self) -> State {
        if let State::Stopped(_) = self.state {
            return self.state;
        }
        if self.token.is_cancelled() {
            return self.stop(StopReason::Cancelled);
        }
        if self
            .max_iterations
            .map_or(false, |budget| self.iterations >= budget)
        {
            return self.stop(StopReason::BudgetExhausted);
        }
        if !self.generator.next_into(&mut self.arrangement) {
            return self.stop(StopReason::Exhausted);
        }
        self.evaluator.evaluate(&self.arrangement, &mut self.loads);
        if let Some(placer) = &mut self.placer {
            placer.place_mut(&mut self.arrangement, &mut self.loads);
        }
        if self.tracker.consider(&self.arrangement, &self.loads) == Consideration::Improved {
            log::debug!(
                "Worker {} improved to {} at iteration {}",
                self.worker,
                self.tracker.best(),
                self.iterations
            );
        }
        self.iterations += 1;
        if self.iterations % self.progress_interval == 0 {
            log::debug!(
                "Worker {}: {} iterations, best={} tied={}",
                self.worker,
                self.iterations,
                self.tracker.best(),
                self.tracker.tied()
            );
            self.report();
        }
        if self
            .target
            .map_or(false, |target| self.tracker.reached(target))
        {
            return self.stop(StopReason::TargetReached);
        }
        State::Running
    }

    /// Steps until the search stops.
    #[must_use]
    pub fn run(mut self) -> Outcome {
        log::info!("Worker {} started", self.worker);
        let reason = loop {
            if let State::Stopped(reason) = self.step() {
                break reason;
            }
        };
        Outcome {
            tracker: self.tracker,
            iterations: self.iterations,
            reason,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Dimension, GroupId, Mode, Objective, SearchBuilder, Silent, Symbol};
    use rstest::rstest;
    use std::sync::Mutex;

    fn builder(disks_count: usize, groups_count: GroupId, group_len: u16) -> SearchBuilder {
        SearchBuilder::new(Dimension {
            disks_count,
            groups_count,
            group_len,
        })
    }

    fn run(config: &SearchConfig) -> Outcome {
        Search::new(config, 0, CancellationToken::new(), &Silent)
            .unwrap()
            .run()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Snapshot>>);

    impl Progress for Recorder {
        fn report(&self, snapshot: &Snapshot) {
            self.0.lock().unwrap().push(*snapshot);
        }
    }

    struct CancelOnReport(CancellationToken);

    impl Progress for CancelOnReport {
        fn report(&self, _: &Snapshot) {
            self.0.cancel();
        }
    }

    #[test]
    fn test_exhaustive_scenario() {
        let outcome = run(&builder(6, 1, 2).build().unwrap());
        assert_eq!(outcome.reason, StopReason::Exhausted);
        assert_eq!(outcome.iterations, 12);
        assert_eq!(outcome.tracker.best(), 2);
        assert_eq!(outcome.tracker.tied(), 12);
        assert_eq!(outcome.tracker.entries().len(), 12);
    }

    #[rstest(
        disks_count,
        objective,
        local_parity,
        best,
        tied,
        case(5, Objective::Max, false, 1, 4),
        case(5, Objective::Spread, false, 1, 4),
        case(6, Objective::Spread, false, 2, 12),
        case(5, Objective::Max, true, 1, 8),
        case(6, Objective::Max, true, 1, 2)
    )]
    fn test_best(
        disks_count: usize,
        objective: Objective,
        local_parity: bool,
        best: u32,
        tied: usize,
    ) {
        let config = builder(disks_count, 1, 2)
            .objective(objective)
            .local_parity(local_parity)
            .build()
            .unwrap();
        let outcome = run(&config);
        assert_eq!(outcome.reason, StopReason::Exhausted);
        assert_eq!((outcome.tracker.best(), outcome.tracker.tied()), (best, tied));
        for (loads, _) in outcome.tracker.entries() {
            assert_eq!(objective.score(loads), best);
        }
    }

    #[test]
    fn test_local_parity_tags() {
        let config = builder(6, 1, 2).local_parity(true).build().unwrap();
        for (_, arrangement) in run(&config).tracker.entries() {
            let tags = arrangement
                .iter()
                .filter(|&&s| s == Symbol::LocalParity(1))
                .count();
            assert_eq!(tags, 1);
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let config = builder(6, 1, 2).build().unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = Search::new(&config, 0, token, &Silent).unwrap().run();
        assert_eq!(outcome.reason, StopReason::Cancelled);
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.tracker.is_empty());
        assert!(outcome.tracker.entries().is_empty());
    }

    #[test]
    fn test_cancelled_between_iterations() {
        let config = builder(8, 2, 2).progress_interval(3).build().unwrap();
        let token = CancellationToken::new();
        let progress = CancelOnReport(token.clone());
        let outcome = Search::new(&config, 0, token, &progress).unwrap().run();
        assert_eq!(outcome.reason, StopReason::Cancelled);
        assert_eq!(outcome.iterations, 3);
    }

    #[rstest(
        mode,
        budget,
        case(Mode::Sampling, 0),
        case(Mode::Sampling, 7),
        case(Mode::Exhaustive, 5)
    )]
    fn test_budget(mode: Mode, budget: u64) {
        let config = builder(15, 3, 4)
            .mode(mode)
            .seed(1)
            .max_iterations(budget)
            .build()
            .unwrap();
        let outcome = run(&config);
        assert_eq!(outcome.reason, StopReason::BudgetExhausted);
        assert_eq!(outcome.iterations, budget);
    }

    #[rstest(
        target,
        reason,
        iterations,
        tied,
        case(1, StopReason::TargetReached, 4, 1),
        case(4, StopReason::TargetReached, 11, 4),
        case(5, StopReason::Exhausted, 12, 4)
    )]
    fn test_target(target: usize, reason: StopReason, iterations: u64, tied: usize) {
        let config = builder(5, 1, 2).target(target).build().unwrap();
        let outcome = run(&config);
        assert_eq!(outcome.reason, reason);
        assert_eq!(outcome.iterations, iterations);
        assert_eq!(outcome.tracker.best(), 1);
        assert_eq!(outcome.tracker.tied(), tied);
    }

    #[test]
    fn test_target_above_floor_not_reached() {
        let config = builder(6, 1, 2).target(1).build().unwrap();
        let outcome = run(&config);
        assert_eq!(outcome.reason, StopReason::Exhausted);
        assert_eq!(outcome.tracker.best(), 2);
    }

    #[test]
    fn test_step() {
        let config = builder(4, 1, 1).build().unwrap();
        let mut search = Search::new(&config, 0, CancellationToken::new(), &Silent).unwrap();
        for iteration in 1..=6 {
            assert_eq!(search.step(), State::Running);
            assert_eq!(search.iterations(), iteration);
            assert!(!search.tracker().is_empty());
        }
        let stopped = State::Stopped(StopReason::Exhausted);
        assert_eq!(search.step(), stopped);
        assert_eq!(search.step(), stopped);
        assert_eq!(search.iterations(), 6);
    }

    #[test]
    fn test_progress_snapshots() {
        let config = builder(6, 1, 2).progress_interval(5).build().unwrap();
        let recorder = Recorder::default();
        let outcome = Search::new(&config, 0, CancellationToken::new(), &recorder)
            .unwrap()
            .run();
        let snapshots = recorder.0.into_inner().unwrap();
        let iterations: Vec<_> = snapshots.iter().map(|s| s.iterations).collect();
        assert_eq!(iterations, vec![5, 10, 12]);
        let total: u64 = snapshots.iter().map(|s| s.delta).sum();
        assert_eq!(total, outcome.iterations);
        assert!(snapshots.iter().all(|s| s.best == 2 && s.worker == 0));
    }

    #[test]
    fn test_worker_out_of_range() {
        let config = builder(6, 1, 2).workers(2).build().unwrap();
        assert!(Search::new(&config, 1, CancellationToken::new(), &Silent).is_ok());
        assert!(matches!(
            Search::new(&config, 2, CancellationToken::new(), &Silent),
            Err(Error::WorkerOutOfRange {
                worker: 2,
                workers: 2
            })
        ));
    }

    #[test]
    fn test_stop_reason_precedence() {
        assert!(StopReason::Cancelled > StopReason::BudgetExhausted);
        assert!(StopReason::BudgetExhausted > StopReason::TargetReached);
        assert!(StopReason::TargetReached > StopReason::Exhausted);
        assert_eq!(StopReason::TargetReached.to_string(), "target_reached");
    }
}

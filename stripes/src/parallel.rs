//! Fan-out of the search over a pool of workers.

use crate::{
    CancellationToken, Outcome, Progress, Result, Search, SearchConfig, StopReason, Tracker,
};

/// Runs `config.workers` independent searches on a dedicated thread pool and merges their
/// outcomes.
///
/// Iterations are summed, trackers are merged, and the stop reason is the greatest of the
/// workers' reasons.
///
/// # Errors
///
/// Returns an error if `config` is invalid or the thread pool cannot be created.
pub fn search(
    config: &SearchConfig,
    token: &CancellationToken,
    progress: &dyn Progress,
) -> Result<Outcome> {
    config.validate()?;
    log::info!(
        "Searching {} arrangements of {}x{} groups on {} disks with {} worker(s)",
        config.mode.to_string(),
        config.groups_count,
        config.group_len,
        config.disks_count,
        config.workers
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|idx| format!("search-{}", idx))
        .build()?;
    let mut results: Vec<Option<Result<Outcome>>> = (0..config.workers).map(|_| None).collect();
    pool.scope(|scope| {
        for (worker, slot) in results.iter_mut().enumerate() {
            let token = token.clone();
            scope.spawn(move |_| {
                *slot = Some(Search::new(config, worker, token, progress).map(Search::run));
            });
        }
    });
    let mut merged = Outcome {
        tracker: Tracker::new(config.objective, config.disks_count).retain(config.retain),
        iterations: 0,
        reason: StopReason::Exhausted,
    };
    for outcome in results.into_iter().flatten() {
        merged.merge(outcome?);
    }
    log::info!(
        "Search stopped ({}) after {} iterations: best={} tied={}",
        merged.reason.to_string(),
        merged.iterations,
        merged.tracker.best(),
        merged.tracker.tied()
    );
    Ok(merged)
}

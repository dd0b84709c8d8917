//! Progress reporting of running workers.

use indicatif::ProgressBar;

/// State of one worker at a progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Worker reporting the snapshot.
    pub worker: usize,
    /// Best objective value of the worker so far.
    pub best: u32,
    /// Number of arrangements tied for the best value.
    pub tied: usize,
    /// Iterations the worker has done so far.
    pub iterations: u64,
    /// Iterations done since the previous snapshot of this worker.
    pub delta: u64,
}

/// Receives progress snapshots from search workers.
///
/// Snapshots of different workers can arrive concurrently.
pub trait Progress: Sync {
    /// Handles one snapshot.
    fn report(&self, snapshot: &Snapshot);
}

/// Discards all snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {
    fn report(&self, _: &Snapshot) {}
}

impl Progress for ProgressBar {
    fn report(&self, snapshot: &Snapshot) {
        self.inc(snapshot.delta);
        self.set_message(&format!(
            "[W={worker}] [best={best}] [tied={tied}]",
            worker = snapshot.worker,
            best = snapshot.best,
            tied = snapshot.tied,
        ));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_progress_bar() {
        let pb = ProgressBar::hidden();
        pb.set_length(100);
        let snapshot = Snapshot {
            worker: 0,
            best: 2,
            tied: 3,
            iterations: 10,
            delta: 10,
        };
        pb.report(&snapshot);
        pb.report(&Snapshot {
            iterations: 15,
            delta: 5,
            ..snapshot
        });
        assert_eq!(pb.position(), 15);
    }
}

//! Monotonic progress reporting for run loops.
//!
//! The orchestrator advances the reporter once per terminal trial; consumers
//! get a fraction in `[0, 1]` and a "done / total" label. Totals are fixed
//! up front: repeats for a batch run, point-counts x repeats for an
//! extended run.

/// One progress signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Completed fraction in `[0, 1]`; `0.0` when the total is zero.
    pub fraction: f64,
    /// Human-readable "done / total".
    pub label: String,
}

impl ProgressUpdate {
    /// Compute a progress signal from completed and total trial counts.
    pub fn compute(done: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            (done as f64 / total as f64).clamp(0.0, 1.0)
        };
        Self {
            fraction,
            label: format!("{} / {}", done, total),
        }
    }
}

/// Tracks completed trials against a precomputed total.
#[derive(Debug)]
pub struct ProgressReporter {
    done: usize,
    total: usize,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self { done: 0, total }
    }

    /// Record one completed trial and emit the updated signal.
    pub fn advance(&mut self) -> ProgressUpdate {
        self.done += 1;
        let update = ProgressUpdate::compute(self.done, self.total);
        tracing::info!(
            done = self.done,
            total = self.total,
            progress_pct = format!("{:.1}%", update.fraction * 100.0),
            "Trial completed"
        );
        update
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

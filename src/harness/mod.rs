//! Batch/extended test orchestration harness.
//!
//! The harness repeatedly drives the solver service in (sample, solve)
//! trials, retries degenerate results, and accumulates validated records:
//! - Run trials under a bounded retry policy (`trial`)
//! - Append validated results to the run dataset (`dataset`)
//! - Drive batch and extended run loops (`runner`)
//! - Summarize distances excluding corrupted iterations (`stats`)
//! - Extrapolate factorial compute-time growth (`growth`)
//! - Report monotonic run progress (`progress`)

pub mod dataset;
pub mod growth;
pub mod progress;
pub mod runner;
pub mod stats;
pub mod trial;

pub use dataset::{BatchRecord, Dataset};
pub use growth::{GrowthModel, GrowthSeries, MeasuredPoint, ProjectedPoint};
pub use progress::{ProgressReporter, ProgressUpdate};
pub use runner::{BatchRunConfig, ExtendedRunConfig, RunReport, Runner, TrialAttempts};
pub use stats::{average_distance_excluding_degenerate_iterations, table_rows, TableRow};
pub use trial::{run_trial, TrialConfig, TrialOutcome, TrialResult};

/// Retry ceiling for one trial: a degenerate (zero-distance) result is
/// resubmitted until it clears or this many attempts have been made.
pub const MAX_TRIAL_ATTEMPTS: u32 = 150;

/// Minimum sample size for which a route is meaningful.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Largest point count the extended run will sweep to.
pub const EXTENDED_MAX_POINTS: usize = 30;

/// The designated factorial-cost algorithm. Runs only up to
/// [`BRUTE_FORCE_CEILING`] points; beyond that its cost is projected by
/// `growth` instead of measured.
pub const BRUTE_FORCE: &str = "Brute Force";

/// Practical measurement ceiling for [`BRUTE_FORCE`].
pub const BRUTE_FORCE_CEILING: usize = 10;

/// Simulated Annealing degrades into noise below this sample size.
pub const SIMULATED_ANNEALING: &str = "Simulated Annealing";
pub const SIMULATED_ANNEALING_MIN_POINTS: usize = 4;

/// Largest point count the growth model projects to.
pub const PROJECTION_CEILING: usize = 15;

/// Display clamp for projected compute times, in chart time-units. A
/// presentation bound, not a measurement.
pub const PROJECTION_DISPLAY_CAP: f64 = 16.0;

/// Every algorithm the solver service recognizes.
pub const ALL_ALGORITHMS: &[&str] = &[
    "Christofides Algorithm",
    "Greedy Algorithm",
    "Nearest Neighbor",
    SIMULATED_ANNEALING,
    "2-opt Heuristic",
    BRUTE_FORCE,
];

/// Filter the requested algorithms down to those eligible at `points_n`.
///
/// Brute Force is excluded above [`BRUTE_FORCE_CEILING`]; Simulated
/// Annealing below [`SIMULATED_ANNEALING_MIN_POINTS`]. Order is preserved.
pub fn eligible_algorithms(requested: &[String], points_n: usize) -> Vec<String> {
    requested
        .iter()
        .filter(|name| {
            if name.as_str() == BRUTE_FORCE && points_n > BRUTE_FORCE_CEILING {
                return false;
            }
            if name.as_str() == SIMULATED_ANNEALING && points_n < SIMULATED_ANNEALING_MIN_POINTS {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

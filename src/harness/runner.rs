//! Batch and extended run orchestration.
//!
//! Trials execute strictly sequentially: the solver service holds the
//! current sample as shared mutable state with no trial identifier, so a
//! new trial may only start once the previous one has reached a terminal
//! state. Request failures and exhausted retry budgets cost the affected
//! iteration its records but never halt the run; the final report states
//! how much was collected against how much was expected.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::SolverApi;
use crate::harness::dataset::Dataset;
use crate::harness::progress::ProgressReporter;
use crate::harness::trial::{run_trial, TrialConfig, TrialOutcome};
use crate::harness::{eligible_algorithms, EXTENDED_MAX_POINTS, MIN_ROUTE_POINTS};

/// Configuration for a batch run: one point count, repeated trials.
#[derive(Debug, Clone)]
pub struct BatchRunConfig {
    pub points_n: usize,
    pub repeats: u32,
    pub algorithms: Vec<String>,
}

impl Default for BatchRunConfig {
    fn default() -> Self {
        Self {
            points_n: 5,
            repeats: 3,
            algorithms: vec![],
        }
    }
}

/// Configuration for an extended run: a sweep over point counts.
#[derive(Debug, Clone)]
pub struct ExtendedRunConfig {
    pub min_points: usize,
    pub max_points: usize,
    /// Repeats per point count.
    pub repeats: u32,
    pub algorithms: Vec<String>,
}

impl Default for ExtendedRunConfig {
    fn default() -> Self {
        Self {
            min_points: MIN_ROUTE_POINTS,
            max_points: EXTENDED_MAX_POINTS,
            repeats: 50,
            algorithms: vec![],
        }
    }
}

/// Attempt count of one terminal trial, for post-run inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialAttempts {
    pub points_n: usize,
    pub iteration: u32,
    pub attempts: u32,
    /// Whether the trial produced records.
    pub succeeded: bool,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub dataset: Dataset,
    /// Records actually collected (`dataset.len()`).
    pub collected: usize,
    /// Records a fully clean run would have produced.
    pub expected: usize,
    /// Trials that ended with zero records (request failure or gave up).
    pub abandoned_trials: usize,
    /// Per-trial attempt counts in execution order.
    pub trial_attempts: Vec<TrialAttempts>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Whether every expected record was collected.
    pub fn complete(&self) -> bool {
        self.collected == self.expected
    }
}

/// Drives batch and extended runs against a solver endpoint pair.
pub struct Runner {
    api: Arc<dyn SolverApi>,
}

impl Runner {
    pub fn new(api: Arc<dyn SolverApi>) -> Self {
        Self { api }
    }

    /// Run `repeats` trials at a fixed point count.
    pub async fn run_batch(&self, config: &BatchRunConfig) -> anyhow::Result<RunReport> {
        if config.points_n < MIN_ROUTE_POINTS {
            anyhow::bail!(
                "At least {} points are required for a route, got {}",
                MIN_ROUTE_POINTS,
                config.points_n
            );
        }
        if config.algorithms.is_empty() {
            anyhow::bail!("No algorithms selected");
        }
        if config.repeats == 0 {
            anyhow::bail!("At least one repeat is required");
        }

        tracing::info!(
            points_n = config.points_n,
            repeats = config.repeats,
            algorithms = ?config.algorithms,
            "Starting batch run"
        );

        let mut state = RunState::new(config.repeats as usize);
        for iteration in 1..=config.repeats {
            state
                .run_one(self.api.as_ref(), iteration, config.points_n, &config.algorithms)
                .await;
        }

        Ok(state.into_report())
    }

    /// Sweep point counts from `min_points` to `max_points`, `repeats`
    /// trials each, filtering per-size algorithm eligibility.
    pub async fn run_extended(&self, config: &ExtendedRunConfig) -> anyhow::Result<RunReport> {
        if config.min_points < MIN_ROUTE_POINTS {
            anyhow::bail!(
                "At least {} points are required for a route, got {}",
                MIN_ROUTE_POINTS,
                config.min_points
            );
        }
        if config.max_points < config.min_points {
            anyhow::bail!(
                "max_points ({}) must be >= min_points ({})",
                config.max_points,
                config.min_points
            );
        }
        if config.max_points > EXTENDED_MAX_POINTS {
            anyhow::bail!(
                "max_points ({}) exceeds the extended run limit of {}",
                config.max_points,
                EXTENDED_MAX_POINTS
            );
        }
        if config.algorithms.is_empty() {
            anyhow::bail!("No algorithms selected");
        }
        if config.repeats == 0 {
            anyhow::bail!("At least one repeat is required");
        }

        let point_counts = config.max_points - config.min_points + 1;
        tracing::info!(
            min_points = config.min_points,
            max_points = config.max_points,
            repeats = config.repeats,
            algorithms = ?config.algorithms,
            "Starting extended run"
        );

        let mut state = RunState::new(point_counts * config.repeats as usize);
        for points_n in config.min_points..=config.max_points {
            for iteration in 1..=config.repeats {
                state
                    .run_one(self.api.as_ref(), iteration, points_n, &config.algorithms)
                    .await;
            }
        }

        Ok(state.into_report())
    }
}

/// Mutable state threaded through a run's trial loop.
struct RunState {
    dataset: Dataset,
    progress: ProgressReporter,
    expected: usize,
    abandoned_trials: usize,
    trial_attempts: Vec<TrialAttempts>,
}

impl RunState {
    fn new(total_trials: usize) -> Self {
        Self {
            dataset: Dataset::new(),
            progress: ProgressReporter::new(total_trials),
            expected: 0,
            abandoned_trials: 0,
            trial_attempts: Vec::new(),
        }
    }

    /// Execute one trial to a terminal state and record its contribution.
    async fn run_one(
        &mut self,
        api: &dyn SolverApi,
        iteration: u32,
        points_n: usize,
        requested: &[String],
    ) {
        let eligible = eligible_algorithms(requested, points_n);
        if eligible.is_empty() {
            tracing::debug!(
                points_n,
                iteration,
                "No requested algorithm eligible at this size, skipping trial"
            );
            self.progress.advance();
            return;
        }
        self.expected += eligible.len();

        let trial_config = TrialConfig::new(points_n, eligible);
        match run_trial(api, &trial_config).await {
            Ok(TrialOutcome::Valid(trial)) => {
                self.dataset
                    .append(iteration, points_n, &trial.points, &trial.outcomes);
                self.trial_attempts.push(TrialAttempts {
                    points_n,
                    iteration,
                    attempts: trial.attempts,
                    succeeded: true,
                });
            }
            Ok(TrialOutcome::GaveUp { attempts }) => {
                self.abandoned_trials += 1;
                self.trial_attempts.push(TrialAttempts {
                    points_n,
                    iteration,
                    attempts,
                    succeeded: false,
                });
            }
            Err(err) => {
                // Logged, not propagated: a lost iteration must not halt
                // the remaining iterations.
                tracing::error!(
                    points_n,
                    iteration,
                    error = %err,
                    "Trial aborted by request failure"
                );
                self.abandoned_trials += 1;
                self.trial_attempts.push(TrialAttempts {
                    points_n,
                    iteration,
                    attempts: 0,
                    succeeded: false,
                });
            }
        }

        self.progress.advance();
    }

    fn into_report(self) -> RunReport {
        let report = RunReport {
            collected: self.dataset.len(),
            expected: self.expected,
            abandoned_trials: self.abandoned_trials,
            trial_attempts: self.trial_attempts,
            dataset: self.dataset,
            finished_at: Utc::now(),
        };
        tracing::info!(
            collected = report.collected,
            expected = report.expected,
            abandoned_trials = report.abandoned_trials,
            complete = report.complete(),
            "Run finished"
        );
        report
    }
}

//! One (sample, solve) trial under the bounded retry policy.
//!
//! The solver can produce pathological zero-length routes when randomly
//! sampled points land disconnected from the road graph ("in mid-air").
//! Such a round is degenerate data, not an error: the trial resamples and
//! resubmits until the round clears or [`MAX_TRIAL_ATTEMPTS`] is exhausted.
//! Request errors, by contrast, abort the trial immediately — a failed
//! endpoint call is not degeneracy and retrying it would mask real faults.

use crate::client::{AlgorithmOutcome, Point, SolverApi};
use crate::error::RequestError;
use crate::harness::MAX_TRIAL_ATTEMPTS;

/// Configuration for a single trial.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Number of points to sample for each attempt.
    pub points_n: usize,
    /// Algorithms to run against the sample.
    pub algorithms: Vec<String>,
    /// Attempt ceiling; [`MAX_TRIAL_ATTEMPTS`] unless a test tightens it.
    pub max_attempts: u32,
}

impl TrialConfig {
    pub fn new(points_n: usize, algorithms: Vec<String>) -> Self {
        Self {
            points_n,
            algorithms,
            max_attempts: MAX_TRIAL_ATTEMPTS,
        }
    }
}

/// A validated trial: every outcome successful and non-degenerate.
#[derive(Debug, Clone)]
pub struct TrialResult {
    /// The sample the winning attempt solved against.
    pub points: Vec<Point>,
    /// Outcome list from the winning attempt, verbatim.
    pub outcomes: Vec<AlgorithmOutcome>,
    /// Attempts spent, including the winning one.
    pub attempts: u32,
}

/// Terminal state of a trial that did not error out.
#[derive(Debug, Clone)]
pub enum TrialOutcome {
    /// The round cleared within the attempt budget.
    Valid(TrialResult),
    /// Every attempt came back degenerate; the iteration yields no records.
    GaveUp { attempts: u32 },
}

/// Run one trial: sample, solve, evaluate, resubmitting degenerate rounds.
///
/// Returns `Err` only for request failures (transport, malformed response,
/// or a remote `status: error` envelope), which abort the trial without
/// retry. Degenerate rounds are retried up to `config.max_attempts`; an
/// exhausted budget is a logged [`TrialOutcome::GaveUp`], not an error.
pub async fn run_trial(
    api: &dyn SolverApi,
    config: &TrialConfig,
) -> Result<TrialOutcome, RequestError> {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        // The service holds the sample as ambient state: solve must follow
        // sample with nothing in between.
        let points = api.request_sample(config.points_n).await?;
        let outcomes = api.request_solve(&config.algorithms).await?;

        let degenerate = outcomes
            .iter()
            .find(|o| !o.is_success() || o.distance == 0.0);

        match degenerate {
            None => {
                return Ok(TrialOutcome::Valid(TrialResult {
                    points,
                    outcomes,
                    attempts,
                }));
            }
            Some(outcome) => {
                tracing::debug!(
                    attempt = attempts,
                    algorithm = %outcome.algorithm,
                    status = %outcome.status,
                    distance = outcome.distance,
                    "Degenerate round, resampling"
                );
                if attempts >= config.max_attempts {
                    tracing::warn!(
                        attempts = attempts,
                        points_n = config.points_n,
                        "Gave up after exhausting trial attempts"
                    );
                    return Ok(TrialOutcome::GaveUp { attempts });
                }
            }
        }
    }
}

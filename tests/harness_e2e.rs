//! End-to-end harness scenarios against scripted solver implementations.
//!
//! These tests exercise the full orchestrator loop: sample, solve,
//! degenerate-round retry, aggregation, and export — everything except a
//! live routing service, which the scripted `SolverApi` stands in for.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use routebench::client::{AlgorithmOutcome, Point, SolverApi};
use routebench::error::RequestError;
use routebench::export;
use routebench::harness::runner::{BatchRunConfig, ExtendedRunConfig, Runner};
use routebench::harness::{stats, BRUTE_FORCE, BRUTE_FORCE_CEILING, MAX_TRIAL_ATTEMPTS};

/// Scripted solver: a predicate over the 1-based solve call index decides
/// which rounds come back degenerate; everything else is clean.
struct ScriptedSolver {
    solve_calls: AtomicU32,
    degenerate_when: Box<dyn Fn(u32) -> bool + Send + Sync>,
    current_count: Mutex<usize>,
}

impl ScriptedSolver {
    fn new(degenerate_when: impl Fn(u32) -> bool + Send + Sync + 'static) -> Self {
        Self {
            solve_calls: AtomicU32::new(0),
            degenerate_when: Box::new(degenerate_when),
            current_count: Mutex::new(0),
        }
    }

    fn clean() -> Self {
        Self::new(|_| false)
    }

    fn solve_calls(&self) -> u32 {
        self.solve_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SolverApi for ScriptedSolver {
    async fn request_sample(&self, count: usize) -> Result<Vec<Point>, RequestError> {
        *self.current_count.lock().unwrap() = count;
        Ok((0..count)
            .map(|i| Point {
                id: i.to_string(),
                lat: 54.6872 + i as f64 * 0.004,
                lon: 25.2797 - i as f64 * 0.002,
            })
            .collect())
    }

    async fn request_solve(
        &self,
        algorithms: &[String],
    ) -> Result<Vec<AlgorithmOutcome>, RequestError> {
        let call = self.solve_calls.fetch_add(1, Ordering::Relaxed) + 1;
        let degenerate = (self.degenerate_when)(call);
        let n = *self.current_count.lock().unwrap();

        Ok(algorithms
            .iter()
            .enumerate()
            .map(|(i, name)| AlgorithmOutcome {
                algorithm: name.clone(),
                status: "success".to_string(),
                distance: if degenerate {
                    0.0
                } else {
                    2500.0 + (call * 10 + i as u32) as f64
                },
                time: 6.5,
                compute_time_sec: 0.001 * (i + 1) as f64,
                num_nodes: n as u32 * 3,
                ordered_points: (0..n).map(|p| p.to_string()).collect(),
                expansions: None,
                heuristic_ratio: Some(1.0),
                message: None,
            })
            .collect())
    }
}

fn algos(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn clean_batch_run_yields_one_record_per_iteration() {
    let solver = Arc::new(ScriptedSolver::clean());
    let runner = Runner::new(solver.clone());

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: 5,
            repeats: 3,
            algorithms: algos(&["Greedy Algorithm"]),
        })
        .await
        .unwrap();

    assert_eq!(report.collected, 3);
    assert!(report.complete());
    assert_eq!(solver.solve_calls(), 3);

    let iterations: Vec<u32> = report
        .dataset
        .records()
        .iter()
        .map(|r| r.iteration)
        .collect();
    assert_eq!(iterations, vec![1, 2, 3]);
}

#[tokio::test]
async fn iteration_succeeding_on_final_attempt_yields_one_record() {
    // Iteration 1: call 1 clean. Iteration 2: calls 2..=150 degenerate
    // (149 attempts), call 151 clean on attempt 150. Iteration 3: clean.
    let solver = Arc::new(ScriptedSolver::new(|call| (2..=150).contains(&call)));
    let runner = Runner::new(solver.clone());

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: 5,
            repeats: 3,
            algorithms: algos(&["Greedy Algorithm"]),
        })
        .await
        .unwrap();

    assert_eq!(report.collected, 3);
    assert_eq!(report.abandoned_trials, 0);

    let second = report
        .trial_attempts
        .iter()
        .find(|t| t.iteration == 2)
        .unwrap();
    assert_eq!(second.attempts, MAX_TRIAL_ATTEMPTS);
    assert!(second.succeeded);

    // Exactly one record for iteration 2 despite 150 attempts
    let second_records = report
        .dataset
        .records()
        .iter()
        .filter(|r| r.iteration == 2)
        .count();
    assert_eq!(second_records, 1);
}

#[tokio::test]
async fn always_degenerate_iteration_is_abandoned_after_150_attempts() {
    // Iteration 2 never clears; iterations 1 and 3 are clean.
    let solver = Arc::new(ScriptedSolver::new(|call| (2..=151).contains(&call)));
    let runner = Runner::new(solver.clone());

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: 5,
            repeats: 3,
            algorithms: algos(&["Greedy Algorithm"]),
        })
        .await
        .unwrap();

    assert_eq!(report.collected, 2);
    assert_eq!(report.expected, 3);
    assert_eq!(report.abandoned_trials, 1);
    assert!(!report.complete());

    let second = report
        .trial_attempts
        .iter()
        .find(|t| t.iteration == 2)
        .unwrap();
    assert_eq!(second.attempts, MAX_TRIAL_ATTEMPTS);
    assert!(!second.succeeded);

    // 1 clean + 150 exhausted + 1 clean solve calls
    assert_eq!(solver.solve_calls(), 152);
}

#[tokio::test]
async fn extended_run_never_records_brute_force_above_ceiling() {
    let solver = Arc::new(ScriptedSolver::clean());
    let runner = Runner::new(solver);

    let report = runner
        .run_extended(&ExtendedRunConfig {
            min_points: 8,
            max_points: 13,
            repeats: 2,
            algorithms: algos(&[BRUTE_FORCE, "Nearest Neighbor"]),
        })
        .await
        .unwrap();

    assert!(report.complete());
    assert!(report
        .dataset
        .records()
        .iter()
        .all(|r| r.algorithm != BRUTE_FORCE || r.points_n <= BRUTE_FORCE_CEILING));

    // Brute force still measured at and below the ceiling
    assert!(report
        .dataset
        .records()
        .iter()
        .any(|r| r.algorithm == BRUTE_FORCE && r.points_n == BRUTE_FORCE_CEILING));
}

#[tokio::test]
async fn exported_csv_round_trips_the_collected_dataset() {
    let solver = Arc::new(ScriptedSolver::clean());
    let runner = Runner::new(solver);

    let report = runner
        .run_extended(&ExtendedRunConfig {
            min_points: 4,
            max_points: 6,
            repeats: 2,
            algorithms: algos(&["Greedy Algorithm", "Nearest Neighbor"]),
        })
        .await
        .unwrap();

    let text = export::extended_csv(&report.dataset);
    let rows = export::parse_extended_csv(&text).unwrap();
    assert_eq!(rows.len(), report.dataset.len());

    for (row, record) in rows.iter().zip(report.dataset.records()) {
        assert_eq!(row.points_n, record.points_n);
        assert_eq!(row.iteration, record.iteration);
        assert_eq!(row.algorithm, record.algorithm);
        assert_eq!(row.distance, record.distance);
        assert_eq!(row.time, record.time);
        assert_eq!(row.compute_time_sec, record.compute_time_sec);
    }
}

#[tokio::test]
async fn csv_written_to_disk_parses_back() {
    let solver = Arc::new(ScriptedSolver::clean());
    let runner = Runner::new(solver);

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: 4,
            repeats: 2,
            algorithms: algos(&["Greedy Algorithm"]),
        })
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    std::fs::write(&path, export::extended_csv(&report.dataset)).unwrap();

    let rows = export::parse_extended_csv(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn summary_statistics_follow_a_full_run() {
    let solver = Arc::new(ScriptedSolver::clean());
    let runner = Runner::new(solver);

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: 5,
            repeats: 4,
            algorithms: algos(&["Greedy Algorithm", "Nearest Neighbor"]),
        })
        .await
        .unwrap();

    assert_eq!(report.collected, 8);

    let avg = stats::average_distance_excluding_degenerate_iterations(&report.dataset);
    assert!(avg > 0.0);

    let rows = stats::table_rows(&report.dataset);
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| !r.distance_repaired));
}

//! The run dataset: validated trial records and derived groupings.
//!
//! The dataset is the harness's single source of truth. It is owned by the
//! orchestrator, cleared at the start of a run, and mutated only by appends
//! from validated trials. Groupings are derived views recomputed per call so
//! they can never go stale against the records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{AlgorithmOutcome, Point};

/// One flattened, immutable record from a validated trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Repeat index the user requested (1-based).
    pub iteration: u32,
    /// Sample size the trial ran at.
    pub points_n: usize,
    pub algorithm: String,
    /// Route distance in meters.
    pub distance: f64,
    /// Estimated travel time in minutes.
    pub time: f64,
    pub compute_time_sec: f64,
    pub num_nodes: u32,
    /// Visiting order of sampled point ids.
    pub ordered_points: Vec<String>,
    /// `ordered_points` resolved against the trial's sample, for the
    /// display-layer distance fallback. Ids missing from the sample are
    /// dropped during resolution.
    pub ordered_point_coords: Vec<Point>,
}

/// Insertion-ordered collection of validated [`BatchRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<BatchRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all records; called at the start of a new run.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BatchRecord] {
        &self.records
    }

    /// Flatten a validated trial into one record per outcome.
    ///
    /// A no-op when `outcomes` is empty: abandoned trials never reach this
    /// point with data, so the dataset only ever grows by whole trials.
    pub fn append(
        &mut self,
        iteration: u32,
        points_n: usize,
        points: &[Point],
        outcomes: &[AlgorithmOutcome],
    ) {
        for outcome in outcomes {
            let ordered_point_coords = outcome
                .ordered_points
                .iter()
                .filter_map(|id| points.iter().find(|p| &p.id == id).cloned())
                .collect();

            self.records.push(BatchRecord {
                iteration,
                points_n,
                algorithm: outcome.algorithm.clone(),
                distance: outcome.distance,
                time: outcome.time,
                compute_time_sec: outcome.compute_time_sec,
                num_nodes: outcome.num_nodes,
                ordered_points: outcome.ordered_points.clone(),
                ordered_point_coords,
            });
        }
    }

    /// Records grouped by iteration id, ascending.
    pub fn group_by_iteration(&self) -> BTreeMap<u32, Vec<&BatchRecord>> {
        let mut groups: BTreeMap<u32, Vec<&BatchRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.iteration).or_default().push(record);
        }
        groups
    }

    /// Records grouped by (algorithm, point count), ascending.
    pub fn group_by_algorithm_and_n(&self) -> BTreeMap<(String, usize), Vec<&BatchRecord>> {
        let mut groups: BTreeMap<(String, usize), Vec<&BatchRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry((record.algorithm.clone(), record.points_n))
                .or_default()
                .push(record);
        }
        groups
    }
}

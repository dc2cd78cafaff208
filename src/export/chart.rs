//! Chart-ready series derived from the run dataset.
//!
//! The harness only produces the series; rendering belongs to an external
//! collaborator. Batch mode pairs distance bars with compute-time lines per
//! algorithm, sorted by distance; extended mode plots mean compute time
//! against point count and appends the projected curve for the designated
//! factorial algorithm.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::harness::dataset::Dataset;
use crate::harness::growth;
use crate::harness::BRUTE_FORCE;

/// Suffix of the projected series name, after the algorithm it extends.
const PROJECTION_SERIES_SUFFIX: &str = "Theoretical";

/// Per-algorithm batch series: distances ascending, compute times carried
/// along in the same permutation so index i describes one record.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSeries {
    pub algorithm: String,
    pub distances_m: Vec<f64>,
    pub compute_times_sec: Vec<f64>,
}

/// Build batch-mode series, one per algorithm present in the dataset.
pub fn batch_series(dataset: &Dataset) -> Vec<BatchSeries> {
    let mut grouped: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for record in dataset.records() {
        grouped
            .entry(record.algorithm.as_str())
            .or_default()
            .push((record.distance, record.compute_time_sec));
    }

    grouped
        .into_iter()
        .map(|(algorithm, mut pairs)| {
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            BatchSeries {
                algorithm: algorithm.to_string(),
                distances_m: pairs.iter().map(|p| p.0).collect(),
                compute_times_sec: pairs.iter().map(|p| p.1).collect(),
            }
        })
        .collect()
}

/// Mean compute time against point count for one algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct ExtendedSeries {
    pub algorithm: String,
    /// `(n, mean compute time in seconds)` ascending by `n`.
    pub points: Vec<(usize, f64)>,
}

/// Extended-mode chart: measured series per algorithm, plus the projected
/// series when the designated factorial algorithm has measurements.
#[derive(Debug, Clone, Serialize)]
pub struct ExtendedChart {
    pub series: Vec<ExtendedSeries>,
    /// Measured + projected curve, present only when brute force ran.
    pub projection: Option<ExtendedSeries>,
}

/// Build extended-mode series from the dataset.
pub fn extended_series(dataset: &Dataset) -> ExtendedChart {
    let mut mean_times: BTreeMap<String, Vec<(usize, f64)>> = BTreeMap::new();
    for ((algorithm, n), records) in dataset.group_by_algorithm_and_n() {
        let sum: f64 = records.iter().map(|r| r.compute_time_sec).sum();
        mean_times
            .entry(algorithm)
            .or_default()
            .push((n, sum / records.len() as f64));
    }

    let series: Vec<ExtendedSeries> = mean_times
        .into_iter()
        .map(|(algorithm, points)| ExtendedSeries { algorithm, points })
        .collect();

    // The projected curve carries the real points too, so it draws as one
    // continuous line extending the measured one.
    let projection = growth::extrapolate(dataset, BRUTE_FORCE).map(|g| {
        let mut points: Vec<(usize, f64)> =
            g.measured.iter().map(|m| (m.n, m.mean_time_sec)).collect();
        points.extend(g.projected.iter().map(|p| (p.n, p.projected_time_sec)));
        ExtendedSeries {
            algorithm: format!("{} {}", BRUTE_FORCE, PROJECTION_SERIES_SUFFIX),
            points,
        }
    });

    ExtendedChart { series, projection }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AlgorithmOutcome;
    use crate::harness::PROJECTION_CEILING;

    fn outcome(algorithm: &str, distance: f64, compute_time_sec: f64) -> AlgorithmOutcome {
        AlgorithmOutcome {
            algorithm: algorithm.to_string(),
            status: "success".to_string(),
            distance,
            time: 3.0,
            compute_time_sec,
            num_nodes: 5,
            ordered_points: vec![],
            expansions: None,
            heuristic_ratio: None,
            message: None,
        }
    }

    #[test]
    fn test_batch_series_sorted_by_distance_with_paired_times() {
        let mut dataset = Dataset::new();
        dataset.append(1, 5, &[], &[outcome("Greedy Algorithm", 300.0, 0.3)]);
        dataset.append(2, 5, &[], &[outcome("Greedy Algorithm", 100.0, 0.1)]);
        dataset.append(3, 5, &[], &[outcome("Greedy Algorithm", 200.0, 0.2)]);

        let series = batch_series(&dataset);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].distances_m, vec![100.0, 200.0, 300.0]);
        // Times follow the distance permutation, not insertion order
        assert_eq!(series[0].compute_times_sec, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_batch_series_one_per_algorithm() {
        let mut dataset = Dataset::new();
        dataset.append(
            1,
            5,
            &[],
            &[
                outcome("Greedy Algorithm", 300.0, 0.3),
                outcome("Nearest Neighbor", 250.0, 0.05),
            ],
        );
        let series = batch_series(&dataset);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].algorithm, "Greedy Algorithm");
        assert_eq!(series[1].algorithm, "Nearest Neighbor");
    }

    #[test]
    fn test_extended_series_means_per_point_count() {
        let mut dataset = Dataset::new();
        dataset.append(1, 4, &[], &[outcome("Greedy Algorithm", 10.0, 0.002)]);
        dataset.append(2, 4, &[], &[outcome("Greedy Algorithm", 11.0, 0.004)]);
        dataset.append(1, 6, &[], &[outcome("Greedy Algorithm", 12.0, 0.01)]);

        let chart = extended_series(&dataset);
        assert!(chart.projection.is_none());
        assert_eq!(chart.series.len(), 1);
        let points = &chart.series[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, 4);
        assert!((points[0].1 - 0.003).abs() < 1e-12);
        assert_eq!(points[1].0, 6);
    }

    #[test]
    fn test_projection_extends_measured_brute_force() {
        let mut dataset = Dataset::new();
        dataset.append(1, 9, &[], &[outcome(BRUTE_FORCE, 900.0, 0.004)]);
        dataset.append(1, 10, &[], &[outcome(BRUTE_FORCE, 950.0, 0.01)]);

        let chart = extended_series(&dataset);
        let projection = chart.projection.unwrap();
        assert_eq!(projection.algorithm, "Brute Force Theoretical");

        // Measured 9 and 10, then projected 11..=15
        let ns: Vec<usize> = projection.points.iter().map(|p| p.0).collect();
        assert_eq!(ns, vec![9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(*ns.last().unwrap(), PROJECTION_CEILING);

        // The measured prefix carries the real means verbatim
        assert!((projection.points[1].1 - 0.01).abs() < 1e-12);
    }
}

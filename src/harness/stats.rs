//! Summary statistics over the run dataset.
//!
//! The retry policy should keep zero-distance records out of the dataset,
//! but the summarizer does not assume upstream correctness: any iteration
//! containing one is excluded from averages wholesale. Display rows repair
//! zero distances with a great-circle fallback so a table never shows a
//! 0.00 km route, but the repaired value stays strictly presentation-side.

use crate::client::Point;
use crate::harness::dataset::Dataset;

/// Mean earth radius in meters, for the great-circle fallback.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Mean route distance over all iterations free of zero-distance records.
///
/// An iteration with even one `distance == 0` record is excluded entirely;
/// the mean runs over every record of the remaining iterations. Returns
/// `0.0` when no iteration qualifies.
pub fn average_distance_excluding_degenerate_iterations(dataset: &Dataset) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;

    for (iteration, records) in dataset.group_by_iteration() {
        if records.iter().any(|r| r.distance == 0.0) {
            tracing::debug!(iteration, "Skipping iteration with zero-distance record");
            continue;
        }
        for record in records {
            total += record.distance;
            count += 1;
        }
    }

    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// One display row of the per-iteration results table.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub iteration: u32,
    /// 1-based position within the iteration group.
    pub index_in_iteration: usize,
    pub algorithm: String,
    /// Reported distance, or the great-circle fallback when it was zero.
    pub display_distance_m: f64,
    /// Whether the fallback was applied.
    pub distance_repaired: bool,
    pub time_min: f64,
    pub num_nodes: u32,
    pub compute_time_sec: f64,
}

/// Build display rows grouped by ascending iteration id.
///
/// A zero reported distance falls back to the great-circle distance between
/// the first and last point of the algorithm's ordered route. The fallback
/// never feeds back into the dataset or into averaging.
pub fn table_rows(dataset: &Dataset) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(dataset.len());

    for (iteration, records) in dataset.group_by_iteration() {
        for (index, record) in records.iter().enumerate() {
            let mut display_distance_m = record.distance;
            let mut distance_repaired = false;

            if display_distance_m == 0.0 && record.ordered_point_coords.len() > 1 {
                let first = &record.ordered_point_coords[0];
                let last = record
                    .ordered_point_coords
                    .last()
                    .unwrap_or(first);
                display_distance_m = haversine_distance_m(first, last);
                distance_repaired = true;
                tracing::debug!(
                    iteration,
                    algorithm = %record.algorithm,
                    fallback_m = display_distance_m,
                    "Applied great-circle fallback for zero reported distance"
                );
            }

            rows.push(TableRow {
                iteration,
                index_in_iteration: index + 1,
                algorithm: record.algorithm.clone(),
                display_distance_m,
                distance_repaired,
                time_min: record.time,
                num_nodes: record.num_nodes,
                compute_time_sec: record.compute_time_sec,
            });
        }
    }

    rows
}

/// Overall mean distance across records with a non-zero reported distance.
///
/// Coarser than the iteration-excluding average; used for the run-end
/// summary line.
pub fn overall_mean_distance_m(dataset: &Dataset) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for record in dataset.records() {
        if record.distance > 0.0 {
            total += record.distance;
            count += 1;
        }
    }
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Great-circle distance between two points, in meters.
pub fn haversine_distance_m(a: &Point, b: &Point) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

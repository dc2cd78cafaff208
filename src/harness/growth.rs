//! Factorial growth extrapolation for the brute-force algorithm.
//!
//! Brute force is only measured up to [`BRUTE_FORCE_CEILING`] points. Beyond
//! that, its cost is projected: the last measured mean compute time fixes a
//! scale factor against `n!`, and projected times follow `scale * n!` up to
//! [`PROJECTION_CEILING`], clamped at [`PROJECTION_DISPLAY_CAP`] so charted
//! values stay bounded. Factorials use arbitrary-precision integers.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::harness::dataset::Dataset;
use crate::harness::{PROJECTION_CEILING, PROJECTION_DISPLAY_CAP};

/// Fitted growth model for the designated factorial algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthModel {
    /// Largest point count with real measurements.
    pub baseline_n: usize,
    /// Mean compute time at `baseline_n`, in seconds.
    pub baseline_time_sec: f64,
    /// `baseline_time_sec / baseline_n!`.
    pub scale_factor: f64,
}

/// Mean measured compute time at one point count.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredPoint {
    pub n: usize,
    pub mean_time_sec: f64,
}

/// Projected compute time at a point count beyond the measured range.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPoint {
    pub n: usize,
    pub projected_time_sec: f64,
}

/// Measured points, projected points and the model that links them.
///
/// Monotonic by construction: factorial is strictly increasing and the
/// measured points are ordered by `n`.
#[derive(Debug, Clone)]
pub struct GrowthSeries {
    pub model: GrowthModel,
    pub measured: Vec<MeasuredPoint>,
    pub projected: Vec<ProjectedPoint>,
}

/// `n!` with arbitrary-precision arithmetic.
pub fn factorial(n: usize) -> BigUint {
    let mut result = BigUint::from(1u64);
    for i in 2..=n {
        result *= BigUint::from(i as u64);
    }
    result
}

/// Convert a BigUint to f64 through u128, clamping on overflow.
///
/// Factorials up to the projection ceiling fit u128 with room to spare; the
/// clamp keeps the conversion total anyway.
fn biguint_to_f64(v: &BigUint) -> f64 {
    v.to_u128().unwrap_or(u128::MAX) as f64
}

/// Fit a growth model for `algorithm` and project beyond its measured range.
///
/// Mean compute times are taken per point count from the dataset; the
/// largest measured `n` anchors the scale factor. Returns `None` when the
/// dataset holds no measurements for the algorithm at all.
pub fn extrapolate(dataset: &Dataset, algorithm: &str) -> Option<GrowthSeries> {
    let groups = dataset.group_by_algorithm_and_n();

    // BTreeMap ordering gives measured points ascending by n
    let measured: Vec<MeasuredPoint> = groups
        .iter()
        .filter(|((name, _), _)| name == algorithm)
        .map(|((_, n), records)| {
            let sum: f64 = records.iter().map(|r| r.compute_time_sec).sum();
            MeasuredPoint {
                n: *n,
                mean_time_sec: sum / records.len() as f64,
            }
        })
        .collect();

    let last = measured.last()?;
    let baseline_fact = biguint_to_f64(&factorial(last.n));
    let scale_factor = if baseline_fact > 0.0 {
        last.mean_time_sec / baseline_fact
    } else {
        // unreachable: factorial(n) >= 1 for all n
        1.0
    };

    let model = GrowthModel {
        baseline_n: last.n,
        baseline_time_sec: last.mean_time_sec,
        scale_factor,
    };

    let projected = (last.n + 1..=PROJECTION_CEILING)
        .map(|n| {
            let raw = scale_factor * biguint_to_f64(&factorial(n));
            ProjectedPoint {
                n,
                projected_time_sec: raw.min(PROJECTION_DISPLAY_CAP),
            }
        })
        .collect();

    Some(GrowthSeries {
        model,
        measured,
        projected,
    })
}

//! HTTP client for the remote TSP routing service.
//!
//! The service exposes two JSON endpoints the harness consumes:
//! `/select_random_points` (sample N fresh points from the loaded graph) and
//! `/run_all_algos` (solve the currently-held sample with a set of
//! algorithms). The service itself owns the "current sample" state, so a
//! solve is only meaningful immediately after a successful sample — the
//! harness never interleaves trials.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RequestError;

/// Status string the service uses for successful envelopes and outcomes.
pub const STATUS_SUCCESS: &str = "success";

/// Request timeout in seconds.
///
/// A hung solve otherwise stalls the whole run; a timeout surfaces as
/// `RequestError::RequestFailed` and costs only the current iteration.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// One sampled problem point, unique by `id` within a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

/// Result of running one algorithm against the current sample.
///
/// Returned verbatim by the solve endpoint. A `status == "success"` outcome
/// with `distance == 0.0` is a degenerate outcome (sampled points were
/// effectively disconnected), distinct from an explicit failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmOutcome {
    pub algorithm: String,
    pub status: String,
    /// Total route distance in meters.
    #[serde(default)]
    pub distance: f64,
    /// Estimated travel time in minutes.
    #[serde(default)]
    pub time: f64,
    /// Wall-clock seconds the solver spent computing the route.
    #[serde(default)]
    pub compute_time_sec: f64,
    /// Number of graph nodes in the expanded route.
    #[serde(default)]
    pub num_nodes: u32,
    /// Visiting order of the sampled point ids.
    #[serde(default)]
    pub ordered_points: Vec<String>,
    /// Node expansions performed by the solver, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansions: Option<u64>,
    /// Distance ratio against the best algorithm of the round, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic_ratio: Option<f64>,
    /// Error message for `status != "success"` outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AlgorithmOutcome {
    /// Whether the solver reported this outcome as successful.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// A degenerate outcome: reported success with zero route distance.
    pub fn is_degenerate(&self) -> bool {
        self.is_success() && self.distance == 0.0
    }
}

/// Abstraction over the two solver endpoints.
///
/// The production implementation is [`SolverClient`]; tests drive the harness
/// with scripted implementations instead of a live service.
#[async_trait]
pub trait SolverApi: Send + Sync {
    /// Sample `count` fresh points from the service's loaded graph.
    ///
    /// Returns exactly `count` points or an error, never a partial set.
    async fn request_sample(&self, count: usize) -> Result<Vec<Point>, RequestError>;

    /// Solve the currently-held sample with the given algorithms.
    ///
    /// An empty `algorithms` slice asks the service to reuse its last
    /// selection. The outcome list is returned verbatim, unfiltered.
    async fn request_solve(
        &self,
        algorithms: &[String],
    ) -> Result<Vec<AlgorithmOutcome>, RequestError>;
}

/// HTTP implementation of [`SolverApi`] against a running routing service.
pub struct SolverClient {
    /// HTTP client for making API requests.
    client: Client,
    /// Base URL of the routing service, without trailing slash.
    base_url: String,
}

impl SolverClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client - system TLS configuration error"),
            base_url,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the JSON response envelope.
    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RequestError> {
        let url = format!("{}{}", self.base_url, path);
        let http_response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RequestError::RequestFailed(e.to_string()))?;

        let status = http_response.status();
        if !status.is_success() {
            let error_text = http_response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(RequestError::ApiError {
                code: status.as_u16(),
                message: error_text,
            });
        }

        http_response
            .json()
            .await
            .map_err(|e| RequestError::ParseError(format!("Failed to decode response: {}", e)))
    }
}

#[async_trait]
impl SolverApi for SolverClient {
    async fn request_sample(&self, count: usize) -> Result<Vec<Point>, RequestError> {
        let request = SampleRequest { count };
        let response: SampleResponse = self.post_json("/select_random_points", &request).await?;

        if response.status != STATUS_SUCCESS {
            return Err(RequestError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "sample request rejected without message".to_string()),
            ));
        }

        check_sample_size(response.points.unwrap_or_default(), count)
    }

    async fn request_solve(
        &self,
        algorithms: &[String],
    ) -> Result<Vec<AlgorithmOutcome>, RequestError> {
        let request = SolveRequest {
            algos: algorithms.to_vec(),
        };
        let response: SolveResponse = self.post_json("/run_all_algos", &request).await?;

        if response.status != STATUS_SUCCESS {
            return Err(RequestError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "solve request rejected without message".to_string()),
            ));
        }

        for warning in &response.warnings {
            tracing::warn!(warning = %warning, "Solver warning");
        }

        Ok(response.results.unwrap_or_default())
    }
}

/// Validate that a sample holds exactly the requested number of points.
///
/// A short sample is never returned to callers; trial logic only ever sees
/// full samples or an error.
fn check_sample_size(points: Vec<Point>, requested: usize) -> Result<Vec<Point>, RequestError> {
    if points.len() != requested {
        return Err(RequestError::PartialSample {
            requested,
            got: points.len(),
        });
    }
    Ok(points)
}

/// Request body for the sample endpoint.
#[derive(Debug, Serialize)]
struct SampleRequest {
    count: usize,
}

/// Response envelope from the sample endpoint.
#[derive(Debug, Deserialize)]
struct SampleResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    points: Option<Vec<Point>>,
}

/// Request body for the solve endpoint.
#[derive(Debug, Serialize)]
struct SolveRequest {
    algos: Vec<String>,
}

/// Response envelope from the solve endpoint.
#[derive(Debug, Deserialize)]
struct SolveResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    results: Option<Vec<AlgorithmOutcome>>,
    #[serde(default)]
    warnings: Vec<String>,
}

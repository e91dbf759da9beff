use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::models::AnalysisResponse;

pub const MIN_POINTS: i64 = 10;
pub const MAX_POINTS: i64 = 500;
pub const MIN_DAYS: i64 = 7;
pub const MAX_DAYS: i64 = 90;

const HEALTH_PATH: &str = "/api/analyze/health";
const ANALYZE_PATH: &str = "/api/analyze/uhi";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shown when a rejected payload carries no error message of its own.
const REJECTED_FALLBACK: &str = "backend rejected the analysis request";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend returned HTTP {status}")]
    Http { status: StatusCode },
    #[error("analysis failed: {message}")]
    Api { message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin wrapper over the two backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the health endpoint. The body is ignored; any transport
    /// failure or non-success status reads as unhealthy.
    pub async fn check_health(&self) -> bool {
        match self.http.get(self.endpoint(HEALTH_PATH)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Run one analysis request. Parameters are not range-checked here;
    /// callers validate with [`validate_parameters`] first.
    pub async fn fetch_analysis(
        &self,
        num_points: i64,
        days_back: i64,
    ) -> Result<AnalysisResponse, ClientError> {
        let response = self
            .http
            .get(self.endpoint(ANALYZE_PATH))
            .query(&[("points", num_points), ("days", days_back)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http { status });
        }

        let payload: AnalysisResponse = response.json().await?;
        accept_payload(payload)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Enforce the payload's own success flag.
fn accept_payload(payload: AnalysisResponse) -> Result<AnalysisResponse, ClientError> {
    if payload.success {
        return Ok(payload);
    }

    let message = payload
        .error
        .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
    Err(ClientError::Api { message })
}

/// Range checks for the two request parameters. Returns one human-readable
/// message per violated bound; an empty list means the pair is valid.
pub fn validate_parameters(num_points: i64, days_back: i64) -> Vec<String> {
    let mut problems = Vec::new();

    if !(MIN_POINTS..=MAX_POINTS).contains(&num_points) {
        problems.push(format!(
            "sample points must be between {MIN_POINTS} and {MAX_POINTS}, got {num_points}"
        ));
    }

    if !(MIN_DAYS..=MAX_DAYS).contains(&days_back) {
        problems.push(format!(
            "history window must be between {MIN_DAYS} and {MAX_DAYS} days, got {days_back}"
        ));
    }

    problems
}

//! Hevy API integration.
//!
//! Only the paginated "list workouts" endpoint is used. Requests block; the
//! client is built once per run.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::{ApiConfig, SecretValue, Workout};

/// Error type for Hevy API operations.
#[derive(Debug, thiserror::Error)]
pub enum HevyError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error
    #[error("Hevy API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No API key configured
    #[error("Missing Hevy API key")]
    MissingApiKey,
}

/// Result type for Hevy operations.
pub type HevyResult<T> = Result<T, HevyError>;

/// One page of the workout listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPage {
    /// Page number (1-based)
    #[serde(default)]
    pub page: Option<u32>,

    /// Total number of pages
    #[serde(default)]
    pub page_count: Option<u32>,

    /// Workouts, newest first. Records that do not parse are skipped.
    #[serde(default, deserialize_with = "skip_malformed_workouts")]
    pub workouts: Vec<Workout>,
}

fn skip_malformed_workouts<'de, D>(deserializer: D) -> Result<Vec<Workout>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let workouts = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Workout>(record) {
            Ok(workout) => Some(workout),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed workout record");
                None
            }
        })
        .collect();
    Ok(workouts)
}

/// Anything that can serve pages of workouts, newest first.
pub trait WorkoutSource {
    /// Fetch one page (1-based).
    fn workouts_page(&self, page: u32, page_size: u32) -> HevyResult<WorkoutPage>;
}

/// Hevy API client.
pub struct HevyClient {
    /// API base URL
    base_url: String,

    /// API key
    api_key: SecretValue,

    /// HTTP client
    client: reqwest::blocking::Client,
}

impl HevyClient {
    /// Create a new Hevy client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretValue,
        timeout: Duration,
    ) -> HevyResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(format!("liftmenu/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, api_key, client })
    }

    /// Create a client from API settings. Fails without an API key.
    pub fn from_config(config: &ApiConfig) -> HevyResult<Self> {
        let api_key = config.api_key.clone().ok_or(HevyError::MissingApiKey)?;
        Self::new(&config.base_url, api_key, Duration::from_secs(config.timeout_secs))
    }

    /// URL of the workouts endpoint.
    fn workouts_url(&self) -> String {
        format!("{}/workouts", self.base_url)
    }

    /// Handle API response.
    fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::blocking::Response,
    ) -> HevyResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().map_err(|e| HevyError::InvalidResponse(e.to_string()))
        } else {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());

            match status.as_u16() {
                401 | 403 => Err(HevyError::Auth(message)),
                _ => Err(HevyError::Api { status: status.as_u16(), message }),
            }
        }
    }
}

impl WorkoutSource for HevyClient {
    fn workouts_page(&self, page: u32, page_size: u32) -> HevyResult<WorkoutPage> {
        tracing::debug!(page, page_size, "Requesting workouts page");

        let response = self
            .client
            .get(self.workouts_url())
            .header("api-key", self.api_key.expose())
            .header("accept", "application/json")
            .query(&[("page", page), ("pageSize", page_size)])
            .send()?;

        self.handle_response(response)
    }
}

impl std::fmt::Debug for HevyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HevyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

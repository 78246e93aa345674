//! Run orchestration.
//!
//! `App` owns the configuration for one invocation and wires the pipeline
//! together: fetch -> group -> recommend -> render. Sending is left to the
//! caller so previews and dry runs share the same path.

use chrono::{DateTime, Utc};

use crate::core::{Config, ProgressionEngine, RoutineSnapshot};
use crate::integrations::{
    fetch_workouts, FetchPolicy, FetchReport, FetchStop, HevyClient, HevyError, OutgoingEmail,
    WorkoutSource,
};
use crate::report::{render_html, render_text, Report};

/// Exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for unexpected failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the API key is missing.
pub const EXIT_MISSING_CREDENTIAL: i32 = 2;
/// Exit code when no workouts were found.
pub const EXIT_NO_DATA: i32 = 3;
/// Exit code when the API could not be reached at all.
pub const EXIT_FETCH_FAILED: i32 = 4;

/// Pipeline failures that end a run with a dedicated exit code.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// No API key in the environment
    #[error("HEVY_API_KEY is missing")]
    MissingApiKey,

    /// The API answered but had no workouts
    #[error("No workouts found")]
    NoData,

    /// The first page request failed
    #[error("Could not fetch workouts (page {page}): {error}")]
    FetchFailed { page: u32, error: String },

    /// The HTTP client could not be created
    #[error("Failed to create Hevy client: {0}")]
    Client(#[source] HevyError),
}

impl RunError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingApiKey => EXIT_MISSING_CREDENTIAL,
            Self::NoData => EXIT_NO_DATA,
            Self::FetchFailed { .. } => EXIT_FETCH_FAILED,
            Self::Client(_) => EXIT_FAILURE,
        }
    }
}

/// Everything produced by one pass of the pipeline.
#[derive(Debug, Clone)]
pub struct Menu {
    /// How the fetch went
    pub fetch: FetchReport,

    /// Latest workout per routine
    pub routines: RoutineSnapshot,

    /// Recommendations per routine
    pub report: Report,
}

/// Application state for one invocation.
#[derive(Debug, Clone)]
pub struct App {
    /// Effective configuration
    config: Config,

    /// Recommendation engine built from the config
    engine: ProgressionEngine,
}

impl App {
    /// Create the app from a fully resolved configuration.
    pub fn new(config: Config) -> Self {
        let engine = ProgressionEngine::new(config.progression.clone());
        Self { config, engine }
    }

    /// Effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recommendation engine.
    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    /// Build the Hevy client. Fails before any network activity when the
    /// API key is missing.
    pub fn hevy_client(&self) -> Result<HevyClient, RunError> {
        if self.config.api.api_key.is_none() {
            return Err(RunError::MissingApiKey);
        }
        HevyClient::from_config(&self.config.api).map_err(|e| match e {
            HevyError::MissingApiKey => RunError::MissingApiKey,
            other => RunError::Client(other),
        })
    }

    /// Fetch, group and evaluate workouts from `source`.
    pub fn build_menu(&self, source: &dyn WorkoutSource, now: DateTime<Utc>) -> Result<Menu, RunError> {
        let policy = FetchPolicy::from_config(&self.config.fetch, now);
        tracing::info!(?policy, "Fetching workout history");

        let fetch = fetch_workouts(source, policy, self.config.api.page_size);
        tracing::info!(
            workouts = fetch.workouts.len(),
            pages = fetch.pages_fetched,
            stop = ?fetch.stop,
            "Fetch finished"
        );

        if fetch.failed_outright() {
            if let FetchStop::Failed { page, error } = &fetch.stop {
                return Err(RunError::FetchFailed { page: *page, error: error.clone() });
            }
        }

        let routines = RoutineSnapshot::group(fetch.workouts.iter().cloned());
        if routines.is_empty() {
            return Err(RunError::NoData);
        }

        let report = Report::build(&routines, &self.engine, now);
        Ok(Menu { fetch, routines, report })
    }

    /// Subject line, honouring a configured override.
    pub fn subject(&self, report: &Report) -> String {
        self.config.email.subject.clone().unwrap_or_else(|| report.subject(self.config.fetch.mode))
    }

    /// Render the email for `report`.
    pub fn email_for(&self, report: &Report) -> OutgoingEmail {
        OutgoingEmail {
            subject: self.subject(report),
            text: render_text(report),
            html: render_html(report),
        }
    }
}

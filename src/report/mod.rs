//! Workout menu report.
//!
//! [`Report::build`] runs every exercise of every routine through the
//! progression engine. The text and HTML renderers only format what the
//! report holds, so both bodies always carry the same information.

mod html;
mod text;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use html::render_html;
pub use text::render_text;

use crate::core::{FetchMode, ProgressionEngine, Recommendation, RoutineSnapshot, WeightUnit};

/// Heading shown at the top of both bodies.
pub const REPORT_TITLE: &str = "Your Workout Menu";

/// Line shown under the heading.
pub const REPORT_INTRO: &str = "Targets calculated for your next session of each routine.";

/// Shown for a routine where no exercise produced a recommendation.
pub const EMPTY_ROUTINE: &str = "No weighted sets to progress.";

/// Format used for routine dates ("May 03").
pub const DATE_FORMAT: &str = "%b %d";

/// Recommendations for one routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineReport {
    /// Routine title
    pub title: String,

    /// Start of the workout the recommendations are based on
    pub last_performed: Option<DateTime<Utc>>,

    /// One entry per exercise that produced a recommendation
    pub recommendations: Vec<Recommendation>,
}

impl RoutineReport {
    /// "May 03" label for the routine's last session.
    pub fn last_performed_label(&self) -> Option<String> {
        self.last_performed.map(|dt| dt.format(DATE_FORMAT).to_string())
    }
}

/// The full menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Unit weights are shown in
    pub unit: WeightUnit,

    /// Routines in grouping order
    pub routines: Vec<RoutineReport>,
}

impl Report {
    /// Build the report for every routine in `snapshot`.
    pub fn build(
        snapshot: &RoutineSnapshot,
        engine: &ProgressionEngine,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let routines = snapshot
            .iter()
            .map(|(title, workout)| RoutineReport {
                title: title.to_string(),
                last_performed: workout.started_at(),
                recommendations: workout
                    .exercises()
                    .iter()
                    .filter_map(|exercise| engine.recommend(exercise.title(), exercise.sets()))
                    .collect(),
            })
            .collect();

        Self { generated_at, unit: engine.config().unit, routines }
    }

    /// Total number of recommendations across routines.
    pub fn recommendation_count(&self) -> usize {
        self.routines.iter().map(|r| r.recommendations.len()).sum()
    }

    /// Earliest and latest session covered, if any dates are known.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let dates = self.routines.iter().filter_map(|r| r.last_performed);
        dates.fold(None, |range, dt| match range {
            None => Some((dt, dt)),
            Some((lo, hi)) => Some((lo.min(dt), hi.max(dt))),
        })
    }

    /// Subject line for the email.
    ///
    /// The window policy names the covered dates; the page policy uses a
    /// fixed title.
    pub fn subject(&self, mode: FetchMode) -> String {
        match (mode, self.date_range()) {
            (FetchMode::Window, Some((first, last))) => format!(
                "🏋️ Weekly Workout Menu ({} - {})",
                first.format(DATE_FORMAT),
                last.format(DATE_FORMAT)
            ),
            _ => "🏋️ Next Workout Menu (All Routines)".to_string(),
        }
    }
}

//! Workout history as delivered by the Hevy API.
//!
//! Every numeric field on a set may be missing, `null` or mistyped. Set
//! fields are read leniently: integral floats and numeric strings are
//! accepted, anything else reads as missing. Nothing here fills in defaults
//! except [`WorkoutSet::normalize`], which produces the fully populated
//! [`NormalizedSet`] the progression rules work on.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when a workout has none.
pub const UNKNOWN_WORKOUT: &str = "Unknown Workout";

/// Title used when an exercise has none.
pub const UNKNOWN_EXERCISE: &str = "Unknown Exercise";

/// RPE assumed when a set was logged without one.
pub const DEFAULT_RPE: f64 = 8.0;

/// One completed training session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Hevy workout id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Routine name (not unique across time)
    #[serde(default)]
    pub title: Option<String>,

    /// Start time, ISO-8601 (usually with a trailing `Z`)
    #[serde(default)]
    pub start_time: Option<String>,

    /// Exercises in the order they were performed
    #[serde(default)]
    pub exercises: Option<Vec<Exercise>>,
}

impl Workout {
    /// Routine title, falling back to [`UNKNOWN_WORKOUT`].
    pub fn title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNKNOWN_WORKOUT,
        }
    }

    /// Exercises performed, empty when the field was missing or `null`.
    pub fn exercises(&self) -> &[Exercise] {
        self.exercises.as_deref().unwrap_or_default()
    }

    /// Start time as UTC, or `None` if absent or unparseable.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_timestamp)
    }
}

/// A movement performed within a workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name
    #[serde(default)]
    pub title: Option<String>,

    /// Sets in the order they were completed
    #[serde(default)]
    pub sets: Option<Vec<WorkoutSet>>,
}

impl Exercise {
    /// Exercise name, falling back to [`UNKNOWN_EXERCISE`].
    pub fn title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNKNOWN_EXERCISE,
        }
    }

    /// Sets performed, empty when the field was missing or `null`.
    pub fn sets(&self) -> &[WorkoutSet] {
        self.sets.as_deref().unwrap_or_default()
    }
}

/// One performed set, exactly as the API reported it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Repetitions
    #[serde(default, deserialize_with = "lenient_int")]
    pub reps: Option<i64>,

    /// Weight lifted in kilograms
    #[serde(default, deserialize_with = "lenient_float")]
    pub weight_kg: Option<f64>,

    /// Rate of perceived exertion
    #[serde(default, deserialize_with = "lenient_float")]
    pub rpe: Option<f64>,
}

impl WorkoutSet {
    /// Convenience constructor used by tests and the `recommend` command.
    pub fn new(reps: i64, weight_kg: f64, rpe: Option<f64>) -> Self {
        Self { reps: Some(reps), weight_kg: Some(weight_kg), rpe }
    }

    /// Fill in defaults: missing (or negative) reps become 0, missing weight
    /// becomes 0 kg and missing RPE becomes [`DEFAULT_RPE`].
    pub fn normalize(&self) -> NormalizedSet {
        NormalizedSet {
            reps: self.reps.and_then(|r| u32::try_from(r).ok()).unwrap_or(0),
            weight_kg: self.weight_kg.filter(|w| w.is_finite()).unwrap_or(0.0),
            rpe: self.rpe.filter(|r| r.is_finite()).unwrap_or(DEFAULT_RPE),
        }
    }
}

/// A set with every field populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSet {
    /// Repetitions
    pub reps: u32,
    /// Weight lifted in kilograms
    pub weight_kg: f64,
    /// Rate of perceived exertion
    pub rpe: f64,
}

/// Largest magnitude an `f64` carries without losing integer precision.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    value_as_f64(value).filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT).map(|f| f as i64)
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = value.as_ref().and_then(value_as_i64);
    if parsed.is_none() && value.as_ref().is_some_and(|v| !v.is_null()) {
        tracing::debug!(?value, "Ignoring non-integer set field");
    }
    Ok(parsed)
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = value.as_ref().and_then(value_as_f64);
    if parsed.is_none() && value.as_ref().is_some_and(|v| !v.is_null()) {
        tracing::debug!(?value, "Ignoring non-numeric set field");
    }
    Ok(parsed)
}

/// Parse an API timestamp into UTC.
///
/// Accepts RFC 3339 (`2024-05-01T17:30:00Z`, `...+02:00`) and zone-less
/// timestamps, which are taken to be UTC already.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

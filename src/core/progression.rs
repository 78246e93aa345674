//! Progressive-overload recommendations.
//!
//! A reference set is picked from each exercise, normalized, and run through
//! an ordered rule ladder. The first rule whose predicate matches decides the
//! action:
//!
//! | # | action          | when                                   | target                      |
//! |---|-----------------|----------------------------------------|-----------------------------|
//! | 1 | INCREASE WEIGHT | reps >= goal and RPE <= trigger        | weight + increment          |
//! | 2 | ADD REPS        | reps < goal and RPE < 9                | min(reps + 2, goal) reps    |
//! | 3 | DELOAD          | reps < goal - 4 and RPE >= 9.5         | weight x 0.90               |
//! | 4 | MAINTAIN        | anything else                          | same weight, one more rep   |
//!
//! Sets with zero reps (cardio, planks, duration-only entries) get no
//! recommendation at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::ProgressionConfig;
use super::units::{format_number, round_to};
use super::workout::{NormalizedSet, WorkoutSet};

/// RPE below which the lifter still has reps in the tank.
pub const ADD_REPS_RPE_CEILING: f64 = 9.0;

/// Reps added per session while building towards the goal.
pub const REP_STEP: u32 = 2;

/// How far below the goal reps a set must fall to count as a dip.
pub const DELOAD_REP_MARGIN: u32 = 4;

/// RPE at or above which a low-rep set triggers a deload.
pub const DELOAD_RPE: f64 = 9.5;

/// Fraction of the working weight kept after a deload.
pub const DELOAD_FACTOR: f64 = 0.90;

/// What to do next session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Goal reps reached comfortably
    IncreaseWeight,
    /// Under the goal with reps in reserve
    AddReps,
    /// Low reps at near-maximal effort
    Deload,
    /// Close to the limit
    Maintain,
}

impl Action {
    /// Every action, in rule order.
    pub const ALL: [Self; 4] = [Self::IncreaseWeight, Self::AddReps, Self::Deload, Self::Maintain];

    /// Tag shown in reports.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::IncreaseWeight => "INCREASE WEIGHT",
            Self::AddReps => "ADD REPS",
            Self::Deload => "DELOAD",
            Self::Maintain => "MAINTAIN",
        }
    }

    /// Display color used by the HTML report.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::IncreaseWeight => "green",
            Self::AddReps => "blue",
            Self::Deload => "red",
            Self::Maintain => "black",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which set of an exercise the recommendation is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSet {
    /// The most recently completed set
    #[default]
    Last,
    /// The heaviest set (first one wins on ties)
    Heaviest,
}

impl ReferenceSet {
    /// Pick the reference set, or `None` for an empty exercise.
    pub fn select<'a>(&self, sets: &'a [WorkoutSet]) -> Option<&'a WorkoutSet> {
        match self {
            Self::Last => sets.last(),
            Self::Heaviest => sets.iter().fold(None, |best: Option<&WorkoutSet>, set| match best {
                Some(b) if set.normalize().weight_kg <= b.normalize().weight_kg => Some(b),
                _ => Some(set),
            }),
        }
    }
}

impl std::str::FromStr for ReferenceSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" => Ok(Self::Last),
            "heaviest" | "max" => Ok(Self::Heaviest),
            other => Err(format!("unknown reference set '{other}' (expected last or heaviest)")),
        }
    }
}

/// The prescription for next session. Weights are in the display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// Work at a new weight
    Weight {
        /// New working weight
        weight: f64,
    },
    /// Keep the weight and chase a rep count
    Reps {
        /// Rep goal
        reps: u32,
        /// Unchanged working weight
        weight: f64,
    },
}

impl Target {
    /// Working weight for next session.
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Weight { weight } | Self::Reps { weight, .. } => *weight,
        }
    }

    /// Rep goal, if the target is rep-based.
    pub const fn reps(&self) -> Option<u32> {
        match self {
            Self::Weight { .. } => None,
            Self::Reps { reps, .. } => Some(*reps),
        }
    }
}

/// Recommendation for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Exercise name
    pub exercise: String,
    /// The normalized reference set
    pub reference: NormalizedSet,
    /// One-line summary of the reference set, e.g. `12 reps @ 110.2 lbs (RPE 8)`
    pub summary: String,
    /// Chosen action
    pub action: Action,
    /// Human-readable instruction
    pub detail: String,
    /// Next-session target
    pub target: Target,
}

impl Recommendation {
    /// Display color for the action.
    pub fn color(&self) -> &'static str {
        self.action.color()
    }
}

/// Everything a rule needs: the normalized set and its weight in the display unit.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The normalized reference set
    pub set: &'a NormalizedSet,
    /// Reference weight in the display unit, rounded
    pub weight: f64,
    /// Progression settings
    pub config: &'a ProgressionConfig,
}

/// One step of the ladder.
pub struct Rule {
    /// Action produced when the rule matches
    pub action: Action,
    /// Whether the rule applies
    pub applies: fn(&RuleInput<'_>) -> bool,
    /// Target and detail text for a matching set
    pub build: fn(&RuleInput<'_>) -> (Target, String),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("action", &self.action).finish()
    }
}

/// The ladder, evaluated top-down. The last rule always matches.
pub static RULES: [Rule; 4] = [
    Rule { action: Action::IncreaseWeight, applies: increase_applies, build: increase_target },
    Rule { action: Action::AddReps, applies: add_reps_applies, build: add_reps_target },
    Rule { action: Action::Deload, applies: deload_applies, build: deload_target },
    Rule { action: Action::Maintain, applies: maintain_applies, build: maintain_target },
];

fn increase_applies(input: &RuleInput<'_>) -> bool {
    input.set.reps >= input.config.goal_reps && input.set.rpe <= input.config.rpe_trigger
}

fn increase_target(input: &RuleInput<'_>) -> (Target, String) {
    let precision = input.config.precision();
    let unit = input.config.unit.label();
    let increment = input.config.increment();
    let weight = round_to(input.weight + increment, precision);
    let detail = format!(
        "Add {} {unit}. New Target: {} {unit}.",
        format_number(increment, precision),
        format_number(weight, precision)
    );
    (Target::Weight { weight }, detail)
}

fn add_reps_applies(input: &RuleInput<'_>) -> bool {
    input.set.reps < input.config.goal_reps && input.set.rpe < ADD_REPS_RPE_CEILING
}

fn add_reps_target(input: &RuleInput<'_>) -> (Target, String) {
    let reps = input.set.reps.saturating_add(REP_STEP).min(input.config.goal_reps);
    let detail = format!(
        "Keep weight ({} {}). Push for {reps} reps.",
        format_number(input.weight, input.config.precision()),
        input.config.unit.label()
    );
    (Target::Reps { reps, weight: input.weight }, detail)
}

fn deload_applies(input: &RuleInput<'_>) -> bool {
    input.set.reps < input.config.goal_reps.saturating_sub(DELOAD_REP_MARGIN)
        && input.set.rpe >= DELOAD_RPE
}

fn deload_target(input: &RuleInput<'_>) -> (Target, String) {
    let precision = input.config.precision();
    let weight = round_to(input.weight * DELOAD_FACTOR, precision);
    let detail = format!(
        "Performance dip. Drop to {} {} to rebuild volume.",
        format_number(weight, precision),
        input.config.unit.label()
    );
    (Target::Weight { weight }, detail)
}

const fn maintain_applies(_input: &RuleInput<'_>) -> bool {
    true
}

fn maintain_target(input: &RuleInput<'_>) -> (Target, String) {
    let detail = format!(
        "Keep weight ({} {}). Squeeze out 1 more rep.",
        format_number(input.weight, input.config.precision()),
        input.config.unit.label()
    );
    (Target::Reps { reps: input.set.reps.saturating_add(1), weight: input.weight }, detail)
}

/// Applies [`RULES`] to exercises.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    config: ProgressionConfig,
}

impl ProgressionEngine {
    /// Create an engine with the given settings.
    pub fn new(config: ProgressionConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Reference weight of a set in the display unit, rounded.
    pub fn display_weight(&self, set: &NormalizedSet) -> f64 {
        round_to(self.config.unit.from_kg(set.weight_kg), self.config.precision())
    }

    /// The first rule matching `set`.
    ///
    /// This is the bare ladder: it does not skip zero-rep sets.
    pub fn matching_rule(&self, set: &NormalizedSet) -> &'static Rule {
        let input = RuleInput { set, weight: self.display_weight(set), config: &self.config };
        RULES.iter().find(|rule| (rule.applies)(&input)).unwrap_or(&RULES[RULES.len() - 1])
    }

    /// Classify a normalized set without building the full recommendation.
    pub fn classify(&self, set: &NormalizedSet) -> Action {
        self.matching_rule(set).action
    }

    /// Recommend what to do next time for `exercise`.
    ///
    /// Returns `None` for an exercise without sets and for a reference set
    /// with zero reps.
    pub fn recommend(&self, exercise: &str, sets: &[WorkoutSet]) -> Option<Recommendation> {
        let reference = self.config.reference_set.select(sets)?.normalize();
        if reference.reps == 0 {
            tracing::debug!(exercise, "Skipping zero-rep reference set");
            return None;
        }

        let weight = self.display_weight(&reference);
        let input = RuleInput { set: &reference, weight, config: &self.config };
        let rule = self.matching_rule(&reference);
        let (target, detail) = (rule.build)(&input);

        let precision = self.config.precision();
        let summary = format!(
            "{} reps @ {} {} (RPE {})",
            reference.reps,
            format_number(weight, precision),
            self.config.unit.label(),
            format_number(reference.rpe, MAX_RPE_PRECISION)
        );

        Some(Recommendation {
            exercise: exercise.to_string(),
            reference,
            summary,
            action: rule.action,
            detail,
            target,
        })
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new(ProgressionConfig::default())
    }
}

const MAX_RPE_PRECISION: u32 = 1;

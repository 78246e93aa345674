//! Core types and functionality for liftmenu.
//!
//! This module contains the workout data model, the progression rules,
//! routine grouping, units and configuration.

mod config;
mod progression;
mod routine;
mod secret;
mod units;
mod workout;

pub use config::{
    ApiConfig, Config, ConfigError, EmailConfig, FetchConfig, FetchMode, ProgressionConfig,
    ENV_API_KEY, ENV_API_URL, ENV_EMAIL_PASSWORD, ENV_EMAIL_RECEIVER, ENV_EMAIL_SENDER,
    LOCAL_CONFIG_FILE,
};
pub use progression::{
    Action, ProgressionEngine, Recommendation, ReferenceSet, Rule, RuleInput, Target,
    ADD_REPS_RPE_CEILING, DELOAD_FACTOR, DELOAD_REP_MARGIN, DELOAD_RPE, REP_STEP, RULES,
};
pub use routine::RoutineSnapshot;
pub use secret::SecretValue;
pub use units::{format_number, round_to, WeightUnit, LB_PER_KG, MAX_PRECISION};
pub use workout::{
    parse_timestamp, Exercise, NormalizedSet, Workout, WorkoutSet, DEFAULT_RPE, UNKNOWN_EXERCISE,
    UNKNOWN_WORKOUT,
};

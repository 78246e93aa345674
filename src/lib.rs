#![allow(clippy::format_push_string)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]

//! # liftmenu
//!
//! Progressive-overload workout menu from your Hevy history, delivered by email.
//!
//! liftmenu pulls your recent workouts from the Hevy API, keeps the latest
//! session of every routine, and works out what to do next time for each
//! exercise: add weight, add reps, deload, or hold.
//!
//! ## Pipeline
//!
//! - **Fetch**: page through `/v1/workouts`, either a fixed number of pages or
//!   a rolling window of days
//! - **Group**: one workout (the newest) per routine title
//! - **Recommend**: an ordered rule ladder over the reference set of each exercise
//! - **Render**: plain-text and HTML bodies with the same content
//! - **Notify**: one multipart email over SMTP, best effort
//!
//! ## Quick Start
//!
//! ```bash
//! export HEVY_API_KEY=...
//! export EMAIL_SENDER=me@gmail.com EMAIL_PASSWORD=... EMAIL_RECEIVER=me@gmail.com
//!
//! # Fetch, build the menu and email it
//! liftmenu
//!
//! # Print the menu instead
//! liftmenu preview --format text
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::use_self)]

pub mod app;
pub mod core;
pub mod integrations;
pub mod report;

// Re-export commonly used types
pub use app::{App, Menu, RunError};
pub use core::{
    Action, Config, ProgressionConfig, ProgressionEngine, Recommendation, ReferenceSet,
    RoutineSnapshot, Target, WeightUnit, Workout, WorkoutSet,
};
pub use integrations::{
    fetch_workouts, notify, FetchPolicy, FetchReport, FetchStop, HevyClient, MailTransport,
    OutgoingEmail, SmtpMailer, WorkoutSource,
};
pub use report::{render_html, render_text, Report};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "liftmenu";

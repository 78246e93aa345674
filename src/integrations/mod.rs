//! External integrations module.
//!
//! The Hevy workout API (read side) and SMTP email delivery (write side).

pub mod email;
pub mod fetcher;
pub mod hevy;

pub use email::{build_message, notify, MailError, MailResult, MailTransport, OutgoingEmail, SmtpMailer};
pub use fetcher::{fetch_workouts, FetchPolicy, FetchReport, FetchStop};
pub use hevy::{HevyClient, HevyError, HevyResult, WorkoutPage, WorkoutSource};

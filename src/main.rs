//! liftmenu - progressive-overload workout menu from your Hevy history.
//!
//! Fetches recent workouts, keeps the latest session per routine, works out
//! the next target for every exercise and emails the menu.

#![allow(clippy::single_match_else)]

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use liftmenu::app::EXIT_FAILURE;
use liftmenu::core::{
    Config, FetchMode, SecretValue, ENV_API_KEY, ENV_EMAIL_PASSWORD, ENV_EMAIL_RECEIVER,
    ENV_EMAIL_SENDER,
};
use liftmenu::{
    notify, render_html, render_text, App, ReferenceSet, RunError, SmtpMailer, WeightUnit,
    WorkoutSet,
};

/// Progressive-overload workout menu from your Hevy history
#[derive(Parser)]
#[command(name = "liftmenu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default locations
    #[arg(short, long, global = true, env = "LIFTMENU_CONFIG")]
    config: Option<PathBuf>,

    /// Display unit for weights (kg, lb)
    #[arg(long, global = true)]
    unit: Option<WeightUnit>,

    /// Weight added on INCREASE WEIGHT, in the display unit
    #[arg(long, global = true)]
    increment: Option<f64>,

    /// Fetch a fixed number of pages
    #[arg(long, global = true, conflicts_with = "window_days")]
    pages: Option<u32>,

    /// Fetch every workout from the last N days
    #[arg(long, global = true)]
    window_days: Option<u32>,

    /// Set each recommendation is based on (last, heaviest)
    #[arg(long, global = true)]
    reference_set: Option<ReferenceSet>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch workouts, build the menu and email it (default)
    Run {
        /// Print the email instead of sending it
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Build the menu and print it without sending
    Preview {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = PreviewFormat::Text)]
        format: PreviewFormat,
    },

    /// Recommend the next step for a single set (offline)
    Recommend {
        /// Exercise name
        #[arg(short, long, default_value = "Exercise")]
        exercise: String,

        /// Reps performed
        #[arg(short, long)]
        reps: i64,

        /// Weight lifted, in kilograms
        #[arg(short, long)]
        weight_kg: f64,

        /// Rate of perceived exertion (defaults to 8)
        #[arg(long)]
        rpe: Option<f64>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewFormat {
    Text,
    Html,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    if let Err(err) = dispatch(cli) {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<RunError>().map_or(EXIT_FAILURE, RunError::exit_code);
        std::process::exit(code);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    // Commands that need no configuration
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            cmd_completions(*shell);
            return Ok(());
        }
        Some(Commands::Config { path: true }) => {
            cmd_config_path(cli.config.as_deref());
            return Ok(());
        }
        _ => {}
    }

    let app = App::new(load_config(&cli)?);

    match cli.command {
        None => cmd_run(&app, false),
        Some(Commands::Run { dry_run }) => cmd_run(&app, dry_run),
        Some(Commands::Preview { format }) => cmd_preview(&app, format),
        Some(Commands::Recommend { exercise, reps, weight_kg, rpe }) => {
            cmd_recommend(&app, &exercise, reps, weight_kg, rpe);
            Ok(())
        }
        Some(Commands::Config { .. }) => cmd_config(app.config()),
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// Resolve configuration: file, then `.env` and the environment, then flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    config.apply_env();

    if let Some(unit) = cli.unit {
        config.progression.unit = unit;
    }
    if let Some(increment) = cli.increment {
        config.progression.increment = Some(increment);
    }
    if let Some(reference_set) = cli.reference_set {
        config.progression.reference_set = reference_set;
    }
    if let Some(pages) = cli.pages {
        config.fetch.mode = FetchMode::Pages;
        config.fetch.max_pages = pages;
    }
    if let Some(days) = cli.window_days {
        config.fetch.mode = FetchMode::Window;
        config.fetch.window_days = days;
    }

    Ok(config)
}

/// Fetch, build the menu and email it.
fn cmd_run(app: &App, dry_run: bool) -> Result<()> {
    let client = app.hevy_client()?;

    println!("Fetching workout history...");
    let menu = app.build_menu(&client, Utc::now())?;
    println!("Found {} active routines: {:?}", menu.routines.len(), menu.routines.titles());

    let email = app.email_for(&menu.report);
    if dry_run {
        println!("\nSubject: {}\n", email.subject);
        print!("{}", email.text);
        return Ok(());
    }

    match SmtpMailer::from_config(&app.config().email) {
        Ok(mailer) => {
            if notify(&mailer, &email) {
                println!("Email sent successfully!");
            } else {
                eprintln!("Failed to send email.");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Email delivery is not configured");
            eprintln!("Failed to send email: {e}");
        }
    }

    Ok(())
}

/// Build the menu and print one rendering of it.
fn cmd_preview(app: &App, format: PreviewFormat) -> Result<()> {
    let client = app.hevy_client()?;
    let menu = app.build_menu(&client, Utc::now())?;

    match format {
        PreviewFormat::Text => print!("{}", render_text(&menu.report)),
        PreviewFormat::Html => print!("{}", render_html(&menu.report)),
        PreviewFormat::Json => {
            let json = serde_json::to_string_pretty(&menu.report)
                .context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Classify a single set without touching the network.
fn cmd_recommend(app: &App, exercise: &str, reps: i64, weight_kg: f64, rpe: Option<f64>) {
    let set = WorkoutSet::new(reps, weight_kg, rpe);
    match app.engine().recommend(exercise, &[set]) {
        Some(rec) => {
            println!("[{}] {}: {}", rec.exercise, rec.action.tag(), rec.detail);
            println!("    Last: {}", rec.summary);
        }
        None => println!("[{exercise}] No recommendation: the set has no reps."),
    }
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "liftmenu", &mut io::stdout());
}

/// Show the config file in use.
fn cmd_config_path(explicit: Option<&std::path::Path>) {
    match explicit.map(std::path::Path::to_path_buf).or_else(Config::resolved_path) {
        Some(path) => println!("{}", path.display()),
        None => {
            if let Some(path) = Config::global_config_path() {
                println!("{} (not found, using defaults)", path.display());
            }
        }
    }
}

/// Show the effective configuration. Secrets only show whether they are set.
fn cmd_config(config: &Config) -> Result<()> {
    let toml = config.to_toml().context("Failed to render config")?;
    println!("{toml}");

    let secret_state = |secret: Option<&SecretValue>| if secret.is_some() { "set" } else { "not set" };
    let value_state = |value: Option<&String>| if value.is_some() { "set" } else { "not set" };
    println!("# {ENV_API_KEY}: {}", secret_state(config.api.api_key.as_ref()));
    println!("# {ENV_EMAIL_SENDER}: {}", value_state(config.email.sender.as_ref()));
    println!("# {ENV_EMAIL_RECEIVER}: {}", value_state(config.email.receiver.as_ref()));
    println!("# {ENV_EMAIL_PASSWORD}: {}", secret_state(config.email.password.as_ref()));

    Ok(())
}

//! Logging setup shared by the cup_sim demos.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging flags for a demo, flattened into its clap parser.
///
/// The tournament logs at four levels:
/// - warn: a team missing from the rankings was given the baseline strength
/// - info: the tournament starts and the champion is crowned
/// - debug: the built tournament, every group table and every knockout round
/// - trace: every match
#[derive(clap::Args, Debug, Clone)]
pub struct TracingArgs {
    /// Show group tables and rounds (-v) or every match (-vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only show ranking warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log line format
    #[arg(long = "log-format", default_value = "compact", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    /// One JSON object per event
    Json,
}

impl TracingArgs {
    fn level(&self) -> &'static str {
        match (self.quiet, self.verbosity) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Install the global subscriber. `RUST_LOG` overrides the flags.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber is already installed.
    pub fn init_tracing(&self) {
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            // Dependencies stay at warn, only the simulator gets chatty.
            Err(_) => EnvFilter::new(format!("warn,cup_sim={}", self.level())),
        };

        let layer = match self.log_format {
            LogFormat::Compact => fmt::layer().compact().boxed(),
            LogFormat::Pretty => fmt::layer().pretty().boxed(),
            LogFormat::Json => fmt::layer().json().boxed(),
        };

        tracing_subscriber::registry().with(layer).with(filter).init();
    }
}

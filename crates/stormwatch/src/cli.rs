//! Clap derive structures for the `stormwatch` CLI.
//!
//! Only depends on clap + clap_complete so build.rs can include it for man
//! page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stormwatch -- weather and air-quality alerts for subscribed cities
#[derive(Debug, Parser)]
#[command(
    name = "stormwatch",
    version,
    about = "Hourly weather and air-quality alerts for subscribed cities",
    long_about = "Checks current conditions for every subscriber's city at the top of\n\
        each hour and notifies subscribers whose alert rules fire.\n\n\
        Conditions come from OpenWeather-compatible weather and air-pollution\n\
        APIs; notifications go through an HTTP mail relay.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "STORMWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subscriber file (overrides [store] path)
    #[arg(long, env = "STORMWATCH_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the hourly alert scheduler until interrupted
    Run(RunArgs),

    /// Run a single alert cycle now and print its summary
    Check(CheckArgs),

    /// Show current conditions for a city
    #[command(alias = "cond")]
    Conditions(ConditionsArgs),

    /// Manage subscribers
    #[command(alias = "subs")]
    Subscribers(SubscribersArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Run / Check ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run one cycle immediately at startup
    #[arg(long)]
    pub run_on_start: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Exit with status 3 if any subscriber failed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct ConditionsArgs {
    /// City name as understood by the weather provider
    pub city: String,
}

// ── Subscribers ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubscribersArgs {
    #[command(subcommand)]
    pub command: SubscribersCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubscribersCommand {
    /// List all subscribers
    #[command(alias = "ls")]
    List,

    /// Add a subscriber, or replace the one with the same address
    #[command(alias = "set")]
    Add(AddSubscriberArgs),
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AddSubscriberArgs {
    /// Notification address
    pub address: String,

    /// City to watch
    pub city: String,

    /// Alert when it is raining
    #[arg(long)]
    pub rain: bool,

    /// Alert when the temperature is below 10°C
    #[arg(long)]
    pub cold: bool,

    /// Alert when the temperature is above 30°C
    #[arg(long)]
    pub hot: bool,

    /// Alert when humidity is above 80%
    #[arg(long)]
    pub humid: bool,

    /// Alert when air quality is Poor or worse
    #[arg(long)]
    pub aqi: bool,

    /// Record interest in severe-weather alerts
    #[arg(long)]
    pub severe: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path in use
    Path,

    /// Display the resolved configuration (secrets redacted)
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

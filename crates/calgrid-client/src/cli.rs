//! Command-line interface definition.

use std::path::PathBuf;

use calgrid_core::{ProviderId, TracingOutputFormat};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};

/// calgrid - calendar event normalization and layout
#[derive(Debug, Parser)]
#[command(name = "calgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALGRID_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format: pretty, compact or json
    #[arg(long, env = "CALGRID_LOG_FORMAT", global = true, value_parser = parse_log_format)]
    pub log_format: Option<TracingOutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize provider payloads into calendar events
    Normalize {
        /// Provider the payloads come from
        #[arg(long, short, value_parser = parse_provider)]
        provider: ProviderId,

        /// Account the calendar belongs to
        #[arg(long, default_value = "default")]
        account: String,

        /// Calendar the events belong to
        #[arg(long, default_value = "primary")]
        calendar: String,

        /// Fail on the first event that does not normalize
        #[arg(long)]
        strict: bool,

        /// JSON file with one payload or an array of payloads; `-` for stdin
        file: PathBuf,
    },

    /// Convert calendar events back into provider write payloads
    Denormalize {
        /// JSON file with one event or an array of events; `-` for stdin
        file: PathBuf,
    },

    /// Encode a recurrence as an RRULE line
    Rrule {
        /// JSON file with the recurrence; `-` for stdin
        file: PathBuf,
    },

    /// Compute lane layouts for a set of events
    Layout {
        #[command(subcommand)]
        view: LayoutView,
    },

    /// Snap a pointer offset in a day column to a quarter hour
    Snap {
        /// Offset from the top of the column in pixels
        #[arg(long, allow_negative_numbers = true)]
        offset: f64,

        /// Column height in pixels
        #[arg(long)]
        height: f64,

        /// Date of the column, printed with the snapped time
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Layout views.
#[derive(Debug, Subcommand)]
pub enum LayoutView {
    /// All-day row of a week
    Week {
        /// Any day of the week; the row starts on the configured first weekday
        #[arg(long)]
        date: NaiveDate,

        /// Number of days in the row
        #[arg(long, default_value = "7")]
        days: u32,

        #[command(flatten)]
        common: LayoutArgs,
    },

    /// A single month-view day cell
    Day {
        /// The day to lay out
        #[arg(long)]
        date: NaiveDate,

        #[command(flatten)]
        common: LayoutArgs,
    },

    /// Timed column of a single day
    Columns {
        /// The day to lay out
        #[arg(long)]
        date: NaiveDate,

        #[command(flatten)]
        common: LayoutArgs,
    },
}

/// Arguments shared by every layout view.
#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Display time zone (defaults to the configured zone)
    #[arg(long, value_parser = parse_tz)]
    pub tz: Option<Tz>,

    /// Visible lane budget (defaults to what fits in the configured height)
    #[arg(long)]
    pub lanes: Option<usize>,

    /// JSON file with calendar events; `-` for stdin
    pub file: PathBuf,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

fn parse_provider(value: &str) -> Result<ProviderId, String> {
    value.parse()
}

fn parse_log_format(value: &str) -> Result<TracingOutputFormat, String> {
    value.parse().map_err(|e: calgrid_core::TracingError| e.to_string())
}

fn parse_tz(value: &str) -> Result<Tz, String> {
    calgrid_core::time::parse_time_zone(value).map_err(|e| e.to_string())
}

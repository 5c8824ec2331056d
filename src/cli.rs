//! Command-line interface definitions for romdupe.
//!
//! Global options (verbosity, color, config file) plus three subcommands.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups
//! romdupe scan ~/roms/snes --images ~/roms/snes/images
//!
//! # Machine-readable report
//! romdupe scan ~/roms/snes -o json
//!
//! # Delete every non-kept variant, keeping a specific release for one title
//! romdupe clean ~/roms/snes --images ~/roms/snes/images --keep "Game (Europe).sfc" -y
//!
//! # Show how every file was classified
//! romdupe -vv scan ~/roms/snes
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Find and remove regional/revision duplicates in ROM collections.
///
/// Files are grouped by a normalized title: region and revision tags in
/// brackets, compilation suffixes after '+', and trailing sequel numerals on
/// long subtitled names are ignored. Multi-disc and multi-part sets are never
/// treated as duplicates.
#[derive(Debug, Parser)]
#[command(name = "romdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a ROM directory and report duplicate groups
    Scan(ScanArgs),
    /// Delete every non-kept ROM (and its preview images) in each group
    Clean(CleanArgs),
    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory containing the ROM files
    #[arg(value_name = "ROM_DIR")]
    pub rom_dir: PathBuf,

    /// Directory containing preview images named after the ROMs
    #[arg(long, value_name = "DIR")]
    pub images: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the clean subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Directory containing the ROM files
    #[arg(value_name = "ROM_DIR")]
    pub rom_dir: PathBuf,

    /// Directory containing preview images; matching images are deleted too
    #[arg(long, value_name = "DIR")]
    pub images: PathBuf,

    /// File to keep in its group instead of the first one (repeatable)
    #[arg(short, long, value_name = "FILE")]
    pub keep: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Move files to the system trash instead of deleting them permanently
    #[arg(long)]
    pub trash: bool,

    /// Output format for the report printed after deletion
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Configuration file management.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write the default configuration file
    Init {
        /// Destination (defaults to the platform config path)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Show,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

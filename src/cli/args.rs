//! CLI argument definitions.

use crate::cli::validators::parse_confidence;
use crate::dispatch::Mode;
use crate::output::OutputMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Big-cat species classification and detection.
#[derive(Debug, Parser)]
#[command(name = "animalai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files (JPEG or PNG) or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show an informational page.
    About {
        /// Page to show.
        #[arg(value_enum, default_value_t = Page::Project)]
        page: Page,
    },
    /// Show species descriptions from the knowledge base.
    Species {
        /// Species label (Tiger, Lion, Leopard, Cheetah); all when omitted.
        label: Option<String>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage models.
    Models {
        /// Models action to perform.
        #[command(subcommand)]
        action: ModelsAction,
    },
}

/// Informational pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    /// What the dashboard recognises.
    Project,
    /// Who built it.
    Author,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Models subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ModelsAction {
    /// Verify both model files exist and load.
    Check,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Model to run (default from config: classification).
    #[arg(short, long, value_enum, env = "ANIMALAI_MODE")]
    pub mode: Option<Mode>,

    /// Directory for annotated detection images (default: same as input).
    #[arg(short, long, env = "ANIMALAI_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output mode.
    #[arg(long, value_enum, default_value_t = OutputMode::Human, global = true)]
    pub output_mode: OutputMode,

    /// Configuration file (default: platform config directory).
    #[arg(long = "config", id = "config_file", env = "ANIMALAI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Minimum detection box confidence (0.0-1.0).
    #[arg(short = 'c', long, value_parser = parse_confidence)]
    pub confidence: Option<f32>,

    /// Classification confidence (0.0-1.0) under which a result is flagged.
    #[arg(long, value_parser = parse_confidence)]
    pub low_confidence: Option<f32>,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: full trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable the progress spinner.
    #[arg(long)]
    pub no_progress: bool,
}

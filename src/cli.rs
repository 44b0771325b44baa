//! Command-line definitions.

use crate::config::{validate_threshold, Config};
use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Filter Appium server logs down to what matters
#[derive(Debug, Parser)]
#[command(name = "logsift", version)]
#[command(about = "Filter Appium server logs down to what matters", long_about = None)]
pub struct Cli {
    /// Increase diagnostic output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter a log file (or stdin) and print the digest
    Filter(FilterArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default config file location
    Path,
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Log file to read; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Keep oversized response payloads intact
    #[arg(long)]
    pub no_truncation: bool,

    /// Disable stack compression
    #[arg(long)]
    pub no_stack_compression: bool,

    /// Keep the session setup span as is
    #[arg(long)]
    pub no_session_compression: bool,

    /// Print every retained line instead of grouping repeats
    #[arg(long)]
    pub no_grouping: bool,

    /// Keep routine success lines even away from errors
    #[arg(long)]
    pub no_context_filter: bool,

    /// Similarity (0.0-1.0) at which routine lines are grouped
    #[arg(long, value_name = "F", value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Write the filtered text to this file instead of stdout
    #[arg(short, long, value_name = "PATH", conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Write the filtered text to filtered_<name> in the current directory
    #[arg(long)]
    pub save: bool,

    /// Copy the filtered text to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Print reduction statistics to stderr
    #[arg(long, conflicts_with = "stats_json")]
    pub stats: bool,

    /// Print reduction statistics to stderr as JSON
    #[arg(long)]
    pub stats_json: bool,
}

impl FilterArgs {
    /// Input path, or `None` for stdin.
    pub fn input(&self) -> Option<&PathBuf> {
        self.file.as_ref().filter(|path| path.as_os_str() != "-")
    }

    /// Layer command-line switches over the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        let filter = &mut config.filter;
        if self.no_truncation {
            filter.response_truncation = false;
        }
        if self.no_stack_compression {
            filter.stack_compression = false;
        }
        if self.no_session_compression {
            filter.session_compression = false;
        }
        if self.no_grouping {
            filter.http_grouping = false;
        }
        if self.no_context_filter {
            filter.context_aware_filtering = false;
        }
        if let Some(threshold) = self.threshold {
            config.grouping.similarity_threshold = threshold;
        }
    }
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    validate_threshold(threshold).map_err(|e| e.to_string())?;
    Ok(threshold)
}

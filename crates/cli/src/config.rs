//! Command-line and environment configuration.
//!
//! Every option falls back to an environment variable so the binary runs
//! unchanged as a GitHub Actions step, where the runner provides
//! `GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH`, `GITHUB_OUTPUT` and (when step
//! debugging is on) `RUNNER_DEBUG=1`.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use pipeline::{FenceKind, OutputName};
use tracing::Level;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// Newline-delimited JSON.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "commit-metadata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Extract YAML metadata blocks from commit messages, pull requests, and issue comments",
    long_about = None
)]
pub struct CliConfig {
    /// Name of the triggering event (push, pull_request, pull_request_target, issue_comment)
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Path to the JSON webhook payload of the event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Step output file; records are printed to stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Name of the output holding the extracted records
    #[arg(long, env = "METADATA_OUTPUT_NAME", default_value = "metadata", value_parser = parse_output_name)]
    pub output_name: OutputName,

    /// Fence styles to recognise, in priority order
    #[arg(
        long = "fence",
        env = "METADATA_FENCES",
        value_delimiter = ',',
        default_values_t = FenceKind::ALL
    )]
    pub fences: Vec<FenceKind>,

    /// Log line format
    #[arg(long, value_enum, env = "METADATA_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    pub verbose: bool,
}

impl CliConfig {
    /// Default log level when `RUST_LOG` is not set.
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

fn parse_output_name(value: &str) -> Result<OutputName, String> {
    OutputName::new(value).ok_or_else(|| "output name must not be empty".to_string())
}

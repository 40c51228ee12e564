//! commit-metadata entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags with GitHub Actions environment
//!    fallbacks (see [`config::CliConfig`]).
//! 2. **Wire observability**: install the `tracing-subscriber` registry
//!    (text or JSON, stderr).
//! 3. **Construct infrastructure**: an [`listener::EventFileSource`] for the
//!    triggering event and a [`github::ActionsOutput`] for the result, injected
//!    into a [`runner::MetadataRunner`].
//! 4. **Map the outcome to an exit status**: success (including "no metadata
//!    found") exits 0; any failure has already been reported to the host by
//!    the runner and exits 1.

mod config;
mod telemetry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use github::ActionsOutput;
use listener::EventFileSource;
use pipeline::{BlockScanner, MetadataPipeline};
use runner::MetadataRunner;
use tracing::debug;

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = CliConfig::parse();
    telemetry::init_tracing(config.log_format, config.log_level());

    let scanner =
        BlockScanner::with_kinds(config.fences.iter().copied()).context("Invalid fence table")?;

    let source = EventFileSource::new(config.event_name, config.event_path);
    let sink = ActionsOutput::new(config.output_file);
    debug!(
        event_path = ?source.event_path(),
        output_file = ?sink.output_file(),
        fences = ?config.fences,
        "configured"
    );

    let runner = MetadataRunner::new(source, sink)
        .with_pipeline(MetadataPipeline::new(scanner))
        .with_output_name(config.output_name);

    match runner.execute().await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

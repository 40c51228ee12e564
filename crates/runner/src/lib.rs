//! Metadata extraction runner.
//!
//! [`MetadataRunner`] drives one invocation: it reads the triggering event
//! from an [`EventSource`], runs the [`MetadataPipeline`], and hands the
//! result to an [`OutputSink`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The runner sequences calls between the business
//! logic in the [`pipeline`] crate and the infrastructure behind the port
//! traits. It contains no extraction rules of its own.
//!
//! ## Outcomes
//!
//! | Pipeline result | Sink call | `execute` returns |
//! |-----------------|-----------|-------------------|
//! | records extracted | `set_output(name, records)` | `Ok(outcome)` |
//! | no metadata / skipped | `set_output(name, [])` | `Ok(outcome)` |
//! | any error | `fail(reason)`, no output | `Err(error)` |

use pipeline::{
    EventSource, MetadataPipeline, OutputName, OutputSink, PipelineError, RunOutcome, SinkError,
    SourceError,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Errors that fail an invocation.
#[derive(Debug, Error)]
pub enum RunError {
    /// The triggering event could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The pipeline rejected the event or one of its blocks.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The result could not be handed back to the host.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Drives a single metadata extraction.
pub struct MetadataRunner<S, O> {
    source: S,
    sink: O,
    pipeline: MetadataPipeline,
    output_name: OutputName,
}

impl<S: EventSource, O: OutputSink> MetadataRunner<S, O> {
    /// Creates a runner with the default pipeline and output name.
    pub fn new(source: S, sink: O) -> Self {
        Self {
            source,
            sink,
            pipeline: MetadataPipeline::default(),
            output_name: OutputName::default(),
        }
    }

    /// Replaces the pipeline (e.g. to restrict the fence table).
    pub fn with_pipeline(mut self, pipeline: MetadataPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Replaces the name the records are published under.
    pub fn with_output_name(mut self, output_name: OutputName) -> Self {
        self.output_name = output_name;
        self
    }

    /// Returns the sink, e.g. to inspect what was written.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// Runs the invocation to completion.
    ///
    /// On failure the sink's `fail` is called with the error message before
    /// the error is returned; no output value is set.
    #[instrument(skip(self), fields(output = %self.output_name))]
    pub async fn execute(&self) -> Result<RunOutcome, RunError> {
        match self.try_execute().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(error = %err, "metadata extraction failed");
                if let Err(report_err) = self.sink.fail(&err.to_string()).await {
                    warn!(error = %report_err, "could not report failure to the host");
                }
                Err(err)
            }
        }
    }

    async fn try_execute(&self) -> Result<RunOutcome, RunError> {
        let descriptor = self.source.read_event().await?;
        info!(event = descriptor.name(), "received event");

        let outcome = self.pipeline.run(&descriptor)?;
        match &outcome {
            RunOutcome::Extracted(records) => {
                info!(count = records.len(), "extracted metadata records");
            }
            RunOutcome::NoMetadata => {
                info!("No metadata block found in event messages.");
            }
            RunOutcome::Skipped { reason } => {
                info!(%reason, "event has no messages to scan");
            }
        }

        self.sink
            .set_output(&self.output_name, outcome.records())
            .await?;
        Ok(outcome)
    }
}

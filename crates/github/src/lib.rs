//! GitHub Actions output adapter.
//!
//! Implements [`pipeline::OutputSink`] the way an Actions step reports back
//! to its workflow:
//!
//! - **Outputs** are appended to the file named by `GITHUB_OUTPUT` using the
//!   multi-line `name<<DELIMITER` form, with a fresh random delimiter per
//!   value. When no output file is configured (a local run), the records are
//!   printed to the console as pretty JSON instead.
//! - **Failures** are reported with the `::error::` workflow command on the
//!   console, which annotates the run; the binary then exits non-zero.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain extraction rules. It only
//! knows how to serialise records and talk to the runner's files and stdout.

pub mod commands;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pipeline::{MetadataRecord, OutputName, OutputSink, SinkError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::commands::{file_command, new_delimiter, workflow_command};

/// Environment variable naming the step output file in GitHub Actions.
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Output sink for GitHub Actions (or a local console).
pub struct ActionsOutput<W = tokio::io::Stdout> {
    output_file: Option<PathBuf>,
    console: Mutex<W>,
}

impl ActionsOutput {
    /// Creates a sink writing workflow commands to stdout.
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self::with_console(output_file, tokio::io::stdout())
    }
}

impl<W> ActionsOutput<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a sink writing workflow commands to `console`.
    pub fn with_console(output_file: Option<PathBuf>, console: W) -> Self {
        Self {
            output_file,
            console: Mutex::new(console),
        }
    }

    /// Returns the configured output file, if any.
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Consumes the sink, returning the console writer.
    pub fn into_console(self) -> W {
        self.console.into_inner()
    }

    async fn write_console(&self, text: &str) -> Result<(), SinkError> {
        let write_err = |source: std::io::Error| SinkError::Write {
            target: "stdout".to_string(),
            source,
        };
        let mut console = self.console.lock().await;
        console.write_all(text.as_bytes()).await.map_err(write_err)?;
        console.flush().await.map_err(write_err)
    }
}

async fn append_to_file(path: &Path, text: &str) -> Result<(), SinkError> {
    let write_err = |source: std::io::Error| SinkError::Write {
        target: path.display().to_string(),
        source,
    };
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(write_err)?;
    file.write_all(text.as_bytes()).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)
}

#[async_trait]
impl<W> OutputSink for ActionsOutput<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn set_output(
        &self,
        name: &OutputName,
        records: &[MetadataRecord],
    ) -> Result<(), SinkError> {
        match &self.output_file {
            Some(path) => {
                let value = serde_json::to_string(records)?;
                let entry = file_command(name.as_str(), &value, &new_delimiter());
                append_to_file(path, &entry).await?;
                debug!(output = %name, path = %path.display(), count = records.len(), "wrote step output");
            }
            None => {
                let mut value = serde_json::to_string_pretty(records)?;
                value.push('\n');
                self.write_console(&value).await?;
                debug!(output = %name, count = records.len(), "printed output to console");
            }
        }
        Ok(())
    }

    async fn fail(&self, reason: &str) -> Result<(), SinkError> {
        self.write_console(&workflow_command("error", reason)).await
    }
}

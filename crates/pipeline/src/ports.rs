//! Port traits between the pipeline and its host.
//!
//! Infrastructure crates implement these: `listener` supplies an
//! [`EventSource`], `github` supplies an [`OutputSink`]. The runner only ever
//! sees the traits.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::{EventDescriptor, MetadataRecord, OutputName};

// ---------------------------------------------------------------------------
// Event source
// ---------------------------------------------------------------------------

/// Failures while obtaining the triggering event.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A required environment variable is absent or empty.
    #[error("Environment variable {name} is not set")]
    MissingVariable {
        /// Name of the variable.
        name: &'static str,
    },

    /// The payload file could not be read.
    #[error("Failed to read event payload from {}: {source}", .path.display())]
    Read {
        /// Payload file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The payload file is not valid JSON.
    #[error("Event payload in {} is not valid JSON: {source}", .path.display())]
    Parse {
        /// Payload file path.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
}

/// Supplies the event that triggered this invocation.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Reads the event descriptor. Called once per invocation.
    async fn read_event(&self) -> Result<EventDescriptor, SourceError>;
}

// ---------------------------------------------------------------------------
// Output sink
// ---------------------------------------------------------------------------

/// Failures while handing results back to the host.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to the output destination failed.
    #[error("Failed to write to {target}: {source}")]
    Write {
        /// Human-readable destination (file path or `"stdout"`).
        target: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The records could not be serialised.
    #[error("Failed to serialise metadata records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Receives the outcome of an invocation.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Publishes the records under `name`. An empty slice is a valid output.
    async fn set_output(&self, name: &OutputName, records: &[MetadataRecord])
        -> Result<(), SinkError>;

    /// Reports a fatal failure. No output is set when this is called.
    async fn fail(&self, reason: &str) -> Result<(), SinkError>;
}

//! Error types for the metadata extraction domain.
//!
//! [`UnsupportedEventError`] and [`MalformedMetadataError`] are produced by
//! the classifier and decoder respectively. [`PipelineError`] is what the
//! driver returns: every variant is fatal for the invocation and no partial
//! output survives it.
//!
//! Absence (no payload, no commits, no blocks) is deliberately *not*
//! represented here; it surfaces as an empty or no-op
//! [`RunOutcome`](crate::RunOutcome).

use thiserror::Error;

use crate::events::Route;
use crate::MessageId;

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// The event name is outside the recognised set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported event type: {name}")]
pub struct UnsupportedEventError {
    /// The offending event name, as supplied by the host.
    pub name: String,
}

/// A fenced block's content is not a key-value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed metadata block: {reason}")]
pub struct MalformedMetadataError {
    /// What was wrong with the block (parser message or shape mismatch).
    pub reason: String,
}

/// A message that contains metadata lacks one of its provenance fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing {field} for {item}")]
pub struct MissingProvenanceError {
    /// Which provenance field is absent (`"id"`, `"url"`, `"author"`).
    pub field: &'static str,
    /// Label of the payload item (e.g. `"commit #2"`, `"pull request"`).
    pub item: String,
}

impl MalformedMetadataError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The event name is not one the pipeline handles.
    #[error(transparent)]
    UnsupportedEvent(#[from] UnsupportedEventError),

    /// A block in one of the messages could not be decoded.
    ///
    /// Processing stops at the first such block; records decoded before it
    /// are discarded.
    #[error("{source} (message {message_id}, block {block_index})")]
    MalformedMetadata {
        /// Message containing the block.
        message_id: MessageId,
        /// Zero-based position of the block within the message.
        block_index: usize,
        /// The decoder failure.
        #[source]
        source: MalformedMetadataError,
    },

    /// A payload section is present but does not have the expected shape
    /// (e.g. `commits` is not an array).
    #[error("Invalid {route} payload: {reason}")]
    InvalidPayload {
        /// Route whose payload failed to parse.
        route: Route,
        /// Parser message.
        reason: String,
    },

    /// A message carrying at least one block is missing a provenance field.
    #[error(transparent)]
    MissingProvenance(#[from] MissingProvenanceError),
}

//! Metadata extraction domain.
//!
//! Finds YAML metadata blocks embedded in commit messages, pull request
//! descriptions, and issue comments, and turns each into a
//! [`MetadataRecord`] stamped with the message's provenance.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O. It defines
//! *what* the host must provide ([`EventSource`], [`OutputSink`]); the
//! `listener` and `github` crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Non-empty string newtypes (`MessageId`, `MessageUrl`, `OutputName`) |
//! | [`types`] | Descriptors, messages, provenance, records, run outcome |
//! | [`events`] | Routes and typed payload shapes per supported event |
//! | [`classify`] | Event name → route |
//! | [`extract`] | Payload → message records |
//! | [`scan`] | Fence table and block scanner |
//! | [`decode`] | Block → metadata record |
//! | [`driver`] | Stage composition (`MetadataPipeline`) |
//! | [`ports`] | `EventSource` / `OutputSink` traits and their errors |
//! | [`errors`] | Stage and pipeline error types |

pub mod classify;
pub mod decode;
pub mod driver;
pub mod errors;
pub mod events;
pub mod extract;
pub mod identifiers;
pub mod ports;
pub mod scan;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classify::classify;
pub use decode::decode;
pub use driver::{run, MetadataPipeline};
pub use errors::{
    MalformedMetadataError, MissingProvenanceError, PipelineError, UnsupportedEventError,
};
pub use events::{EventPayload, Route};
pub use extract::{extract, Extraction};
pub use identifiers::{MessageId, MessageUrl, OutputName};
pub use ports::{EventSource, OutputSink, SinkError, SourceError};
pub use scan::{scan, BlockScanner, Fence, FenceKind, FenceTag, RawBlock};
pub use types::{
    subject_line, Author, EventDescriptor, MessageRecord, MetadataRecord, Provenance, RunOutcome,
};

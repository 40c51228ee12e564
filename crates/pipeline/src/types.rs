//! Shared value types for the metadata extraction domain.
//!
//! These are the values that flow between the pipeline stages: the
//! [`EventDescriptor`] supplied by the host, the [`MessageRecord`]s projected
//! from it, the [`MetadataRecord`]s decoded from fenced blocks, and the
//! [`RunOutcome`] handed back to the runner.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{MessageId, MessageUrl, MissingProvenanceError};

// ---------------------------------------------------------------------------
// Event descriptor
// ---------------------------------------------------------------------------

/// The host-supplied description of what triggered this invocation.
///
/// The payload is kept as opaque JSON until the classifier has picked a
/// route; only then is it projected onto a typed
/// [`EventPayload`](crate::events::EventPayload).
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    name: String,
    payload: Value,
}

impl EventDescriptor {
    /// Creates a descriptor from an event name (e.g. `"push"`) and its payload.
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Returns the event name exactly as the host supplied it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw event payload (`Value::Null` when the host supplied none).
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Who wrote a message.
///
/// Push payloads carry a git identity object (`name`, `email`, `username`);
/// pull requests and comments carry a GitHub user object (`login`, `id`, ...).
/// Objects are kept verbatim so downstream consumers see exactly what the
/// host reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// A bare author name.
    Name(String),
    /// An identity object copied from the payload.
    Identity(Map<String, Value>),
}

impl Author {
    /// Returns `true` if the author carries no information at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Author::Name(name) => name.is_empty(),
            Author::Identity(fields) => fields.is_empty(),
        }
    }

    /// Best-effort human label for logging: the name, login, or username.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Author::Name(name) => Some(name.as_str()),
            Author::Identity(fields) => ["name", "login", "username"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        }
    }

    /// Converts the author into the JSON value stamped onto records.
    pub fn to_value(&self) -> Value {
        match self {
            Author::Name(name) => Value::String(name.clone()),
            Author::Identity(fields) => Value::Object(fields.clone()),
        }
    }
}

/// The triple identifying the origin of a message.
///
/// Stamped onto every [`MetadataRecord`] decoded from that message; it always
/// takes precedence over same-named keys inside the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Author of the commit, pull request, or comment.
    pub author: Author,
    /// Identifier of the message.
    pub id: MessageId,
    /// Canonical URL of the message.
    pub url: MessageUrl,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One free-text message projected from the event payload.
///
/// A message whose payload item lacks an id, url or author is still kept:
/// incomplete provenance only matters once a block is found in its text.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    text: String,
    provenance: Result<Provenance, MissingProvenanceError>,
}

impl MessageRecord {
    /// Creates a message record.
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance: Ok(provenance),
        }
    }

    /// Creates a message record whose provenance could not be assembled.
    pub fn unattributed(text: impl Into<String>, missing: MissingProvenanceError) -> Self {
        Self {
            text: text.into(),
            provenance: Err(missing),
        }
    }

    /// Returns the full message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the message's provenance, or which field the payload left out.
    pub fn provenance(&self) -> Result<&Provenance, MissingProvenanceError> {
        self.provenance.as_ref().map_err(Clone::clone)
    }
}

/// Returns the text up to (not including) the first newline, or the whole
/// text if there is none. A trailing `\r` is dropped so CRLF messages yield
/// the same subject as LF ones.
pub fn subject_line(text: &str) -> &str {
    let line = text.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line)
}

// ---------------------------------------------------------------------------
// Metadata records
// ---------------------------------------------------------------------------

/// Field name for the human-readable description.
pub const DESCRIPTION_KEY: &str = "description";
/// Field name for the stamped author.
pub const AUTHOR_KEY: &str = "author";
/// Field name for the stamped message id.
pub const ID_KEY: &str = "id";
/// Field name for the stamped message URL.
pub const URL_KEY: &str = "url";

/// A decoded metadata block enriched with provenance.
///
/// Always contains `author`, `id`, `url`, and `description`. Only the
/// [`decoder`](crate::decode) constructs these, which is what upholds that
/// guarantee; once built a record is immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord(Map<String, Value>);

impl MetadataRecord {
    pub(crate) fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the description (block-supplied or defaulted).
    pub fn description(&self) -> Option<&Value> {
        self.0.get(DESCRIPTION_KEY)
    }

    /// Returns the stamped message id.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY).and_then(Value::as_str)
    }

    /// Returns the stamped message URL.
    pub fn url(&self) -> Option<&str> {
        self.0.get(URL_KEY).and_then(Value::as_str)
    }

    /// Returns the stamped author value.
    pub fn author(&self) -> Option<&Value> {
        self.0.get(AUTHOR_KEY)
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// At least one metadata block was decoded. Records are in message order,
    /// then block order within each message.
    Extracted(Vec<MetadataRecord>),
    /// The event carried messages, but none contained a metadata block.
    NoMetadata,
    /// The event was recognised but carries no message text worth scanning
    /// (e.g. a pull request being closed).
    Skipped {
        /// Human-readable description of why nothing was scanned.
        reason: String,
    },
}

impl RunOutcome {
    /// Returns the extracted records; empty for the no-op outcomes.
    pub fn records(&self) -> &[MetadataRecord] {
        match self {
            RunOutcome::Extracted(records) => records,
            RunOutcome::NoMetadata | RunOutcome::Skipped { .. } => &[],
        }
    }
}

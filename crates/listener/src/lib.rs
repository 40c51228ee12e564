//! Trigger event source infrastructure.
//!
//! Implements the [`pipeline::EventSource`] trait for the way GitHub Actions
//! hands an event to a step: the event name in `GITHUB_EVENT_NAME` and the
//! webhook payload as a JSON file at `GITHUB_EVENT_PATH`.
//!
//! ## Deployment Scenarios
//!
//! | Scenario | Name from | Payload from |
//! |----------|-----------|--------------|
//! | GitHub Actions step | `GITHUB_EVENT_NAME` | `GITHUB_EVENT_PATH` |
//! | Local replay | `--event-name` | `--event-path` (a saved webhook payload) |
//! | Local, no payload | `--event-name` | none: treated as a `null` payload |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File access and JSON parsing live here. The
//! [`pipeline`] crate sees only [`pipeline::EventSource`] and
//! [`pipeline::EventDescriptor`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pipeline::{EventDescriptor, EventSource, SourceError};
use serde_json::Value;
use tracing::debug;

/// Environment variable holding the event name in GitHub Actions.
pub const EVENT_NAME_VAR: &str = "GITHUB_EVENT_NAME";

/// Environment variable holding the payload file path in GitHub Actions.
pub const EVENT_PATH_VAR: &str = "GITHUB_EVENT_PATH";

/// Reads the event name from configuration and the payload from a JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFileSource {
    event_name: Option<String>,
    event_path: Option<PathBuf>,
}

impl EventFileSource {
    /// Creates a source. A `None` or empty name fails at read time; a `None`
    /// path means the event has no payload.
    pub fn new(event_name: Option<String>, event_path: Option<PathBuf>) -> Self {
        Self {
            event_name,
            event_path,
        }
    }

    /// Returns the configured payload path, if any.
    pub fn event_path(&self) -> Option<&Path> {
        self.event_path.as_deref()
    }
}

#[async_trait]
impl EventSource for EventFileSource {
    async fn read_event(&self) -> Result<EventDescriptor, SourceError> {
        let name = self
            .event_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(SourceError::MissingVariable {
                name: EVENT_NAME_VAR,
            })?;

        let payload = match &self.event_path {
            Some(path) => read_payload(path).await?,
            None => {
                debug!(event = name, "no payload file configured");
                Value::Null
            }
        };

        Ok(EventDescriptor::new(name, payload))
    }
}

/// Reads a payload file. A blank file is a `null` payload.
async fn read_payload(path: &Path) -> Result<Value, SourceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read event payload");

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

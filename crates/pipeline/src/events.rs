//! Routes and typed payload shapes for the supported GitHub events.
//!
//! The host hands over a JSON payload whose shape depends on the event name.
//! Once the classifier has chosen a [`Route`], the payload is projected onto
//! the matching [`EventPayload`] variant. Every field is optional at this
//! level: absence is resolved by the extractor, not by serde.

use serde::Deserialize;
use serde_json::Value;

use crate::{Author, PipelineError};

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// The code path selected for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `push`: one message per pushed commit.
    CommitPush,
    /// `pull_request` or `pull_request_target`: one message from the title and body.
    PullRequest {
        /// `true` for `pull_request_target` (runs in the base repository's context).
        target: bool,
    },
    /// `issue_comment`: one message from the comment body.
    IssueComment,
}

impl Route {
    /// Every recognised event name and the route it selects.
    pub const EVENT_NAMES: [(&'static str, Route); 4] = [
        ("push", Route::CommitPush),
        ("pull_request", Route::PullRequest { target: false }),
        ("pull_request_target", Route::PullRequest { target: true }),
        ("issue_comment", Route::IssueComment),
    ];

    /// Looks up the route for a host event name. Matching is exact.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::EVENT_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, route)| *route)
    }

    /// Returns the host event name for this route.
    pub fn event_name(self) -> &'static str {
        match self {
            Route::CommitPush => "push",
            Route::PullRequest { target: false } => "pull_request",
            Route::PullRequest { target: true } => "pull_request_target",
            Route::IssueComment => "issue_comment",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_name())
    }
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// GitHub ids arrive as strings (commit SHAs) or integers (everything else).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// String id, e.g. a commit SHA.
    Text(String),
    /// Numeric id, e.g. a pull request or comment id.
    Number(u64),
}

impl RawId {
    /// Renders the id as a string.
    pub fn render(&self) -> String {
        match self {
            RawId::Text(text) => text.clone(),
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Payload of a `push` event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitPushPayload {
    /// Pushed commits, oldest first. Absent for tag pushes and branch deletions.
    #[serde(default)]
    pub commits: Option<Vec<PushedCommit>>,
}

/// One entry of a push payload's `commits` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushedCommit {
    /// Commit SHA.
    #[serde(default)]
    pub id: Option<RawId>,
    /// Full commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Commit page URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Git author identity (`name`, `email`, `username`).
    #[serde(default)]
    pub author: Option<Author>,
}

/// Payload of a `pull_request` / `pull_request_target` event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequestPayload {
    /// Activity type, e.g. `opened`, `synchronize`, `closed`.
    #[serde(default)]
    pub action: Option<String>,
    /// The pull request object.
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

/// The `pull_request` object of a pull request payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequest {
    /// Pull request id (not the number).
    #[serde(default)]
    pub id: Option<RawId>,
    /// Pull request title.
    #[serde(default)]
    pub title: Option<String>,
    /// Pull request description; `null` when left empty.
    #[serde(default)]
    pub body: Option<String>,
    /// Web URL of the pull request.
    #[serde(default)]
    pub html_url: Option<String>,
    /// User who opened the pull request.
    #[serde(default)]
    pub user: Option<Author>,
}

/// Payload of an `issue_comment` event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueCommentPayload {
    /// Activity type: `created`, `edited`, or `deleted`.
    #[serde(default)]
    pub action: Option<String>,
    /// The comment object.
    #[serde(default)]
    pub comment: Option<IssueComment>,
}

/// The `comment` object of an issue comment payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueComment {
    /// Comment id.
    #[serde(default)]
    pub id: Option<RawId>,
    /// Comment text.
    #[serde(default)]
    pub body: Option<String>,
    /// Permalink to the comment.
    #[serde(default)]
    pub html_url: Option<String>,
    /// User who wrote the comment.
    #[serde(default)]
    pub user: Option<Author>,
}

/// Typed payload, one variant per route.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// `push`
    CommitPush(CommitPushPayload),
    /// `pull_request` / `pull_request_target`
    PullRequest(PullRequestPayload),
    /// `issue_comment`
    IssueComment(IssueCommentPayload),
}

impl EventPayload {
    /// Projects a raw JSON payload onto the shape for `route`.
    ///
    /// Returns `Ok(None)` for a `null` payload (the host supplied none).
    pub fn from_json(route: Route, payload: &Value) -> Result<Option<Self>, PipelineError> {
        if payload.is_null() {
            return Ok(None);
        }

        let invalid = |err: serde_json::Error| PipelineError::InvalidPayload {
            route,
            reason: err.to_string(),
        };

        let parsed = match route {
            Route::CommitPush => {
                EventPayload::CommitPush(CommitPushPayload::deserialize(payload).map_err(invalid)?)
            }
            Route::PullRequest { .. } => EventPayload::PullRequest(
                PullRequestPayload::deserialize(payload).map_err(invalid)?,
            ),
            Route::IssueComment => EventPayload::IssueComment(
                IssueCommentPayload::deserialize(payload).map_err(invalid)?,
            ),
        };
        Ok(Some(parsed))
    }
}

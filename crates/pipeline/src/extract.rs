//! Projection of event payloads into message records.

use serde_json::Value;
use tracing::debug;

use crate::events::{
    CommitPushPayload, EventPayload, IssueCommentPayload, PullRequestPayload, RawId, Route,
};
use crate::{
    Author, MessageId, MessageRecord, MessageUrl, MissingProvenanceError, PipelineError, Provenance,
};

/// Pull request activity types after which the title/body may carry new metadata.
const PULL_REQUEST_ACTIONS: [&str; 4] = ["opened", "edited", "synchronize", "reopened"];

/// Issue comment activity types after which the comment no longer exists.
const DEAD_COMMENT_ACTIONS: [&str; 1] = ["deleted"];

/// What the extractor found in a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Messages to scan, in payload order. May be empty.
    Messages(Vec<MessageRecord>),
    /// The event is recognised but has no message text worth scanning.
    Inapplicable {
        /// Human-readable explanation, reported as the run's no-op reason.
        reason: String,
    },
}

/// Projects an event payload into the messages to scan for metadata.
///
/// A `null` payload or a missing section (no `commits`, no `pull_request`,
/// no `comment`) yields no messages rather than an error. Messages whose
/// item lacks an id, url or author are kept unattributed; the driver only
/// rejects them if they turn out to contain a block.
pub fn extract(route: Route, payload: &Value) -> Result<Extraction, PipelineError> {
    let Some(payload) = EventPayload::from_json(route, payload)? else {
        debug!(%route, "event carries no payload");
        return Ok(Extraction::Messages(Vec::new()));
    };

    Ok(match payload {
        EventPayload::CommitPush(payload) => Extraction::Messages(commit_messages(payload)),
        EventPayload::PullRequest(payload) => pull_request_message(payload),
        EventPayload::IssueComment(payload) => issue_comment_message(payload),
    })
}

fn commit_messages(payload: CommitPushPayload) -> Vec<MessageRecord> {
    let Some(commits) = payload.commits else {
        debug!("push payload has no commits");
        return Vec::new();
    };

    let mut out = Vec::with_capacity(commits.len());
    for (index, commit) in commits.into_iter().enumerate() {
        let item = format!("commit #{}", index + 1);
        let Some(message) = commit.message.filter(|m| !m.is_empty()) else {
            debug!(%item, "skipping commit without a message");
            continue;
        };
        out.push(message_record(message, commit.id, commit.url, commit.author, &item));
    }
    out
}

fn pull_request_message(payload: PullRequestPayload) -> Extraction {
    if let Some(action) = payload
        .action
        .as_deref()
        .filter(|action| !PULL_REQUEST_ACTIONS.contains(action))
    {
        return Extraction::Inapplicable {
            reason: format!("pull request action '{action}' does not change its title or body"),
        };
    }

    let Some(pull_request) = payload.pull_request else {
        debug!("pull request payload has no pull_request object");
        return Extraction::Messages(Vec::new());
    };

    let mut text = pull_request.title.unwrap_or_default();
    if let Some(body) = pull_request.body.filter(|b| !b.is_empty()) {
        text.push_str("\n\n");
        text.push_str(&body);
    }
    if text.is_empty() {
        debug!("pull request has neither title nor body");
        return Extraction::Messages(Vec::new());
    }

    Extraction::Messages(vec![message_record(
        text,
        pull_request.id,
        pull_request.html_url,
        pull_request.user,
        "pull request",
    )])
}

fn issue_comment_message(payload: IssueCommentPayload) -> Extraction {
    if let Some(action) = payload
        .action
        .as_deref()
        .filter(|action| DEAD_COMMENT_ACTIONS.contains(action))
    {
        return Extraction::Inapplicable {
            reason: format!("issue comment action '{action}' leaves no comment to scan"),
        };
    }

    let Some(comment) = payload.comment else {
        debug!("issue comment payload has no comment object");
        return Extraction::Messages(Vec::new());
    };
    let Some(body) = comment.body.filter(|b| !b.is_empty()) else {
        debug!("issue comment has an empty body");
        return Extraction::Messages(Vec::new());
    };

    Extraction::Messages(vec![message_record(
        body,
        comment.id,
        comment.html_url,
        comment.user,
        "issue comment",
    )])
}

fn message_record(
    text: String,
    id: Option<RawId>,
    url: Option<String>,
    author: Option<Author>,
    item: &str,
) -> MessageRecord {
    match provenance(id, url, author, item) {
        Ok(provenance) => {
            debug!(id = %provenance.id, author = ?provenance.author.display_name(), %item, "processing message");
            MessageRecord::new(text, provenance)
        }
        Err(missing) => {
            debug!(%item, field = missing.field, "message has incomplete provenance");
            MessageRecord::unattributed(text, missing)
        }
    }
}

fn provenance(
    id: Option<RawId>,
    url: Option<String>,
    author: Option<Author>,
    item: &str,
) -> Result<Provenance, MissingProvenanceError> {
    let missing = |field: &'static str| MissingProvenanceError {
        field,
        item: item.to_string(),
    };

    let id = id
        .and_then(|id| MessageId::new(id.render()))
        .ok_or_else(|| missing("id"))?;
    let url = url.and_then(MessageUrl::new).ok_or_else(|| missing("url"))?;
    let author = author
        .filter(|author| !author.is_empty())
        .ok_or_else(|| missing("author"))?;

    Ok(Provenance { author, id, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn messages(extraction: Extraction) -> Vec<MessageRecord> {
        match extraction {
            Extraction::Messages(messages) => messages,
            Extraction::Inapplicable { reason } => panic!("unexpected skip: {reason}"),
        }
    }

    fn commit(id: &str, message: Value) -> Value {
        json!({
            "id": id,
            "message": message,
            "url": format!("https://github.com/o/r/commit/{id}"),
            "author": { "name": "Mona", "email": "mona@example.com", "username": "mona" },
        })
    }

    #[test]
    fn push_yields_one_message_per_commit_in_order() {
        let payload = json!({
            "commits": [commit("aaa", json!("first")), commit("bbb", json!("second"))],
        });

        let messages = messages(extract(Route::CommitPush, &payload).unwrap());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), "first");
        assert_eq!(messages[0].provenance().unwrap().id.as_str(), "aaa");
        assert_eq!(
            messages[0].provenance().unwrap().url.as_str(),
            "https://github.com/o/r/commit/aaa"
        );
        assert_eq!(messages[1].text(), "second");
    }

    #[test]
    fn commits_without_messages_are_skipped() {
        let payload = json!({
            "commits": [
                commit("aaa", Value::Null),
                commit("bbb", json!("")),
                commit("ccc", json!("kept")),
            ],
        });

        let messages = messages(extract(Route::CommitPush, &payload).unwrap());
        let texts: Vec<&str> = messages.iter().map(MessageRecord::text).collect();
        assert_eq!(texts, vec!["kept"]);
    }

    #[test]
    fn missing_payload_or_section_yields_nothing() {
        for route in [
            Route::CommitPush,
            Route::PullRequest { target: false },
            Route::IssueComment,
        ] {
            assert_eq!(
                extract(route, &Value::Null).unwrap(),
                Extraction::Messages(Vec::new())
            );
            assert_eq!(
                extract(route, &json!({})).unwrap(),
                Extraction::Messages(Vec::new())
            );
        }
    }

    #[test]
    fn pull_request_text_joins_title_and_body() {
        let payload = json!({
            "action": "opened",
            "pull_request": {
                "id": 42,
                "title": "Add feature",
                "body": "Details here",
                "html_url": "https://github.com/o/r/pull/7",
                "user": { "login": "octocat" },
            },
        });

        let messages = messages(extract(Route::PullRequest { target: false }, &payload).unwrap());

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "Add feature\n\nDetails here");
        assert_eq!(messages[0].provenance().unwrap().id.as_str(), "42");
        assert_eq!(
            messages[0].provenance().unwrap().author,
            Author::Identity(json!({ "login": "octocat" }).as_object().unwrap().clone())
        );
    }

    #[test]
    fn pull_request_without_body_uses_title_only() {
        for body in [Value::Null, json!("")] {
            let payload = json!({
                "action": "synchronize",
                "pull_request": {
                    "id": 42,
                    "title": "Add feature",
                    "body": body,
                    "html_url": "https://github.com/o/r/pull/7",
                    "user": { "login": "octocat" },
                },
            });
            let messages = messages(extract(Route::PullRequest { target: true }, &payload).unwrap());
            assert_eq!(messages[0].text(), "Add feature");
        }
    }

    #[test]
    fn closed_pull_requests_are_inapplicable() {
        let payload = json!({ "action": "closed", "pull_request": { "title": "x" } });
        let extraction = extract(Route::PullRequest { target: false }, &payload).unwrap();
        assert_eq!(
            extraction,
            Extraction::Inapplicable {
                reason: "pull request action 'closed' does not change its title or body".into()
            }
        );
    }

    #[test]
    fn pull_request_without_action_is_scanned() {
        let payload = json!({
            "pull_request": {
                "id": 42,
                "title": "Add feature",
                "html_url": "https://github.com/o/r/pull/7",
                "user": { "login": "octocat" },
            },
        });
        let messages = messages(extract(Route::PullRequest { target: false }, &payload).unwrap());
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn issue_comment_yields_the_comment_body() {
        let payload = json!({
            "action": "created",
            "comment": {
                "id": 99,
                "body": "LGTM\n---\napproved: true\n---",
                "html_url": "https://github.com/o/r/issues/1#issuecomment-99",
                "user": { "login": "reviewer" },
            },
        });

        let messages = messages(extract(Route::IssueComment, &payload).unwrap());
        let provenance = messages[0].provenance().unwrap();
        assert_eq!(messages[0].text(), "LGTM\n---\napproved: true\n---");
        assert_eq!(provenance.id.as_str(), "99");
        assert_eq!(
            provenance.url.as_str(),
            "https://github.com/o/r/issues/1#issuecomment-99"
        );
    }

    #[test]
    fn deleted_comments_are_inapplicable() {
        let payload = json!({ "action": "deleted", "comment": { "id": 1, "body": "x" } });
        assert!(matches!(
            extract(Route::IssueComment, &payload).unwrap(),
            Extraction::Inapplicable { .. }
        ));
    }

    #[test]
    fn messages_without_provenance_are_kept_unattributed() {
        let payload = json!({
            "commits": [
                { "id": "aaa", "message": "no url", "author": "mona" },
                commit("bbb", json!("complete")),
            ],
        });

        let messages = messages(extract(Route::CommitPush, &payload).unwrap());

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0].provenance().unwrap_err(),
            MissingProvenanceError {
                field: "url",
                item: "commit #1".into()
            }
        );
        assert_eq!(messages[1].provenance().unwrap().id.as_str(), "bbb");
    }
}

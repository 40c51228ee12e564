//! Event classification.

use crate::events::Route;
use crate::{EventDescriptor, UnsupportedEventError};

/// Chooses the code path for an event.
///
/// Fails for any event name outside [`Route::EVENT_NAMES`]; the caller must
/// treat that as fatal for the whole invocation.
pub fn classify(descriptor: &EventDescriptor) -> Result<Route, UnsupportedEventError> {
    Route::from_event_name(descriptor.name()).ok_or_else(|| UnsupportedEventError {
        name: descriptor.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case("push", Route::CommitPush)]
    #[case("pull_request", Route::PullRequest { target: false })]
    #[case("pull_request_target", Route::PullRequest { target: true })]
    #[case("issue_comment", Route::IssueComment)]
    fn recognised_events_are_routed(#[case] name: &str, #[case] expected: Route) {
        let descriptor = EventDescriptor::new(name, Value::Null);
        assert_eq!(classify(&descriptor), Ok(expected));
    }

    #[rstest]
    #[case("release")]
    #[case("workflow_dispatch")]
    #[case("issues")]
    fn other_events_are_unsupported(#[case] name: &str) {
        let descriptor = EventDescriptor::new(name, Value::Null);
        let err = classify(&descriptor).unwrap_err();
        assert_eq!(err.name, name);
        assert_eq!(err.to_string(), format!("Unsupported event type: {name}"));
    }
}

use std::sync::Mutex;

use async_trait::async_trait;
use pipeline::{
    BlockScanner, EventDescriptor, EventSource, FenceKind, MetadataPipeline, MetadataRecord,
    OutputName, OutputSink, RunOutcome, SinkError, SourceError,
};
use pretty_assertions::assert_eq;
use runner::{MetadataRunner, RunError};
use serde_json::{json, Value};

// ── Fakes ─────────────────────────────────────────────────────────────────

struct StaticSource(Option<EventDescriptor>);

#[async_trait]
impl EventSource for StaticSource {
    async fn read_event(&self) -> Result<EventDescriptor, SourceError> {
        self.0.clone().ok_or(SourceError::MissingVariable {
            name: "GITHUB_EVENT_NAME",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SinkCall {
    Output { name: String, records: Value },
    Fail(String),
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    reject_output: bool,
}

impl RecordingSink {
    fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutputSink for RecordingSink {
    async fn set_output(
        &self,
        name: &OutputName,
        records: &[MetadataRecord],
    ) -> Result<(), SinkError> {
        if self.reject_output {
            return Err(SinkError::Write {
                target: "test".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.calls.lock().unwrap().push(SinkCall::Output {
            name: name.to_string(),
            records: serde_json::to_value(records)?,
        });
        Ok(())
    }

    async fn fail(&self, reason: &str) -> Result<(), SinkError> {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Fail(reason.to_string()));
        Ok(())
    }
}

fn push(message: &str) -> EventDescriptor {
    EventDescriptor::new(
        "push",
        json!({
            "commits": [{
                "id": "abc",
                "message": message,
                "url": "https://github.com/o/r/commit/abc",
                "author": { "name": "Mona" },
            }],
        }),
    )
}

fn runner(event: Option<EventDescriptor>) -> MetadataRunner<StaticSource, RecordingSink> {
    MetadataRunner::new(StaticSource(event), RecordingSink::default())
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn extracted_records_are_published() {
    let runner = runner(Some(push("fix: bug\n\n---\ntype: fix\n---")));

    let outcome = runner.execute().await.unwrap();

    assert_eq!(outcome.records().len(), 1);
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Output {
            name: "metadata".into(),
            records: json!([{
                "type": "fix",
                "description": "fix: bug",
                "author": { "name": "Mona" },
                "id": "abc",
                "url": "https://github.com/o/r/commit/abc",
            }]),
        }]
    );
}

#[tokio::test]
async fn no_metadata_publishes_an_empty_sequence() {
    let runner = runner(Some(push("chore: update")));

    let outcome = runner.execute().await.unwrap();

    assert_eq!(outcome, RunOutcome::NoMetadata);
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Output {
            name: "metadata".into(),
            records: json!([]),
        }]
    );
}

#[tokio::test]
async fn skipped_events_publish_an_empty_sequence() {
    let runner = runner(Some(EventDescriptor::new(
        "issue_comment",
        json!({ "action": "deleted", "comment": { "id": 1 } }),
    )));

    let outcome = runner.execute().await.unwrap();

    assert!(matches!(outcome, RunOutcome::Skipped { .. }));
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Output {
            name: "metadata".into(),
            records: json!([]),
        }]
    );
}

#[tokio::test]
async fn unsupported_event_fails_without_output() {
    let runner = runner(Some(EventDescriptor::new("release", Value::Null)));

    let err = runner.execute().await.unwrap_err();

    assert!(matches!(err, RunError::Pipeline(_)));
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Fail("Unsupported event type: release".into())]
    );
}

#[tokio::test]
async fn malformed_block_fails_without_partial_output() {
    let runner = runner(Some(push("ok\n---\na: 1\n---\n---\ntype fix\n---")));

    let err = runner.execute().await.unwrap_err();

    assert!(matches!(err, RunError::Pipeline(_)));
    let calls = runner.sink().calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], SinkCall::Fail(reason) if reason.starts_with("Malformed metadata block")));
}

#[tokio::test]
async fn source_errors_are_reported() {
    let runner = runner(None);

    let err = runner.execute().await.unwrap_err();

    assert!(matches!(err, RunError::Source(_)));
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Fail(
            "Environment variable GITHUB_EVENT_NAME is not set".into()
        )]
    );
}

#[tokio::test]
async fn sink_errors_are_reported_as_failures() {
    let runner = MetadataRunner::new(
        StaticSource(Some(push("chore"))),
        RecordingSink {
            reject_output: true,
            ..RecordingSink::default()
        },
    );

    let err = runner.execute().await.unwrap_err();

    assert!(matches!(err, RunError::Sink(_)));
    assert_eq!(
        runner.sink().calls(),
        vec![SinkCall::Fail("Failed to write to test: disk full".into())]
    );
}

#[tokio::test]
async fn output_name_and_pipeline_are_configurable() {
    let runner = runner(Some(push("s\n---\na: 1\n---\n```yaml\nb: 2\n```")))
        .with_output_name(OutputName::new("release-notes").unwrap())
        .with_pipeline(MetadataPipeline::new(
            BlockScanner::with_kinds([FenceKind::YamlCode]).unwrap(),
        ));

    runner.execute().await.unwrap();

    let calls = runner.sink().calls();
    let SinkCall::Output { name, records } = &calls[0] else {
        panic!("expected an output call, got {calls:?}");
    };
    assert_eq!(name, "release-notes");
    assert_eq!(records[0]["b"], json!(2));
    assert_eq!(records.as_array().map(Vec::len), Some(1));
}

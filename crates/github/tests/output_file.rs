use github::ActionsOutput;
use pipeline::{run, EventDescriptor, OutputName, OutputSink};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn sample_records() -> Vec<pipeline::MetadataRecord> {
    let descriptor = EventDescriptor::new(
        "push",
        json!({
            "commits": [{
                "id": "abc",
                "message": "feat: add\n\n---\ntype: feat\nnotes: |\n  first line\n  second line\n---",
                "url": "https://github.com/o/r/commit/abc",
                "author": { "name": "Mona" },
            }],
        }),
    );
    run(&descriptor).unwrap().records().to_vec()
}

/// Parses `name<<DELIM\nvalue\nDELIM\n` entries from an output file.
fn parse_entries(contents: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut lines = contents.lines();
    while let Some(header) = lines.next() {
        let (name, delimiter) = header.split_once("<<").expect("heredoc header");
        let mut value = Vec::new();
        for line in lines.by_ref() {
            if line == delimiter {
                break;
            }
            value.push(line);
        }
        entries.push((name.to_string(), value.join("\n")));
    }
    entries
}

#[tokio::test]
async fn records_are_appended_to_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("github_output");
    std::fs::write(&path, "previous<<EOF\nkept\nEOF\n").unwrap();

    let records = sample_records();
    let sink = ActionsOutput::with_console(Some(path.clone()), Vec::new());
    sink.set_output(&OutputName::default(), &records)
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let entries = parse_entries(&contents);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("previous".to_string(), "kept".to_string()));
    assert_eq!(entries[1].0, "metadata");

    let value: Value = serde_json::from_str(&entries[1].1).unwrap();
    assert_eq!(
        value,
        json!([{
            "type": "feat",
            "notes": "first line\nsecond line\n",
            "description": "feat: add",
            "author": { "name": "Mona" },
            "id": "abc",
            "url": "https://github.com/o/r/commit/abc",
        }])
    );

    // Nothing goes to the console when a file is configured.
    assert!(sink.into_console().is_empty());
}

#[tokio::test]
async fn output_file_is_created_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh_output");

    let sink = ActionsOutput::with_console(Some(path.clone()), Vec::new());
    sink.set_output(&OutputName::new("notes").unwrap(), &[])
        .await
        .unwrap();

    let entries = parse_entries(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(entries, vec![("notes".to_string(), "[]".to_string())]);
}

#[tokio::test]
async fn console_output_is_pretty_json() {
    let records = sample_records();
    let sink = ActionsOutput::with_console(None, Vec::new());

    sink.set_output(&OutputName::default(), &records)
        .await
        .unwrap();

    let console = String::from_utf8(sink.into_console()).unwrap();
    assert!(console.starts_with("[\n  {\n"));
    let value: Value = serde_json::from_str(&console).unwrap();
    assert_eq!(value[0]["type"], json!("feat"));
}

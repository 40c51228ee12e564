//! GitHub Actions workflow command and file command formatting.

use uuid::Uuid;

/// Escapes a workflow command message so it stays on one line.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats a workflow command without properties, e.g. `::error::message`.
pub fn workflow_command(command: &str, message: &str) -> String {
    format!("::{command}::{}\n", escape_data(message))
}

/// Formats one `name<<DELIMITER` entry for an environment file such as
/// `GITHUB_OUTPUT`. Multi-line values are safe as long as they do not
/// contain the delimiter.
pub fn file_command(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Generates a delimiter that cannot plausibly occur in a value.
pub fn new_delimiter() -> String {
    format!("ghadelimiter_{}", Uuid::new_v4())
}

//! Metadata block decoding.
//!
//! A block is parsed as a YAML document that must be a mapping. The decoded
//! mapping is then defaulted (`description`) and stamped with provenance
//! (`author`, `id`, `url`). Nothing about the remaining keys is validated.
//!
//! YAML allows keys that JSON does not. Scalar keys are written out as text
//! (`~` becomes `"null"`, `1.5` becomes `"1.5"`) and sequence or mapping keys
//! as their compact JSON rendering.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use crate::types::{subject_line, AUTHOR_KEY, DESCRIPTION_KEY, ID_KEY, URL_KEY};
use crate::{MalformedMetadataError, MetadataRecord, Provenance};

/// Decodes one raw block found in `message_text`.
///
/// - A missing or `null` `description` becomes the message's subject line.
/// - `author`, `id` and `url` always come from `provenance`, replacing any
///   values the block defines for those keys.
pub fn decode(
    raw: &str,
    message_text: &str,
    provenance: &Provenance,
) -> Result<MetadataRecord, MalformedMetadataError> {
    if raw.trim().is_empty() {
        return Err(MalformedMetadataError::new(format!(
            "expected a mapping of keys to values, found {}",
            describe(&Value::Null)
        )));
    }

    let document: Yaml =
        serde_yaml::from_str(raw).map_err(|err| MalformedMetadataError::new(err.to_string()))?;

    let mut fields = match to_json(document) {
        Value::Object(fields) => fields,
        other => {
            return Err(MalformedMetadataError::new(format!(
                "expected a mapping of keys to values, found {}",
                describe(&other)
            )))
        }
    };

    if fields.get(DESCRIPTION_KEY).map_or(true, Value::is_null) {
        fields.insert(
            DESCRIPTION_KEY.to_string(),
            Value::String(subject_line(message_text).to_string()),
        );
    }

    fields.insert(AUTHOR_KEY.to_string(), provenance.author.to_value());
    fields.insert(ID_KEY.to_string(), Value::String(provenance.id.to_string()));
    fields.insert(URL_KEY.to_string(), Value::String(provenance.url.to_string()));

    Ok(MetadataRecord::from_fields(fields))
}

fn to_json(value: Yaml) -> Value {
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => number_to_json(&number),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Yaml::Mapping(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key_to_string(key), to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Yaml::Tagged(tagged) => to_json(tagged.value),
    }
}

fn number_to_json(number: &serde_yaml::Number) -> Value {
    if let Some(int) = number.as_i64() {
        Value::from(int)
    } else if let Some(int) = number.as_u64() {
        Value::from(int)
    } else {
        // NaN and infinities have no JSON form.
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn key_to_string(key: Yaml) -> String {
    match key {
        Yaml::String(text) => text,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(flag) => flag.to_string(),
        Yaml::Number(number) => number.to_string(),
        Yaml::Tagged(tagged) => key_to_string(tagged.value),
        complex @ (Yaml::Sequence(_) | Yaml::Mapping(_)) => to_json(complex).to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

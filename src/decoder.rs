//! Declarative document decoding.
//!
//! Whole YAML files and the bodies of `@openapi` annotations are decoded through the same
//! function. The YAML value tree is converted into a `serde_json::Value` so the rest of the
//! crate works on a single JSON-compatible representation.

use serde_json::{Map, Number, Value};
use serde_yaml::value::TaggedValue;

/// Decodes one YAML (or JSON) document into a JSON value.
///
/// Empty input decodes to `Value::Null`. Merge keys (`<<: *anchor`) are resolved before
/// conversion. Input holding more than one YAML document is rejected by `serde_yaml`.
///
/// # Errors
///
/// Returns the underlying `serde_yaml` error if the text is not well-formed YAML.
pub fn decode_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    yaml.apply_merge()?;
    Ok(yaml_to_json(yaml))
}

/// Converts a YAML value tree into its JSON equivalent.
///
/// Mapping keys that are not strings are stringified, tags are dropped in favour of the
/// tagged value and non-finite floats become `null`.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_to_string(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            yaml_to_json(value)
        }
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            key_to_string(value)
        }
        // Complex keys have no JSON form; fall back to their flow rendering
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

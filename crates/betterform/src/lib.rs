//! Public surface for the betterform playground.
//!
//! Re-exports the schema engine and provides the small helpers the CLI
//! binary shares with embedders.

pub mod cli;

/// Re-export for convenience.
pub use betterform_schema as schema;

use anyhow::{Context, bail};
use betterform_schema::FormValues;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

/// Read a JSON/JSON5 object of field values from disk.
pub fn read_values(path: impl AsRef<Path>) -> anyhow::Result<FormValues> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read values from {}", path.display()))?;
    let value: Value = json5::from_str(&contents)
        .with_context(|| format!("failed to parse values in {}", path.display()))?;
    values_from_json(&value)
}

/// Convert a JSON object into form values. Flags and numbers become text.
pub fn values_from_json(value: &Value) -> anyhow::Result<FormValues> {
    let Value::Object(map) = value else {
        bail!("values must be a JSON object");
    };
    map.iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Bool(flag) => flag.to_string(),
                Value::Number(number) => number.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    bail!("value for `{name}` must be a string, bool or number")
                }
            };
            Ok((name.clone(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn converts_scalars_to_text() {
        let values = values_from_json(&json!({
            "email": "a@b.co",
            "newsletter": true,
            "age": 42,
            "nickname": null
        }))
        .expect("values");
        assert_eq!(values["email"], "a@b.co");
        assert_eq!(values["newsletter"], "true");
        assert_eq!(values["age"], "42");
        assert_eq!(values["nickname"], "");
    }

    #[test]
    fn rejects_nested_values() {
        let err = values_from_json(&json!({ "tags": ["a"] })).unwrap_err();
        assert!(format!("{err}").contains("tags"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(values_from_json(&json!(["a"])).is_err());
    }

    #[test]
    fn reads_json5_values_file() {
        let temp = tempfile::tempdir().expect("tmp");
        let path = temp.path().join("values.json5");
        fs::write(&path, "{ email: 'a@b.co', // trailing comment\n }").expect("write");
        let values = read_values(&path).expect("values");
        assert_eq!(values.get("email").map(String::as_str), Some("a@b.co"));
    }
}

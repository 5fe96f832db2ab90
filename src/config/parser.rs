use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use serde::Deserialize;
use tracing::debug;
use crate::error::{Result, SerialTraceError};
use super::serialization::SerializationConfig;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChecksum {
    Single(String),
    Many(Vec<String>),
}

impl RawChecksum {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawChecksum::Single(checksum) => vec![checksum],
            RawChecksum::Many(checksums) => checksums,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSerializationEntry {
    name: Option<String>,
    #[serde(rename = "customTargetConstructorClass")]
    custom_target_constructor_class: Option<String>,
    checksum: Option<RawChecksum>,
}

/// Reads documents in the format printed by [`SerializationConfig`] back
/// into an accumulator.
pub struct SerializationConfigParser;

impl SerializationConfigParser {
    /// Returns the number of entries read.
    pub fn parse_str(content: &str, config: &SerializationConfig) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(SerialTraceError::InvalidEntry(format!(
                    "expected a top-level array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let count = items.len();
        for (position, item) in items.into_iter().enumerate() {
            let raw: RawSerializationEntry = serde_json::from_value(item).map_err(|e| {
                SerialTraceError::InvalidEntry(format!("entry {}: {}", position, e))
            })?;
            let name = raw
                .name
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    SerialTraceError::InvalidEntry(format!("entry {}: missing 'name'", position))
                })?;

            config.record_target(
                &name,
                raw.custom_target_constructor_class.as_deref(),
                raw.checksum.map(RawChecksum::into_vec).unwrap_or_default(),
            );
        }

        Ok(count)
    }

    pub fn parse_file(path: impl AsRef<Path>, config: &SerializationConfig) -> Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SerialTraceError::ConfigFileNotFound(path.display().to_string()),
            _ => SerialTraceError::Io(e),
        })?;
        let count = Self::parse_str(&content, config)?;
        debug!("Loaded {} serialization entries from {}", count, path.display());
        Ok(count)
    }

    /// Merges every file into one fresh accumulator, in the given order.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<SerializationConfig> {
        let config = SerializationConfig::new();
        for path in paths {
            Self::parse_file(path, &config)?;
        }
        Ok(config)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

//! The structured answer returned for an IPC query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::normalize::normalize;

/// Keys every record must carry. Spelling and case are exact.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "art section",
    "category",
    "Punishment",
    "Applicable",
    "Brief description",
];

#[derive(Debug, Error)]
pub enum RecordError {
    /// The (normalised) text does not parse as a JSON object.
    #[error("not a JSON object: {0}")]
    Malformed(String),

    /// Parsed, but one or more of [`REQUIRED_FIELDS`] is absent.
    #[error("missing required fields: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
}

/// A JSON object holding at least the five [`REQUIRED_FIELDS`].
///
/// Values are not constrained and keys beyond the required set are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredRecord(Map<String, Value>);

impl StructuredRecord {
    /// Normalise a raw model reply, parse it, and validate the required keys.
    pub fn from_model_text(raw: &str) -> Result<Self, RecordError> {
        let text = normalize(raw);
        Self::parse(&text).inspect_err(|e| match e {
            RecordError::Malformed(reason) => {
                warn!(%reason, %text, "model reply is not valid JSON")
            }
            RecordError::Incomplete { missing } => {
                warn!(?missing, "model reply is missing required fields")
            }
        })
    }

    /// Parse already-normalised text and validate the required keys.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::from_object(map),
            Ok(other) => Err(RecordError::Malformed(format!(
                "expected an object, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(RecordError::Malformed(e.to_string())),
        }
    }

    /// Validate a parsed JSON object.
    pub fn from_object(map: Map<String, Value>) -> Result<Self, RecordError> {
        let missing = missing_fields(&map);
        if missing.is_empty() {
            Ok(Self(map))
        } else {
            Err(RecordError::Incomplete { missing })
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Required keys absent from `map`, in [`REQUIRED_FIELDS`] order.
pub fn missing_fields(map: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_object() -> Map<String, Value> {
        match json!({
            "art section": "Section 302",
            "category": "Offences affecting the human body",
            "Punishment": "Death or imprisonment for life, and fine",
            "Applicable": "Any person",
            "Brief description": "Punishment for murder."
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn accepts_complete_object() {
        let record = StructuredRecord::from_object(full_object()).unwrap();
        assert_eq!(record.get("category"), Some(&json!("Offences affecting the human body")));
        assert_eq!(record.as_map().len(), 5);
    }

    #[test]
    fn keeps_extra_keys() {
        let mut map = full_object();
        map.insert("Cognizable".into(), json!("Yes"));
        let record = StructuredRecord::from_object(map).unwrap();
        assert_eq!(record.get("Cognizable"), Some(&json!("Yes")));
    }

    #[test]
    fn values_are_unconstrained() {
        let mut map = full_object();
        map.insert("art section".into(), json!(302));
        assert!(StructuredRecord::from_object(map).is_ok());
    }

    #[test]
    fn rejects_every_incomplete_subset() {
        // Bit i set means REQUIRED_FIELDS[i] is kept.
        for mask in 0u32..(1 << REQUIRED_FIELDS.len()) - 1 {
            let mut map = full_object();
            let mut expected = Vec::new();
            for (i, key) in REQUIRED_FIELDS.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    map.remove(*key);
                    expected.push(*key);
                }
            }
            match StructuredRecord::from_object(map) {
                Err(RecordError::Incomplete { missing }) => assert_eq!(missing, expected),
                other => panic!("mask {mask:#07b}: expected Incomplete, got {other:?}"),
            }
        }
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut map = full_object();
        let value = map.remove("Punishment").unwrap();
        map.insert("punishment".into(), value);
        let err = StructuredRecord::from_object(map).unwrap_err();
        assert!(matches!(err, RecordError::Incomplete { ref missing } if missing == &["Punishment"]));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = StructuredRecord::parse("{IPC Section 302}").unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_non_object() {
        let err = StructuredRecord::parse(r#"["a", "b"]"#).unwrap_err();
        match err {
            RecordError::Malformed(msg) => assert_eq!(msg, "expected an object, found an array"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn from_model_text_repairs_then_validates() {
        let raw = "\"art section\": \"302\", category: Murder, Punishment: Death, \
                   Applicable: Everyone, \"Brief description\": \"Causing death\"";
        let record = StructuredRecord::from_model_text(raw).unwrap();
        assert_eq!(record.get("category"), Some(&json!("Murder")));
        assert_eq!(record.get("Brief description"), Some(&json!("Causing death")));
    }

    #[test]
    fn from_model_text_unrepairable_reply_is_malformed() {
        let err = StructuredRecord::from_model_text("Section 302 covers murder").unwrap_err();
        assert!(matches!(err, RecordError::Malformed(_)));
    }

    #[test]
    fn from_model_text_empty_reply_is_incomplete() {
        let err = StructuredRecord::from_model_text("").unwrap_err();
        match err {
            RecordError::Incomplete { missing } => assert_eq!(missing, REQUIRED_FIELDS.to_vec()),
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[test]
    fn serializes_as_plain_object() {
        let record = StructuredRecord::from_object(full_object()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, Value::Object(full_object()));
    }

    #[test]
    fn incomplete_error_lists_keys() {
        let err = RecordError::Incomplete {
            missing: vec!["category", "Applicable"],
        };
        assert_eq!(err.to_string(), "missing required fields: category, Applicable");
    }
}

//! Extraction result model.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::ExtractionError;

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain or unconverted string.
    Text(String),
    /// Converted `..float` field.
    Number(f64),
    /// Converted `..date` field without time components.
    Date(NaiveDate),
    /// Converted `..date` field whose format carries a time.
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// The empty text value every field starts with.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One raw regex match, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMatch {
    /// Whole match text.
    pub text: String,
    /// Byte offset of the match in the searched text.
    pub start: usize,
    /// End byte offset.
    pub end: usize,
    /// Capture groups 1..n; `None` for groups that did not participate.
    pub groups: Vec<Option<String>>,
}

impl RawMatch {
    pub fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let (text, start, end) = caps
            .get(0)
            .map(|m| (m.as_str().to_string(), m.start(), m.end()))
            .unwrap_or_default();

        Self {
            text,
            start,
            end,
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }
}

/// Result of [`Template::extract`](crate::Template::extract).
///
/// All maps keep the field order of the template definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Field values by result key; `None` when a structural error aborted the call.
    pub data: Option<IndexMap<String, FieldValue>>,

    /// Raw matches by result key.
    pub matches: IndexMap<String, Vec<RawMatch>>,

    /// Per-field diagnostics by result key.
    #[serde(rename = "protocol")]
    pub field_diagnostics: IndexMap<String, Vec<String>>,

    /// Structural error of the call.
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ExtractionError>,
}

impl ExtractionResult {
    /// A result for a call that failed its preconditions.
    pub fn failed(error: ExtractionError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Value of a field by result key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    /// Keys of fields that logged at least one error diagnostic.
    pub fn failed_fields(&self) -> Vec<&str> {
        self.field_diagnostics
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Required keys whose value is missing or empty.
    pub fn missing_required<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|key| self.get(key).is_none_or(FieldValue::is_empty))
            .map(String::as_str)
            .collect()
    }
}

fn serialize_error<S>(error: &Option<ExtractionError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_serialization() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 12).unwrap();

        assert_eq!(serde_json::to_string(&FieldValue::from("EUR")).unwrap(), r#""EUR""#);
        assert_eq!(serde_json::to_string(&FieldValue::Number(1234.56)).unwrap(), "1234.56");
        assert_eq!(serde_json::to_string(&FieldValue::Date(date)).unwrap(), r#""2023-01-12""#);
    }

    #[test]
    fn test_missing_required() {
        let mut data = IndexMap::new();
        data.insert("invoice_number".to_string(), FieldValue::from("RE-1"));
        data.insert("recipient".to_string(), FieldValue::empty());
        let result = ExtractionResult {
            data: Some(data),
            ..Default::default()
        };

        let required = vec![
            "invoice_number".to_string(),
            "recipient".to_string(),
            "iban".to_string(),
        ];
        assert_eq!(result.missing_required(&required), vec!["recipient", "iban"]);
    }

    #[test]
    fn test_failed_result_serialization() {
        let result = ExtractionResult::failed(ExtractionError::NotText);
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["data"].is_null());
        assert_eq!(json["error"], "Text parameter is not a string.");
    }
}

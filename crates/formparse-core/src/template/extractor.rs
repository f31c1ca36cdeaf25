//! Field extraction: normalization, matching, group concatenation and conversion.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use regex::Captures;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::result::{ExtractionResult, FieldValue, RawMatch};

use super::convert::{to_date, to_float};
use super::diagnostics::DiagnosticLog;
use super::field::{FieldKind, FieldSpec};
use super::modifiers::ModifierSet;
use super::normalize::{collapse_whitespace, normalize};
use super::options::ExtractionOptions;

const NOTHING_FOUND: &str = "Error: RegEx - nothing found";

/// Outcome of matching one field's pattern.
struct FieldMatch {
    /// Concatenated value; `None` when the pattern found nothing.
    value: Option<String>,
    raw: Vec<RawMatch>,
}

/// Applies field rules to a text.
pub struct ExtractionEngine<'a> {
    options: &'a ExtractionOptions,
    fields: &'a [FieldSpec],
}

impl<'a> ExtractionEngine<'a> {
    pub fn new(options: &'a ExtractionOptions, fields: &'a [FieldSpec]) -> Self {
        Self { options, fields }
    }

    /// Extract every field from `text`.
    ///
    /// Fields are isolated from each other: a failing field is recorded in its
    /// own diagnostics and in `log`, and the remaining fields still run.
    pub fn extract(&self, text: &str, now: NaiveDateTime, log: &mut DiagnosticLog) -> ExtractionResult {
        if text.is_empty() {
            return ExtractionResult::failed(ExtractionError::EmptyText);
        }

        let normalized = normalize(text, self.options);
        let collapsed = self
            .fields
            .iter()
            .any(|f| f.kind() != FieldKind::Static && self.modifiers_for(f).collapses_whitespace())
            .then(|| collapse_whitespace(&normalized));

        let mut data = IndexMap::new();
        let mut matches = IndexMap::new();
        let mut field_diagnostics = IndexMap::new();

        for field in self.fields {
            if field.name().is_empty() {
                debug!("Skipping field without name");
                continue;
            }

            let key = field.key().to_string();
            let mut value = FieldValue::empty();
            let mut raw = Vec::new();
            let mut diagnostics = Vec::new();

            if field.kind() == FieldKind::Static {
                value = FieldValue::from(field.literal());
            } else {
                let subject = match (&collapsed, self.modifiers_for(field).collapses_whitespace()) {
                    (Some(collapsed), true) => collapsed.as_str(),
                    _ => &*normalized,
                };

                match self.match_field(field, subject) {
                    Ok(FieldMatch { value: Some(found), raw: found_raw }) => {
                        raw = found_raw;
                        value = self.convert(field, found, now);
                    }
                    Ok(FieldMatch { value: None, raw: found_raw }) => {
                        raw = found_raw;
                        diagnostics.push(NOTHING_FOUND.to_string());
                    }
                    Err(err) => {
                        diagnostics.push(format!("Error: {}", err));
                        log.push(format!("Error: Field {} {}", key, err));
                    }
                }
            }

            debug!("Field '{}' -> {:?}", key, value);
            data.insert(key.clone(), value);
            matches.insert(key.clone(), raw);
            field_diagnostics.insert(key, diagnostics);
        }

        ExtractionResult {
            data: Some(data),
            matches,
            field_diagnostics,
            error: None,
        }
    }

    fn modifiers_for(&self, field: &FieldSpec) -> ModifierSet {
        field.modifiers().unwrap_or(self.options.default_modifiers)
    }

    fn match_field(&self, field: &FieldSpec, subject: &str) -> Result<FieldMatch, ExtractionError> {
        let modifiers = self.modifiers_for(field);
        let pattern = if modifiers.collapses_whitespace() {
            collapse_whitespace(field.pattern())
        } else {
            field.pattern().to_string()
        };

        let regex = modifiers
            .build_regex(&pattern)
            .map_err(|err| ExtractionError::pattern(&pattern, &err))?;

        let captures: Vec<Captures<'_>> = if modifiers.is_global() {
            regex.captures_iter(subject).collect()
        } else {
            regex.captures(subject).into_iter().collect()
        };

        let raw = captures.iter().map(RawMatch::from_captures).collect();
        if captures.is_empty() {
            return Ok(FieldMatch { value: None, raw });
        }

        let has_groups = regex.captures_len() > 1;
        let separator = self.options.group_separator.as_str();
        let value = captures
            .iter()
            .map(|caps| resolve_match(caps, has_groups, separator))
            .filter(|resolved| !resolved.is_empty())
            .collect::<Vec<_>>()
            .join(separator);

        Ok(FieldMatch {
            value: Some(value),
            raw,
        })
    }

    fn convert(&self, field: &FieldSpec, value: String, now: NaiveDateTime) -> FieldValue {
        match field.kind() {
            FieldKind::Float => FieldValue::Number(to_float(&value, self.options)),
            FieldKind::Date => {
                let format = field.date_format().unwrap_or(&self.options.date_format);
                to_date(&value, format, now).unwrap_or(FieldValue::Text(value))
            }
            FieldKind::Text | FieldKind::Static => FieldValue::Text(value),
        }
    }
}

/// Value of one match: its non-empty groups joined, or the whole match when
/// the pattern has no groups.
fn resolve_match(caps: &Captures<'_>, has_groups: bool, separator: &str) -> String {
    if has_groups {
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    } else {
        caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default()
    }
}

//! Templates: acceptance tests, field rules and the diagnostic log.

mod convert;
mod diagnostics;
mod extractor;
mod field;
mod matcher;
mod modifiers;
mod normalize;
mod options;
mod set;

pub use convert::{parse_leading_float, to_date, to_float};
pub use diagnostics::DiagnosticLog;
pub use extractor::ExtractionEngine;
pub use field::{FieldKind, FieldSpec};
pub use matcher::MatchEngine;
pub use modifiers::{AcceptancePattern, Modifier, ModifierSet};
pub use normalize::{collapse_whitespace, normalize, strip_accents};
pub use options::ExtractionOptions;
pub use set::TemplateSet;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ExtractionError, Result};
use crate::models::config::EngineConfig;
use crate::models::definition::TemplateDefinition;
use crate::models::result::ExtractionResult;

/// A parse template for one document kind.
///
/// `accepts` and `extract` append to the template's diagnostic log and
/// therefore take `&mut self`; give each worker its own clone for parallel use.
#[derive(Debug, Clone)]
pub struct Template {
    id: String,
    name: String,
    group: String,
    tests: Vec<AcceptancePattern>,
    options: ExtractionOptions,
    fields: Vec<FieldSpec>,
    log: DiagnosticLog,
}

impl Template {
    /// Build a template with the built-in option defaults.
    pub fn new(definition: TemplateDefinition) -> Self {
        Self::with_config(definition, &EngineConfig::default())
    }

    /// Build a template, filling omitted options from `config`.
    pub fn with_config(definition: TemplateDefinition, config: &EngineConfig) -> Self {
        let id = definition
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let options = ExtractionOptions::resolve(&definition.options, &config.defaults);
        let tests = definition
            .test
            .iter()
            .map(|raw| AcceptancePattern::parse(raw))
            .collect();
        let fields: Vec<FieldSpec> = definition.fields.iter().map(FieldSpec::from_definition).collect();

        debug!(
            "Template '{}' ({}) with {} tests and {} fields",
            definition.name,
            id,
            definition.test.len(),
            fields.len()
        );

        Self {
            id,
            name: definition.name,
            group: definition.group,
            tests,
            options,
            fields,
            log: DiagnosticLog::new(),
        }
    }

    /// Decode a YAML definition and build the template.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(Self::new(TemplateDefinition::from_yaml_str(source)?))
    }

    /// Decode a JSON definition and build the template.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(Self::new(TemplateDefinition::from_json_str(source)?))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn tests(&self) -> &[AcceptancePattern] {
        &self.tests
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Whether this template applies to `text`.
    ///
    /// All acceptance tests must match; evaluation stops at the first failing
    /// one. Malformed tests are logged as `Error: <message>`.
    pub fn accepts(&mut self, text: &str) -> bool {
        let accepted = MatchEngine::new(&self.tests).accepts(text, &mut self.log);
        info!("Template '{}' accepts text: {}", self.name, accepted);
        accepted
    }

    /// Extract all fields from `text`, using the current local time for date
    /// components the formats leave open.
    pub fn extract(&mut self, text: &str) -> ExtractionResult {
        self.extract_at(text, Local::now().naive_local())
    }

    /// Extract all fields with an explicit reference time.
    pub fn extract_at(&mut self, text: &str, now: NaiveDateTime) -> ExtractionResult {
        ExtractionEngine::new(&self.options, &self.fields).extract(text, now, &mut self.log)
    }

    /// Extract from a plain value tree node; anything but a string is a
    /// structural error.
    pub fn extract_value(&mut self, input: &serde_json::Value) -> ExtractionResult {
        match input.as_str() {
            Some(text) => self.extract(text),
            None => ExtractionResult::failed(ExtractionError::NotText),
        }
    }

    /// Template-level diagnostics, oldest first.
    pub fn diagnostics(&self) -> &[String] {
        self.log.entries()
    }

    /// Whether the template-level log holds an `ERROR` entry.
    pub fn has_error(&self) -> bool {
        self.log.has_error()
    }

    pub fn clear_diagnostics(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::FieldValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const YAML: &str = r#"
name: Stadtwerke
group: rechnung
test:
  - Stadtwerke/i
  - Rechnung
options:
  decimal_separator: ','
  thousand_separator: '.'
  modifiers: i
fields:
  static_sender: Stadtwerke Musterstadt
  invoice_number: Rechnungsnummer +(\S+)
  amount_float: Betrag +([\d.,]+)
  invoice_date: Rechnungsdatum +(\d{1,2}\.\d{1,2}\.\d{4})
  positions:
    regex: Pos (\d+)
    modifiers: g
  broken: (unclosed
"#;

    const TEXT: &str = "STADTWERKE Musterstadt\nRechnung\nRechnungsnummer RE-77\n\
        Pos 1\nPos 2\nBetrag 1.234,56\nRechnungsdatum 12.01.2023";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_generated_and_explicit_id() {
        let template = Template::from_yaml_str(YAML).unwrap();
        assert!(Uuid::parse_str(template.id()).is_ok());

        let template = Template::from_yaml_str("id: fixed\nname: x").unwrap();
        assert_eq!(template.id(), "fixed");
    }

    #[test]
    fn test_accepts_and_extracts() {
        let mut template = Template::from_yaml_str(YAML).unwrap();
        assert!(template.accepts(TEXT));

        let result = template.extract_at(TEXT, now());
        assert!(result.is_ok());
        assert_eq!(result.get("sender"), Some(&FieldValue::from("Stadtwerke Musterstadt")));
        assert_eq!(result.get("invoice_number"), Some(&FieldValue::from("RE-77")));
        assert_eq!(result.get("amount_float"), Some(&FieldValue::Number(1234.56)));
        assert_eq!(
            result.get("invoice_date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2023, 1, 12).unwrap()))
        );
        assert_eq!(result.get("positions"), Some(&FieldValue::from("1, 2")));
        assert_eq!(result.get("broken"), Some(&FieldValue::empty()));
    }

    #[test]
    fn test_has_error_reads_template_log_only() {
        let mut template = Template::from_yaml_str(
            "name: t\nfields:\n  bic: 'BIC: (\\w{8,11})'\n",
        )
        .unwrap();

        let result = template.extract("no bank data here");
        assert_eq!(result.field_diagnostics["bic"], vec!["Error: RegEx - nothing found"]);
        assert!(!template.has_error());
        assert!(template.diagnostics().is_empty());
    }

    #[test]
    fn test_log_accumulates_until_cleared() {
        let mut template = Template::from_yaml_str(YAML).unwrap();

        template.extract(TEXT);
        template.extract(TEXT);
        assert_eq!(template.diagnostics().len(), 2);
        assert!(template.diagnostics()[0].starts_with("Error: Field broken "));
        assert!(template.has_error());

        template.clear_diagnostics();
        assert!(!template.has_error());
        assert!(template.diagnostics().is_empty());
    }

    #[test]
    fn test_rejects_other_documents() {
        let mut template = Template::from_yaml_str(YAML).unwrap();
        assert!(!template.accepts("Stadtwerke Gutschrift"));
        assert!(template.diagnostics().is_empty());
    }

    #[test]
    fn test_malformed_acceptance_test_logged_once() {
        let mut template =
            Template::from_yaml_str("name: t\ntest:\n  - '(broken'\n  - '[also broken'\n").unwrap();

        assert!(!template.accepts("anything"));
        assert_eq!(template.diagnostics().len(), 1);
        assert!(template.has_error());
    }

    #[test]
    fn test_extract_value_requires_string() {
        let mut template = Template::from_yaml_str(YAML).unwrap();

        for input in [json!(null), json!(42), json!(["text"])] {
            let result = template.extract_value(&input);
            assert!(result.data.is_none());
            assert_eq!(result.error, Some(ExtractionError::NotText));
            assert!(result.field_diagnostics.is_empty());
        }
        assert!(template.diagnostics().is_empty());

        let result = template.extract_value(&json!(TEXT));
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_defaults_used() {
        let mut config = EngineConfig::default();
        config.defaults.group_separator = " / ".to_string();
        let definition = TemplateDefinition::from_yaml_str("name: t\nfields:\n  pos: Pos (\\d+)\n").unwrap();

        let mut template = Template::with_config(definition, &config);
        let result = template.extract("Pos 1 Pos 2");
        assert_eq!(result.get("pos"), Some(&FieldValue::from("1 / 2")));
    }
}

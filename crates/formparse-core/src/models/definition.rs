//! Template definition model.
//!
//! A definition is the plain value tree a template is built from, usually
//! decoded from YAML:
//!
//! ```yaml
//! name: PPP berlin
//! group: rechnung
//! test:
//!   - PPP berlin/i
//!   - Rechnung
//! options:
//!   decimal_separator: ','
//!   thousand_separator: '.'
//! fields:
//!   invoice_amount_float: (\d+,\d+) +EUR
//!   static_currency: EUR
//!   IBAN:
//!     regex: 'IBAN:(\w{10,30})'
//!     modifiers: gxi
//! ```

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::Result;

/// Template definition as decoded from its textual form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateDefinition {
    /// Template identity; generated when absent.
    pub id: Option<String>,

    /// Name used for identification.
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    /// Group classifying the template, e.g. invoices.
    #[serde(deserialize_with = "nullable")]
    pub group: String,

    /// Acceptance patterns, each optionally suffixed with `/<flags>`.
    #[serde(deserialize_with = "nullable")]
    pub test: Vec<String>,

    /// Template-wide options.
    #[serde(deserialize_with = "nullable")]
    pub options: OptionsDefinition,

    /// Field rules in document order.
    #[serde(deserialize_with = "deserialize_fields")]
    pub fields: Vec<FieldDefinition>,
}

/// The `options` block of a definition. Absent or empty values fall back to
/// [`OptionDefaults`](crate::models::config::OptionDefaults).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionsDefinition {
    pub langu: Option<String>,
    pub date_formats: Option<String>,
    pub decimal_separator: Option<String>,
    pub thousand_separator: Option<String>,
    pub group_separator: Option<String>,
    pub remove_accents: Option<bool>,
    pub modifiers: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub replace: Vec<(String, String)>,
    pub currency: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub required_fields: Vec<String>,
}

/// One entry of the `fields` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDefinition {
    /// Field name; drives the field kind.
    pub name: String,
    /// Pattern source.
    pub regex: Option<String>,
    /// Literal value for static fields.
    pub data: Option<String>,
    /// Modifier characters (subset of `igmx`).
    pub modifiers: Option<String>,
    /// Date format overriding the template default.
    pub format: Option<String>,
}

impl FieldDefinition {
    /// Shorthand form: the value is the pattern (or the literal of a static field).
    pub fn shorthand(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            regex: Some(value.clone()),
            data: Some(value),
            ..Default::default()
        }
    }

    /// Pattern source; `data` stands in when `regex` is absent.
    pub fn pattern(&self) -> &str {
        self.regex.as_deref().or(self.data.as_deref()).unwrap_or_default()
    }

    /// Literal value; `regex` stands in when `data` is absent.
    pub fn literal(&self) -> &str {
        self.data.as_deref().or(self.regex.as_deref()).unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldEntry {
    Shorthand(String),
    Detailed(FieldBody),
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FieldBody {
    regex: Option<String>,
    data: Option<String>,
    modifiers: Option<String>,
    format: Option<String>,
}

impl TemplateDefinition {
    /// Decode a definition from YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Decode a definition from JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Build a definition from an already decoded value tree.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields are a mapping; the map visitor keeps document order.
fn deserialize_fields<'de, D>(deserializer: D) -> std::result::Result<Vec<FieldDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<FieldDefinition>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping of field names to patterns")
        }

        fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, entry)) = map.next_entry::<String, Option<FieldEntry>>()? {
                let field = match entry {
                    Some(FieldEntry::Shorthand(value)) => FieldDefinition::shorthand(name, value),
                    Some(FieldEntry::Detailed(body)) => FieldDefinition {
                        name,
                        regex: body.regex,
                        data: body.data,
                        modifiers: body.modifiers,
                        format: body.format,
                    },
                    None => FieldDefinition {
                        name,
                        ..Default::default()
                    },
                };
                fields.push(field);
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_any(FieldsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVOICE_YAML: &str = r#"
name: PPP berlin-brandenburg-hamburg
group: rechnung
test:
    - PPP berlin-brandenburg-hamburg/i
    - Rechnung
options:
    langu: de-DE
    decimal_separator: ','
    thousand_separator: '.'
    replace:
    - ['€', 'EUR']
    - ['|', ' ']
    required_fields:
    - invoice_number
fields:
    invoice_amount_float:
        regex: (\d+,\d+) +EUR Rechnungsbetrag
        modifiers: gi
    static_currency: EUR
    invoice_date: Rechnungsdatum +(\d{1,2}\.\d{1,2}\.\d{2,4})
    subject:
"#;

    #[test]
    fn test_decode_yaml_definition() {
        let def = TemplateDefinition::from_yaml_str(INVOICE_YAML).unwrap();

        assert_eq!(def.id, None);
        assert_eq!(def.name, "PPP berlin-brandenburg-hamburg");
        assert_eq!(def.group, "rechnung");
        assert_eq!(def.test.len(), 2);
        assert_eq!(def.options.langu.as_deref(), Some("de-DE"));
        assert_eq!(def.options.decimal_separator.as_deref(), Some(","));
        assert_eq!(
            def.options.replace,
            vec![
                ("€".to_string(), "EUR".to_string()),
                ("|".to_string(), " ".to_string())
            ]
        );
        assert_eq!(def.options.required_fields, vec!["invoice_number"]);
        assert_eq!(def.options.remove_accents, None);
    }

    #[test]
    fn test_fields_keep_document_order() {
        let def = TemplateDefinition::from_yaml_str(INVOICE_YAML).unwrap();
        let names: Vec<&str> = def.fields.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["invoice_amount_float", "static_currency", "invoice_date", "subject"]
        );
    }

    #[test]
    fn test_field_forms() {
        let def = TemplateDefinition::from_yaml_str(INVOICE_YAML).unwrap();

        let amount = &def.fields[0];
        assert_eq!(amount.pattern(), r"(\d+,\d+) +EUR Rechnungsbetrag");
        assert_eq!(amount.modifiers.as_deref(), Some("gi"));

        let currency = &def.fields[1];
        assert_eq!(currency.literal(), "EUR");

        let subject = &def.fields[3];
        assert_eq!(subject.pattern(), "");
        assert_eq!(subject.modifiers, None);
    }

    #[test]
    fn test_data_key_as_pattern() {
        let def = TemplateDefinition::from_json_str(
            r#"{"name": "x", "fields": {"total": {"data": "Total (\\d+)", "modifiers": "i"}}}"#,
        )
        .unwrap();

        assert_eq!(def.fields[0].pattern(), r"Total (\d+)");
    }

    #[test]
    fn test_empty_blocks() {
        let def = TemplateDefinition::from_yaml_str("name: empty\noptions:\nfields:\ntest:\n").unwrap();

        assert!(def.fields.is_empty());
        assert!(def.test.is_empty());
        assert_eq!(def.options, OptionsDefinition::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(TemplateDefinition::from_yaml_str("fields: [unclosed").is_err());
    }
}

//! Field rules.

use crate::models::definition::FieldDefinition;

use super::modifiers::ModifierSet;

const STATIC_PREFIX: &str = "static_";

/// Behavior of a field, derived once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `static_<key>` - fixed literal value.
    Static,
    /// Extracted string.
    Text,
    /// Name ends with `float` - extracted and converted to a number.
    Float,
    /// Name ends with `date` - extracted and converted to a date.
    Date,
}

impl FieldKind {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with(STATIC_PREFIX) {
            Self::Static
        } else if name.ends_with("float") {
            Self::Float
        } else if name.ends_with("date") {
            Self::Date
        } else {
            Self::Text
        }
    }
}

/// One field's extraction rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    key: String,
    kind: FieldKind,
    pattern: String,
    literal: String,
    modifiers: Option<ModifierSet>,
    date_format: Option<String>,
}

impl FieldSpec {
    pub fn from_definition(def: &FieldDefinition) -> Self {
        let kind = FieldKind::from_name(&def.name);
        let key = def
            .name
            .strip_prefix(STATIC_PREFIX)
            .unwrap_or(&def.name)
            .to_string();

        Self {
            name: def.name.clone(),
            key,
            kind,
            pattern: def.pattern().to_string(),
            literal: def.literal().to_string(),
            modifiers: def
                .modifiers
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(ModifierSet::parse),
            date_format: def.format.clone().filter(|f| !f.is_empty()),
        }
    }

    /// Declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Result key (name without the `static_` prefix).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Own modifiers, if the definition declared any.
    pub fn modifiers(&self) -> Option<ModifierSet> {
        self.modifiers
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::modifiers::Modifier;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(FieldKind::from_name("static_currency"), FieldKind::Static);
        assert_eq!(FieldKind::from_name("invoice_amount_float"), FieldKind::Float);
        assert_eq!(FieldKind::from_name("invoice_date"), FieldKind::Date);
        assert_eq!(FieldKind::from_name("invoice_number"), FieldKind::Text);
        // static wins over the conversion suffixes
        assert_eq!(FieldKind::from_name("static_rate_float"), FieldKind::Static);
    }

    #[test]
    fn test_static_key() {
        let spec = FieldSpec::from_definition(&FieldDefinition::shorthand("static_sender_name", "PPP"));
        assert_eq!(spec.key(), "sender_name");
        assert_eq!(spec.literal(), "PPP");

        let spec = FieldSpec::from_definition(&FieldDefinition::shorthand("BIC", r"BIC: (\w{8,11})"));
        assert_eq!(spec.key(), "BIC");
        assert_eq!(spec.pattern(), r"BIC: (\w{8,11})");
    }

    #[test]
    fn test_modifiers_and_format() {
        let spec = FieldSpec::from_definition(&FieldDefinition {
            name: "IBAN".to_string(),
            regex: Some(r"IBAN:(\w{10,30})".to_string()),
            modifiers: Some("gxi".to_string()),
            format: Some(String::new()),
            ..Default::default()
        });

        let modifiers = spec.modifiers().unwrap();
        assert!(modifiers.is_global());
        assert!(modifiers.collapses_whitespace());
        assert!(modifiers.contains(Modifier::Insensitive));
        assert_eq!(spec.date_format(), None);
    }

    #[test]
    fn test_empty_modifiers_mean_defaults() {
        let spec = FieldSpec::from_definition(&FieldDefinition {
            name: "total".to_string(),
            regex: Some("x".to_string()),
            modifiers: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(spec.modifiers(), None);
    }
}

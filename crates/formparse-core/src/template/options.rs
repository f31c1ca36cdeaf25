//! Template-wide extraction options.

use tracing::warn;

use crate::models::config::OptionDefaults;
use crate::models::definition::OptionsDefinition;

use super::modifiers::ModifierSet;

/// Resolved options of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    pub locale: String,
    pub date_format: String,
    /// Literal `(from, to)` replacements, applied in order before matching.
    pub replacements: Vec<(String, String)>,
    pub decimal_separator: String,
    pub thousand_separator: String,
    pub group_separator: String,
    pub strip_accents: bool,
    /// Modifiers for fields that declare none.
    pub default_modifiers: ModifierSet,
    pub currency: Option<String>,
    pub required_fields: Vec<String>,
}

impl ExtractionOptions {
    /// Resolve a definition's options against `defaults`.
    ///
    /// Empty strings count as absent.
    pub fn resolve(def: &OptionsDefinition, defaults: &OptionDefaults) -> Self {
        fn pick(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        let options = Self {
            locale: pick(&def.langu, &defaults.langu),
            date_format: pick(&def.date_formats, &defaults.date_formats),
            replacements: def.replace.clone(),
            decimal_separator: pick(&def.decimal_separator, &defaults.decimal_separator),
            thousand_separator: pick(&def.thousand_separator, &defaults.thousand_separator),
            group_separator: pick(&def.group_separator, &defaults.group_separator),
            strip_accents: def.remove_accents.unwrap_or(defaults.remove_accents),
            default_modifiers: ModifierSet::parse(&pick(&def.modifiers, &defaults.modifiers)),
            currency: def.currency.clone().filter(|c| !c.is_empty()),
            required_fields: def.required_fields.clone(),
        };

        if !options.decimal_separator.is_empty()
            && options.decimal_separator == options.thousand_separator
        {
            warn!(
                "Decimal and thousand separator are both '{}'; thousand removal takes precedence",
                options.decimal_separator
            );
        }

        options
    }
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self::resolve(&OptionsDefinition::default(), &OptionDefaults::default())
    }
}

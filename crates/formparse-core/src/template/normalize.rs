//! Text normalization applied before matching.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use super::options::ExtractionOptions;

/// Apply the template's replacements and accent stripping.
pub fn normalize<'a>(text: &'a str, options: &ExtractionOptions) -> Cow<'a, str> {
    let mut text = Cow::Borrowed(text);

    for (from, to) in &options.replacements {
        if !from.is_empty() && text.contains(from.as_str()) {
            text = Cow::Owned(text.replace(from.as_str(), to));
        }
    }

    if options.strip_accents {
        text = Cow::Owned(strip_accents(&text));
    }

    text
}

/// Canonical decomposition with combining diacritical marks dropped.
pub fn strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Remove all whitespace.
pub fn collapse_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacements_in_order() {
        let options = ExtractionOptions {
            replacements: vec![
                ("€".to_string(), "EUR".to_string()),
                ("|".to_string(), " ".to_string()),
                ("EUR".to_string(), "Euro".to_string()),
            ],
            ..Default::default()
        };

        assert_eq!(normalize("12 € | 13 €", &options), "12 Euro   13 Euro");
    }

    #[test]
    fn test_replacements_are_literal() {
        let options = ExtractionOptions {
            replacements: vec![(".".to_string(), ",".to_string())],
            ..Default::default()
        };

        assert_eq!(normalize("1.234.56", &options), "1,234,56");
    }

    #[test]
    fn test_strip_accents() {
        let options = ExtractionOptions {
            strip_accents: true,
            ..Default::default()
        };

        assert_eq!(normalize("Hauptstraße Müller Café", &options), "Hauptstraße Muller Cafe");
    }

    #[test]
    fn test_no_changes_borrows() {
        let options = ExtractionOptions::default();
        assert!(matches!(normalize("plain", &options), Cow::Borrowed(_)));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("IBAN: DE99 1111\t2222\n3333"), "IBAN:DE99111122223333");
    }
}

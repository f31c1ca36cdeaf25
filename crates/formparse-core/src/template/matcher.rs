//! Acceptance matching: decides whether a template applies to a text.

use std::borrow::Cow;

use tracing::debug;

use super::diagnostics::DiagnosticLog;
use super::modifiers::AcceptancePattern;
use super::normalize::collapse_whitespace;

/// Evaluates acceptance patterns with AND semantics.
pub struct MatchEngine<'a> {
    patterns: &'a [AcceptancePattern],
}

impl<'a> MatchEngine<'a> {
    pub fn new(patterns: &'a [AcceptancePattern]) -> Self {
        Self { patterns }
    }

    /// True when every pattern matches `text`.
    ///
    /// Stops at the first pattern that fails to compile or to match. A compile
    /// failure is recorded in `log`.
    pub fn accepts(&self, text: &str, log: &mut DiagnosticLog) -> bool {
        for test in self.patterns {
            let (pattern, subject) = if test.flags.collapses_whitespace() {
                (
                    Cow::Owned(collapse_whitespace(&test.pattern)),
                    Cow::Owned(collapse_whitespace(text)),
                )
            } else {
                (Cow::Borrowed(test.pattern.as_str()), Cow::Borrowed(text))
            };

            let regex = match test.flags.build_regex(&pattern) {
                Ok(regex) => regex,
                Err(err) => {
                    log.push(format!("Error: {}", err));
                    return false;
                }
            };

            if !regex.is_match(&subject) {
                debug!("Acceptance test '{}' did not match", test.pattern);
                return false;
            }
        }

        true
    }
}

//! Append-only diagnostic log of a template.

use tracing::debug;

/// Entries starting with this marker (any case) signal a failure.
const ERROR_MARKER: &str = "ERROR";

/// Human-readable messages recorded by acceptance and extraction calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        debug!("Diagnostic: {}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry starts with `ERROR`, compared case-insensitively.
    pub fn has_error(&self) -> bool {
        self.entries.iter().any(|entry| is_error_entry(entry))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub(crate) fn is_error_entry(entry: &str) -> bool {
    entry
        .get(..ERROR_MARKER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ERROR_MARKER))
}

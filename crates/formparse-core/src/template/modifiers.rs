//! Pattern modifiers and acceptance flag markers.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::warn;

lazy_static! {
    // Trailing `/<flags>` marker of an acceptance pattern.
    static ref FLAG_MARKER: Regex = Regex::new(r"/([xig]*)$").unwrap();
}

/// A single pattern modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `i` - case insensitive.
    Insensitive,
    /// `g` - collect all matches.
    Global,
    /// `m` - `^`/`$` match at line boundaries.
    Multiline,
    /// `x` - remove all whitespace from pattern and text before matching.
    CollapseWhitespace,
}

impl Modifier {
    const ALL: [Modifier; 4] = [
        Modifier::Insensitive,
        Modifier::Global,
        Modifier::Multiline,
        Modifier::CollapseWhitespace,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(Self::Insensitive),
            'g' => Some(Self::Global),
            'm' => Some(Self::Multiline),
            'x' => Some(Self::CollapseWhitespace),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Insensitive => 'i',
            Self::Global => 'g',
            Self::Multiline => 'm',
            Self::CollapseWhitespace => 'x',
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Insensitive => 1,
            Self::Global => 1 << 1,
            Self::Multiline => 1 << 2,
            Self::CollapseWhitespace => 1 << 3,
        }
    }
}

/// A set of [`Modifier`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a modifier string such as `gxi`. Unknown characters are ignored.
    pub fn parse(source: &str) -> Self {
        let mut set = Self::new();
        for c in source.chars() {
            match Modifier::from_char(c) {
                Some(modifier) => set.insert(modifier),
                None => warn!("Ignoring unknown modifier '{}' in '{}'", c, source),
            }
        }
        set
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_global(&self) -> bool {
        self.contains(Modifier::Global)
    }

    pub fn collapses_whitespace(&self) -> bool {
        self.contains(Modifier::CollapseWhitespace)
    }

    /// Compile `pattern` with the native flags of this set (`i`, `m`).
    ///
    /// The pattern is expected to be whitespace-collapsed already when `x` is set.
    /// `\r` counts as a line terminator, so `^`/`$` with `m` work on CRLF text.
    pub fn build_regex(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.contains(Modifier::Insensitive))
            .multi_line(self.contains(Modifier::Multiline))
            .crlf(true)
            .build()
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.iter() {
            write!(f, "{}", modifier.as_char())?;
        }
        Ok(())
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        let mut set = Self::new();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

/// An acceptance pattern with its flags split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptancePattern {
    /// Pattern source without the flag marker.
    pub pattern: String,
    /// Only `i` and `x` affect matching; `g` is accepted and ignored.
    pub flags: ModifierSet,
}

impl AcceptancePattern {
    pub fn new(pattern: impl Into<String>, flags: ModifierSet) -> Self {
        Self {
            pattern: pattern.into(),
            flags,
        }
    }

    /// Split a raw test string like `Rechnung/xi` into pattern and flags.
    pub fn parse(raw: &str) -> Self {
        match FLAG_MARKER.captures(raw) {
            Some(caps) => {
                let marker = caps.get(0).map_or(raw.len(), |m| m.start());
                Self::new(&raw[..marker], ModifierSet::parse(&caps[1]))
            }
            None => Self::new(raw, ModifierSet::new()),
        }
    }
}

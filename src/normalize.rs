use std::{collections::BTreeMap, fmt, str::FromStr};

use itertools::Itertools;

use crate::constants::DEFAULT_CONFUSIONS;

/// A single-character substitution table for recognition confusions.
///
/// Every occurrence of a key is replaced by its value in one simultaneous
/// pass, so a replacement character is never itself substituted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionTable(BTreeMap<char, char>);

impl ConfusionTable {
    /// A table with no substitutions.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces a substitution.
    pub fn with(mut self, from: char, to: char) -> Self {
        self.0.insert(from, to);
        self
    }

    /// Returns the replacement for `c`, if any.
    pub fn get(&self, c: char) -> Option<char> {
        self.0.get(&c).copied()
    }

    /// Number of substitutions in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no substitutions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Strips whitespace and repairs confusions in `raw_text`.
    pub fn normalize(&self, raw_text: &str) -> String {
        raw_text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.get(c).unwrap_or(c))
            .collect()
    }
}

impl Default for ConfusionTable {
    fn default() -> Self {
        Self(DEFAULT_CONFUSIONS.into_iter().collect())
    }
}

impl fmt::Display for ConfusionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|(from, to)| format!("{from}={to}")).join(",")
        )
    }
}

/// Errors from parsing a `from=to,...` confusion list.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfusionTableError {
    /// An entry was not of the form `a=b` with single characters.
    #[error("Confusion entry `{0}` must look like `a=b` with single characters on both sides.")]
    MalformedEntry(String),
}

impl FromStr for ConfusionTable {
    type Err = ConfusionTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = ConfusionTable::empty();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut chars = entry.chars();
            match (chars.next(), chars.next(), chars.next(), chars.next()) {
                (Some(from), Some('='), Some(to), None) => {
                    table = table.with(from, to);
                }
                _ => return Err(ConfusionTableError::MalformedEntry(entry.to_string())),
            }
        }
        Ok(table)
    }
}

/// Normalizes `raw_text` with the default confusion table.
pub fn normalize(raw_text: &str) -> String {
    ConfusionTable::default().normalize(raw_text)
}

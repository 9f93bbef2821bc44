//! Ordered mapping between platform mode names and receiver input names.
//!
//! The map is read from configuration once at startup and shared read-only.
//! Declaration order is preserved because it is the order modes are
//! advertised in. The reverse direction (input → mode) resolves duplicates to
//! the mode declared last.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `mode name → receiver input` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMap {
    entries: IndexMap<String, String>,
}

impl InputMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a mapping.
    ///
    /// Replacing keeps the mode at its original position.
    pub fn insert(&mut self, mode: impl Into<String>, input: impl Into<String>) {
        self.entries.insert(mode.into(), input.into());
    }

    /// Receiver input for a platform mode.
    #[must_use]
    pub fn input_for(&self, mode: &str) -> Option<&str> {
        self.entries.get(mode).map(String::as_str)
    }

    /// Platform mode for a receiver input. Last declaration wins.
    #[must_use]
    pub fn mode_for(&self, input: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(_, i)| *i == input)
            .map(|(mode, _)| mode.as_str())
    }

    /// Mode names in declaration order.
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Receiver inputs that more than one mode maps to.
    pub fn shared_inputs(&self) -> Vec<&str> {
        let mut shared: Vec<&str> = Vec::new();
        for (i, input) in self.entries.values().enumerate() {
            let repeated = self.entries.values().take(i).any(|earlier| earlier == input);
            if repeated && !shared.contains(&input.as_str()) {
                shared.push(input);
            }
        }
        shared
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: Into<String>, I: Into<String>> FromIterator<(M, I)> for InputMap {
    fn from_iter<T: IntoIterator<Item = (M, I)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(mode, input)| (mode.into(), input.into()))
                .collect(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// A single known speaker as supplied by the roster source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Canonical full name; may be missing upstream
    #[serde(default)]
    pub name: Option<String>,
}

/// Ordered list of known speaker names.
///
/// Order matters: speaker resolution keeps the last matching entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster, dropping absent and blank names
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self {
            names: names
                .into_iter()
                .flatten()
                .filter(|n| !n.trim().is_empty())
                .collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(|n| Some(n.into())))
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        Self::new(entries.into_iter().map(|e| e.name))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

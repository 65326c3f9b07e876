use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Speaker label used for turns without a resolved speaker
pub const UNKNOWN_SPEAKER: &str = "UNK";

/// Placeholder text for header fields without a value
pub const NOT_AVAILABLE: &str = "N/A";

/// Default editorial correction note
pub const DEFAULT_CORRECTION: &str = "No correction of source texts was performed.";

/// TEI header fields of a document or of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeiHeader {
    pub title: String,
    /// Only emitted when present
    pub edition: Option<String>,
    pub authority: String,
    pub correction: String,
}

impl Default for TeiHeader {
    fn default() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            edition: None,
            authority: NOT_AVAILABLE.to_string(),
            correction: DEFAULT_CORRECTION.to_string(),
        }
    }
}

/// Fixed preface block preceding a document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preface {
    pub head: String,
    pub date: NaiveDate,
}

/// Header metadata attached once per document, ahead of the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFields {
    pub header: TeiHeader,
    pub preface: Preface,
}

/// A contiguous run of text attributed to one speaker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechTurn {
    /// Resolved speaker; `None` renders as [`UNKNOWN_SPEAKER`]
    pub speaker: Option<String>,
    pub segments: Vec<String>,
}

impl SpeechTurn {
    pub fn new(speaker: Option<String>) -> Self {
        Self {
            speaker,
            segments: Vec::new(),
        }
    }

    /// Label written to the `who` attribute
    pub fn who(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// The assembled representation of one protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub id: String,
    pub header: TeiHeader,
    pub preface: Preface,
    /// Ordered turns; the first is the implicit leading `UNK` turn
    pub turns: Vec<SpeechTurn>,
}

impl DocumentTree {
    /// Turns that received at least one segment
    pub fn spoken_turns(&self) -> impl Iterator<Item = &SpeechTurn> {
        self.turns.iter().filter(|t| !t.is_empty())
    }

    pub fn segment_count(&self) -> usize {
        self.turns.iter().map(|t| t.segments.len()).sum()
    }
}

/// Aggregate of all assembled documents of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub header: TeiHeader,
    pub documents: Vec<DocumentTree>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_turn_label() {
        assert_eq!(SpeechTurn::new(None).who(), "UNK");
        assert_eq!(SpeechTurn::new(Some("Erik Ek".to_string())).who(), "Erik Ek");
    }

    #[test]
    fn test_default_header() {
        let header = TeiHeader::default();
        assert_eq!(header.title, "N/A");
        assert!(header.edition.is_none());
        assert_eq!(header.correction, DEFAULT_CORRECTION);
    }
}

use serde::{Deserialize, Serialize};

/// A single paragraph node inside a content block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A structural unit of the source document (one OCR block)
///
/// `text` is everything the block contains, including text that sits outside
/// any paragraph; it is what noise classification and pattern scanning see.
/// Assembly walks `paragraphs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
    pub paragraphs: Vec<Paragraph>,
}

impl ContentBlock {
    /// Block whose text is exactly its paragraphs, newline separated
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        let text = paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text, paragraphs }
    }

    /// Block with aggregated text recorded separately from its paragraphs
    pub fn with_text(text: impl Into<String>, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            text: text.into(),
            paragraphs,
        }
    }

    /// Build a block from raw paragraph strings
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(Paragraph::new).collect())
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A parsed protocol: an identifier and its content blocks in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Protocol / package identifier (usually the source file stem)
    pub id: String,
    pub blocks: Vec<ContentBlock>,
}

impl Document {
    pub fn new(id: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            id: id.into(),
            blocks,
        }
    }

    /// Total number of paragraphs across all blocks
    pub fn paragraph_count(&self) -> usize {
        self.blocks.iter().map(|b| b.paragraphs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_text_joins_paragraphs() {
        let block = ContentBlock::from_lines(["Herr talman!", "Jag yrkar bifall."]);
        assert_eq!(block.text(), "Herr talman!\nJag yrkar bifall.");
    }

    #[test]
    fn test_empty_block_text() {
        assert_eq!(ContentBlock::default().text(), "");
        assert_eq!(ContentBlock::from_lines([""]).text(), "");
    }

    #[test]
    fn test_block_text_may_exceed_paragraphs() {
        let block = ContentBlock::with_text("Herr EK yttrade:\nJa.", vec![Paragraph::new("Ja.")]);
        assert_eq!(block.text(), "Herr EK yttrade:\nJa.");
        assert_eq!(block.paragraphs.len(), 1);
    }
}

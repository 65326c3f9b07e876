use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;

use crate::error::SegmentError;
use crate::models::{
    ContentBlock, Document, InstanceIndex, MatchInstance, Paragraph, Pattern, Roster, RosterEntry,
};

/// Element name marking a content block in source XML
pub const CONTENT_BLOCK_TAG: &[u8] = b"contentBlock";

/// Parse JSON Lines, skipping blank lines
fn parse_json_lines<T: DeserializeOwned>(
    content: &str,
    kind: &'static str,
) -> Result<Vec<T>, SegmentError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| SegmentError::MalformedRecord {
                kind,
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Parse a pattern set from JSON Lines (`{"pattern": "..."}` per line)
pub fn parse_patterns(content: &str) -> Result<Vec<Pattern>, SegmentError> {
    parse_json_lines(content, "pattern set")
}

/// Load the pattern set from a JSON Lines file
pub fn read_patterns(path: &Path) -> Result<Vec<Pattern>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pattern file: {:?}", path))?;
    parse_patterns(&content).with_context(|| format!("Failed to parse pattern file: {:?}", path))
}

/// Load the roster: JSON Lines with a `name` field, or one name per line
pub fn read_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {:?}", path))?;

    let is_json = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("jsonl")
    );
    if is_json {
        let entries: Vec<RosterEntry> = parse_json_lines(&content, "roster")
            .with_context(|| format!("Failed to parse roster file: {:?}", path))?;
        Ok(Roster::from_entries(entries))
    } else {
        Ok(Roster::new(content.lines().map(|l| Some(l.trim().to_string()))))
    }
}

/// Parse a persisted instance table
pub fn parse_instances(content: &str) -> Result<InstanceIndex, SegmentError> {
    let rows: Vec<MatchInstance> = parse_json_lines(content, "instance table")?;
    Ok(InstanceIndex::new(rows))
}

/// Load a persisted instance table from a JSON Lines file
pub fn read_instances(path: &Path) -> Result<InstanceIndex> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read instance file: {:?}", path))?;
    parse_instances(&content).with_context(|| format!("Failed to parse instance file: {:?}", path))
}

/// Parse a structured XML protocol.
///
/// Every `contentBlock` element is a content block. Its text is every
/// non-blank descendant text node joined by newlines, including text outside
/// any child element. Each child element is one paragraph whose raw text is
/// all of the child's descendant text.
pub fn parse_document_xml(id: &str, xml: &str) -> Result<Document, SegmentError> {
    let malformed = |source: quick_xml::Error| SegmentError::MalformedDocument {
        document_id: id.to_string(),
        source,
    };

    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();
    let mut block: Option<OpenBlock> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                depth += 1;
                match block.as_mut() {
                    None if e.local_name().as_ref() == CONTENT_BLOCK_TAG => {
                        block = Some(OpenBlock::new(depth));
                    }
                    Some(open) if depth == open.depth + 1 => {
                        open.paragraph = Some(String::new());
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match block.as_mut() {
                Some(open) if depth == open.depth => open.paragraphs.push(Paragraph::default()),
                Some(_) => {}
                None if e.local_name().as_ref() == CONTENT_BLOCK_TAG => {
                    blocks.push(ContentBlock::default());
                }
                None => {}
            },
            Event::Text(t) => {
                if let Some(open) = block.as_mut() {
                    let unescaped = t.unescape().map_err(|e| malformed(e.into()))?;
                    open.push_text(&unescaped);
                }
            }
            Event::CData(c) => {
                if let Some(open) = block.as_mut() {
                    open.push_text(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                if let Some(open) = block.as_mut() {
                    if depth == open.depth + 1 {
                        if let Some(text) = open.paragraph.take() {
                            open.paragraphs.push(Paragraph::new(text));
                        }
                    } else if depth == open.depth {
                        blocks.extend(block.take().map(OpenBlock::finish));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Document::new(id, blocks))
}

/// A `contentBlock` being parsed
struct OpenBlock {
    depth: usize,
    text_nodes: Vec<String>,
    paragraphs: Vec<Paragraph>,
    paragraph: Option<String>,
}

impl OpenBlock {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            text_nodes: Vec::new(),
            paragraphs: Vec::new(),
            paragraph: None,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
        // indentation between elements
        if !text.trim().is_empty() {
            self.text_nodes.push(text.to_string());
        }
    }

    fn finish(self) -> ContentBlock {
        ContentBlock::with_text(self.text_nodes.join("\n"), self.paragraphs)
    }
}

/// Parse an OCR'd plain-text protocol.
///
/// Blank lines separate content blocks; every other line is one paragraph,
/// kept as written.
pub fn parse_document_text(id: &str, text: &str) -> Document {
    let mut blocks = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !lines.is_empty() {
                blocks.push(ContentBlock::from_lines(lines.drain(..)));
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        blocks.push(ContentBlock::from_lines(lines));
    }

    Document::new(id, blocks)
}

/// Document id of a source file: its stem
pub fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read one document, dispatching on the file extension
pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {:?}", path))?;
    let id = document_id(path);

    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => Ok(parse_document_text(&id, &content)),
        _ => parse_document_xml(&id, &content)
            .with_context(|| format!("Failed to parse document: {:?}", path)),
    }
}

fn is_document_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("xml") | Some("txt")
    )
}

/// Expand inputs into document files; directories contribute their `.xml`
/// and `.txt` files in name order.
pub fn collect_document_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to list directory: {:?}", input))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_document_file(p))
                .collect();
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }

    Ok(paths)
}

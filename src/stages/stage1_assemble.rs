use tracing::debug;

use crate::models::{Document, DocumentTree, HeaderFields, MatchInstance, SpeechTurn};

/// Execute Stage 1: Document assembly
///
/// Walks content blocks and their paragraphs in order. Attribution is
/// re-evaluated on every non-empty paragraph: every instance row of this
/// document is tested, and if any row's matched text occurs in the paragraph a
/// new turn opens for the speaker of the *last* such row (`UNK` when that row
/// is unresolved). The paragraph is then appended to whichever turn is open.
///
/// The first turn is an implicit `UNK` turn that may stay empty; it is pruned
/// when the corpus is serialized.
pub fn assemble_document<'a>(
    document: &Document,
    fields: &HeaderFields,
    instances: impl IntoIterator<Item = &'a MatchInstance>,
) -> DocumentTree {
    let rows: Vec<&MatchInstance> = instances
        .into_iter()
        .filter(|r| r.document_id == document.id)
        .collect();

    let mut turns = vec![SpeechTurn::new(None)];

    for block in &document.blocks {
        if block.text().is_empty() {
            continue;
        }

        for paragraph in &block.paragraphs {
            if paragraph.is_empty() {
                continue;
            }

            if let Some(row) = last_matching_row(&rows, &paragraph.text) {
                let speaker = row.resolved_speaker().map(str::to_string);
                turns.push(SpeechTurn::new(speaker));
            }

            if let Some(open) = turns.last_mut() {
                open.segments.push(paragraph.text.clone());
            }
        }
    }

    debug!(
        "{}: {} turns from {} rows",
        document.id,
        turns.len(),
        rows.len()
    );

    DocumentTree {
        id: document.id.clone(),
        header: fields.header.clone(),
        preface: fields.preface.clone(),
        turns,
    }
}

/// Scan all rows without early exit; the last row whose text occurs in the
/// paragraph decides the speaker.
fn last_matching_row<'a>(rows: &[&'a MatchInstance], paragraph: &str) -> Option<&'a MatchInstance> {
    let mut found = None;
    for row in rows {
        if paragraph.contains(row.text.as_str()) {
            found = Some(*row);
        }
    }
    found
}

use tracing::debug;

use crate::heuristics::{resolve_speaker, NoiseClassifier, RatioClassifier};
use crate::models::{CompiledPattern, Document, MatchInstance, Roster};

/// Result of Stage 0 detection for one document
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    /// Match instances in pattern order, then block order, then match order
    pub instances: Vec<MatchInstance>,
    /// Number of content blocks in the document
    pub blocks_total: usize,
    /// Blocks skipped as metadata noise
    pub noise_blocks: usize,
}

impl DetectionResult {
    /// Instances with a resolved speaker
    pub fn resolved_count(&self) -> usize {
        self.instances.iter().filter(|i| i.speaker.is_some()).count()
    }
}

/// Find all pattern instances in a document with the default noise classifier
pub fn find_instances(
    document: &Document,
    patterns: &[CompiledPattern],
    roster: Option<&Roster>,
) -> DetectionResult {
    find_instances_with(document, patterns, roster, &RatioClassifier::default())
}

/// Execute Stage 0: Detection
///
/// For every pattern and every content block not classified as noise, every
/// non-overlapping match becomes one [`MatchInstance`], attributed via the
/// roster when one is supplied. Pure: identical inputs give identical rows.
pub fn find_instances_with(
    document: &Document,
    patterns: &[CompiledPattern],
    roster: Option<&Roster>,
    classifier: &dyn NoiseClassifier,
) -> DetectionResult {
    let block_texts: Vec<&str> = document.blocks.iter().map(|b| b.text()).collect();
    let scannable: Vec<bool> = block_texts.iter().map(|t| !classifier.is_noise(t)).collect();
    let noise_blocks = scannable.iter().filter(|&&s| !s).count();

    let mut instances = Vec::new();

    for pattern in patterns {
        for (block_index, text) in block_texts.iter().enumerate() {
            if !scannable[block_index] {
                continue;
            }

            // (byte, char) position of the previous match start
            let mut cursor = (0usize, 0usize);

            for m in pattern.regex.find_iter(text) {
                let speaker = roster
                    .and_then(|r| resolve_speaker(m.as_str(), r))
                    .map(str::to_string);
                let offset = cursor.1 + text[cursor.0..m.start()].chars().count();
                cursor = (m.start(), offset);

                instances.push(
                    MatchInstance::new(&document.id, &pattern.digest, m.as_str(), speaker)
                        .with_location(block_index, offset),
                );
            }
        }
    }

    debug!(
        "{}: {} blocks, {} noise, {} instances",
        document.id,
        block_texts.len(),
        noise_blocks,
        instances.len()
    );

    DetectionResult {
        instances,
        blocks_total: block_texts.len(),
        noise_blocks,
    }
}

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::heuristics::{NoiseConfig, RatioClassifier};
use crate::io::{header_fields_for, read_document, HeaderDefaults};
use crate::models::{compile_patterns, Document, DocumentTree, InstanceIndex, Pattern, Roster};
use crate::stages::{
    assemble_corpus, assemble_document, find_instances_with, CorpusConfig, DetectionResult,
    SerializedCorpus,
};

/// Batch settings shared by the workflows
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    pub noise: NoiseConfig,
    pub header_defaults: HeaderDefaults,
    pub corpus: CorpusConfig,
    /// Skip documents that fail to load instead of aborting the batch
    pub keep_going: bool,
}

/// Per-document detection statistics
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub document_id: String,
    pub blocks: usize,
    pub noise_blocks: usize,
    pub paragraphs: usize,
    pub instances: usize,
    pub resolved: usize,
}

impl DocumentReport {
    fn new(document: &Document, detection: &DetectionResult) -> Self {
        Self {
            document_id: document.id.clone(),
            blocks: detection.blocks_total,
            noise_blocks: detection.noise_blocks,
            paragraphs: document.paragraph_count(),
            instances: detection.instances.len(),
            resolved: detection.resolved_count(),
        }
    }
}

/// Result of running detection over a batch
#[derive(Debug, Clone, Default)]
pub struct DetectionBatch {
    pub index: InstanceIndex,
    pub reports: Vec<DocumentReport>,
    /// Documents that failed to load and were skipped
    pub skipped: Vec<PathBuf>,
}

/// Load documents in order, honouring `keep_going` for unreadable files
pub fn load_documents(
    paths: &[PathBuf],
    keep_going: bool,
) -> Result<(Vec<Document>, Vec<PathBuf>)> {
    let mut documents = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match read_document(path) {
            Ok(document) => documents.push(document),
            Err(e) if keep_going => {
                warn!("Skipping {:?}: {:#}", path, e);
                skipped.push(path.clone());
            }
            Err(e) => return Err(e),
        }
    }

    Ok((documents, skipped))
}

/// Detect pattern instances in every document.
///
/// Patterns are compiled up front; an invalid pattern aborts the batch before
/// any document is scanned.
pub fn detect_documents(
    documents: &[Document],
    patterns: &[Pattern],
    roster: Option<&Roster>,
    config: &BatchConfig,
) -> Result<DetectionBatch> {
    let compiled = compile_patterns(patterns)?;
    let classifier = RatioClassifier::new(config.noise.clone());

    let mut batch = DetectionBatch::default();
    for document in documents {
        let detection = find_instances_with(document, &compiled, roster, &classifier);
        let report = DocumentReport::new(document, &detection);
        info!(
            "{}: {} instances ({} resolved), {} of {} blocks skipped as noise",
            report.document_id,
            report.instances,
            report.resolved,
            report.noise_blocks,
            report.blocks
        );
        batch.index.extend(detection.instances);
        batch.reports.push(report);
    }

    Ok(batch)
}

/// Assemble every document against the instance table and serialize the corpus
pub fn assemble_documents(
    documents: &[Document],
    index: &InstanceIndex,
    config: &BatchConfig,
) -> Result<SerializedCorpus> {
    let trees: Vec<DocumentTree> = documents
        .iter()
        .map(|document| {
            info!("Create TEI for {}", document.id);
            let fields = header_fields_for(&document.id, &config.header_defaults);
            assemble_document(document, &fields, index.for_document(&document.id))
        })
        .collect();

    assemble_corpus(trees, config.corpus.header())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentBlock;

    #[test]
    fn test_invalid_pattern_aborts_batch() {
        let documents = vec![Document::new("p", vec![ContentBlock::from_lines(["Herr EK:"])])];
        let patterns = vec![Pattern::new("Herr"), Pattern::new("[")];

        let result = detect_documents(&documents, &patterns, None, &BatchConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_keep_going_skips_unreadable_documents() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("prot_1925_ak_1.txt");
        std::fs::write(&good, "Herr EK:\nJa.").unwrap();
        let missing = dir.path().join("prot_1925_ak_2.xml");

        let paths = vec![good, missing.clone()];
        let (documents, skipped) = load_documents(&paths, true).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(skipped, vec![missing]);

        assert!(load_documents(&paths, false).is_err());
    }
}

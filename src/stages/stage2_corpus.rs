use anyhow::Result;
use tracing::{debug, info};

use crate::io::corpus_element;
use crate::models::{Corpus, DocumentTree, TeiHeader, DEFAULT_CORRECTION, NOT_AVAILABLE};

/// Configuration for the corpus-level header
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub title: String,
    pub edition: Option<String>,
    pub authority: String,
    pub correction: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            edition: Some("0.1.0".to_string()),
            authority: NOT_AVAILABLE.to_string(),
            correction: DEFAULT_CORRECTION.to_string(),
        }
    }
}

impl CorpusConfig {
    pub fn header(&self) -> TeiHeader {
        TeiHeader {
            title: self.title.clone(),
            edition: self.edition.clone(),
            authority: self.authority.clone(),
            correction: self.correction.clone(),
        }
    }
}

/// Result of Stage 2 corpus assembly
#[derive(Debug, Clone)]
pub struct SerializedCorpus {
    /// The serialized XML document
    pub xml: String,
    /// Number of documents in the corpus
    pub documents: usize,
    /// Elements removed by the empty-element pass
    pub elements_pruned: usize,
}

/// Wrap assembled documents under one corpus header
pub fn build_corpus(documents: Vec<DocumentTree>, header: TeiHeader) -> Corpus {
    Corpus { header, documents }
}

/// Execute Stage 2: Corpus assembly
///
/// Builds the `teiCorpus` tree, removes every element whose normalized text
/// content is empty (unused header fields, turns that never received a
/// segment) and serializes the result.
pub fn assemble_corpus(
    documents: Vec<DocumentTree>,
    header: TeiHeader,
) -> Result<SerializedCorpus> {
    serialize_corpus(&build_corpus(documents, header))
}

/// Prune and serialize an already built corpus
pub fn serialize_corpus(corpus: &Corpus) -> Result<SerializedCorpus> {
    let mut root = corpus_element(corpus);
    let before = root.element_count();
    let elements_pruned = root.prune_empty();
    debug!(
        "Pruned {} subtrees ({} -> {} elements)",
        elements_pruned,
        before,
        root.element_count()
    );

    let xml = root.to_xml_string()?;
    info!(
        "Serialized corpus: {} documents, {} bytes",
        corpus.documents.len(),
        xml.len()
    );

    Ok(SerializedCorpus {
        xml,
        documents: corpus.documents.len(),
        elements_pruned,
    })
}

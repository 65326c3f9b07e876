pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod stages;
pub mod workflow;

pub use error::SegmentError;
pub use heuristics::{
    is_metadata_block, resolve_speaker, NoiseClassifier, NoiseConfig, RatioClassifier,
};
pub use io::{
    infer_metadata, parse_document_text, parse_document_xml, HeaderDefaults, ProtocolMetadata,
};
pub use models::{
    ContentBlock, Corpus, Document, DocumentTree, InstanceIndex, MatchInstance, Paragraph, Pattern,
    Roster, SpeechTurn, TeiHeader,
};
pub use stages::{
    assemble_corpus, assemble_document, find_instances, find_instances_with, CorpusConfig,
    SerializedCorpus,
};
pub use workflow::{assemble_documents, detect_documents, load_documents, BatchConfig};

use thiserror::Error;

/// Fatal conditions raised by the segmentation library
#[derive(Debug, Error)]
pub enum SegmentError {
    /// A segmentation pattern failed to compile; aborts the whole batch
    #[error("invalid segmentation pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The source document could not be parsed as XML
    #[error("malformed document {document_id}: {source}")]
    MalformedDocument {
        document_id: String,
        #[source]
        source: quick_xml::Error,
    },

    /// A line of a JSON Lines input could not be decoded
    #[error("malformed record on line {line} of {kind}: {source}")]
    MalformedRecord {
        kind: &'static str,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

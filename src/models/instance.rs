use serde::{Deserialize, Deserializer, Serialize};

/// One occurrence of a segmentation pattern inside a non-noise content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInstance {
    /// Owning document (protocol package) id
    #[serde(rename = "package_id")]
    pub document_id: String,
    /// Content-derived pattern identity
    #[serde(rename = "pattern")]
    pub pattern_digest: String,
    /// The matched substring
    #[serde(rename = "txt")]
    pub text: String,
    /// Resolved speaker, if any
    #[serde(rename = "person", default, deserialize_with = "deserialize_speaker")]
    pub speaker: Option<String>,
    /// Index of the content block the match was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
    /// Character offset of the match within the block text
    #[serde(rename = "loc", default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl MatchInstance {
    pub fn new(
        document_id: impl Into<String>,
        pattern_digest: impl Into<String>,
        text: impl Into<String>,
        speaker: Option<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            pattern_digest: pattern_digest.into(),
            text: text.into(),
            speaker,
            block: None,
            offset: None,
        }
    }

    pub fn with_location(mut self, block: usize, offset: usize) -> Self {
        self.block = Some(block);
        self.offset = Some(offset);
        self
    }

    /// The speaker name if it is a usable label
    pub fn resolved_speaker(&self) -> Option<&str> {
        self.speaker.as_deref().filter(|s| !s.is_empty())
    }
}

/// Accept only non-empty strings as speakers; null, numbers and other
/// sentinels propagated from upstream tables load as unresolved.
fn deserialize_speaker<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Ordered table of match instances, the join between detection and assembly.
///
/// Rows are never deduplicated; order and multiplicity are significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceIndex {
    rows: Vec<MatchInstance>,
}

impl InstanceIndex {
    pub fn new(rows: Vec<MatchInstance>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MatchInstance] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = MatchInstance>) {
        self.rows.extend(rows);
    }

    /// Rows belonging to one document, in table order
    pub fn for_document<'a>(
        &'a self,
        document_id: &'a str,
    ) -> impl Iterator<Item = &'a MatchInstance> {
        self.rows.iter().filter(move |r| r.document_id == document_id)
    }
}

impl FromIterator<MatchInstance> for InstanceIndex {
    fn from_iter<T: IntoIterator<Item = MatchInstance>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

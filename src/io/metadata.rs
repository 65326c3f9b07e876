use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{HeaderFields, Preface, TeiHeader, DEFAULT_CORRECTION, NOT_AVAILABLE};

/// Chamber of a bicameral-era protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    /// Andra kammaren
    Ak,
    /// Första kammaren
    Fk,
}

impl Chamber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::Ak => "ak",
            Chamber::Fk => "fk",
        }
    }
}

/// Metadata inferred from a protocol filename or package id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMetadata {
    /// Protocol id: last path segment up to the first '.'
    pub protocol: String,
    pub year: Option<i32>,
    pub chamber: Option<Chamber>,
    /// Session date; not derivable from filenames yet
    pub date: Option<NaiveDate>,
}

/// Values used where inference leaves a header field unset
#[derive(Debug, Clone)]
pub struct HeaderDefaults {
    /// Year used for the fallback date when none was inferred
    pub fallback_year: i32,
    pub authority: String,
    pub correction: String,
}

impl Default for HeaderDefaults {
    fn default() -> Self {
        Self {
            fallback_year: 2020,
            authority: NOT_AVAILABLE.to_string(),
            correction: DEFAULT_CORRECTION.to_string(),
        }
    }
}

impl ProtocolMetadata {
    /// Session date, falling back to January 1st of the inferred year
    pub fn date_or_default(&self, defaults: &HeaderDefaults) -> NaiveDate {
        let year = self.year.unwrap_or(defaults.fallback_year);
        self.date
            .or_else(|| NaiveDate::from_ymd_opt(year, 1, 1))
            .unwrap_or_default()
    }
}

/// Infer protocol id, year and chamber from a filename.
///
/// The year is taken from the first four characters of each `_`-separated
/// token when they are digits strictly between 1800 and 2100; the last such
/// token wins. The chamber comes from an `_ak_` or `_fk_` marker.
pub fn infer_metadata(filename: &str) -> ProtocolMetadata {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    let protocol = basename.split('.').next().unwrap_or(basename).to_string();

    let mut year = None;
    for token in basename.split('_') {
        let prefix: String = token.chars().take(4).collect();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(y) = prefix.parse::<i32>() {
            if y > 1800 && y < 2100 {
                year = Some(y);
            }
        }
    }

    let chamber = if filename.contains("_ak_") {
        Some(Chamber::Ak)
    } else if filename.contains("_fk_") {
        Some(Chamber::Fk)
    } else {
        None
    };

    let metadata = ProtocolMetadata {
        protocol,
        year,
        chamber,
        date: None,
    };
    debug!("Metadata {:?}", metadata);
    metadata
}

/// Human-readable document title derived from a protocol id
pub fn document_title(protocol: &str) -> String {
    let spaced = protocol.replace('_', " ");
    let head = spaced.split('-').next().unwrap_or(&spaced);
    head.replace("prot", "Protokoll")
}

/// Build the per-document header and preface from inferred metadata
pub fn header_fields(metadata: &ProtocolMetadata, defaults: &HeaderDefaults) -> HeaderFields {
    let date = metadata.date_or_default(defaults);
    let head = metadata
        .protocol
        .split('.')
        .next()
        .unwrap_or(&metadata.protocol)
        .to_string();

    HeaderFields {
        header: TeiHeader {
            title: document_title(&metadata.protocol),
            edition: None,
            authority: defaults.authority.clone(),
            correction: defaults.correction.clone(),
        },
        preface: Preface { head, date },
    }
}

/// Header fields for a document id; hyphens count as token separators
pub fn header_fields_for(document_id: &str, defaults: &HeaderDefaults) -> HeaderFields {
    let metadata = infer_metadata(&document_id.replace('-', "_"));
    let fields = header_fields(&metadata, defaults);
    debug!(
        "{}: year {} chamber {:?}",
        document_id,
        fields.preface.date.year(),
        metadata.chamber.map(|c| c.as_str())
    );
    fields
}

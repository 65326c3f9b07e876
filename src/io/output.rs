use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::io::xml::XmlElement;
use crate::models::{Corpus, DocumentTree, InstanceIndex, SpeechTurn, TeiHeader};

/// Namespace of the corpus root element
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// Render a `teiHeader` element.
///
/// `editionStmt` is only emitted when an edition is set; `extent` is always
/// declared and later pruned if it stays empty.
pub fn header_element(header: &TeiHeader) -> XmlElement {
    let mut file_desc = XmlElement::new("fileDesc").with_child(
        XmlElement::new("titleStmt").with_child(XmlElement::new("title").with_text(&header.title)),
    );

    if let Some(edition) = &header.edition {
        file_desc.push(
            XmlElement::new("editionStmt")
                .with_child(XmlElement::new("edition").with_text(edition)),
        );
    }

    file_desc.push(XmlElement::new("extent"));
    file_desc.push(
        XmlElement::new("publicationStmt")
            .with_child(XmlElement::new("authority").with_text(&header.authority)),
    );
    file_desc.push(
        XmlElement::new("sourceDesc").with_child(
            XmlElement::new("bibl").with_child(XmlElement::new("title").with_text(&header.title)),
        ),
    );

    let encoding_desc = XmlElement::new("encodingDesc").with_child(
        XmlElement::new("editorialDecl").with_child(
            XmlElement::new("correction")
                .with_child(XmlElement::new("p").with_text(&header.correction)),
        ),
    );

    XmlElement::new("teiHeader")
        .with_child(file_desc)
        .with_child(encoding_desc)
}

fn turn_element(turn: &SpeechTurn) -> XmlElement {
    let mut u = XmlElement::new("u").with_attr("who", turn.who());
    for segment in &turn.segments {
        u.push(XmlElement::new("seg").with_text(segment));
    }
    u
}

/// Render one assembled protocol as a `TEI` element
pub fn document_element(document: &DocumentTree) -> XmlElement {
    let date = document.preface.date.format("%Y-%m-%d").to_string();

    let preface = XmlElement::new("div")
        .with_attr("type", "preface")
        .with_child(XmlElement::new("head").with_text(&document.preface.head))
        .with_child(
            XmlElement::new("docDate")
                .with_attr("when", &date)
                .with_text(&date),
        );

    let mut body_div = XmlElement::new("div");
    for turn in &document.turns {
        body_div.push(turn_element(turn));
    }

    let text = XmlElement::new("text")
        .with_child(XmlElement::new("front").with_child(preface))
        .with_child(XmlElement::new("body").with_child(body_div));

    XmlElement::new("TEI")
        .with_child(header_element(&document.header))
        .with_child(text)
}

/// Render the corpus root, before pruning
pub fn corpus_element(corpus: &Corpus) -> XmlElement {
    let mut root = XmlElement::new("teiCorpus")
        .with_attr("xmlns", TEI_NAMESPACE)
        .with_child(header_element(&corpus.header));
    for document in &corpus.documents {
        root.push(document_element(document));
    }
    root
}

/// Write serialized XML to a file
pub fn write_xml(path: &Path, xml: &str) -> Result<()> {
    std::fs::write(path, xml).with_context(|| format!("Failed to write XML: {:?}", path))
}

/// Persist an instance table as JSON Lines
pub fn write_instances(path: &Path, index: &InstanceIndex) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = std::io::BufWriter::new(file);
    for row in index.rows() {
        serde_json::to_writer(&mut writer, row).context("Failed to write instance row")?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::input::read_instances;
    use crate::models::{MatchInstance, Preface};
    use chrono::NaiveDate;

    #[test]
    fn test_header_without_edition() {
        let element = header_element(&TeiHeader::default());
        let file_desc = element.child("fileDesc").unwrap();

        assert!(file_desc.child("editionStmt").is_none());
        assert!(file_desc.child("extent").is_some());
        let names: Vec<_> = file_desc.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["titleStmt", "extent", "publicationStmt", "sourceDesc"]);
    }

    #[test]
    fn test_header_with_edition() {
        let header = TeiHeader {
            edition: Some("0.1.0".to_string()),
            ..Default::default()
        };
        let element = header_element(&header);
        let file_desc = element.child("fileDesc").unwrap();

        let edition = file_desc.child("editionStmt").and_then(|e| e.child("edition"));
        assert_eq!(edition.and_then(|e| e.text.as_deref()), Some("0.1.0"));
        assert_eq!(file_desc.children[1].name, "editionStmt");
    }

    #[test]
    fn test_document_element_structure() {
        let document = DocumentTree {
            id: "prot_1925_ak_12".to_string(),
            header: TeiHeader::default(),
            preface: Preface {
                head: "prot_1925_ak_12".to_string(),
                date: NaiveDate::from_ymd_opt(1925, 1, 1).unwrap(),
            },
            turns: vec![SpeechTurn {
                speaker: Some("Erik Ek".to_string()),
                segments: vec!["Herr talman!".to_string()],
            }],
        };

        let tei = document_element(&document);
        let text = tei.child("text").unwrap();
        let preface = text.child("front").and_then(|f| f.child("div")).unwrap();
        assert_eq!(preface.attr("type"), Some("preface"));
        assert_eq!(preface.child("docDate").and_then(|d| d.attr("when")), Some("1925-01-01"));

        let u = &text.child("body").and_then(|b| b.child("div")).unwrap().children[0];
        assert_eq!(u.attr("who"), Some("Erik Ek"));
        assert_eq!(u.children[0].text.as_deref(), Some("Herr talman!"));
    }

    #[test]
    fn test_instances_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.jsonl");
        let index = InstanceIndex::new(vec![
            MatchInstance::new("p", "abc", "Herr EK:", Some("Erik Ek".to_string()))
                .with_location(1, 0),
            MatchInstance::new("p", "abc", "TALMANNEN:", None),
        ]);

        write_instances(&path, &index).unwrap();
        let reloaded = read_instances(&path).unwrap();

        assert_eq!(reloaded, index);
    }
}

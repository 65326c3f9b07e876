use std::path::PathBuf;

use parlaseg::io::{read_instances, read_patterns, read_roster, write_instances};
use parlaseg::{assemble_documents, detect_documents, load_documents, BatchConfig};

const PROTOCOL_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<protocol>
  <contentBlock>
    <textBlock>— 12 —</textBlock>
  </contentBlock>
  <contentBlock>
    <textBlock>Förhandlingar vid plenum.</textBlock>
    <textBlock>Herr EK yttrade:</textBlock>
    <textBlock>Herr talman! Jag yrkar bifall till utskottets förslag.</textBlock>
  </contentBlock>
  <contentBlock>
    <textBlock>Vidare anförde han att frågan är angelägen.</textBlock>
  </contentBlock>
  <contentBlock>
    <textBlock>Fru ANDERSSON yttrade:</textBlock>
    <textBlock>Jag instämmer och yrkar avslag på motionen.</textBlock>
  </contentBlock>
</protocol>
"#;

const PATTERNS: &str = r#"{"pattern": "(Herr|Fru) [A-ZÅÄÖ]+ yttrade:"}
"#;

const ROSTER: &str = r#"{"name": "Anna Andersson"}
{"name": null}
{"name": "Erik Ek"}
"#;

fn write_fixtures(dir: &std::path::Path) -> (PathBuf, PathBuf, PathBuf) {
    let docs = dir.join("protocols");
    std::fs::create_dir(&docs).unwrap();
    std::fs::write(docs.join("prot_1925_ak_12.xml"), PROTOCOL_XML).unwrap();
    std::fs::write(
        docs.join("prot_1926_fk_3.txt"),
        "12\n\nHerr EK yttrade:\nJag yrkar bifall till förslaget i dess helhet.\n",
    )
    .unwrap();

    let patterns = dir.join("patterns.jsonl");
    std::fs::write(&patterns, PATTERNS).unwrap();
    let roster = dir.join("roster.jsonl");
    std::fs::write(&roster, ROSTER).unwrap();

    (docs, patterns, roster)
}

#[test]
fn test_full_pipeline_through_persisted_instances() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, patterns_path, roster_path) = write_fixtures(dir.path());

    let patterns = read_patterns(&patterns_path).unwrap();
    let roster = read_roster(&roster_path).unwrap();
    let paths = parlaseg::io::collect_document_paths(&[docs]).unwrap();
    let (documents, skipped) = load_documents(&paths, false).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(documents.len(), 2);

    let config = BatchConfig::default();
    let batch = detect_documents(&documents, &patterns, Some(&roster), &config).unwrap();
    assert_eq!(batch.index.len(), 3);
    assert_eq!(batch.reports[0].noise_blocks, 1);

    let instances_path = dir.path().join("instances.jsonl");
    write_instances(&instances_path, &batch.index).unwrap();
    let index = read_instances(&instances_path).unwrap();
    assert_eq!(index, batch.index);

    let corpus = assemble_documents(&documents, &index, &config).unwrap();
    let xml = corpus.xml;

    assert_eq!(corpus.documents, 2);
    assert_eq!(xml.matches("<TEI>").count(), 2);
    assert!(xml.contains("<title>Protokoll 1925 ak 12</title>"));
    assert!(xml.contains("<docDate when=\"1926-01-01\">1926-01-01</docDate>"));
    assert!(xml.contains("<edition>0.1.0</edition>"));

    // text before the first attribution stays in the leading UNK turn
    assert!(xml.contains("<u who=\"UNK\">"));
    assert!(xml.contains("<seg>Förhandlingar vid plenum.</seg>"));

    // Erik Ek's turn spans two content blocks
    assert!(xml.contains("<u who=\"Erik Ek\">"));
    assert!(xml.contains("<seg>Vidare anförde han att frågan är angelägen.</seg>"));
    assert!(xml.contains("<u who=\"Anna Andersson\">"));
    assert!(!xml.contains("<extent"));
}

#[test]
fn test_pipeline_without_roster_labels_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let (docs, patterns_path, _) = write_fixtures(dir.path());

    let patterns = read_patterns(&patterns_path).unwrap();
    let paths = parlaseg::io::collect_document_paths(&[docs]).unwrap();
    let (documents, _) = load_documents(&paths, false).unwrap();

    let config = BatchConfig::default();
    let batch = detect_documents(&documents, &patterns, None, &config).unwrap();
    let corpus = assemble_documents(&documents, &batch.index, &config).unwrap();

    assert!(batch.index.rows().iter().all(|r| r.speaker.is_none()));
    assert!(!corpus.xml.contains("Erik Ek"));
    assert!(corpus.xml.contains("<u who=\"UNK\">"));
}

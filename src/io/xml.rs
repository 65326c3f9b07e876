use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// A minimal owned XML element tree used for TEI output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All text of this element and its descendants, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Text content with whitespace runs collapsed and the ends stripped
    pub fn normalized_text(&self) -> String {
        self.text_content()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self.children.iter().any(XmlElement::has_content)
    }

    /// Remove every descendant whose normalized text content is empty.
    ///
    /// Attributes do not count as content. An element with any non-empty
    /// descendant text is never removed, so the order of removal does not
    /// matter. Returns the number of elements removed (subtrees count once).
    pub fn prune_empty(&mut self) -> usize {
        let before = self.children.len();
        self.children.retain(XmlElement::has_content);
        let mut removed = before - self.children.len();

        for child in &mut self.children {
            removed += child.prune_empty();
        }
        removed
    }

    /// Number of elements in this subtree, including self
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(XmlElement::element_count).sum::<usize>()
    }

    /// Serialize with an XML declaration and two-space indentation
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .context("Failed to write XML declaration")?;
        self.write_to(&mut writer)?;

        let mut xml =
            String::from_utf8(writer.into_inner()).context("Serialized XML is not UTF-8")?;
        xml.push('\n');
        Ok(xml)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        XmlElement::new("body").with_child(
            XmlElement::new("div")
                .with_child(XmlElement::new("u").with_attr("who", "UNK"))
                .with_child(
                    XmlElement::new("u")
                        .with_attr("who", "Erik Ek")
                        .with_child(XmlElement::new("seg").with_text("Herr talman!"))
                        .with_child(XmlElement::new("seg").with_text("  \n ")),
                ),
        )
    }

    #[test]
    fn test_prune_removes_empty_elements() {
        let mut tree = sample();
        let removed = tree.prune_empty();

        assert_eq!(removed, 2);
        let div = tree.child("div").unwrap();
        assert_eq!(div.children.len(), 1);
        assert_eq!(div.children[0].attr("who"), Some("Erik Ek"));
        assert_eq!(div.children[0].children.len(), 1);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut tree = sample();
        tree.prune_empty();
        let once = tree.clone();

        assert_eq!(tree.prune_empty(), 0);
        assert_eq!(tree, once);
    }

    #[test]
    fn test_normalized_text() {
        let element = XmlElement::new("p")
            .with_text("  Herr\n talman")
            .with_child(XmlElement::new("seg").with_text(" ! "));
        assert_eq!(element.normalized_text(), "Herr talman !");
    }

    #[test]
    fn test_serialize_escapes_and_indents() {
        let element = XmlElement::new("u")
            .with_attr("who", "A & B")
            .with_child(XmlElement::new("seg").with_text("1 < 2"))
            .with_child(XmlElement::new("extent"));
        let xml = element.to_xml_string().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<u who=\"A &amp; B\">"));
        assert!(xml.contains("  <seg>1 &lt; 2</seg>"));
        assert!(xml.contains("  <extent/>"));
        assert!(xml.trim_end().ends_with("</u>"));
    }
}

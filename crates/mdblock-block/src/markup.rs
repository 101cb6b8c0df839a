//! Structured markup nodes.
//!
//! A block is stored in course markup as a single element: its attributes
//! hold the scalar fields and its text body holds the Markdown. Whitespace in
//! the body is significant, so the reader never trims text.

use log::debug;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use mdblock_core::{Error, Result};

/// One parsed element: tag, attributes in document order, and text body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkupNode {
    /// Element name.
    pub tag: String,
    /// Attribute name/value pairs, entity-unescaped.
    pub attributes: Vec<(String, String)>,
    /// Text before the first child element, if any.
    pub text: Option<String>,
}

impl MarkupNode {
    /// Create an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute append.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style text body.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parse the first element of an XML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] if the document is malformed or has no
    /// element.
    ///
    /// # Example
    ///
    /// ```
    /// use mdblock_block::MarkupNode;
    ///
    /// let node = MarkupNode::parse(r#"<markdown filename="a.md">  text</markdown>"#).unwrap();
    /// assert_eq!(node.tag, "markdown");
    /// assert_eq!(node.attribute("filename"), Some("a.md"));
    /// assert_eq!(node.text.as_deref(), Some("  text"));
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut node = loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => break Self::from_start(&start)?,
                Ok(Event::Empty(start)) => return Self::from_start(&start),
                Ok(Event::Eof) => return Err(Error::markup("document has no element")),
                Ok(Event::Text(text)) if !is_whitespace(&text) => {
                    return Err(Error::markup("text outside of the root element"));
                }
                Ok(_) => {}
                Err(e) => return Err(markup_error(&reader, e)),
            }
        };

        let mut body = String::new();
        loop {
            match reader.read_event() {
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::markup(format!("invalid text: {e}")))?;
                    body.push_str(&text);
                }
                Ok(Event::CData(cdata)) => {
                    body.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
                Ok(Event::Start(_) | Event::Empty(_) | Event::End(_)) => break,
                Ok(Event::Eof) => return Err(Error::markup("unexpected end of document")),
                Ok(_) => {}
                Err(e) => return Err(markup_error(&reader, e)),
            }
        }

        if !body.is_empty() {
            node.text = Some(normalize_line_endings(body));
        }
        debug!(
            "Parsed <{}> with {} attribute(s) and {} byte(s) of text",
            node.tag,
            node.attributes.len(),
            node.text.as_ref().map_or(0, String::len)
        );
        Ok(node)
    }

    /// Serialize back to an XML element.
    pub fn to_xml(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape(value.as_str())));
        }
        match &self.text {
            Some(text) => {
                out.push('>');
                out.push_str(&escape(text.as_str()));
                out.push_str(&format!("</{}>", self.tag));
            }
            None => out.push_str("/>"),
        }
        out
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut node = Self::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::markup(format!("invalid attribute: {e}")))?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::markup(format!("invalid value for '{name}': {e}")))?
                .into_owned();
            node.attributes.push((name, value));
        }
        Ok(node)
    }
}

fn normalize_line_endings(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

fn is_whitespace(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn markup_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> Error {
    Error::markup(format!(
        "malformed markup at byte {}: {e}",
        reader.error_position()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes_in_order() {
        let node = MarkupNode::parse(r#"<markdown b="2" a="1"/>"#).unwrap();
        assert_eq!(node.tag, "markdown");
        assert_eq!(
            node.attributes,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string())
            ]
        );
        assert_eq!(node.text, None);
    }

    #[test]
    fn test_parse_unescapes_attributes_and_text() {
        let node = MarkupNode::parse(
            r#"<markdown display_name="Q &amp; A">a &lt; b &amp;&amp; c</markdown>"#,
        )
        .unwrap();
        assert_eq!(node.attribute("display_name"), Some("Q & A"));
        assert_eq!(node.text.as_deref(), Some("a < b && c"));
    }

    #[test]
    fn test_parse_preserves_whitespace() {
        let xml = "<markdown>\n    # Title\n\n        code\n</markdown>";
        let node = MarkupNode::parse(xml).unwrap();
        assert_eq!(node.text.as_deref(), Some("\n    # Title\n\n        code\n"));
    }

    #[test]
    fn test_parse_normalizes_line_endings() {
        let xml = "<markdown>\r\n  # T\r\n      code\r\n\rend</markdown>";
        let node = MarkupNode::parse(xml).unwrap();
        assert_eq!(node.text.as_deref(), Some("\n  # T\n      code\n\nend"));
    }

    #[test]
    fn test_parse_includes_cdata() {
        let xml = "<markdown>intro <![CDATA[<b>raw</b>]]> end</markdown>";
        let node = MarkupNode::parse(xml).unwrap();
        assert_eq!(node.text.as_deref(), Some("intro <b>raw</b> end"));
    }

    #[test]
    fn test_parse_text_stops_at_first_child() {
        let xml = "<markdown>before<child>inner</child>after</markdown>";
        let node = MarkupNode::parse(xml).unwrap();
        assert_eq!(node.text.as_deref(), Some("before"));
    }

    #[test]
    fn test_parse_skips_prolog_and_comments() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- block -->\n<markdown>x</markdown>";
        let node = MarkupNode::parse(xml).unwrap();
        assert_eq!(node.text.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_empty_element_has_no_text() {
        let node = MarkupNode::parse("<markdown></markdown>").unwrap();
        assert_eq!(node.text, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(MarkupNode::parse("").is_err());
        assert!(MarkupNode::parse("just text").is_err());
        assert!(MarkupNode::parse("<markdown>unterminated").is_err());
        assert!(MarkupNode::parse(r#"<markdown a="1" a="2"/>"#).is_err());
    }

    #[test]
    fn test_to_xml_escapes() {
        let node = MarkupNode::new("markdown")
            .with_attribute("display_name", "\"Q\" & A")
            .with_text("a < b");
        let xml = node.to_xml();
        assert_eq!(
            xml,
            "<markdown display_name=\"&quot;Q&quot; &amp; A\">a &lt; b</markdown>"
        );
        assert_eq!(MarkupNode::parse(&xml).unwrap(), node);
    }

    #[test]
    fn test_to_xml_self_closing() {
        let node = MarkupNode::new("markdown").with_attribute("filename", "a.md");
        assert_eq!(node.to_xml(), "<markdown filename=\"a.md\"/>");
    }
}

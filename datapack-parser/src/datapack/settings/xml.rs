//! Generic XML element tree
//!
//! The settings document is read into plain elements first and only then
//! interpreted. Everything the typed layer does not understand stays in this
//! form and is written back as it was read, so the only differences after a
//! round trip are indentation, attribute quoting and dropped comments.

use super::error::SettingsError;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Character data directly inside the element, trimmed
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
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

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes except `name`, in document order.
    pub fn attributes_except(&self, name: &str) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .filter(|(key, _)| key != name)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub declaration: Option<XmlDeclaration>,
    pub root: XmlElement,
}

fn xml_error(reader: &Reader<&[u8]>, message: impl std::fmt::Display) -> SettingsError {
    SettingsError::Xml {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}

fn start_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlElement, SettingsError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| xml_error(reader, e))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| xml_error(reader, e))?
            .into_owned();
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append_text(element: &mut XmlElement, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match &mut element.text {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
}

/// Parse a whole document. Comments, processing instructions and the doctype are dropped.
pub fn parse_xml(text: &str) -> Result<XmlDocument, SettingsError> {
    let mut reader = Reader::from_str(text);
    let mut declaration = None;
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Decl(decl) => {
                let version = decl
                    .version()
                    .map(|v| String::from_utf8_lossy(&v).into_owned())
                    .unwrap_or_else(|_| "1.0".to_string());
                let encoding = decl
                    .encoding()
                    .and_then(Result::ok)
                    .map(|e| String::from_utf8_lossy(&e).into_owned());
                declaration = Some(XmlDeclaration { version, encoding });
            }
            Event::Start(start) => stack.push(start_element(&reader, &start)?),
            Event::Empty(start) => {
                let element = start_element(&reader, &start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(xml_error(&reader, "more than one root element")),
                }
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(xml_error(&reader, "unexpected closing tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(xml_error(&reader, "more than one root element")),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| xml_error(&reader, e))?;
                    append_text(current, &text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    append_text(current, &String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(&reader, format!("unclosed element <{}>", open.name)));
    }
    let root = root.ok_or_else(|| SettingsError::MissingRoot(String::new()))?;
    Ok(XmlDocument { declaration, root })
}

/// Serialize with two-space indentation and a trailing newline.
pub fn write_xml(document: &XmlDocument) -> String {
    let mut out = String::new();
    if let Some(declaration) = &document.declaration {
        let _ = write!(out, "<?xml version=\"{}\"", escape(declaration.version.as_str()));
        if let Some(encoding) = &declaration.encoding {
            let _ = write!(out, " encoding=\"{}\"", escape(encoding.as_str()));
        }
        out.push_str("?>\n");
    }
    write_element(&mut out, &document.root, 0);
    out
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{}<{}", indent, element.name);
    for (key, value) in &element.attributes {
        let _ = write!(out, " {}=\"{}\"", key, escape(value.as_str()));
    }

    match (&element.text, element.children.is_empty()) {
        (None, true) => out.push_str("/>\n"),
        (Some(text), true) => {
            let _ = writeln!(out, ">{}</{}>", escape(text.as_str()), element.name);
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                let _ = writeln!(out, "{}  {}", indent, escape(text.as_str()));
            }
            for child in &element.children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{}</{}>", indent, element.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TSCreator version="1.3">
  <!-- written by hand -->
  <settings>
    <setting name="topAge" source="text" unit="Ma">
      <setting name="text">0.0</setting>
    </setting>
  </settings>
  <column id="class datastore.RootColumn:Chart Root">
    <setting name="title">Rock &amp; Roll</setting>
    <setting name="backgroundColor"/>
  </column>
</TSCreator>
"#;

    #[test]
    fn test_parse_structure() {
        let document = parse_xml(SAMPLE).unwrap();
        assert_eq!(document.declaration, Some(XmlDeclaration::default()));
        assert_eq!(document.root.name, "TSCreator");
        assert_eq!(document.root.attribute("version"), Some("1.3"));
        assert_eq!(document.root.children.len(), 2);

        let column = &document.root.children[1];
        assert_eq!(column.children[0].text.as_deref(), Some("Rock & Roll"));
        assert_eq!(column.children[1].text, None);
    }

    #[test]
    fn test_write_then_parse_is_stable() {
        let document = parse_xml(SAMPLE).unwrap();
        let written = write_xml(&document);
        assert!(written.contains("<setting name=\"title\">Rock &amp; Roll</setting>"));
        assert!(written.contains("<setting name=\"backgroundColor\"/>"));
        assert_eq!(parse_xml(&written).unwrap(), document);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            parse_xml("<TSCreator><column></TSCreator>"),
            Err(SettingsError::Xml { .. })
        ));
        assert!(matches!(parse_xml("<a></a><b/>"), Err(SettingsError::Xml { .. })));
        assert_eq!(parse_xml("   "), Err(SettingsError::MissingRoot(String::new())));
    }
}

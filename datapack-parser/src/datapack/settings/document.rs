//! Loosely typed settings document
//!
//!     The document mirrors the XML closely. Only the elements the compiler reads
//!     or writes get their own types:
//!
//!         <TSCreator version="1.3">          SettingsDocument
//!           <settings>                       SettingsBlock
//!             <setting name="…">…</setting>  SettingEntry
//!           </settings>
//!           <column id="…">                  ColumnEntry
//!             <setting name="…">…</setting>
//!             <fonts>                        FontBlock
//!               <font function="…">…</font>  FontEntry
//!             </fonts>
//!             <column id="…">…</column>
//!           </column>
//!         </TSCreator>
//!
//!     Every list keeps an `Other` arm holding the raw element, so anything not
//!     listed above (including a `<column>` whose id cannot be parsed) survives
//!     a read-modify-write cycle in its original position.

use super::error::SettingsError;
use super::id::ColumnId;
use super::xml::{parse_xml, write_xml, XmlDeclaration, XmlDocument, XmlElement};
use std::fmt;

pub const ROOT_ELEMENT: &str = "TSCreator";

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Empty,
    Text(String),
    Nested(Vec<SettingItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingEntry {
    pub name: String,
    /// Attributes other than `name`
    pub attributes: Vec<(String, String)>,
    pub value: SettingValue,
}

impl SettingEntry {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            value: SettingValue::Text(value.into()),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            value: SettingValue::Empty,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// The text value, if the setting holds text.
    pub fn value_text(&self) -> Option<&str> {
        match &self.value {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Nested settings, if the setting holds any.
    pub fn nested(&self) -> Option<&Vec<SettingItem>> {
        match &self.value {
            SettingValue::Nested(items) => Some(items),
            _ => None,
        }
    }

    pub fn nested_mut(&mut self) -> &mut Vec<SettingItem> {
        if !matches!(self.value, SettingValue::Nested(_)) {
            self.value = SettingValue::Nested(Vec::new());
        }
        match &mut self.value {
            SettingValue::Nested(items) => items,
            _ => unreachable!("value was just made nested"),
        }
    }

    fn from_element(element: XmlElement) -> Result<SettingEntry, XmlElement> {
        let Some(name) = element.attribute("name").map(str::to_string) else {
            return Err(element);
        };
        let attributes = element.attributes_except("name");
        let value = if !element.children.is_empty() {
            SettingValue::Nested(element.children.into_iter().map(SettingItem::from_element).collect())
        } else {
            match element.text {
                Some(text) => SettingValue::Text(text),
                None => SettingValue::Empty,
            }
        };
        Ok(SettingEntry {
            name,
            attributes,
            value,
        })
    }

    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("setting").with_attribute("name", &self.name);
        element.attributes.extend(self.attributes.iter().cloned());
        match &self.value {
            SettingValue::Empty => {}
            SettingValue::Text(text) => element.text = Some(text.clone()),
            SettingValue::Nested(items) => {
                element.children = items.iter().map(SettingItem::to_element).collect()
            }
        }
        element
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingItem {
    Setting(SettingEntry),
    Other(XmlElement),
}

impl SettingItem {
    fn from_element(element: XmlElement) -> SettingItem {
        if element.name != "setting" {
            return SettingItem::Other(element);
        }
        match SettingEntry::from_element(element) {
            Ok(entry) => SettingItem::Setting(entry),
            Err(element) => SettingItem::Other(element),
        }
    }

    fn to_element(&self) -> XmlElement {
        match self {
            SettingItem::Setting(entry) => entry.to_element(),
            SettingItem::Other(element) => element.clone(),
        }
    }
}

/// Lookup and upsert over a list of settings.
pub trait SettingList {
    fn settings(&self) -> Box<dyn Iterator<Item = &SettingEntry> + '_>;
    fn settings_mut(&mut self) -> Box<dyn Iterator<Item = &mut SettingEntry> + '_>;
    /// Add a setting that does not exist yet.
    fn push_setting(&mut self, entry: SettingEntry);

    fn setting(&self, name: &str) -> Option<&SettingEntry> {
        self.settings().find(|entry| entry.name == name)
    }

    fn setting_mut(&mut self, name: &str) -> Option<&mut SettingEntry> {
        self.settings_mut().find(|entry| entry.name == name)
    }

    fn setting_text(&self, name: &str) -> Option<&str> {
        self.setting(name)?.value_text()
    }

    /// Replace a setting's value with text, keeping its attributes, or add it.
    fn set_setting(&mut self, name: &str, value: impl Into<String>) {
        let value = SettingValue::Text(value.into());
        match self.setting_mut(name) {
            Some(entry) => entry.value = value,
            None => self.push_setting(SettingEntry {
                name: name.to_string(),
                attributes: Vec::new(),
                value,
            }),
        }
    }
}

impl SettingList for Vec<SettingItem> {
    fn settings(&self) -> Box<dyn Iterator<Item = &SettingEntry> + '_> {
        Box::new(self.iter().filter_map(|item| match item {
            SettingItem::Setting(entry) => Some(entry),
            SettingItem::Other(_) => None,
        }))
    }

    fn settings_mut(&mut self) -> Box<dyn Iterator<Item = &mut SettingEntry> + '_> {
        Box::new(self.iter_mut().filter_map(|item| match item {
            SettingItem::Setting(entry) => Some(entry),
            SettingItem::Other(_) => None,
        }))
    }

    fn push_setting(&mut self, entry: SettingEntry) {
        self.push(SettingItem::Setting(entry));
    }
}

/// The chart-wide `<settings>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsBlock {
    pub attributes: Vec<(String, String)>,
    pub items: Vec<SettingItem>,
}

impl SettingList for SettingsBlock {
    fn settings(&self) -> Box<dyn Iterator<Item = &SettingEntry> + '_> {
        self.items.settings()
    }

    fn settings_mut(&mut self) -> Box<dyn Iterator<Item = &mut SettingEntry> + '_> {
        self.items.settings_mut()
    }

    fn push_setting(&mut self, entry: SettingEntry) {
        self.items.push_setting(entry);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontEntry {
    pub function: String,
    pub inheritable: bool,
    /// Attributes other than `function` and `inheritable`
    pub attributes: Vec<(String, String)>,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FontItem {
    Font(FontEntry),
    Other(XmlElement),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontBlock {
    pub attributes: Vec<(String, String)>,
    pub items: Vec<FontItem>,
}

impl FontBlock {
    pub fn fonts(&self) -> impl Iterator<Item = &FontEntry> {
        self.items.iter().filter_map(|item| match item {
            FontItem::Font(font) => Some(font),
            FontItem::Other(_) => None,
        })
    }

    pub fn font_mut(&mut self, function: &str) -> Option<&mut FontEntry> {
        self.items.iter_mut().find_map(|item| match item {
            FontItem::Font(font) if font.function.eq_ignore_ascii_case(function) => Some(font),
            _ => None,
        })
    }

    fn from_element(element: XmlElement) -> FontBlock {
        let items = element
            .children
            .into_iter()
            .map(|child| match child.attribute("function") {
                Some(function) if child.name == "font" => FontItem::Font(FontEntry {
                    function: function.to_string(),
                    inheritable: child
                        .attribute("inheritable")
                        .is_some_and(|v| v.eq_ignore_ascii_case("true")),
                    attributes: child
                        .attributes
                        .iter()
                        .filter(|(key, _)| key != "function" && key != "inheritable")
                        .cloned()
                        .collect(),
                    style: child.text.clone().unwrap_or_default(),
                }),
                _ => FontItem::Other(child),
            })
            .collect();
        FontBlock {
            attributes: element.attributes,
            items,
        }
    }

    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("fonts");
        element.attributes = self.attributes.clone();
        element.children = self
            .items
            .iter()
            .map(|item| match item {
                FontItem::Font(font) => {
                    let mut child = XmlElement::new("font")
                        .with_attribute("function", &font.function)
                        .with_attribute("inheritable", font.inheritable.to_string());
                    child.attributes.extend(font.attributes.iter().cloned());
                    if !font.style.is_empty() {
                        child.text = Some(font.style.clone());
                    }
                    child
                }
                FontItem::Other(other) => other.clone(),
            })
            .collect();
        element
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnItem {
    Setting(SettingEntry),
    Fonts(FontBlock),
    Column(ColumnEntry),
    Other(XmlElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEntry {
    pub id: ColumnId,
    /// Attributes other than `id`
    pub attributes: Vec<(String, String)>,
    pub items: Vec<ColumnItem>,
}

impl ColumnEntry {
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            attributes: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &ColumnEntry> {
        self.items.iter().filter_map(|item| match item {
            ColumnItem::Column(column) => Some(column),
            _ => None,
        })
    }

    /// Raw `<column>` elements whose id could not be parsed.
    pub fn unreadable_children(&self) -> impl Iterator<Item = &XmlElement> {
        self.items.iter().filter_map(|item| match item {
            ColumnItem::Other(element) if element.name == "column" => Some(element),
            _ => None,
        })
    }

    pub fn fonts(&self) -> Option<&FontBlock> {
        self.items.iter().find_map(|item| match item {
            ColumnItem::Fonts(fonts) => Some(fonts),
            _ => None,
        })
    }

    pub fn fonts_mut(&mut self) -> Option<&mut FontBlock> {
        self.items.iter_mut().find_map(|item| match item {
            ColumnItem::Fonts(fonts) => Some(fonts),
            _ => None,
        })
    }

    /// Every descendant entry, depth first, including this one.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &ColumnEntry> + '_> {
        Box::new(std::iter::once(self).chain(self.children().flat_map(ColumnEntry::iter)))
    }

    fn from_element(element: XmlElement) -> Result<ColumnEntry, XmlElement> {
        let id = match element.attribute("id").map(str::parse::<ColumnId>) {
            Some(Ok(id)) => id,
            Some(Err(err)) => {
                tracing::warn!(%err, "keeping column with unreadable id as raw XML");
                return Err(element);
            }
            None => return Err(element),
        };
        let attributes = element.attributes_except("id");
        let items = element
            .children
            .into_iter()
            .map(|child| match child.name.as_str() {
                "setting" => match SettingEntry::from_element(child) {
                    Ok(entry) => ColumnItem::Setting(entry),
                    Err(child) => ColumnItem::Other(child),
                },
                "fonts" => ColumnItem::Fonts(FontBlock::from_element(child)),
                "column" => match ColumnEntry::from_element(child) {
                    Ok(column) => ColumnItem::Column(column),
                    Err(child) => ColumnItem::Other(child),
                },
                _ => ColumnItem::Other(child),
            })
            .collect();
        Ok(ColumnEntry {
            id,
            attributes,
            items,
        })
    }

    fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("column").with_attribute("id", self.id.to_string());
        element.attributes.extend(self.attributes.iter().cloned());
        element.children = self
            .items
            .iter()
            .map(|item| match item {
                ColumnItem::Setting(entry) => entry.to_element(),
                ColumnItem::Fonts(fonts) => fonts.to_element(),
                ColumnItem::Column(column) => column.to_element(),
                ColumnItem::Other(other) => other.clone(),
            })
            .collect();
        element
    }
}

impl SettingList for ColumnEntry {
    fn settings(&self) -> Box<dyn Iterator<Item = &SettingEntry> + '_> {
        Box::new(self.items.iter().filter_map(|item| match item {
            ColumnItem::Setting(entry) => Some(entry),
            _ => None,
        }))
    }

    fn settings_mut(&mut self) -> Box<dyn Iterator<Item = &mut SettingEntry> + '_> {
        Box::new(self.items.iter_mut().filter_map(|item| match item {
            ColumnItem::Setting(entry) => Some(entry),
            _ => None,
        }))
    }

    /// New settings go after the existing ones, ahead of fonts and child columns.
    fn push_setting(&mut self, entry: SettingEntry) {
        let position = self
            .items
            .iter()
            .position(|item| matches!(item, ColumnItem::Fonts(_) | ColumnItem::Column(_)))
            .unwrap_or(self.items.len());
        self.items.insert(position, ColumnItem::Setting(entry));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentItem {
    Settings(SettingsBlock),
    Column(ColumnEntry),
    Other(XmlElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDocument {
    pub declaration: Option<XmlDeclaration>,
    pub root_name: String,
    pub root_attributes: Vec<(String, String)>,
    pub items: Vec<DocumentItem>,
}

impl SettingsDocument {
    /// An empty document with the given format version.
    pub fn new(version: &str) -> Self {
        Self {
            declaration: Some(XmlDeclaration::default()),
            root_name: ROOT_ELEMENT.to_string(),
            root_attributes: vec![("version".to_string(), version.to_string())],
            items: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        Self::from_xml(parse_xml(text)?)
    }

    pub fn from_xml(document: XmlDocument) -> Result<Self, SettingsError> {
        let XmlDocument { declaration, root } = document;
        if root.name != ROOT_ELEMENT {
            return Err(SettingsError::MissingRoot(root.name));
        }
        let items = root
            .children
            .into_iter()
            .map(|child| match child.name.as_str() {
                "settings" => DocumentItem::Settings(SettingsBlock {
                    attributes: child.attributes,
                    items: child
                        .children
                        .into_iter()
                        .map(SettingItem::from_element)
                        .collect(),
                }),
                "column" => match ColumnEntry::from_element(child) {
                    Ok(column) => DocumentItem::Column(column),
                    Err(child) => DocumentItem::Other(child),
                },
                _ => DocumentItem::Other(child),
            })
            .collect();
        Ok(SettingsDocument {
            declaration,
            root_name: root.name,
            root_attributes: root.attributes,
            items,
        })
    }

    pub fn to_xml(&self) -> XmlDocument {
        let mut root = XmlElement::new(&self.root_name);
        root.attributes = self.root_attributes.clone();
        root.children = self
            .items
            .iter()
            .map(|item| match item {
                DocumentItem::Settings(block) => {
                    let mut element = XmlElement::new("settings");
                    element.attributes = block.attributes.clone();
                    element.children = block.items.iter().map(SettingItem::to_element).collect();
                    element
                }
                DocumentItem::Column(column) => column.to_element(),
                DocumentItem::Other(other) => other.clone(),
            })
            .collect();
        XmlDocument {
            declaration: self.declaration.clone(),
            root,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.root_attributes
            .iter()
            .find(|(key, _)| key == "version")
            .map(|(_, value)| value.as_str())
    }

    pub fn settings_block(&self) -> Option<&SettingsBlock> {
        self.items.iter().find_map(|item| match item {
            DocumentItem::Settings(block) => Some(block),
            _ => None,
        })
    }

    /// The `<settings>` block, inserted first when the document has none.
    pub fn settings_block_mut(&mut self) -> &mut SettingsBlock {
        let position = match self
            .items
            .iter()
            .position(|item| matches!(item, DocumentItem::Settings(_)))
        {
            Some(position) => position,
            None => {
                self.items.insert(0, DocumentItem::Settings(SettingsBlock::default()));
                0
            }
        };
        match &mut self.items[position] {
            DocumentItem::Settings(block) => block,
            _ => unreachable!("position points at the settings block"),
        }
    }

    /// Top-level column entries.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnEntry> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Column(column) => Some(column),
            _ => None,
        })
    }

    /// Every column entry in the document, depth first.
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnEntry> {
        self.columns().flat_map(ColumnEntry::iter)
    }

    /// Top-level raw `<column>` elements whose id could not be parsed.
    pub fn unreadable_columns(&self) -> impl Iterator<Item = &XmlElement> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Other(element) if element.name == "column" => Some(element),
            _ => None,
        })
    }
}

impl fmt::Display for SettingsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_xml(&self.to_xml()))
    }
}

impl std::str::FromStr for SettingsDocument {
    type Err = SettingsError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        SettingsDocument::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::settings::id::ColumnType;

    const SAMPLE: &str = r#"<TSCreator version="1.3">
  <settings>
    <setting name="unitsPerMY" unit="Ma">2.0</setting>
    <mystery flag="yes"/>
  </settings>
  <column id="class datastore.RootColumn:Chart Root" legacy="1">
    <setting name="title">Chart Root</setting>
    <setting name="customColor"/>
    <fonts>
      <font function="Column Header" inheritable="true">font-size: 14;</font>
      <font>stray</font>
    </fonts>
    <column id="class datastore.MetaColumn:Europe"/>
    <column id="broken"/>
    <annotation>keep me</annotation>
  </column>
</TSCreator>
"#;

    #[test]
    fn test_typed_view() {
        let document = SettingsDocument::parse(SAMPLE).unwrap();
        assert_eq!(document.version(), Some("1.3"));

        let block = document.settings_block().unwrap();
        assert_eq!(block.setting_text("unitsPerMY"), Some("2.0"));
        assert_eq!(block.setting("unitsPerMY").unwrap().attributes, vec![("unit".into(), "Ma".into())]);
        assert!(matches!(block.items[1], SettingItem::Other(_)));

        let root = document.columns().next().unwrap();
        assert_eq!(root.id.column_type, ColumnType::RootColumn);
        assert_eq!(root.setting_text("title"), Some("Chart Root"));
        assert_eq!(root.setting("customColor").unwrap().value, SettingValue::Empty);

        let fonts = root.fonts().unwrap();
        let font = fonts.fonts().next().unwrap();
        assert_eq!(font.function, "Column Header");
        assert!(font.inheritable);
        assert_eq!(fonts.items.len(), 2);

        assert_eq!(root.children().count(), 1);
        assert_eq!(root.unreadable_children().count(), 1);
        assert_eq!(document.all_columns().count(), 2);
    }

    #[test]
    fn test_untouched_round_trip() {
        let document = SettingsDocument::parse(SAMPLE).unwrap();
        let written = document.to_string();
        assert!(written.contains("<annotation>keep me</annotation>"));
        assert!(written.contains("<column id=\"broken\"/>"));
        assert!(written.contains("legacy=\"1\""));
        assert_eq!(SettingsDocument::parse(&written).unwrap(), document);
    }

    #[test]
    fn test_set_setting_keeps_attributes_and_order() {
        let mut document = SettingsDocument::parse(SAMPLE).unwrap();
        let block = document.settings_block_mut();
        block.set_setting("unitsPerMY", "5.0");
        block.set_setting("doPopups", "true");
        assert_eq!(block.setting("unitsPerMY").unwrap().attributes.len(), 1);
        assert_eq!(block.setting_text("doPopups"), Some("true"));

        let DocumentItem::Column(root) = &mut document.items[1] else {
            panic!("expected the root column");
        };
        root.set_setting("width", "120.0");
        assert!(matches!(&root.items[2], ColumnItem::Setting(s) if s.name == "width"));
    }

    #[test]
    fn test_wrong_root() {
        assert_eq!(
            SettingsDocument::parse("<Other/>"),
            Err(SettingsError::MissingRoot("Other".into()))
        );
    }
}

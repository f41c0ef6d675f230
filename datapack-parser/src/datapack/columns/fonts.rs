//! Font roles and options
//!
//! Every column can override the font used for a fixed set of label roles. An
//! override is "on" when the column carries it; roles that are off inherit from
//! the parent column in the renderer.
//!
//! The settings document stores an override as CSS-like style text:
//!
//! ```text
//! font-family: Arial;font-style: italic;font-weight: bold;font-size: 14;fill: rgb(0,0,0);
//! ```

use super::node::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontRole {
    ColumnHeader,
    AgeLabel,
    UncertaintyLabel,
    ZoneColumnLabel,
    SequenceColumnLabel,
    EventColumnLabel,
    PopupBody,
    RulerLabel,
    RulerTickMarkLabel,
    PointColumnScaleLabel,
    RangeLabel,
    RangeBoxLabel,
    LegendTitle,
    LegendColumnName,
    LegendColumnSource,
}

impl FontRole {
    pub const ALL: [FontRole; 15] = [
        FontRole::ColumnHeader,
        FontRole::AgeLabel,
        FontRole::UncertaintyLabel,
        FontRole::ZoneColumnLabel,
        FontRole::SequenceColumnLabel,
        FontRole::EventColumnLabel,
        FontRole::PopupBody,
        FontRole::RulerLabel,
        FontRole::RulerTickMarkLabel,
        FontRole::PointColumnScaleLabel,
        FontRole::RangeLabel,
        FontRole::RangeBoxLabel,
        FontRole::LegendTitle,
        FontRole::LegendColumnName,
        FontRole::LegendColumnSource,
    ];

    /// The `function` attribute used in the settings document.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontRole::ColumnHeader => "Column Header",
            FontRole::AgeLabel => "Age Label",
            FontRole::UncertaintyLabel => "Uncertainty Label",
            FontRole::ZoneColumnLabel => "Zone Column Label",
            FontRole::SequenceColumnLabel => "Sequence Column Label",
            FontRole::EventColumnLabel => "Event Column Label",
            FontRole::PopupBody => "Popup Body",
            FontRole::RulerLabel => "Ruler Label",
            FontRole::RulerTickMarkLabel => "Ruler Tick Mark Label",
            FontRole::PointColumnScaleLabel => "Point Column Scale Label",
            FontRole::RangeLabel => "Range Label",
            FontRole::RangeBoxLabel => "Range Box Label",
            FontRole::LegendTitle => "Legend Title",
            FontRole::LegendColumnName => "Legend Column Name",
            FontRole::LegendColumnSource => "Legend Column Source",
        }
    }

    pub fn parse(text: &str) -> Option<FontRole> {
        FontRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFace {
    #[default]
    Arial,
    Courier,
    Verdana,
}

impl FontFace {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFace::Arial => "Arial",
            FontFace::Courier => "Courier",
            FontFace::Verdana => "Verdana",
        }
    }

    pub fn parse(text: &str) -> Option<FontFace> {
        match text.trim().to_ascii_lowercase().as_str() {
            "arial" => Some(FontFace::Arial),
            "courier" => Some(FontFace::Courier),
            "verdana" => Some(FontFace::Verdana),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontOptions {
    pub on: bool,
    pub inheritable: bool,
    pub face: FontFace,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
}

impl FontOptions {
    pub fn default_for(role: FontRole) -> Self {
        let (size, bold) = match role {
            FontRole::ColumnHeader => (14, true),
            FontRole::LegendTitle => (14, true),
            FontRole::PopupBody | FontRole::RulerTickMarkLabel => (10, false),
            _ => (12, false),
        };
        Self {
            on: false,
            inheritable: false,
            face: FontFace::Arial,
            size,
            bold,
            italic: false,
            color: Rgb::BLACK,
        }
    }

    /// The style properties these options describe, in writing order.
    fn declarations(&self) -> [(&'static str, String); 5] {
        [
            ("font-family", self.face.as_str().to_string()),
            ("font-style", if self.italic { "italic" } else { "normal" }.to_string()),
            ("font-weight", if self.bold { "bold" } else { "normal" }.to_string()),
            ("font-size", self.size.to_string()),
            ("fill", self.color.to_string()),
        ]
    }

    pub fn to_style(&self) -> String {
        self.declarations()
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect()
    }

    /// Rewrite existing style text so it describes these options.
    ///
    /// Only declarations whose parsed value differs from these options are
    /// replaced, and missing ones appended. Unknown properties and values this
    /// model cannot represent keep their original text.
    pub fn update_style(&self, role: FontRole, style: &str) -> String {
        let mut documented = FontOptions::default_for(role);
        documented.apply_style(style);
        let before = documented.declarations();
        let changed: Vec<_> = self
            .declarations()
            .into_iter()
            .zip(before)
            .filter(|(ours, theirs)| ours.1 != theirs.1)
            .map(|(ours, _)| ours)
            .collect();

        let mut written = vec![false; changed.len()];
        let mut declarations = Vec::new();
        for declaration in style.split(';').filter(|d| !d.trim().is_empty()) {
            let property = declaration.split_once(':').map(|(p, _)| p.trim());
            match changed.iter().position(|(name, _)| Some(*name) == property) {
                Some(i) => {
                    written[i] = true;
                    declarations.push(format!("{}: {}", changed[i].0, changed[i].1));
                }
                None => declarations.push(declaration.to_string()),
            }
        }
        for (i, (property, value)) in changed.iter().enumerate() {
            if !written[i] {
                declarations.push(format!("{property}: {value}"));
            }
        }
        declarations.iter().map(|d| format!("{d};")).collect()
    }

    /// Update from style text. Unknown properties and unparsable values are ignored.
    pub fn apply_style(&mut self, style: &str) {
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match property.trim() {
                "font-family" => {
                    if let Some(face) = FontFace::parse(value) {
                        self.face = face;
                    }
                }
                "font-style" => self.italic = value.eq_ignore_ascii_case("italic"),
                "font-weight" => self.bold = value.eq_ignore_ascii_case("bold"),
                "font-size" => {
                    if let Ok(size) = value.trim_end_matches("px").parse::<f64>() {
                        self.size = size.round().max(1.0) as u32;
                    }
                }
                "fill" => {
                    if let Some(color) = Rgb::parse_css(value) {
                        self.color = color;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Options for every [FontRole]; all roles are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings(BTreeMap<FontRole, FontOptions>);

impl FontSettings {
    pub fn get(&self, role: FontRole) -> Option<&FontOptions> {
        self.0.get(&role)
    }

    pub fn get_mut(&mut self, role: FontRole) -> &mut FontOptions {
        self.0
            .entry(role)
            .or_insert_with(|| FontOptions::default_for(role))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontRole, &FontOptions)> {
        self.0.iter().map(|(role, options)| (*role, options))
    }

    pub fn enabled(&self) -> impl Iterator<Item = (FontRole, &FontOptions)> {
        self.iter().filter(|(_, options)| options.on)
    }
}

impl Default for FontSettings {
    fn default() -> Self {
        FontSettings(
            FontRole::ALL
                .into_iter()
                .map(|role| (role, FontOptions::default_for(role)))
                .collect(),
        )
    }
}

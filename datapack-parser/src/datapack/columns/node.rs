//! Column node definition

use super::fonts::FontSettings;
use super::sub_entries::SubEntries;
use super::type_settings::TypeSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static SLASHED_RGB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,3})\s*/\s*(\d{1,3})\s*/\s*(\d{1,3})\s*$").unwrap());

static CSS_RGB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)\s*$").unwrap()
});

/// The closed set of column kinds. Determines which [TypeSettings] variant a node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisplayType {
    Block,
    Facies,
    Event,
    Range,
    Chron,
    Freehand,
    Point,
    Sequence,
    Transect,
    Zone,
    Ruler,
    Meta,
    Root,
    Blank,
}

impl DisplayType {
    pub const ALL: [DisplayType; 14] = [
        DisplayType::Block,
        DisplayType::Facies,
        DisplayType::Event,
        DisplayType::Range,
        DisplayType::Chron,
        DisplayType::Freehand,
        DisplayType::Point,
        DisplayType::Sequence,
        DisplayType::Transect,
        DisplayType::Zone,
        DisplayType::Ruler,
        DisplayType::Meta,
        DisplayType::Root,
        DisplayType::Blank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Block => "Block",
            DisplayType::Facies => "Facies",
            DisplayType::Event => "Event",
            DisplayType::Range => "Range",
            DisplayType::Chron => "Chron",
            DisplayType::Freehand => "Freehand",
            DisplayType::Point => "Point",
            DisplayType::Sequence => "Sequence",
            DisplayType::Transect => "Transect",
            DisplayType::Zone => "Zone",
            DisplayType::Ruler => "Ruler",
            DisplayType::Meta => "Meta",
            DisplayType::Root => "Root",
            DisplayType::Blank => "Blank",
        }
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age span of a column in million years.
///
/// [AgeRange::UNBOUNDED] is the "no data" sentinel: its `min` is larger than its
/// `max`, so including any age makes it bounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl AgeRange {
    pub const UNBOUNDED: AgeRange = AgeRange {
        min: f64::MAX,
        max: f64::MIN,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_bounded(&self) -> bool {
        self.min <= self.max
    }

    pub fn include(&mut self, age: f64) {
        self.min = self.min.min(age);
        self.max = self.max.max(age);
    }

    pub fn union(&self, other: &AgeRange) -> AgeRange {
        AgeRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn from_ages<I: IntoIterator<Item = f64>>(ages: I) -> AgeRange {
        let mut range = AgeRange::UNBOUNDED;
        for age in ages {
            range.include(age);
        }
        range
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::UNBOUNDED
    }
}

/// An RGB colour as used by both the datapack (`r/g/b`) and settings (`rgb(r,g,b)`) formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse the datapack notation `255/128/0`.
    pub fn parse_slashed(text: &str) -> Option<Rgb> {
        Self::from_captures(SLASHED_RGB.captures(text)?)
    }

    /// Parse the settings notation `rgb(255,128,0)`.
    pub fn parse_css(text: &str) -> Option<Rgb> {
        Self::from_captures(CSS_RGB.captures(text)?)
    }

    fn from_captures(caps: regex::Captures<'_>) -> Option<Rgb> {
        let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
        Some(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

pub const DEFAULT_WIDTH: f64 = 100.0;

/// A named column in the tree.
///
/// `name` is the structural key used by the index and never changes after
/// construction. `edit_name` is the user-facing label. The display type and its
/// settings variant are fixed at construction so they cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub name: String,
    pub edit_name: String,
    display_type: DisplayType,
    pub on: bool,
    pub show: bool,
    pub expanded: bool,
    pub enable_title: bool,
    pub show_age_labels: bool,
    pub show_uncertainty_labels: bool,
    pub width: f64,
    pub rgb: Rgb,
    pub popup: String,
    pub age_range: AgeRange,
    pub children: Vec<ColumnNode>,
    pub parent_name: Option<String>,
    type_settings: TypeSettings,
    pub font_settings: FontSettings,
    pub sub_entries: Option<SubEntries>,
}

impl ColumnNode {
    pub fn new(name: impl Into<String>, display_type: DisplayType) -> Self {
        let name = name.into();
        Self {
            edit_name: name.clone(),
            name,
            display_type,
            on: true,
            show: true,
            expanded: false,
            enable_title: true,
            show_age_labels: false,
            show_uncertainty_labels: false,
            width: DEFAULT_WIDTH,
            rgb: Rgb::WHITE,
            popup: String::new(),
            age_range: AgeRange::UNBOUNDED,
            children: Vec::new(),
            parent_name: None,
            type_settings: TypeSettings::for_display_type(display_type),
            font_settings: FontSettings::default(),
            sub_entries: None,
        }
    }

    /// A meta column whose children are the parts of one facies block
    /// (rendered by the legacy renderer as a single block-series column).
    pub fn block_series(name: impl Into<String>) -> Self {
        let mut node = ColumnNode::new(name, DisplayType::Meta);
        node.type_settings = TypeSettings::Meta(super::type_settings::MetaSettings {
            block_series: true,
        });
        node
    }

    /// Attach children, pointing their `parent_name` at this node.
    pub fn with_children(mut self, children: Vec<ColumnNode>) -> Self {
        for child in children {
            self.push_child(child);
        }
        self
    }

    pub fn push_child(&mut self, mut child: ColumnNode) {
        child.parent_name = Some(self.name.clone());
        self.children.push(child);
    }

    pub fn with_sub_entries(mut self, entries: SubEntries) -> Self {
        self.age_range = AgeRange::from_ages(entries.ages());
        self.sub_entries = Some(entries);
        self
    }

    pub fn display_type(&self) -> DisplayType {
        self.display_type
    }

    pub fn type_settings(&self) -> &TypeSettings {
        &self.type_settings
    }

    /// Mutable access for code that has already matched on the variant.
    pub(crate) fn type_settings_mut(&mut self) -> &mut TypeSettings {
        &mut self.type_settings
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_block_series(&self) -> bool {
        matches!(
            self.type_settings,
            TypeSettings::Meta(super::type_settings::MetaSettings { block_series: true })
        )
    }

    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Recompute this node's age range from its sub entries and children.
    pub fn recompute_age_range(&mut self) -> AgeRange {
        let mut range = match &self.sub_entries {
            Some(entries) => AgeRange::from_ages(entries.ages()),
            None => AgeRange::UNBOUNDED,
        };
        for child in &mut self.children {
            range = range.union(&child.recompute_age_range());
        }
        self.age_range = range;
        range
    }
}

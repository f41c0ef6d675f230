//! Data rows carried by leaf columns
//!
//! Each leaf data column keeps the rows of its datapack block in source order.
//! The row shape depends on the column type, so [SubEntries] is keyed the same
//! way as the display type.

use super::node::DisplayType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Unknown styles fall back to solid, matching the renderer.
    pub fn parse(text: &str) -> LineStyle {
        match text.trim().to_ascii_lowercase().as_str() {
            "dashed" => LineStyle::Dashed,
            "dotted" => LineStyle::Dotted,
            _ => LineStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventKind {
    Fad,
    Lad,
    #[default]
    Events,
    EventCount,
}

impl EventKind {
    /// Section lines inside an event block (`FAD`, `LAD`, `EVENTS`, `EVENT COUNT`).
    pub fn parse_section(text: &str) -> Option<EventKind> {
        match text.trim().to_ascii_uppercase().as_str() {
            "FAD" => Some(EventKind::Fad),
            "LAD" => Some(EventKind::Lad),
            "EVENTS" => Some(EventKind::Events),
            "EVENT COUNT" => Some(EventKind::EventCount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Abundance {
    Top,
    Missing,
    Rare,
    #[default]
    Common,
    Frequent,
    Abundant,
    Sample,
    Flood,
}

impl Abundance {
    pub fn parse(text: &str) -> Option<Abundance> {
        match text.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Abundance::Top),
            "missing" => Some(Abundance::Missing),
            "rare" => Some(Abundance::Rare),
            "common" => Some(Abundance::Common),
            "frequent" => Some(Abundance::Frequent),
            "abundant" => Some(Abundance::Abundant),
            "sample" => Some(Abundance::Sample),
            "flood" => Some(Abundance::Flood),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Normal,
    Reverse,
    Unknown,
    NoData,
}

impl Polarity {
    pub fn parse(text: &str) -> Option<Polarity> {
        match text.trim().to_ascii_uppercase().as_str() {
            "N" => Some(Polarity::Normal),
            "R" => Some(Polarity::Reverse),
            "U" => Some(Polarity::Unknown),
            "NO DATA" => Some(Polarity::NoData),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceDirection {
    SequenceBoundary,
    MaximumFloodingSurface,
}

impl SequenceDirection {
    pub fn parse(text: &str) -> Option<SequenceDirection> {
        match text.trim().to_ascii_uppercase().as_str() {
            "SB" => Some(SequenceDirection::SequenceBoundary),
            "MFS" => Some(SequenceDirection::MaximumFloodingSurface),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Severity {
    Major,
    #[default]
    Medium,
    Minor,
}

impl Severity {
    pub fn parse(text: &str) -> Option<Severity> {
        match text.trim().to_ascii_lowercase().as_str() {
            "major" => Some(Severity::Major),
            "medium" => Some(Severity::Medium),
            "minor" => Some(Severity::Minor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubBlockInfo {
    pub label: String,
    pub age: f64,
    pub line_style: LineStyle,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEventInfo {
    pub label: String,
    pub age: f64,
    pub line_style: LineStyle,
    pub popup: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRangeInfo {
    pub label: String,
    pub age: f64,
    pub abundance: Abundance,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubChronInfo {
    pub polarity: Polarity,
    pub label: String,
    pub age: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubFaciesInfo {
    pub rock_type: String,
    pub label: String,
    pub age: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubZoneInfo {
    pub label: String,
    pub age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPointInfo {
    pub age: f64,
    pub x_value: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSequenceInfo {
    pub label: String,
    pub direction: SequenceDirection,
    pub age: f64,
    pub severity: Severity,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubEntries {
    Block(Vec<SubBlockInfo>),
    Event(Vec<SubEventInfo>),
    Range(Vec<SubRangeInfo>),
    Chron(Vec<SubChronInfo>),
    Facies(Vec<SubFaciesInfo>),
    Zone(Vec<SubZoneInfo>),
    Point(Vec<SubPointInfo>),
    Sequence(Vec<SubSequenceInfo>),
}

impl SubEntries {
    pub fn display_type(&self) -> DisplayType {
        match self {
            SubEntries::Block(_) => DisplayType::Block,
            SubEntries::Event(_) => DisplayType::Event,
            SubEntries::Range(_) => DisplayType::Range,
            SubEntries::Chron(_) => DisplayType::Chron,
            SubEntries::Facies(_) => DisplayType::Facies,
            SubEntries::Zone(_) => DisplayType::Zone,
            SubEntries::Point(_) => DisplayType::Point,
            SubEntries::Sequence(_) => DisplayType::Sequence,
        }
    }

    pub fn ages(&self) -> Vec<f64> {
        match self {
            SubEntries::Block(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Event(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Range(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Chron(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Facies(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Zone(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Point(rows) => rows.iter().map(|r| r.age).collect(),
            SubEntries::Sequence(rows) => rows.iter().map(|r| r.age).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SubEntries::Block(rows) => rows.len(),
            SubEntries::Event(rows) => rows.len(),
            SubEntries::Range(rows) => rows.len(),
            SubEntries::Chron(rows) => rows.len(),
            SubEntries::Facies(rows) => rows.len(),
            SubEntries::Zone(rows) => rows.len(),
            SubEntries::Point(rows) => rows.len(),
            SubEntries::Sequence(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

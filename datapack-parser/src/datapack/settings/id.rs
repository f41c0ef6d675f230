//! Column ids
//!
//! Every `<column>` element carries an id of the form
//! `class datastore.<ColumnType>:<name>`. The id is split into a [ColumnId] as
//! soon as the element is read; nothing past the document layer sees the raw
//! string.
//!
//! The name is everything after the last `:`, so a column name that itself
//! contains a colon cannot be addressed by id.

use super::error::SettingsError;
use crate::datapack::columns::{ColumnNode, DisplayType};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NAMESPACE: &str = "class datastore";

/// Column classes of the legacy renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    RootColumn,
    MetaColumn,
    BlockSeriesMetaColumn,
    BlockColumn,
    FaciesColumn,
    EventColumn,
    RangeColumn,
    ChronColumn,
    FreehandColumn,
    PointColumn,
    SequenceColumn,
    TransectColumn,
    ZoneColumn,
    RulerColumn,
    BlankColumn,
    Other(String),
}

impl ColumnType {
    const KNOWN: [ColumnType; 15] = [
        ColumnType::RootColumn,
        ColumnType::MetaColumn,
        ColumnType::BlockSeriesMetaColumn,
        ColumnType::BlockColumn,
        ColumnType::FaciesColumn,
        ColumnType::EventColumn,
        ColumnType::RangeColumn,
        ColumnType::ChronColumn,
        ColumnType::FreehandColumn,
        ColumnType::PointColumn,
        ColumnType::SequenceColumn,
        ColumnType::TransectColumn,
        ColumnType::ZoneColumn,
        ColumnType::RulerColumn,
        ColumnType::BlankColumn,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::RootColumn => "RootColumn",
            ColumnType::MetaColumn => "MetaColumn",
            ColumnType::BlockSeriesMetaColumn => "BlockSeriesMetaColumn",
            ColumnType::BlockColumn => "BlockColumn",
            ColumnType::FaciesColumn => "FaciesColumn",
            ColumnType::EventColumn => "EventColumn",
            ColumnType::RangeColumn => "RangeColumn",
            ColumnType::ChronColumn => "ChronColumn",
            ColumnType::FreehandColumn => "FreehandColumn",
            ColumnType::PointColumn => "PointColumn",
            ColumnType::SequenceColumn => "SequenceColumn",
            ColumnType::TransectColumn => "TransectColumn",
            ColumnType::ZoneColumn => "ZoneColumn",
            ColumnType::RulerColumn => "RulerColumn",
            ColumnType::BlankColumn => "BlankColumn",
            ColumnType::Other(name) => name,
        }
    }

    pub fn parse(text: &str) -> ColumnType {
        let text = text.trim();
        ColumnType::KNOWN
            .into_iter()
            .find(|known| known.as_str() == text)
            .unwrap_or_else(|| ColumnType::Other(text.to_string()))
    }

    /// The class a tree node is written as.
    pub fn for_node(node: &ColumnNode) -> ColumnType {
        match node.display_type() {
            DisplayType::Meta if node.is_block_series() => ColumnType::BlockSeriesMetaColumn,
            DisplayType::Meta => ColumnType::MetaColumn,
            DisplayType::Root => ColumnType::RootColumn,
            DisplayType::Block => ColumnType::BlockColumn,
            DisplayType::Facies => ColumnType::FaciesColumn,
            DisplayType::Event => ColumnType::EventColumn,
            DisplayType::Range => ColumnType::RangeColumn,
            DisplayType::Chron => ColumnType::ChronColumn,
            DisplayType::Freehand => ColumnType::FreehandColumn,
            DisplayType::Point => ColumnType::PointColumn,
            DisplayType::Sequence => ColumnType::SequenceColumn,
            DisplayType::Transect => ColumnType::TransectColumn,
            DisplayType::Zone => ColumnType::ZoneColumn,
            DisplayType::Ruler => ColumnType::RulerColumn,
            DisplayType::Blank => ColumnType::BlankColumn,
        }
    }

    /// The display type this class renders, if it is one of the known classes.
    pub fn display_type(&self) -> Option<DisplayType> {
        Some(match self {
            ColumnType::RootColumn => DisplayType::Root,
            ColumnType::MetaColumn | ColumnType::BlockSeriesMetaColumn => DisplayType::Meta,
            ColumnType::BlockColumn => DisplayType::Block,
            ColumnType::FaciesColumn => DisplayType::Facies,
            ColumnType::EventColumn => DisplayType::Event,
            ColumnType::RangeColumn => DisplayType::Range,
            ColumnType::ChronColumn => DisplayType::Chron,
            ColumnType::FreehandColumn => DisplayType::Freehand,
            ColumnType::PointColumn => DisplayType::Point,
            ColumnType::SequenceColumn => DisplayType::Sequence,
            ColumnType::TransectColumn => DisplayType::Transect,
            ColumnType::ZoneColumn => DisplayType::Zone,
            ColumnType::RulerColumn => DisplayType::Ruler,
            ColumnType::BlankColumn => DisplayType::Blank,
            ColumnType::Other(_) => return None,
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnId {
    pub namespace: String,
    pub column_type: ColumnType,
    pub name: String,
}

impl ColumnId {
    pub fn new(column_type: ColumnType, name: impl Into<String>) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            column_type,
            name: name.into(),
        }
    }
}

impl FromStr for ColumnId {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidColumnId(raw.to_string());
        let (head, name) = raw.rsplit_once(':').ok_or_else(invalid)?;
        let (namespace, column_type) = match head.rsplit_once('.') {
            Some((namespace, column_type)) => (namespace, column_type),
            None => ("", head),
        };
        if column_type.trim().is_empty() {
            return Err(invalid());
        }
        Ok(ColumnId {
            namespace: namespace.to_string(),
            column_type: ColumnType::parse(column_type),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}:{}", self.column_type, self.name)
        } else {
            write!(f, "{}.{}:{}", self.namespace, self.column_type, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("class datastore.RootColumn:Chart Root", "class datastore", ColumnType::RootColumn, "Chart Root")]
    #[case("class datastore.EventColumn:Forams", "class datastore", ColumnType::EventColumn, "Forams")]
    #[case("ZoneColumn:Members", "", ColumnType::ZoneColumn, "Members")]
    #[case("class datastore.FancyColumn:X", "class datastore", ColumnType::Other("FancyColumn".into()), "X")]
    fn test_parse_ids(
        #[case] raw: &str,
        #[case] namespace: &str,
        #[case] column_type: ColumnType,
        #[case] name: &str,
    ) {
        let id: ColumnId = raw.parse().unwrap();
        assert_eq!(id.namespace, namespace);
        assert_eq!(id.column_type, column_type);
        assert_eq!(id.name, name);
    }

    #[test]
    fn test_display_round_trip() {
        let raw = "class datastore.BlockSeriesMetaColumn:Shelf";
        assert_eq!(raw.parse::<ColumnId>().unwrap().to_string(), raw);
        assert_eq!(
            ColumnId::new(ColumnType::BlankColumn, "Gap").to_string(),
            "class datastore.BlankColumn:Gap"
        );
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(
            "no colon here".parse::<ColumnId>(),
            Err(SettingsError::InvalidColumnId("no colon here".into()))
        );
        assert!("class datastore.:X".parse::<ColumnId>().is_err());
    }

    #[test]
    fn test_block_series_maps_to_meta() {
        assert_eq!(
            ColumnType::BlockSeriesMetaColumn.display_type(),
            Some(DisplayType::Meta)
        );
        assert_eq!(ColumnType::for_node(&ColumnNode::block_series("Shelf")), ColumnType::BlockSeriesMetaColumn);
        assert_eq!(ColumnType::Other("X".into()).display_type(), None);
    }
}

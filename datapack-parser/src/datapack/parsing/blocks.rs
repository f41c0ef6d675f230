//! Column data blocks
//!
//! A data block starts with a header line naming the column and its type
//! keyword, followed by tab-indented rows:
//!
//! ```text
//! Belgium<TAB>block<TAB>120<TAB>200/220/255<TAB>notitle<TAB>off<TAB>popup text
//! <TAB>Top<TAB>0
//! <TAB>Brabant<TAB>12.5<TAB>dashed<TAB>popup
//! ```
//!
//! Rows whose age (or other required field) does not parse are dropped with a
//! debug trace. The block ends at the first blank line or the next header.

use crate::datapack::columns::sub_entries::{
    Abundance, EventKind, LineStyle, Polarity, SequenceDirection, Severity, SubBlockInfo,
    SubChronInfo, SubEventInfo, SubFaciesInfo, SubPointInfo, SubRangeInfo, SubSequenceInfo,
    SubZoneInfo,
};
use crate::datapack::columns::type_settings::{SequenceType, TypeSettings};
use crate::datapack::columns::{ColumnNode, DisplayType, Rgb, SubEntries};

/// Column type keywords accepted in the second field of a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Block,
    Event,
    Range,
    Chron,
    Facies,
    Point,
    Sequence(SequenceType),
    Freehand,
    Transect,
    Blank,
}

impl ColumnKind {
    pub fn from_keyword(keyword: &str) -> Option<ColumnKind> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "block" => Some(ColumnKind::Block),
            "event" => Some(ColumnKind::Event),
            "range" => Some(ColumnKind::Range),
            "chron" => Some(ColumnKind::Chron),
            "facies" => Some(ColumnKind::Facies),
            "point" => Some(ColumnKind::Point),
            "sequence" => Some(ColumnKind::Sequence(SequenceType::Sequence)),
            "trend" => Some(ColumnKind::Sequence(SequenceType::Trend)),
            "freehand" => Some(ColumnKind::Freehand),
            "transect" => Some(ColumnKind::Transect),
            "blank" => Some(ColumnKind::Blank),
            _ => None,
        }
    }

    pub fn display_type(&self) -> DisplayType {
        match self {
            ColumnKind::Block => DisplayType::Block,
            ColumnKind::Event => DisplayType::Event,
            ColumnKind::Range => DisplayType::Range,
            ColumnKind::Chron => DisplayType::Chron,
            ColumnKind::Facies => DisplayType::Meta,
            ColumnKind::Point => DisplayType::Point,
            ColumnKind::Sequence(_) => DisplayType::Sequence,
            ColumnKind::Freehand => DisplayType::Freehand,
            ColumnKind::Transect => DisplayType::Transect,
            ColumnKind::Blank => DisplayType::Blank,
        }
    }
}

/// Options from the fields after the type keyword. Order is loose: the first
/// number is the width, the first `r/g/b` the colour, and any other non-empty
/// field is the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    pub width: Option<f64>,
    pub rgb: Option<Rgb>,
    pub enable_title: bool,
    pub on: bool,
    pub popup: String,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            width: None,
            rgb: None,
            enable_title: true,
            on: true,
            popup: String::new(),
        }
    }
}

impl BlockHeader {
    pub fn parse(fields: &[&str]) -> Self {
        let mut header = BlockHeader::default();
        for field in fields.iter().map(|f| f.trim()) {
            if field.is_empty() {
                continue;
            }
            if header.width.is_none() {
                if let Ok(width) = field.parse::<f64>() {
                    header.width = Some(width);
                    continue;
                }
            }
            if header.rgb.is_none() {
                if let Some(rgb) = Rgb::parse_slashed(field) {
                    header.rgb = Some(rgb);
                    continue;
                }
            }
            match field.to_ascii_lowercase().as_str() {
                "notitle" => header.enable_title = false,
                "off" => header.on = false,
                "on" => header.on = true,
                _ => header.popup = field.to_string(),
            }
        }
        header
    }

    fn apply(&self, node: &mut ColumnNode) {
        if let Some(width) = self.width {
            node.width = width;
        }
        if let Some(rgb) = self.rgb {
            node.rgb = rgb;
        }
        node.enable_title = self.enable_title;
        node.on = self.on;
        node.popup = self.popup.clone();
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Rows {
    Block(Vec<SubBlockInfo>),
    Event(Vec<SubEventInfo>),
    Range(Vec<SubRangeInfo>),
    Chron(Vec<SubChronInfo>),
    Facies(Vec<SubFaciesInfo>),
    Point(Vec<SubPointInfo>),
    Sequence(Vec<SubSequenceInfo>),
    Ignored,
}

/// One data block as read from the source, before it becomes a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBlock {
    pub name: String,
    pub kind: ColumnKind,
    pub header: BlockHeader,
    rows: Rows,
    section: EventKind,
}

fn field<'a>(fields: &[&'a str], i: usize) -> &'a str {
    fields.get(i).copied().map(str::trim).unwrap_or_default()
}

fn age(fields: &[&str], i: usize) -> Option<f64> {
    field(fields, i).parse::<f64>().ok()
}

impl ColumnBlock {
    pub fn new(name: impl Into<String>, kind: ColumnKind, header: BlockHeader) -> Self {
        let rows = match kind {
            ColumnKind::Block => Rows::Block(Vec::new()),
            ColumnKind::Event => Rows::Event(Vec::new()),
            ColumnKind::Range => Rows::Range(Vec::new()),
            ColumnKind::Chron => Rows::Chron(Vec::new()),
            ColumnKind::Facies => Rows::Facies(Vec::new()),
            ColumnKind::Point => Rows::Point(Vec::new()),
            ColumnKind::Sequence(_) => Rows::Sequence(Vec::new()),
            ColumnKind::Freehand | ColumnKind::Transect | ColumnKind::Blank => Rows::Ignored,
        };
        Self {
            name: name.into(),
            kind,
            header,
            rows,
            section: EventKind::default(),
        }
    }

    /// Switch the event section (`FAD`, `LAD`, ...). Returns `false` when the
    /// line is not a section marker for this block.
    pub fn section(&mut self, line: &str) -> bool {
        if !matches!(self.rows, Rows::Event(_)) {
            return false;
        }
        match EventKind::parse_section(line) {
            Some(kind) => {
                self.section = kind;
                true
            }
            None => false,
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.rows {
            Rows::Block(rows) => rows.len(),
            Rows::Event(rows) => rows.len(),
            Rows::Range(rows) => rows.len(),
            Rows::Chron(rows) => rows.len(),
            Rows::Facies(rows) => rows.len(),
            Rows::Point(rows) => rows.len(),
            Rows::Sequence(rows) => rows.len(),
            Rows::Ignored => 0,
        }
    }

    /// Add one data row (leading indentation already removed).
    pub fn push_row(&mut self, fields: &[&str]) {
        let section = self.section;
        let accepted = match &mut self.rows {
            Rows::Block(rows) => age(fields, 1).map(|age| {
                rows.push(SubBlockInfo {
                    label: field(fields, 0).to_string(),
                    age,
                    line_style: LineStyle::parse(field(fields, 2)),
                    popup: field(fields, 3).to_string(),
                })
            }),
            Rows::Event(rows) => age(fields, 1).map(|age| {
                rows.push(SubEventInfo {
                    label: field(fields, 0).to_string(),
                    age,
                    line_style: LineStyle::parse(field(fields, 2)),
                    popup: field(fields, 3).to_string(),
                    kind: section,
                })
            }),
            Rows::Range(rows) => age(fields, 1).map(|age| {
                rows.push(SubRangeInfo {
                    label: field(fields, 0).to_string(),
                    age,
                    abundance: Abundance::parse(field(fields, 2)).unwrap_or_default(),
                    popup: field(fields, 3).to_string(),
                })
            }),
            Rows::Chron(rows) => Polarity::parse(field(fields, 0))
                .zip(age(fields, 2))
                .map(|(polarity, age)| {
                    rows.push(SubChronInfo {
                        polarity,
                        label: field(fields, 1).to_string(),
                        age,
                        popup: field(fields, 3).to_string(),
                    })
                }),
            Rows::Facies(rows) => age(fields, 2).map(|age| {
                rows.push(SubFaciesInfo {
                    rock_type: field(fields, 0).to_string(),
                    label: field(fields, 1).to_string(),
                    age,
                    popup: field(fields, 3).to_string(),
                })
            }),
            Rows::Point(rows) => age(fields, 0)
                .zip(field(fields, 1).parse::<f64>().ok())
                .map(|(age, x_value)| {
                    rows.push(SubPointInfo {
                        age,
                        x_value,
                        popup: field(fields, 2).to_string(),
                    })
                }),
            Rows::Sequence(rows) => SequenceDirection::parse(field(fields, 1))
                .zip(age(fields, 2))
                .map(|(direction, age)| {
                    rows.push(SubSequenceInfo {
                        label: field(fields, 0).to_string(),
                        direction,
                        age,
                        severity: Severity::parse(field(fields, 3)).unwrap_or_default(),
                        popup: field(fields, 4).to_string(),
                    })
                }),
            Rows::Ignored => Some(()),
        };
        if accepted.is_none() {
            tracing::debug!(column = %self.name, row = ?fields, "dropping malformed data row");
        }
    }

    /// Build the column node for this block.
    ///
    /// Facies blocks become a block-series meta column with a facies child and a
    /// members (zone) child sharing the rows.
    pub fn to_node(&self) -> ColumnNode {
        let mut node = match &self.rows {
            Rows::Facies(rows) => {
                let members = rows
                    .iter()
                    .map(|row| SubZoneInfo {
                        label: row.label.clone(),
                        age: row.age,
                    })
                    .collect();
                let facies = ColumnNode::new(format!("{} Facies", self.name), DisplayType::Facies)
                    .with_sub_entries(SubEntries::Facies(rows.clone()));
                let members = ColumnNode::new(format!("{} Members", self.name), DisplayType::Zone)
                    .with_sub_entries(SubEntries::Zone(members));
                let mut node = ColumnNode::block_series(&self.name).with_children(vec![facies, members]);
                node.recompute_age_range();
                node
            }
            rows => {
                let node = ColumnNode::new(&self.name, self.kind.display_type());
                match rows {
                    Rows::Block(r) => node.with_sub_entries(SubEntries::Block(r.clone())),
                    Rows::Event(r) => node.with_sub_entries(SubEntries::Event(r.clone())),
                    Rows::Range(r) => node.with_sub_entries(SubEntries::Range(r.clone())),
                    Rows::Chron(r) => node.with_sub_entries(SubEntries::Chron(r.clone())),
                    Rows::Point(r) => node.with_sub_entries(SubEntries::Point(r.clone())),
                    Rows::Sequence(r) => node.with_sub_entries(SubEntries::Sequence(r.clone())),
                    Rows::Facies(_) | Rows::Ignored => node,
                }
            }
        };
        if let (ColumnKind::Sequence(sequence_type), TypeSettings::Sequence(settings)) =
            (self.kind, node.type_settings_mut())
        {
            settings.sequence_type = sequence_type;
        }
        self.header.apply(&mut node);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields_are_order_tolerant() {
        let header = BlockHeader::parse(&["120", "255/0/0", "notitle", "off", "Some popup"]);
        assert_eq!(header.width, Some(120.0));
        assert_eq!(header.rgb, Some(Rgb::new(255, 0, 0)));
        assert!(!header.enable_title);
        assert!(!header.on);
        assert_eq!(header.popup, "Some popup");

        let header = BlockHeader::parse(&[]);
        assert_eq!(header, BlockHeader::default());
    }

    #[test]
    fn test_block_rows_and_age_range() {
        let mut block = ColumnBlock::new("Belgium", ColumnKind::Block, BlockHeader::default());
        block.push_row(&["Top", "0"]);
        block.push_row(&["Brabant", "12.5", "dashed"]);
        block.push_row(&["Broken", "not-an-age"]);
        assert_eq!(block.row_count(), 2);

        let node = block.to_node();
        assert_eq!(node.display_type(), DisplayType::Block);
        assert_eq!(node.age_range.min, 0.0);
        assert_eq!(node.age_range.max, 12.5);
    }

    #[test]
    fn test_event_sections() {
        let mut block = ColumnBlock::new("Forams", ColumnKind::Event, BlockHeader::default());
        assert!(block.section("LAD"));
        block.push_row(&["G. menardii", "5.2"]);
        assert!(!block.section("Something else"));

        let node = block.to_node();
        match node.sub_entries {
            Some(SubEntries::Event(rows)) => assert_eq!(rows[0].kind, EventKind::Lad),
            other => panic!("unexpected entries {other:?}"),
        }
    }

    #[test]
    fn test_facies_becomes_block_series() {
        let mut block = ColumnBlock::new("Shelf", ColumnKind::Facies, BlockHeader::default());
        block.push_row(&["sandstone", "Unit A", "3"]);
        block.push_row(&["shale", "Unit B", "8"]);

        let node = block.to_node();
        assert!(node.is_block_series());
        let names: Vec<_> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Shelf Facies", "Shelf Members"]);
        assert_eq!(node.children[1].display_type(), DisplayType::Zone);
        assert_eq!(node.age_range.max, 8.0);
    }

    #[test]
    fn test_trend_keyword_sets_sequence_type() {
        let block = ColumnBlock::new(
            "T-R",
            ColumnKind::from_keyword("TREND").unwrap(),
            BlockHeader::default(),
        );
        let node = block.to_node();
        assert_eq!(
            node.type_settings().as_sequence().unwrap().sequence_type,
            SequenceType::Trend
        );
    }
}

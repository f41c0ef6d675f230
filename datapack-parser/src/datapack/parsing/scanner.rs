//! Line scanner
//!
//! Walks the lines of each source file and accumulates the pieces the tree
//! builder needs: the parent to children map (in first-seen order), meta-column
//! attributes, data blocks keyed by column name, and the header values.
//! Nothing here fails; unusable lines are traced and skipped.

use super::blocks::{BlockHeader, ColumnBlock, ColumnKind};
use super::lines::{classify_line, HierarchyLine, Line, MetaAttributes};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct DatapackSource {
    pub format_version: Option<String>,
    pub age_units: Option<String>,
    parents: Vec<String>,
    children: HashMap<String, Vec<String>>,
    attributes: HashMap<String, MetaAttributes>,
    blocks: HashMap<String, ColumnBlock>,
}

impl DatapackSource {
    /// Record a hierarchy line. Repeated parents append new children, keeping
    /// the first position of any child already listed.
    pub fn add_hierarchy(&mut self, line: HierarchyLine) {
        let HierarchyLine {
            parent,
            children,
            attributes,
        } = line;
        if parent.is_empty() {
            tracing::debug!("hierarchy line without a parent name");
            return;
        }
        if attributes != MetaAttributes::default() {
            self.attributes.insert(parent.clone(), attributes);
        }
        if !self.children.contains_key(&parent) {
            self.parents.push(parent.clone());
        }
        let listed = self.children.entry(parent).or_default();
        for child in children {
            if !listed.contains(&child) {
                listed.push(child);
            }
        }
    }

    pub fn add_block(&mut self, block: ColumnBlock) {
        if self.blocks.contains_key(&block.name) {
            tracing::debug!(column = %block.name, "duplicate data block, keeping the first");
            return;
        }
        self.blocks.insert(block.name.clone(), block);
    }

    pub fn children_of(&self, name: &str) -> Option<&[String]> {
        self.children.get(name).map(Vec::as_slice)
    }

    pub fn attributes_of(&self, name: &str) -> Option<&MetaAttributes> {
        self.attributes.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&ColumnBlock> {
        self.blocks.get(name)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ColumnBlock> {
        self.blocks.values()
    }

    /// Parents that never appear as a child, in first-seen order.
    pub fn roots(&self) -> Vec<&str> {
        let listed: std::collections::HashSet<&str> = self
            .children
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        self.parents
            .iter()
            .map(String::as_str)
            .filter(|parent| !listed.contains(parent))
            .collect()
    }

    /// Scan one file's text. Blocks never continue across files.
    pub fn scan(&mut self, text: &str, sentinel: &str) {
        let mut current: Option<ColumnBlock> = None;
        for (number, raw) in text.lines().enumerate() {
            match classify_line(raw, sentinel) {
                Line::Blank => self.finish(&mut current),
                Line::Hierarchy(line) => {
                    self.finish(&mut current);
                    self.add_hierarchy(line);
                }
                Line::AgeUnits(units) => {
                    self.finish(&mut current);
                    self.age_units.get_or_insert(units);
                }
                Line::FormatVersion(version) => {
                    self.finish(&mut current);
                    self.format_version.get_or_insert(version);
                }
                Line::Header(fields) => match ColumnKind::from_keyword(fields[1]) {
                    Some(kind) => {
                        self.finish(&mut current);
                        let name = fields[0].trim();
                        current = Some(ColumnBlock::new(name, kind, BlockHeader::parse(&fields[2..])));
                    }
                    None => {
                        if !section_marker(&mut current, fields[0]) {
                            tracing::trace!(line = number + 1, "skipping unrecognised line");
                        }
                    }
                },
                Line::Row(fields) => match current.as_mut() {
                    Some(block) => block.push_row(&fields),
                    None => tracing::trace!(line = number + 1, "data row outside of a block"),
                },
                Line::Other(line) => {
                    if !section_marker(&mut current, line) {
                        tracing::trace!(line = number + 1, "skipping unrecognised line");
                    }
                }
            }
        }
        self.finish(&mut current);
    }

    fn finish(&mut self, current: &mut Option<ColumnBlock>) {
        if let Some(block) = current.take() {
            self.add_block(block);
        }
    }
}

fn section_marker(current: &mut Option<ColumnBlock>, text: &str) -> bool {
    current.as_mut().is_some_and(|block| block.section(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: &str = "_METACOLUMN_OFF";

    #[test]
    fn test_repeated_parent_appends_without_duplicates() {
        let mut source = DatapackSource::default();
        source.scan("Europe\t:\tBelgium\tFrance\nEurope\t:\tFrance\tSpain\n", SENTINEL);
        assert_eq!(
            source.children_of("Europe").unwrap(),
            &["Belgium".to_string(), "France".to_string(), "Spain".to_string()]
        );
        assert_eq!(source.roots(), vec!["Europe"]);
    }

    #[test]
    fn test_blocks_end_at_blank_line() {
        let text = "Belgium\tblock\n\tTop\t0\n\tBase\t10\n\n\tStray\t20\n";
        let mut source = DatapackSource::default();
        source.scan(text, SENTINEL);
        assert_eq!(source.block("Belgium").unwrap().row_count(), 2);
    }

    #[test]
    fn test_event_sections_with_trailing_tabs() {
        let text = "Forams\tevent\nLAD\t\n\tG. menardii\t5.2\nFAD\n\tG. ruber\t2.0\n";
        let mut source = DatapackSource::default();
        source.scan(text, SENTINEL);
        assert_eq!(source.block("Forams").unwrap().row_count(), 2);
    }

    #[test]
    fn test_header_values_keep_first() {
        let mut source = DatapackSource::default();
        source.scan("format version:\t1.3\nage units:\tMa\n", SENTINEL);
        source.scan("format version:\t1.2\n", SENTINEL);
        assert_eq!(source.format_version.as_deref(), Some("1.3"));
        assert_eq!(source.age_units.as_deref(), Some("Ma"));
    }
}

//! Tree builder
//!
//! Turns a scanned [DatapackSource] into a [ColumnTree]. Each root of the
//! parent map is instantiated recursively; a name with children becomes a meta
//! column, a name with only a data block becomes that block's column, and a
//! name with neither becomes a blank column. Age ranges are folded bottom-up
//! once the whole tree exists.

use super::scanner::DatapackSource;
use super::DatapackOptions;
use crate::datapack::columns::{ColumnNode, ColumnTree, DisplayType};
use std::collections::HashSet;

pub fn build_tree(source: &DatapackSource, options: &DatapackOptions) -> ColumnTree {
    let mut root = ColumnNode::new(&options.root_name, DisplayType::Root);
    if source.age_units.is_some() {
        root.push_child(ColumnNode::new(&options.age_units_column, DisplayType::Ruler));
    }

    let mut used = HashSet::new();
    for name in source.roots() {
        let mut visiting = Vec::new();
        let node = build_node(name, source, &mut visiting, &mut used);
        root.push_child(node);
    }

    let unused = source.blocks().filter(|b| !used.contains(b.name.as_str())).count();
    if unused > 0 {
        tracing::debug!(count = unused, "data blocks not referenced by any parent");
    }

    root.recompute_age_range();
    let mut tree = ColumnTree::new(root);
    tree.format_version = source.format_version.clone();
    tree.age_units = source.age_units.clone();
    tree
}

fn build_node<'a>(
    name: &'a str,
    source: &'a DatapackSource,
    visiting: &mut Vec<&'a str>,
    used: &mut HashSet<&'a str>,
) -> ColumnNode {
    if let Some(children) = source.children_of(name) {
        if visiting.contains(&name) {
            tracing::warn!(column = %name, "column hierarchy loops back on itself");
            return ColumnNode::new(name, DisplayType::Blank);
        }
        visiting.push(name);
        let built = children
            .iter()
            .map(|child| build_node(child, source, visiting, used))
            .collect();
        visiting.pop();

        let mut node = ColumnNode::new(name, DisplayType::Meta).with_children(built);
        if let Some(attributes) = source.attributes_of(name) {
            if let Some(width) = attributes.width {
                node.width = width;
            }
            if let Some(rgb) = attributes.rgb {
                node.rgb = rgb;
            }
        }
        if source.block(name).is_some() {
            tracing::debug!(column = %name, "column has both children and data, using children");
        }
        return node;
    }

    match source.block(name) {
        Some(block) => {
            used.insert(name);
            block.to_node()
        }
        None => ColumnNode::new(name, DisplayType::Blank),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> ColumnTree {
        let options = DatapackOptions::default();
        let mut source = DatapackSource::default();
        source.scan(text, &options.metacolumn_off_token);
        build_tree(&source, &options)
    }

    #[test]
    fn test_cycle_becomes_leaf() {
        let tree = build("A\t:\tB\nB\t:\tA\nRoot\t:\tA\n");
        let a = tree.get("A").unwrap();
        assert_eq!(a.children[0].name, "B");
        assert_eq!(a.children[0].children[0].display_type(), DisplayType::Blank);
        assert!(a.children[0].children[0].is_leaf());
    }

    #[test]
    fn test_meta_attributes_apply() {
        let tree = build("Europe\t:\tBelgium\t\t150\t10/20/30\n");
        let europe = tree.get("Europe").unwrap();
        assert_eq!(europe.width, 150.0);
        assert_eq!(europe.rgb, crate::datapack::columns::Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_children_win_over_data_block() {
        let tree = build("Europe\t:\tBelgium\nBelgium\t:\tFlanders\nBelgium\tblock\n\tTop\t1\n");
        let belgium = tree.get("Belgium").unwrap();
        assert_eq!(belgium.display_type(), DisplayType::Meta);
        assert_eq!(belgium.children[0].name, "Flanders");
    }
}

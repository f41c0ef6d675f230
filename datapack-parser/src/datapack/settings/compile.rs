//! Compiling a column tree into a settings document
//!
//!     Two entry points share the per-column writer:
//!
//!     - [compile_settings] builds a fresh document. Every column gets the
//!       recognised settings, the legacy defaults and a fonts block.
//!     - [compile_settings_into] updates a parsed document in place. Recognised
//!       settings are rewritten, everything else is kept, and child columns are
//!       put in tree order with columns the tree does not know kept after them.
//!
//!     Either way every tree node ends up as exactly one `<column>` element.

use super::apply::names_match;
use super::chart::ChartSettings;
use super::document::{
    ColumnEntry, ColumnItem, DocumentItem, FontBlock, SettingEntry, SettingList, SettingsBlock,
    SettingsDocument,
};
use super::fields::{format_number, write_common, write_fonts, write_type_fields};
use super::id::{ColumnId, ColumnType};
use crate::datapack::columns::{ColumnNode, ColumnTree};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// `version` attribute of the document root
    pub version: String,
    /// Width written for columns whose width is not a positive number
    pub default_width: f64,
    /// Chart-wide settings for fresh documents
    pub chart: ChartSettings,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            version: "1.3".to_string(),
            default_width: 100.0,
            chart: ChartSettings::default(),
        }
    }
}

pub fn compile_settings(tree: &ColumnTree) -> SettingsDocument {
    compile_settings_with(tree, &CompileOptions::default())
}

pub fn compile_settings_with(tree: &ColumnTree, options: &CompileOptions) -> SettingsDocument {
    let mut document = SettingsDocument::new(&options.version);
    let mut block = SettingsBlock::default();
    options.chart.write_block(&mut block);
    document.items.push(DocumentItem::Settings(block));
    document
        .items
        .push(DocumentItem::Column(fresh_entry(tree.root(), None, options)));
    tracing::debug!(columns = tree.len(), "compiled settings document");
    document
}

/// Rewrite the recognised settings of `document` from `tree`, keeping everything else.
pub fn compile_settings_into(tree: &ColumnTree, document: &mut SettingsDocument) {
    compile_settings_into_with(tree, document, &CompileOptions::default())
}

pub fn compile_settings_into_with(
    tree: &ColumnTree,
    document: &mut SettingsDocument,
    options: &CompileOptions,
) {
    let root = tree.root();
    let (mut columns, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut document.items)
        .into_iter()
        .partition(|item| matches!(item, DocumentItem::Column(_)));
    document.items = rest;

    let position = columns.iter().position(|item| match item {
        DocumentItem::Column(entry) => names_match(&entry.id.name, &root.name),
        _ => false,
    });
    let root_entry = match position.map(|i| columns.remove(i)) {
        Some(DocumentItem::Column(mut entry)) => {
            update_entry(&mut entry, root, None, options);
            entry
        }
        _ => fresh_entry(root, None, options),
    };
    document.items.push(DocumentItem::Column(root_entry));
    if !columns.is_empty() {
        tracing::debug!(count = columns.len(), "keeping top-level columns the chart does not have");
    }
    document.items.extend(columns);
}

/// The id name of `node`. Block-series children drop their parent's name prefix.
fn entry_name(node: &ColumnNode, parent: Option<&ColumnNode>) -> String {
    parent
        .filter(|parent| parent.is_block_series())
        .and_then(|parent| {
            node.name
                .strip_prefix(parent.name.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
        })
        .filter(|rest| !rest.is_empty())
        .unwrap_or(&node.name)
        .to_string()
}

fn width_of(node: &ColumnNode, options: &CompileOptions) -> f64 {
    if node.width.is_finite() && node.width > 0.0 {
        node.width
    } else {
        options.default_width
    }
}

fn write_settings(node: &ColumnNode, entry: &mut ColumnEntry, options: &CompileOptions) {
    write_common(node, width_of(node, options), entry);
    write_type_fields(node.type_settings(), entry);
}

fn fresh_entry(node: &ColumnNode, parent: Option<&ColumnNode>, options: &CompileOptions) -> ColumnEntry {
    let id = ColumnId::new(ColumnType::for_node(node), entry_name(node, parent));
    let mut entry = ColumnEntry::new(id);
    write_settings(node, &mut entry, options);
    entry.push_setting(SettingEntry::text("useNamedColor", "false"));
    entry.push_setting(SettingEntry::text("placeHolder", "false"));
    entry.push_setting(SettingEntry::text("pad", format_number(0.2)));
    entry.push_setting(SettingEntry::text("age pad", format_number(2.0)));

    let mut fonts = FontBlock::default();
    write_fonts(node, &mut fonts);
    entry.items.push(ColumnItem::Fonts(fonts));
    for child in &node.children {
        entry
            .items
            .push(ColumnItem::Column(fresh_entry(child, Some(node), options)));
    }
    entry
}

fn update_entry(
    entry: &mut ColumnEntry,
    node: &ColumnNode,
    parent: Option<&ColumnNode>,
    options: &CompileOptions,
) {
    let column_type = ColumnType::for_node(node);
    if entry.id.column_type != column_type {
        tracing::debug!(column = %node.name, from = %entry.id.column_type, to = %column_type, "settings column type rewritten");
        entry.id.column_type = column_type;
    }
    write_settings(node, entry, options);

    match entry.fonts_mut() {
        Some(fonts) => write_fonts(node, fonts),
        None => {
            let mut fonts = FontBlock::default();
            write_fonts(node, &mut fonts);
            let position = entry
                .items
                .iter()
                .position(|item| matches!(item, ColumnItem::Column(_)))
                .unwrap_or(entry.items.len());
            entry.items.insert(position, ColumnItem::Fonts(fonts));
        }
    }

    let (mut children, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut entry.items)
        .into_iter()
        .partition(|item| matches!(item, ColumnItem::Column(_)));
    entry.items = rest;

    for child in &node.children {
        let name = entry_name(child, Some(node));
        let position = children.iter().position(|item| match item {
            ColumnItem::Column(existing) => names_match(&existing.id.name, &name),
            _ => false,
        });
        let compiled = match position.map(|i| children.remove(i)) {
            Some(ColumnItem::Column(mut existing)) => {
                update_entry(&mut existing, child, Some(node), options);
                existing
            }
            _ => fresh_entry(child, Some(node), options),
        };
        entry.items.push(ColumnItem::Column(compiled));
    }
    if !children.is_empty() {
        tracing::debug!(column = %node.name, count = children.len(), "keeping child columns the chart does not have");
    }
    entry.items.extend(children);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::columns::{DisplayType, FontRole};
    use crate::datapack::settings::apply::apply_settings;

    fn sample_tree() -> ColumnTree {
        let shelf = ColumnNode::block_series("Shelf").with_children(vec![
            ColumnNode::new("Shelf Facies", DisplayType::Facies),
            ColumnNode::new("Shelf Members", DisplayType::Zone),
        ]);
        let root = ColumnNode::new("Chart Root", DisplayType::Root).with_children(vec![
            ColumnNode::new("Europe", DisplayType::Meta).with_children(vec![
                ColumnNode::new("Forams", DisplayType::Event),
                shelf,
            ]),
            ColumnNode::new("Sea Level", DisplayType::Point),
        ]);
        ColumnTree::new(root)
    }

    #[test]
    fn test_one_column_per_node() {
        let tree = sample_tree();
        let document = compile_settings(&tree);
        assert_eq!(document.all_columns().count(), tree.len());

        let ids: Vec<_> = document.all_columns().map(|c| c.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "class datastore.RootColumn:Chart Root",
                "class datastore.MetaColumn:Europe",
                "class datastore.EventColumn:Forams",
                "class datastore.BlockSeriesMetaColumn:Shelf",
                "class datastore.FaciesColumn:Facies",
                "class datastore.ZoneColumn:Members",
                "class datastore.PointColumn:Sea Level",
            ]
        );
    }

    #[test]
    fn test_fresh_entry_defaults() {
        let document = compile_settings(&sample_tree());
        let forams = document
            .all_columns()
            .find(|c| c.id.name == "Forams")
            .unwrap();
        assert_eq!(forams.setting_text("width"), Some("100.0"));
        assert_eq!(forams.setting_text("isSelected"), Some("true"));
        assert_eq!(forams.setting_text("type"), Some("events"));
        assert_eq!(forams.setting_text("pad"), Some("0.2"));
        assert_eq!(forams.setting_text("age pad"), Some("2.0"));
        assert!(forams.fonts().is_some());
        assert_eq!(document.version(), Some("1.3"));
    }

    #[test]
    fn test_compile_then_apply_restores_fields() {
        let mut tree = sample_tree();
        {
            let forams = tree.get_mut("Forams").unwrap();
            forams.edit_name = "Foraminifera".into();
            forams.width = 64.0;
            forams.font_settings.get_mut(FontRole::ColumnHeader).on = true;
        }
        let document = compile_settings(&tree);

        let mut fresh = sample_tree();
        let report = apply_settings(&document, &mut fresh);
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        assert_eq!(report.applied, tree.len());
        assert_eq!(fresh.get("Forams"), tree.get("Forams"));
    }

    #[test]
    fn test_in_place_update_keeps_unknowns_and_orders_children() {
        let mut document = SettingsDocument::parse(
            r#"<TSCreator version="1.2" vendor="x">
  <settings>
    <setting name="legacyFlag">on</setting>
  </settings>
  <column id="class datastore.RootColumn:Chart Root">
    <setting name="title">Old root</setting>
    <setting name="mystery">42</setting>
    <column id="class datastore.PointColumn:Sea Level">
      <setting name="width">10.0</setting>
      <setting name="customPoint">kept</setting>
    </column>
    <column id="class datastore.MetaColumn:Gone"/>
  </column>
  <extra/>
</TSCreator>"#,
        )
        .unwrap();
        let tree = sample_tree();
        compile_settings_into(&tree, &mut document);

        assert_eq!(document.version(), Some("1.2"));
        assert_eq!(document.settings_block().unwrap().setting_text("legacyFlag"), Some("on"));
        let root = document.columns().next().unwrap();
        assert_eq!(root.setting_text("title"), Some("Chart Root"));
        assert_eq!(root.setting_text("mystery"), Some("42"));

        let children: Vec<_> = root.children().map(|c| c.id.name.as_str()).collect();
        assert_eq!(children, vec!["Europe", "Sea Level", "Gone"]);

        let sea_level = root.children().nth(1).unwrap();
        assert_eq!(sea_level.setting_text("width"), Some("100.0"));
        assert_eq!(sea_level.setting_text("customPoint"), Some("kept"));
        assert!(document.to_string().contains("<extra/>"));
        assert_eq!(document.all_columns().count(), tree.len() + 1);
    }
}

//! Applying a settings document onto a column tree
//!
//! Document columns are matched to tree nodes by name. Nothing here fails: a
//! column the tree does not have, a column of the wrong type, or an id that
//! cannot be read is logged, recorded as a [Diagnostic] and skipped, and the
//! rest of the document is still applied.

use super::document::{ColumnEntry, SettingList, SettingsDocument};
use super::fields::{parse_bool, read_common, read_fonts, read_type_fields};
use super::id::ColumnType;
use super::xml::XmlElement;
use crate::datapack::columns::{ColumnNode, ColumnTree};
use crate::datapack::diagnostics::{codes, Diagnostic};
use serde::Serialize;

/// Prefix the legacy renderer puts on top-level column titles.
pub const CHART_TITLE_PREFIX: &str = "Chart Title in ";

/// Outcome of [apply_settings].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    /// Document columns copied onto a tree node
    pub applied: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The names a document column may go by in the tree, in lookup order.
pub(crate) fn name_candidates(name: &str) -> Vec<String> {
    match name.strip_prefix(CHART_TITLE_PREFIX) {
        Some(bare) => vec![name.to_string(), bare.to_string()],
        None => vec![name.to_string(), format!("{CHART_TITLE_PREFIX}{name}")],
    }
}

pub(crate) fn names_match(document_name: &str, tree_name: &str) -> bool {
    name_candidates(document_name)
        .iter()
        .any(|candidate| candidate == tree_name)
}

fn resolve(tree: &ColumnTree, name: &str) -> Option<String> {
    name_candidates(name)
        .into_iter()
        .find(|candidate| tree.index().contains(candidate))
}

/// Copy every recognised setting in `document` onto the matching columns of `tree`.
pub fn apply_settings(document: &SettingsDocument, tree: &mut ColumnTree) -> ApplyReport {
    let mut applier = Applier {
        tree,
        report: ApplyReport::default(),
        selected: Vec::new(),
    };
    for element in document.unreadable_columns() {
        applier.unreadable(element);
    }
    for entry in document.columns() {
        applier.apply_entry(entry, None);
    }
    applier.turn_on_ancestors();

    let report = applier.report;
    tracing::info!(
        applied = report.applied,
        diagnostics = report.diagnostics.len(),
        "applied settings document"
    );
    report
}

struct Applier<'t> {
    tree: &'t mut ColumnTree,
    report: ApplyReport,
    /// Columns the document turned on, in document order
    selected: Vec<String>,
}

impl Applier<'_> {
    /// `target` overrides the entry's own name for block-series children.
    fn apply_entry(&mut self, entry: &ColumnEntry, target: Option<String>) {
        let resolved = match &target {
            Some(target) => resolve(self.tree, target).or_else(|| resolve(self.tree, &entry.id.name)),
            None => resolve(self.tree, &entry.id.name),
        };

        match &resolved {
            Some(name) => self.apply_fields(entry, name),
            None => {
                let name = target.as_deref().unwrap_or(&entry.id.name);
                tracing::warn!(column = %name, id = %entry.id, "settings column not found in tree");
                self.report.diagnostics.push(
                    Diagnostic::warning(format!("Column '{}' is not in the chart", name))
                        .with_code(codes::UNKNOWN_COLUMN)
                        .with_subject(name),
                );
            }
        }

        let fan_out = entry.id.column_type == ColumnType::BlockSeriesMetaColumn;
        let parent_name = resolved.unwrap_or_else(|| entry.id.name.clone());
        for element in entry.unreadable_children() {
            self.unreadable(element);
        }
        for child in entry.children() {
            let target = fan_out.then(|| format!("{} {}", parent_name, child.id.name));
            self.apply_entry(child, target);
        }
    }

    fn apply_fields(&mut self, entry: &ColumnEntry, name: &str) {
        let Some(node) = self.tree.get_mut(name) else {
            return;
        };
        if entry.id.column_type.display_type() != Some(node.display_type()) {
            tracing::warn!(
                column = %name,
                document_type = %entry.id.column_type,
                display_type = %node.display_type(),
                "settings column type does not match, skipping its fields"
            );
            self.report.diagnostics.push(
                Diagnostic::warning(format!(
                    "Column '{}' is a {} column but the settings describe a {}",
                    name,
                    node.display_type(),
                    entry.id.column_type
                ))
                .with_code(codes::TYPE_MISMATCH)
                .with_subject(name),
            );
            return;
        }

        copy_fields(entry, node);
        if entry.setting_text("isSelected").and_then(parse_bool) == Some(true) {
            self.selected.push(name.to_string());
        }
        self.report.applied += 1;
    }

    fn unreadable(&mut self, element: &XmlElement) {
        let raw = element.attribute("id").unwrap_or_default();
        tracing::warn!(id = %raw, "skipping settings column with unreadable id");
        self.report.diagnostics.push(
            Diagnostic::warning(format!("Column id '{}' cannot be read", raw))
                .with_code(codes::INVALID_COLUMN_ID)
                .with_subject(raw),
        );
    }

    /// A selected column must not sit under a column that is off.
    fn turn_on_ancestors(&mut self) {
        for name in std::mem::take(&mut self.selected) {
            if let Err(err) = self.tree.set_on(&name, true) {
                tracing::warn!(%err, "could not turn on ancestors");
            }
        }
    }
}

fn copy_fields(entry: &ColumnEntry, node: &mut ColumnNode) {
    read_common(entry, node);
    read_type_fields(entry, node.type_settings_mut());
    if let Some(fonts) = entry.fonts() {
        read_fonts(fonts, node);
    }
}

//! Treeviz formatter for column trees
//!
//! One line per column, children drawn with box connectors under their parent:
//!
//! ```text
//! ⧉ Chart Root
//! ├─ ⊢ MA
//! └─ § Europe
//!   ├─ ▤ Belgium (3 rows)
//!   └─ ○ France [off]
//! ```
//!
//! Labels are the structural names truncated to 30 characters. A data column
//! shows its row count and a column that is off is marked `[off]`.
//!
//! Icons
//!     Root: ⧉
//!     Meta: §
//!     Block: ▤
//!     Facies: ▦
//!     Event: •
//!     Range: ┆
//!     Chron: ◐
//!     Freehand: ✎
//!     Point: ∙
//!     Sequence: ≋
//!     Transect: ⟋
//!     Zone: ▭
//!     Ruler: ⊢
//!     Blank: ○
//!
//! Parameters
//!     show-age: append the age range of bounded columns (`[min..max]`)

use super::registry::{FormatError, Formatter, RenderParams};
use crate::datapack::columns::{ColumnNode, ColumnTree, DisplayType};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(display_type: DisplayType) -> &'static str {
    match display_type {
        DisplayType::Root => "⧉",
        DisplayType::Meta => "§",
        DisplayType::Block => "▤",
        DisplayType::Facies => "▦",
        DisplayType::Event => "•",
        DisplayType::Range => "┆",
        DisplayType::Chron => "◐",
        DisplayType::Freehand => "✎",
        DisplayType::Point => "∙",
        DisplayType::Sequence => "≋",
        DisplayType::Transect => "⟋",
        DisplayType::Zone => "▭",
        DisplayType::Ruler => "⊢",
        DisplayType::Blank => "○",
    }
}

fn label(node: &ColumnNode, show_age: bool) -> String {
    let mut label = format!("{} {}", get_icon(node.display_type()), truncate(&node.name, 30));
    if let Some(entries) = &node.sub_entries {
        label.push_str(&format!(" ({} rows)", entries.len()));
    }
    if show_age && node.age_range.is_bounded() {
        label.push_str(&format!(" [{:?}..{:?}]", node.age_range.min, node.age_range.max));
    }
    if !node.on {
        label.push_str(" [off]");
    }
    label
}

fn format_node(
    node: &ColumnNode,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_age: bool,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{}{} {}\n", prefix, connector, label(node, show_age)));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        output.push_str(&format_node(child, &child_prefix, i, child_count, show_age));
    }

    output
}

pub fn to_treeviz_str(tree: &ColumnTree) -> String {
    to_treeviz_str_with_params(tree, &RenderParams::new())
}

pub fn to_treeviz_str_with_params(tree: &ColumnTree, params: &RenderParams) -> String {
    let show_age = params
        .get("show-age")
        .map(|v| v != "false")
        .unwrap_or(false);

    let root = tree.root();
    let mut output = format!("{}\n", label(root, show_age));
    let child_count = root.children.len();
    for (i, child) in root.children.iter().enumerate() {
        output.push_str(&format_node(child, "", i, child_count, show_age));
    }
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with one line per column"
    }

    fn render(&self, tree: &ColumnTree, params: &RenderParams) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with_params(tree, params))
    }
}

//! Column tree and name index
//!
//!     The tree owns every node. The [ColumnIndex] maps a column name to the
//!     position of its node (the child indices walked from the root), so it never
//!     owns or borrows nodes and can be rebuilt at any time from the root.
//!
//!     A sub-column listed under several parents is built once under each of
//!     them, so a name can occur more than once. The index resolves a name to its
//!     first occurrence; operations that walk upwards follow the node's own path
//!     and check each step against `parent_name`. The walk is computed before
//!     anything is mutated, so an operation either completes or changes nothing.
//!     A `parent_name` that disagrees with the node above means the index and the
//!     tree have drifted apart, which is a bug in this crate, and panics.
//!
//!     Nothing here is synchronised. Callers serialise mutations themselves
//!     (`&mut self` enforces that within one owner).

use super::error::TreeError;
use super::node::ColumnNode;
use super::type_settings::TypeSettingsPatch;
use serde::Serialize;
use std::collections::HashMap;

/// Child indices from the root to a node. The root's path is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, parent) = self.0.split_last()?;
        Some(NodePath(parent.to_vec()))
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

/// Name to node lookup over one tree instance.
///
/// When a name occurs more than once, the first occurrence in depth-first order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnIndex {
    paths: HashMap<String, NodePath>,
}

impl ColumnIndex {
    /// Index every node under `root`.
    pub fn build(root: &ColumnNode) -> Self {
        let mut index = ColumnIndex::default();
        index.insert_subtree(root, NodePath::root());
        index
    }

    fn insert_subtree(&mut self, node: &ColumnNode, path: NodePath) {
        if self.paths.contains_key(&node.name) {
            tracing::warn!(column = %node.name, "duplicate column name, keeping first occurrence");
        } else {
            self.paths.insert(node.name.clone(), path.clone());
        }
        for (i, child) in node.children.iter().enumerate() {
            self.insert_subtree(child, path.child(i));
        }
    }

    pub fn path(&self, name: &str) -> Option<&NodePath> {
        self.paths.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Rewrite paths after the children at `a` and `b` of `parent` traded places.
    fn swap_siblings(&mut self, parent: &NodePath, a: usize, b: usize) {
        let (prefix_a, prefix_b) = (parent.child(a), parent.child(b));
        let depth = parent.depth();
        for path in self.paths.values_mut() {
            if path.starts_with(&prefix_a) {
                path.0[depth] = b;
            } else if path.starts_with(&prefix_b) {
                path.0[depth] = a;
            }
        }
    }
}

/// Sibling move direction for [ColumnTree::reorder_sibling].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the parent's children
    Left,
    /// Towards the end of the parent's children
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTree {
    root: ColumnNode,
    #[serde(skip)]
    index: ColumnIndex,
    /// Value of the `format version:` header, if any datapack declared one
    pub format_version: Option<String>,
    /// Value of the age-units header (e.g. `Ma`)
    pub age_units: Option<String>,
}

impl ColumnTree {
    pub fn new(root: ColumnNode) -> Self {
        let index = ColumnIndex::build(&root);
        Self {
            root,
            index,
            format_version: None,
            age_units: None,
        }
    }

    pub fn root(&self) -> &ColumnNode {
        &self.root
    }

    pub fn index(&self) -> &ColumnIndex {
        &self.index
    }

    /// Swap in a whole new tree; the index is rebuilt for it.
    pub fn replace_root(&mut self, root: ColumnNode) {
        self.index = ColumnIndex::build(&root);
        self.root = root;
    }

    /// Rebuild the index from the current tree.
    pub fn initialize_column_index(&mut self) {
        self.index = ColumnIndex::build(&self.root);
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.root.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnNode> {
        self.root.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnNode> {
        let path = self.index.path(name)?;
        Some(self.node_at(path))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ColumnNode> {
        let path = self.index.path(name)?.clone();
        Some(self.node_at_mut(&path))
    }

    fn lookup(&self, name: &str) -> Result<NodePath, TreeError> {
        self.index.path(name).cloned().ok_or_else(|| {
            tracing::warn!(column = %name, "column not found");
            TreeError::UnknownColumn(name.to_string())
        })
    }

    fn node_at(&self, path: &NodePath) -> &ColumnNode {
        let mut node = &self.root;
        for &i in path.indices() {
            node = node
                .children
                .get(i)
                .unwrap_or_else(|| desynchronized(&node.name));
        }
        node
    }

    fn node_at_mut(&mut self, path: &NodePath) -> &mut ColumnNode {
        let mut node = &mut self.root;
        for &i in path.indices() {
            if i >= node.children.len() {
                desynchronized(&node.name);
            }
            node = &mut node.children[i];
        }
        node
    }

    /// Path of the parent of the node at `path`, checked against its `parent_name`.
    fn parent_path(&self, path: &NodePath) -> Option<NodePath> {
        let parent_name = self.node_at(path).parent_name.as_deref()?;
        match path.parent() {
            Some(parent) if self.node_at(&parent).name == parent_name => Some(parent),
            _ => desynchronized(parent_name),
        }
    }

    /// Paths of every ancestor of the node at `path`, nearest first.
    fn ancestor_paths(&self, path: &NodePath) -> Vec<NodePath> {
        let mut chain = Vec::new();
        let mut current = path.clone();
        while let Some(parent) = self.parent_path(&current) {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// Names of every ancestor of `name`, nearest first, ending with the root.
    pub fn ancestors(&self, name: &str) -> Result<Vec<String>, TreeError> {
        let path = self.lookup(name)?;
        Ok(self
            .ancestor_paths(&path)
            .iter()
            .map(|p| self.node_at(p).name.clone())
            .collect())
    }

    /// Flip `on` for `name`. Turning a column on also turns on every ancestor;
    /// turning it off touches nothing else. Returns the new state.
    pub fn toggle_on(&mut self, name: &str) -> Result<bool, TreeError> {
        let on = !self.lookup(name).map(|path| self.node_at(&path).on)?;
        self.set_on(name, on)?;
        Ok(on)
    }

    /// Explicit form of [toggle_on](Self::toggle_on).
    pub fn set_on(&mut self, name: &str, on: bool) -> Result<(), TreeError> {
        let path = self.lookup(name)?;
        let ancestors = if on {
            self.ancestor_paths(&path)
        } else {
            Vec::new()
        };
        self.node_at_mut(&path).on = on;
        for ancestor in &ancestors {
            self.node_at_mut(ancestor).on = true;
        }
        Ok(())
    }

    /// Filter the tree's `show`/`expanded` flags by a case-insensitive name match.
    ///
    /// An empty term shows everything collapsed except the root's children,
    /// which are expanded. Otherwise matches are shown expanded, their
    /// descendants shown, and their ancestors shown expanded.
    pub fn search(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            reset_visibility(&mut self.root, true);
            for child in &mut self.root.children {
                child.expanded = true;
            }
            return;
        }

        reset_visibility(&mut self.root, false);
        let mut matches = Vec::new();
        collect_matches(&self.root, &term, NodePath::root(), &mut matches);

        for path in &matches {
            let ancestors = self.ancestor_paths(path);
            let node = self.node_at_mut(path);
            node.show = true;
            node.expanded = true;
            for child in &mut node.children {
                show_subtree(child);
            }
            for ancestor in &ancestors {
                let ancestor = self.node_at_mut(ancestor);
                if ancestor.show && ancestor.expanded {
                    break;
                }
                ancestor.show = true;
                ancestor.expanded = true;
            }
        }
        tracing::debug!(term = %term, matches = matches.len(), "column search");
    }

    /// Swap `name` with its neighbour. Returns `false` when it is already at that end
    /// (or is the root).
    pub fn reorder_sibling(&mut self, name: &str, direction: Direction) -> Result<bool, TreeError> {
        let path = self.lookup(name)?;
        let Some(parent_path) = self.parent_path(&path) else {
            return Ok(false);
        };

        let position = path.indices()[parent_path.depth()];
        let sibling_count = self.node_at(&parent_path).children.len();
        let target = match direction {
            Direction::Left if position > 0 => position - 1,
            Direction::Right if position + 1 < sibling_count => position + 1,
            _ => return Ok(false),
        };

        self.node_at_mut(&parent_path).children.swap(position, target);
        self.index.swap_siblings(&parent_path, position, target);
        Ok(true)
    }

    /// Change the user-facing label. The structural name stays put so the index
    /// remains valid.
    pub fn rename(&mut self, name: &str, new_name: impl Into<String>) -> Result<(), TreeError> {
        let path = self.lookup(name)?;
        self.node_at_mut(&path).edit_name = new_name.into();
        Ok(())
    }

    /// Shallow-merge a settings patch into the column's type settings.
    ///
    /// A patch written for a different display type is rejected, as is one whose
    /// fields do not fit; in both cases the column is left untouched.
    pub fn update_type_settings(
        &mut self,
        name: &str,
        patch: TypeSettingsPatch,
    ) -> Result<(), TreeError> {
        let path = self.lookup(name)?;
        let node = self.node_at_mut(&path);
        if node.display_type() != patch.target {
            return Err(TreeError::TypeMismatch {
                column: name.to_string(),
                display_type: node.display_type(),
                patch: patch.target,
            });
        }
        node.type_settings_mut()
            .merge_fields(&patch.fields)
            .map_err(|reason| TreeError::InvalidPatch {
                column: name.to_string(),
                reason,
            })
    }
}

fn reset_visibility(node: &mut ColumnNode, show: bool) {
    node.show = show;
    node.expanded = false;
    for child in &mut node.children {
        reset_visibility(child, show);
    }
}

fn show_subtree(node: &mut ColumnNode) {
    node.show = true;
    for child in &mut node.children {
        show_subtree(child);
    }
}

fn collect_matches(node: &ColumnNode, term: &str, path: NodePath, out: &mut Vec<NodePath>) {
    if node.name.to_lowercase().contains(term) {
        out.push(path.clone());
    }
    for (i, child) in node.children.iter().enumerate() {
        collect_matches(child, term, path.child(i), out);
    }
}

#[track_caller]
fn desynchronized(name: &str) -> ! {
    panic!("column index out of sync with tree at '{name}'")
}

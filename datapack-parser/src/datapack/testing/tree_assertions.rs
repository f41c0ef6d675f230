//! Fluent assertions for column trees
//!
//!     Each assertion carries the path it was reached by (`Chart Root > Europe >
//!     Belgium`) so a failure names the column without a debugger. Closures may
//!     return the assertion or nothing; the result is ignored.

use crate::datapack::columns::{ColumnNode, ColumnTree, DisplayType};

pub fn assert_tree(tree: &ColumnTree) -> ColumnAssertion<'_> {
    let root = tree.root();
    ColumnAssertion {
        node: root,
        context: root.name.clone(),
    }
}

pub struct ColumnAssertion<'a> {
    node: &'a ColumnNode,
    context: String,
}

fn summarize(children: &[ColumnNode]) -> String {
    children
        .iter()
        .map(|child| format!("{}({:?})", child.name, child.display_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<'a> ColumnAssertion<'a> {
    pub fn node(&self) -> &'a ColumnNode {
        self.node
    }

    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.name, expected,
            "{}: Expected column name '{}', but got '{}'",
            self.context, expected, self.node.name
        );
        self
    }

    pub fn edit_name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.edit_name, expected,
            "{}: Expected display title '{}', but got '{}'",
            self.context, expected, self.node.edit_name
        );
        self
    }

    pub fn display_type(self, expected: DisplayType) -> Self {
        assert_eq!(
            self.node.display_type(),
            expected,
            "{}: Expected a {:?} column, but got {:?}",
            self.context,
            expected,
            self.node.display_type()
        );
        self
    }

    pub fn block_series(self) -> Self {
        assert!(
            self.node.is_block_series(),
            "{}: Expected a block-series meta column",
            self.context
        );
        self
    }

    pub fn on(self, expected: bool) -> Self {
        assert_eq!(
            self.node.on, expected,
            "{}: Expected on = {}, but got {}",
            self.context, expected, self.node.on
        );
        self
    }

    pub fn width(self, expected: f64) -> Self {
        assert_eq!(
            self.node.width, expected,
            "{}: Expected width {}, but got {}",
            self.context, expected, self.node.width
        );
        self
    }

    pub fn age_range(self, min: f64, max: f64) -> Self {
        let range = self.node.age_range;
        assert!(
            range.min == min && range.max == max,
            "{}: Expected age range [{}..{}], but got [{}..{}]",
            self.context,
            min,
            max,
            range.min,
            range.max
        );
        self
    }

    /// Number of data rows; columns without rows count as zero.
    pub fn row_count(self, expected: usize) -> Self {
        let actual = self.node.sub_entries.as_ref().map_or(0, |rows| rows.len());
        assert_eq!(
            actual, expected,
            "{}: Expected {} data rows, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.node.children)
        );
        self
    }

    /// Children names, in order.
    pub fn child_names(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            actual, expected,
            "{}: Unexpected children [{}]",
            self.context,
            summarize(&self.node.children)
        );
        self
    }

    pub fn child<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ColumnAssertion<'a>) -> R,
    {
        let children = &self.node.children;
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds (column has {} children)",
            self.context,
            index,
            children.len()
        );
        let child = &children[index];
        assertion(ColumnAssertion {
            node: child,
            context: format!("{} > {}", self.context, child.name),
        });
        self
    }

    /// Descend into the child with the given name.
    pub fn named<F, R>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(ColumnAssertion<'a>) -> R,
    {
        let node: &'a ColumnNode = self.node;
        let Some(child) = node.children.iter().find(|c| c.name == name) else {
            panic!(
                "{}: No child named '{}' among [{}]",
                self.context,
                name,
                summarize(&node.children)
            );
        };
        assertion(ColumnAssertion {
            node: child,
            context: format!("{} > {}", self.context, child.name),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ColumnTree {
        ColumnTree::new(
            ColumnNode::new("Chart Root", DisplayType::Root).with_children(vec![
                ColumnNode::new("Europe", DisplayType::Meta)
                    .with_children(vec![ColumnNode::new("Belgium", DisplayType::Block)]),
            ]),
        )
    }

    #[test]
    fn test_fluent_walk() {
        assert_tree(&tree())
            .name("Chart Root")
            .child_names(&["Europe"])
            .named("Europe", |europe| {
                europe
                    .display_type(DisplayType::Meta)
                    .child(0, |belgium| belgium.name("Belgium").row_count(0))
            });
    }

    #[test]
    #[should_panic(expected = "Chart Root > Europe: No child named 'France'")]
    fn test_failure_names_the_path() {
        assert_tree(&tree()).named("Europe", |europe| europe.named("France", |_| ()));
    }
}

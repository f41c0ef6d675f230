//! Named output formats for column trees
//!
//! The registry holds the built-in formats in a fixed order and renders a tree
//! by format name. Render parameters (`show-age`, ...) are passed through to the
//! format; a format ignores parameters it has no use for.

use crate::datapack::columns::ColumnTree;
use std::collections::HashMap;
use std::fmt;

pub type RenderParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No format with that name; carries the names that do exist
    FormatNotFound { name: String, available: Vec<String> },
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound { name, available } => {
                write!(f, "Format '{name}' not found (available: {})", available.join(", "))
            }
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn render(&self, tree: &ColumnTree, params: &RenderParams) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatRegistry {
    fn push<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatters.retain(|f| f.name() != formatter.name());
        self.formatters.push(Box::new(formatter));
        self
    }

    pub fn get(&self, name: &str) -> Result<&dyn Formatter, FormatError> {
        self.formatters
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound {
                name: name.to_string(),
                available: self.list_formats(),
            })
    }

    pub fn render(
        &self,
        tree: &ColumnTree,
        format: &str,
        params: &RenderParams,
    ) -> Result<String, FormatError> {
        self.get(format)?.render(tree, params)
    }

    pub fn serialize(&self, tree: &ColumnTree, format: &str) -> Result<String, FormatError> {
        self.render(tree, format, &RenderParams::new())
    }

    /// Format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.iter().map(|f| f.name().to_string()).collect();
        names.sort();
        names
    }

    /// `(name, description)` pairs in registration order, for help output.
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.formatters.iter().map(|f| (f.name(), f.description()))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry {
            formatters: Vec::new(),
        }
        .push(super::TreevizFormatter)
        .push(super::JsonFormatter)
        .push(super::YamlFormatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::columns::{AgeRange, ColumnNode, DisplayType};

    fn tree() -> ColumnTree {
        let mut europe = ColumnNode::new("Europe", DisplayType::Meta);
        europe.age_range = AgeRange::new(0.0, 80.0);
        ColumnTree::new(ColumnNode::new("Chart Root", DisplayType::Root).with_children(vec![europe]))
    }

    #[test]
    fn test_unknown_format_lists_the_known_ones() {
        let err = FormatRegistry::default().serialize(&tree(), "pdf").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format 'pdf' not found (available: json, treeviz, yaml)"
        );
    }

    #[test]
    fn test_names_are_matched_loosely() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.get(" JSON ").unwrap().name(), "json");
    }

    #[test]
    fn test_params_reach_the_format() {
        let registry = FormatRegistry::default();
        let mut params = RenderParams::new();
        params.insert("show-age".to_string(), "true".to_string());
        let plain = registry.serialize(&tree(), "treeviz").unwrap();
        let with_age = registry.render(&tree(), "treeviz", &params).unwrap();
        assert_ne!(plain, with_age);
        // json has no use for the parameter
        assert_eq!(
            registry.render(&tree(), "json", &params).unwrap(),
            registry.serialize(&tree(), "json").unwrap()
        );
    }

    #[test]
    fn test_descriptions_follow_registration_order() {
        let registry = FormatRegistry::default();
        let names: Vec<_> = registry.descriptions().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["treeviz", "json", "yaml"]);
    }
}

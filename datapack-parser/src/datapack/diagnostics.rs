//! Diagnostic collection
//!
//! Parsing and settings application are lenient: malformed input is skipped
//! rather than rejected. This module gives the skipped parts a structured
//! form so callers can show them to the user instead of digging through logs.
//!
//! Diagnostics come from two places:
//! - [apply_settings](crate::datapack::settings::apply_settings) reports unknown
//!   columns, type mismatches and unreadable ids in its `ApplyReport`
//! - [validate_tree] checks a parsed tree for suspicious structure
//!
//! ## Validation Checks
//!
//! 1. **Duplicate names**: the index keeps only the first node with a name
//! 2. **Empty meta columns**: meta columns that ended up without children
//! 3. **Empty data columns**: data columns whose rows were all dropped

use crate::datapack::columns::{ColumnTree, DisplayType};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

pub mod codes {
    pub const UNKNOWN_COLUMN: &str = "unknown-column";
    pub const TYPE_MISMATCH: &str = "type-mismatch";
    pub const INVALID_COLUMN_ID: &str = "invalid-column-id";
    pub const DUPLICATE_COLUMN: &str = "duplicate-column";
    pub const EMPTY_META_COLUMN: &str = "empty-meta-column";
    pub const EMPTY_DATA_COLUMN: &str = "empty-data-column";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
    /// The column name or settings id the diagnostic is about
    pub subject: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            subject: None,
            source: "datapack-parser".to_string(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.source, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({})", subject)?;
        }
        Ok(())
    }
}

/// Check a tree for structure that parsed but is probably not what the author meant.
pub fn validate_tree(tree: &ColumnTree) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();

    for node in tree.iter() {
        if !seen.insert(node.name.as_str()) {
            diagnostics.push(
                Diagnostic::warning(format!(
                    "Column '{}' appears more than once; only the first is addressable",
                    node.name
                ))
                .with_code(codes::DUPLICATE_COLUMN)
                .with_subject(&node.name),
            );
        }
        match node.display_type() {
            DisplayType::Meta if node.children.is_empty() => diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Information,
                    format!("Meta column '{}' has no children", node.name),
                )
                .with_code(codes::EMPTY_META_COLUMN)
                .with_subject(&node.name),
            ),
            _ if node.sub_entries.as_ref().is_some_and(|entries| entries.is_empty()) => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Information,
                        format!("Data column '{}' has no rows", node.name),
                    )
                    .with_code(codes::EMPTY_DATA_COLUMN)
                    .with_subject(&node.name),
                )
            }
            _ => {}
        }
    }
    diagnostics
}

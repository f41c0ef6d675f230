//! Error types for column tree operations

use super::node::DisplayType;
use std::fmt;

/// Errors returned by the tree mutation operations.
///
/// None of these leave the tree partially modified. Index/tree desynchronisation
/// is not represented here: it is a programming error and panics.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The name is not in the column index
    UnknownColumn(String),
    /// A settings patch written for one display type was aimed at another
    TypeMismatch {
        column: String,
        display_type: DisplayType,
        patch: DisplayType,
    },
    /// The patch names the right type but its fields do not fit the settings shape
    InvalidPatch { column: String, reason: String },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownColumn(name) => write!(f, "No column named '{}'", name),
            TreeError::TypeMismatch {
                column,
                display_type,
                patch,
            } => write!(
                f,
                "Column '{}' is a {} column, settings patch is for {} columns",
                column, display_type, patch
            ),
            TreeError::InvalidPatch { column, reason } => {
                write!(f, "Invalid settings patch for column '{}': {}", column, reason)
            }
        }
    }
}

impl std::error::Error for TreeError {}

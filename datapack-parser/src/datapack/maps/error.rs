//! Error types for map-pack parsing

use std::fmt;

/// The one map-pack condition that is not tolerated: the file is not a map pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapPackError {
    /// The file's leading line carries no recognised map-pack marker
    UnrecognizedFormat { file: String },
}

impl MapPackError {
    /// Name of the file the error is about.
    pub fn file(&self) -> &str {
        match self {
            MapPackError::UnrecognizedFormat { file } => file,
        }
    }
}

impl fmt::Display for MapPackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapPackError::UnrecognizedFormat { file } => write!(
                f,
                "Map info file: {} is not in the correct format/version",
                file
            ),
        }
    }
}

impl std::error::Error for MapPackError {}

//! Error types for the settings document codec

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The text is not well-formed XML
    Xml { position: u64, message: String },
    /// The document element is missing or is not `<TSCreator>`
    MissingRoot(String),
    /// A column id without the `<ColumnType>:<name>` shape
    InvalidColumnId(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Xml { position, message } => {
                write!(f, "Malformed settings XML at byte {}: {}", position, message)
            }
            SettingsError::MissingRoot(found) if found.is_empty() => {
                write!(f, "Settings document has no root element")
            }
            SettingsError::MissingRoot(found) => write!(
                f,
                "Settings document root is <{}>, expected <TSCreator>",
                found
            ),
            SettingsError::InvalidColumnId(raw) => write!(f, "Invalid column id '{}'", raw),
        }
    }
}

impl std::error::Error for SettingsError {}

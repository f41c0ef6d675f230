//! JSON and YAML output through serde

use super::registry::{FormatError, Formatter, RenderParams};
use crate::datapack::columns::ColumnTree;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON of the whole tree"
    }

    fn render(&self, tree: &ColumnTree, _params: &RenderParams) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tree).map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "YAML of the whole tree"
    }

    fn render(&self, tree: &ColumnTree, _params: &RenderParams) -> Result<String, FormatError> {
        serde_yaml::to_string(tree).map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

//! Datapack parsing
//!
//!     Datapacks are tab-delimited text files describing a hierarchy of chart
//!     columns plus the data rows of each leaf column. Parsing happens in two
//!     passes:
//!
//!         1. Scanning: every line of every file is classified and accumulated
//!            into a [DatapackSource](scanner::DatapackSource) (parent map,
//!            meta attributes, data blocks, header values).
//!         2. Building: the parent map's roots are instantiated recursively
//!            under a single root column, with an age-units ruler first when
//!            any file declared its age units.
//!
//!     Parsing is lenient. Malformed lines and rows are skipped with a trace
//!     event and never abort the parse; an input with nothing usable yields a
//!     tree holding only the root.
//!
//! ## Modules
//!
//! - `lines` - line classification and [strip_trailing_noise]
//! - `blocks` - column data blocks and their rows
//! - `scanner` - the accumulation pass
//! - `builder` - tree instantiation

pub mod blocks;
pub mod builder;
pub mod lines;
pub mod scanner;

pub use lines::strip_trailing_noise;

use crate::datapack::columns::ColumnTree;
use crate::datapack::loader::SourceFile;
use serde::{Deserialize, Serialize};

/// Names used when building the tree. Loaded from the `[datapack]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatapackOptions {
    /// Name of the synthetic root column
    pub root_name: String,
    /// Name of the ruler column added when a datapack declares its age units
    pub age_units_column: String,
    /// Marker that cuts off the children list of a hierarchy line
    pub metacolumn_off_token: String,
}

impl Default for DatapackOptions {
    fn default() -> Self {
        Self {
            root_name: "Chart Root".to_string(),
            age_units_column: "MA".to_string(),
            metacolumn_off_token: "_METACOLUMN_OFF".to_string(),
        }
    }
}

/// Parse datapack files into a single column tree with default options.
pub fn parse_datapacks(files: &[SourceFile]) -> ColumnTree {
    parse_datapacks_with(files, &DatapackOptions::default())
}

pub fn parse_datapacks_with(files: &[SourceFile], options: &DatapackOptions) -> ColumnTree {
    let mut source = scanner::DatapackSource::default();
    for file in files {
        tracing::debug!(file = %file.name, bytes = file.contents.len(), "scanning datapack");
        source.scan(&file.text(), &options.metacolumn_off_token);
    }
    let tree = builder::build_tree(&source, options);
    tracing::info!(files = files.len(), columns = tree.len(), "parsed datapacks");
    tree
}

/// Parse a single in-memory datapack.
pub fn parse_datapack_str(text: &str) -> ColumnTree {
    parse_datapacks(&[SourceFile::new("<memory>", text.as_bytes().to_vec())])
}

//! Output formats for column trees
//!
//! - treeviz: one line per column with a glyph for its display type
//! - json / yaml: the serde form of the tree

pub mod registry;
pub mod serde_formats;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter, RenderParams};
pub use serde_formats::{JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params, TreevizFormatter};

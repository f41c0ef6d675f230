//! Column tree definitions and the operations that mutate it
//!
//!     A chart is a tree of named columns. The root ("Chart Root") holds one
//!     column per top-level datapack column, meta columns group other columns,
//!     and leaves carry the stratigraphic data (blocks, events, chrons, ...).
//!
//!     Nodes own their children. Parents are only referenced by name
//!     (`parent_name`) and resolved through the [ColumnIndex], so the ownership
//!     graph stays a plain tree.
//!
//! ## Modules
//!
//! - `node` - [ColumnNode], [DisplayType], [AgeRange] and colours
//! - `type_settings` - per display type settings variants and partial updates
//! - `fonts` - font roles and their options
//! - `sub_entries` - the data rows carried by leaf columns
//! - `tree` - [ColumnTree], [ColumnIndex] and the mutation operations
//! - `error` - [TreeError]

pub mod error;
pub mod fonts;
pub mod node;
pub mod sub_entries;
pub mod tree;
pub mod type_settings;

pub use error::TreeError;
pub use fonts::{FontFace, FontOptions, FontRole, FontSettings};
pub use node::{AgeRange, ColumnNode, DisplayType, Rgb};
pub use sub_entries::SubEntries;
pub use tree::{ColumnIndex, ColumnTree, Direction, NodePath};
pub use type_settings::{TypeSettings, TypeSettingsPatch};

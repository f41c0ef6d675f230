//! Settings documents and the compiler between them and the column tree
//!
//!     A settings document is the XML file the legacy chart renderer reads. It
//!     carries a chart-wide `<settings>` block and one nested `<column>` element
//!     per tree column, each identified by `class datastore.<ColumnType>:<name>`.
//!
//!     Reading goes through two layers: `xml` turns text into plain elements,
//!     `document` gives the elements we care about their own types and keeps
//!     everything else as raw elements. The compiler only ever touches the typed
//!     layer, which is how unknown settings survive a round trip.
//!
//! ## Modules
//!
//! - `xml` - generic element tree, reader and writer
//! - `id` - [ColumnId] and [ColumnType]
//! - `document` - [SettingsDocument] and its parts
//! - `fields` - per-column settings codec shared by both directions
//! - `chart` - [ChartSettings], the `<settings>` block
//! - `apply` - document onto tree ([apply_settings])
//! - `compile` - tree into document ([compile_settings], [compile_settings_into])
//! - `error` - [SettingsError]

pub mod apply;
pub mod chart;
pub mod compile;
pub mod document;
pub mod error;
pub mod fields;
pub mod id;
pub mod xml;

pub use apply::{apply_settings, ApplyReport, CHART_TITLE_PREFIX};
pub use chart::ChartSettings;
pub use compile::{
    compile_settings, compile_settings_into, compile_settings_into_with, compile_settings_with,
    CompileOptions,
};
pub use document::{
    ColumnEntry, ColumnItem, DocumentItem, FontBlock, FontEntry, FontItem, SettingEntry,
    SettingItem, SettingList, SettingValue, SettingsBlock, SettingsDocument,
};
pub use error::SettingsError;
pub use id::{ColumnId, ColumnType};

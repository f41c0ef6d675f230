//! Main module for datapack library functionality

pub mod columns;
pub mod diagnostics;
pub mod formats;
pub mod loader;
pub mod maps;
pub mod parsing;
pub mod settings;
pub mod testing;

pub use columns::{ColumnIndex, ColumnNode, ColumnTree, DisplayType, TreeError};
pub use loader::{DatapackLoader, LoaderError, SourceFile};
pub use maps::{parse_map_packs, MapHierarchy, MapIndex, MapPack, MapPackError};
pub use parsing::{parse_datapacks, DatapackOptions};
pub use settings::{apply_settings, compile_settings, compile_settings_into, SettingsDocument};

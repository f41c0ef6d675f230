//! Source loading utilities
//!
//! This module provides `DatapackLoader` - a utility for resolving datapack and map-pack
//! paths into [`SourceFile`]s that the parsers consume. Both parsers only ever see
//! already-resident text, decryption and upload handling happen before this point.
//!
//! # Example
//!
//! ```rust,ignore
//! use datapack_parser::datapack::loader::DatapackLoader;
//! use datapack_parser::datapack::parsing::parse_datapacks;
//!
//! let sources = DatapackLoader::new()
//!     .with_path("packs/africa.txt")
//!     .with_path("packs/europe.txt")
//!     .load();
//! let tree = parse_datapacks(&sources);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

/// Error that can occur when reading a single source
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading file
    Io { path: PathBuf, message: String },
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io { path, message } => {
                write!(f, "IO error reading {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

/// One decrypted input file.
///
/// `name` is used in error messages and as the fallback map name, so it should be
/// the file name the user recognises rather than a temporary path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, naming it after its file name component.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|err| LoaderError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, contents })
    }

    /// The contents as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

/// Resolves a list of paths into sources, skipping those that cannot be read.
///
/// When nothing resolves the parsers see an empty list.
#[derive(Debug, Default, Clone)]
pub struct DatapackLoader {
    paths: Vec<PathBuf>,
}

impl DatapackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Load every readable path, in request order.
    pub fn load(&self) -> Vec<SourceFile> {
        let (sources, errors) = self.load_with_errors();
        for err in &errors {
            tracing::warn!(%err, "skipping unreadable source");
        }
        sources
    }

    /// Like [`load`](Self::load) but hands the per-path failures back to the caller.
    pub fn load_with_errors(&self) -> (Vec<SourceFile>, Vec<LoaderError>) {
        let mut sources = Vec::with_capacity(self.paths.len());
        let mut errors = Vec::new();
        for path in &self.paths {
            match SourceFile::from_path(path) {
                Ok(source) => sources.push(source),
                Err(err) => errors.push(err),
            }
        }
        (sources, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_stem_strips_extension() {
        assert_eq!(SourceFile::new("world.map.txt", "").stem(), "world.map");
        assert_eq!(SourceFile::new("README", "").stem(), "README");
        assert_eq!(SourceFile::new(".hidden", "").stem(), ".hidden");
    }

    #[test]
    fn test_missing_paths_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Europe\t:\tFrance").unwrap();

        let loader = DatapackLoader::new()
            .with_path("/definitely/not/here.txt")
            .with_path(file.path());
        let (sources, errors) = loader.load_with_errors();

        assert_eq!(sources.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(sources[0].text().starts_with("Europe\t:\tFrance"));
        assert!(errors[0].to_string().contains("here.txt"));
    }

    #[test]
    fn test_nothing_resolves_to_empty_list() {
        let sources = DatapackLoader::new().with_path("/nope/a.txt").load();
        assert!(sources.is_empty());
    }
}

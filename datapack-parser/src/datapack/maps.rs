//! Map packs
//!
//!     A map pack describes one map image: its name and image file, how the image
//!     is framed geographically, the data-column locations plotted on it, and
//!     optionally where it sits inside a parent map. Several map packs merge into
//!     one [MapIndex] (map name to descriptor) and one [MapHierarchy] (parent name
//!     to child names).
//!
//!     Each file is parsed on its own into a [MapFile]. Merging only happens for
//!     files that parsed, so a rejected file never leaves anything behind in the
//!     shared index or hierarchy.
//!
//! ## Modules
//!
//! - `bounds` - [Bounds] and the projection helpers
//! - `parser` - record-level parsing of one file
//! - `error` - [MapPackError]

pub mod bounds;
pub mod error;
pub mod parser;

pub use bounds::{
    Bounds, CoordType, FrameSize, ImagePosition, ImageRegion, RectBounds,
    VerticalPerspectiveBounds,
};
pub use error::MapPackError;
pub use parser::{parse_map_file, MapFile};

use crate::datapack::loader::SourceFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type MapIndex = BTreeMap<String, MapDescriptor>;
pub type MapHierarchy = BTreeMap<String, Vec<String>>;

/// Settings for map-pack parsing. Loaded from the `[map_packs]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPackOptions {
    /// Prefix the image file name is appended to
    pub image_prefix: String,
}

impl Default for MapPackOptions {
    fn default() -> Self {
        Self {
            image_prefix: "/map-images/".to_string(),
        }
    }
}

/// A data-column location plotted on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub default_on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A named line between two points of the same map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transect {
    pub start_location: String,
    pub end_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Where a map sits inside its parent's image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentMap {
    pub name: String,
    pub coord_type: CoordType,
    pub bounds: Bounds,
}

impl ParentMap {
    /// Region this map occupies on the parent image.
    ///
    /// `parent_bounds` are the parent map's own bounds. Only rectangular
    /// placements can be projected.
    pub fn region(&self, parent_bounds: &Bounds, frame: FrameSize) -> Option<ImageRegion> {
        match &self.bounds {
            Bounds::Rectangular(rect) => ImageRegion::within(parent_bounds, rect, frame),
            Bounds::VerticalPerspective(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescriptor {
    pub name: String,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub coord_type: CoordType,
    pub bounds: Bounds,
    #[serde(default)]
    pub points: BTreeMap<String, MapPoint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub info_points: BTreeMap<String, InfoPoint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transects: BTreeMap<String, Transect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentMap>,
}

impl MapDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let bounds = Bounds::default();
        Self {
            name: name.into(),
            image_path: String::new(),
            note: None,
            coord_type: bounds.coord_type(),
            bounds,
            points: BTreeMap::new(),
            info_points: BTreeMap::new(),
            transects: BTreeMap::new(),
            parent: None,
        }
    }

    /// Replace the bounds, keeping `coord_type` in step.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.coord_type = bounds.coord_type();
        self.bounds = bounds;
    }
}

/// Merged result of any number of map-pack files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPack {
    pub map_index: MapIndex,
    pub map_hierarchy: MapHierarchy,
}

impl MapPack {
    /// Add one parsed file. A later map with the same name replaces the earlier
    /// one; hierarchy entries append and never repeat a child.
    pub fn merge(&mut self, file: MapFile) {
        let descriptor = file.descriptor;
        if let Some(parent) = &descriptor.parent {
            let children = self.map_hierarchy.entry(parent.name.clone()).or_default();
            if !children.contains(&descriptor.name) {
                children.push(descriptor.name.clone());
            }
        }
        if self.map_index.contains_key(&descriptor.name) {
            tracing::warn!(map = %descriptor.name, "map defined twice, keeping the later one");
        }
        self.map_index.insert(descriptor.name.clone(), descriptor);
    }

    /// Children of `parent`, in merge order.
    pub fn children_of(&self, parent: &str) -> &[String] {
        self.map_hierarchy
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Maps without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &MapDescriptor> {
        self.map_index.values().filter(|map| map.parent.is_none())
    }
}

/// Parse and merge map packs with default options. The first file that is not a
/// map pack fails the whole batch.
pub fn parse_map_packs(files: &[SourceFile]) -> Result<MapPack, MapPackError> {
    parse_map_packs_with(files, &MapPackOptions::default())
}

pub fn parse_map_packs_with(
    files: &[SourceFile],
    options: &MapPackOptions,
) -> Result<MapPack, MapPackError> {
    let mut pack = MapPack::default();
    for file in files {
        pack.merge(parse_map_file(file, options)?);
    }
    tracing::info!(maps = pack.map_index.len(), "parsed map packs");
    Ok(pack)
}

/// Merge every file that parses; return the rest as errors alongside the pack.
pub fn parse_map_packs_lenient(
    files: &[SourceFile],
    options: &MapPackOptions,
) -> (MapPack, Vec<MapPackError>) {
    let mut pack = MapPack::default();
    let mut errors = Vec::new();
    for file in files {
        match parse_map_file(file, options) {
            Ok(parsed) => pack.merge(parsed),
            Err(err) => {
                tracing::warn!(%err, "skipping map pack");
                errors.push(err);
            }
        }
    }
    (pack, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_file(name: &str, map: &str) -> SourceFile {
        let text = format!(
            "MAP-VERSION\t1.0\n\
             HEADER-MAP INFO\tMAP NAME\tIMAGE\n\
             MAP INFO\t{map}\t{map}.png\n\
             HEADER-PARENT MAP\tPARENT NAME\tCOORDINATE TYPE\tUPPER LEFT LON\tUPPER LEFT LAT\tLOWER RIGHT LON\tLOWER RIGHT LAT\n\
             PARENT MAP\tWorld Map\tRECTANGULAR\t0\t10\t10\t0\n"
        );
        SourceFile::new(name, text)
    }

    #[test]
    fn test_hierarchy_merges_across_files() {
        let files = [child_file("a.txt", "Europe"), child_file("b.txt", "Africa")];
        let pack = parse_map_packs(&files).unwrap();
        assert_eq!(pack.children_of("World Map"), &["Europe", "Africa"]);

        let reversed = [child_file("b.txt", "Africa"), child_file("a.txt", "Europe")];
        let pack = parse_map_packs(&reversed).unwrap();
        let mut children = pack.children_of("World Map").to_vec();
        children.sort();
        assert_eq!(children, vec!["Africa", "Europe"]);
    }

    #[test]
    fn test_bad_file_is_isolated() {
        let files = [
            child_file("a.txt", "Europe"),
            SourceFile::new("notes.txt", "just some text\n"),
            child_file("b.txt", "Africa"),
        ];
        let err = parse_map_packs(&files).unwrap_err();
        assert_eq!(err.file(), "notes.txt");
        assert_eq!(
            err.to_string(),
            "Map info file: notes.txt is not in the correct format/version"
        );

        let (pack, errors) = parse_map_packs_lenient(&files, &MapPackOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(pack.map_index.len(), 2);
        assert!(pack.roots().next().is_none());
    }

    #[test]
    fn test_same_child_listed_once() {
        let files = [child_file("a.txt", "Europe"), child_file("a2.txt", "Europe")];
        let pack = parse_map_packs(&files).unwrap();
        assert_eq!(pack.children_of("World Map"), &["Europe"]);
    }
}

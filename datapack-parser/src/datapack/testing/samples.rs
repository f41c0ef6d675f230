//! Curated sample files, embedded at compile time

use crate::datapack::columns::ColumnTree;
use crate::datapack::loader::SourceFile;
use crate::datapack::maps::{parse_map_file, MapFile, MapPackError, MapPackOptions};
use crate::datapack::parsing::parse_datapack_str;
use crate::datapack::settings::{SettingsDocument, SettingsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Datapack,
    MapPack,
    Settings,
}

impl SampleKind {
    fn extension(&self) -> &'static str {
        match self {
            SampleKind::Datapack | SampleKind::MapPack => "txt",
            SampleKind::Settings => "tsc",
        }
    }
}

const SAMPLES: &[(SampleKind, &str, &str)] = &[
    (
        SampleKind::Datapack,
        "europe",
        include_str!("../../../samples/datapacks/europe.txt"),
    ),
    (
        SampleKind::Datapack,
        "minimal",
        include_str!("../../../samples/datapacks/minimal.txt"),
    ),
    (
        SampleKind::MapPack,
        "world",
        include_str!("../../../samples/maps/world.txt"),
    ),
    (
        SampleKind::MapPack,
        "europe",
        include_str!("../../../samples/maps/europe.txt"),
    ),
    (
        SampleKind::MapPack,
        "antarctica",
        include_str!("../../../samples/maps/antarctica.txt"),
    ),
    (
        SampleKind::MapPack,
        "not_a_map",
        include_str!("../../../samples/maps/not_a_map.txt"),
    ),
    (
        SampleKind::Settings,
        "europe",
        include_str!("../../../samples/settings/europe.tsc"),
    ),
];

/// One sample file.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub kind: SampleKind,
    pub name: &'static str,
    text: &'static str,
}

impl Sample {
    pub fn source(&self) -> &'static str {
        self.text
    }

    /// The sample as a named file, e.g. `europe.txt`.
    pub fn source_file(&self) -> SourceFile {
        SourceFile::new(
            format!("{}.{}", self.name, self.kind.extension()),
            self.text.as_bytes().to_vec(),
        )
    }

    /// Parse a datapack sample on its own.
    pub fn parse(&self) -> ColumnTree {
        assert_eq!(self.kind, SampleKind::Datapack, "{} is not a datapack", self.name);
        parse_datapack_str(self.text)
    }

    pub fn parse_map(&self) -> Result<MapFile, MapPackError> {
        assert_eq!(self.kind, SampleKind::MapPack, "{} is not a map pack", self.name);
        parse_map_file(&self.source_file(), &MapPackOptions::default())
    }

    pub fn parse_settings(&self) -> Result<SettingsDocument, SettingsError> {
        assert_eq!(self.kind, SampleKind::Settings, "{} is not a settings document", self.name);
        SettingsDocument::parse(self.text)
    }
}

/// Entry point for sample lookups. Unknown names panic, listing what exists.
pub struct Samples;

impl Samples {
    pub fn get(kind: SampleKind, name: &str) -> Sample {
        SAMPLES
            .iter()
            .find(|(k, n, _)| *k == kind && *n == name)
            .map(|(kind, name, text)| Sample {
                kind: *kind,
                name: *name,
                text: *text,
            })
            .unwrap_or_else(|| {
                panic!(
                    "no {:?} sample named '{}' (have: {})",
                    kind,
                    name,
                    Self::names(kind).join(", ")
                )
            })
    }

    pub fn names(kind: SampleKind) -> Vec<&'static str> {
        SAMPLES
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, name, _)| *name)
            .collect()
    }

    pub fn datapack(name: &str) -> Sample {
        Self::get(SampleKind::Datapack, name)
    }

    pub fn map_pack(name: &str) -> Sample {
        Self::get(SampleKind::MapPack, name)
    }

    pub fn settings(name: &str) -> Sample {
        Self::get(SampleKind::Settings, name)
    }

    /// Several map packs as source files, in the order given.
    pub fn map_packs(names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|name| Self::map_pack(name).source_file())
            .collect()
    }
}

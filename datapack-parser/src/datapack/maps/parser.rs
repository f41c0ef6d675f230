//! Map-pack file parser
//!
//! A map pack is a sequence of header lines and value lines:
//!
//! ```text
//! MAP-VERSION<TAB>1.0
//! HEADER-MAP INFO<TAB>MAP NAME<TAB>IMAGE<TAB>NOTE
//! MAP INFO<TAB>Europe<TAB>europe.png<TAB>Western Europe
//! HEADER-COORD<TAB>COORDINATE TYPE<TAB>UPPER LEFT LON<TAB>UPPER LEFT LAT<TAB>LOWER RIGHT LON<TAB>LOWER RIGHT LAT
//! COORD<TAB>RECTANGULAR<TAB>-10<TAB>60<TAB>30<TAB>35
//! HEADER-DATACOL<TAB>NAME<TAB>LAT<TAB>LON<TAB>DEFAULT ON/OFF<TAB>MIN AGE<TAB>MAX AGE<TAB>NOTE
//! DATACOL<TAB>Belgium<TAB>50.5<TAB>4.4<TAB>ON<TAB>0<TAB>100<TAB>
//! ```
//!
//! A value line is read against the most recent header line, field by field:
//! the header names each column and the value line supplies it at the same
//! position. A header stays active until a blank line or the next header, so
//! point, info-point and transect sections can list many rows.

use super::bounds::{Bounds, CoordType, RectBounds, VerticalPerspectiveBounds};
use super::error::MapPackError;
use super::{InfoPoint, MapDescriptor, MapPackOptions, MapPoint, ParentMap, Transect};
use crate::datapack::loader::SourceFile;

const LEADING_MARKERS: [&str; 2] = ["MAP-VERSION", "TSCreator Map Pack"];

/// One parsed map-pack file, ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFile {
    pub file: String,
    pub descriptor: MapDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    MapInfo,
    ParentMap,
    Coord,
    DataColumns,
    InfoPoints,
    Transects,
    Unknown,
}

impl Section {
    fn from_header(label: &str) -> Section {
        match label.trim().to_ascii_uppercase().as_str() {
            "HEADER-MAP INFO" => Section::MapInfo,
            "HEADER-PARENT MAP" => Section::ParentMap,
            "HEADER-COORD" => Section::Coord,
            "HEADER-DATACOL" => Section::DataColumns,
            "HEADER-INFORMATION POINTS" => Section::InfoPoints,
            "HEADER-TRANSECTS" => Section::Transects,
            _ => Section::Unknown,
        }
    }
}

/// A value line paired with the header it is read against.
struct Record<'a> {
    header: &'a [&'a str],
    values: &'a [&'a str],
}

impl<'a> Record<'a> {
    fn position(&self, column: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
    }

    fn has(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Non-empty trimmed value of a column.
    fn get(&self, column: &str) -> Option<&'a str> {
        let value = self.values.get(self.position(column)?).copied()?.trim();
        (!value.is_empty()).then_some(value)
    }

    fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    fn number(&self, column: &str) -> Option<f64> {
        self.get(column)?.parse().ok()
    }

    /// Build bounds from whichever bounds columns the header has.
    fn bounds(&self) -> Option<Bounds> {
        if self.has("CENTER LON") || self.has("CENTER LONG") {
            let center_lon = self
                .number("CENTER LON")
                .or_else(|| self.number("CENTER LONG"))?;
            Some(Bounds::VerticalPerspective(VerticalPerspectiveBounds {
                center_lat: self.number("CENTER LAT")?,
                center_lon,
                height: self.number("HEIGHT")?,
                scale: self.number("SCALE")?,
            }))
        } else {
            Some(Bounds::Rectangular(RectBounds {
                upper_left_lon: self.number("UPPER LEFT LON")?,
                upper_left_lat: self.number("UPPER LEFT LAT")?,
                lower_right_lon: self.number("LOWER RIGHT LON")?,
                lower_right_lat: self.number("LOWER RIGHT LAT")?,
            }))
        }
    }

    /// Bounds plus a consistency check against the declared `COORDINATE TYPE`.
    fn checked_bounds(&self, file: &str) -> Option<Bounds> {
        let bounds = self.bounds();
        match (&bounds, self.get("COORDINATE TYPE").and_then(CoordType::parse)) {
            (Some(bounds), Some(declared)) if declared != bounds.coord_type() => {
                tracing::warn!(
                    file,
                    %declared,
                    actual = %bounds.coord_type(),
                    "coordinate type disagrees with the bounds columns"
                );
            }
            (None, _) => tracing::debug!(file, "incomplete bounds record"),
            _ => {}
        }
        bounds
    }
}

fn is_map_pack(first_line: &str) -> bool {
    let marker = first_line.split('\t').next().unwrap_or_default().trim();
    LEADING_MARKERS.iter().any(|m| marker.starts_with(m))
        || Section::from_header(marker) == Section::MapInfo
}

fn image_file_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}

fn is_on(text: Option<&str>) -> bool {
    !matches!(text.map(str::to_ascii_lowercase).as_deref(), Some("off"))
}

/// Parse one map-pack file.
///
/// Fails only when the first non-blank line carries no map-pack marker. Records
/// with missing fields are skipped; a map without a name is named after the
/// file, and one without coordinates covers the whole world.
pub fn parse_map_file(source: &SourceFile, options: &MapPackOptions) -> Result<MapFile, MapPackError> {
    let text = source.text();
    let lines: Vec<&str> = text.lines().collect();

    let leading = lines.iter().find(|line| !line.trim().is_empty());
    if !leading.is_some_and(|line| is_map_pack(line)) {
        return Err(MapPackError::UnrecognizedFormat {
            file: source.name.clone(),
        });
    }

    let mut descriptor = MapDescriptor::new(source.stem());
    let mut header: Option<(Section, Vec<&str>)> = None;

    for (number, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            header = None;
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let label = fields[0].trim();
        if label.to_ascii_uppercase().starts_with("HEADER-") {
            let section = Section::from_header(label);
            if section == Section::Unknown {
                tracing::debug!(file = %source.name, header = label, "ignoring unknown map-pack section");
            }
            header = Some((section, fields));
            continue;
        }
        let Some((section, header_fields)) = &header else {
            tracing::trace!(file = %source.name, line = number + 1, "line outside any section");
            continue;
        };
        let record = Record {
            header: header_fields,
            values: &fields,
        };
        apply_record(*section, &record, &mut descriptor, source, options);
    }

    Ok(MapFile {
        file: source.name.clone(),
        descriptor,
    })
}

fn apply_record(
    section: Section,
    record: &Record<'_>,
    descriptor: &mut MapDescriptor,
    source: &SourceFile,
    options: &MapPackOptions,
) {
    let file = source.name.as_str();
    match section {
        Section::MapInfo => {
            if let Some(name) = record.text("MAP NAME") {
                descriptor.name = name;
            }
            if let Some(image) = record.get("IMAGE") {
                descriptor.image_path = format!("{}{}", options.image_prefix, image_file_name(image));
            }
            descriptor.note = record.text("NOTE");
        }
        Section::ParentMap => {
            let Some(name) = record.text("PARENT NAME") else {
                tracing::debug!(file, "parent map record without a name");
                return;
            };
            if let Some(bounds) = record.checked_bounds(file) {
                descriptor.parent = Some(ParentMap {
                    name,
                    coord_type: bounds.coord_type(),
                    bounds,
                });
            }
        }
        Section::Coord => {
            if let Some(bounds) = record.checked_bounds(file) {
                descriptor.set_bounds(bounds);
            }
        }
        Section::DataColumns => {
            let point = record.text("NAME").zip(record.number("LAT").zip(record.number("LON")));
            match point {
                Some((name, (lat, lon))) => {
                    descriptor.points.insert(
                        name,
                        MapPoint {
                            lat,
                            lon,
                            default_on: is_on(record.get("DEFAULT ON/OFF")),
                            min_age: record.number("MIN AGE"),
                            max_age: record.number("MAX AGE"),
                            note: record.text("NOTE"),
                        },
                    );
                }
                None => tracing::debug!(file, "incomplete data column record"),
            }
        }
        Section::InfoPoints => {
            let point = record.text("NAME").zip(record.number("LAT").zip(record.number("LON")));
            match point {
                Some((name, (lat, lon))) => {
                    descriptor.info_points.insert(
                        name,
                        InfoPoint {
                            lat,
                            lon,
                            note: record.text("NOTE"),
                        },
                    );
                }
                None => tracing::debug!(file, "incomplete information point record"),
            }
        }
        Section::Transects => {
            let ends = record
                .text("START LOCATION")
                .zip(record.text("END LOCATION"));
            match record.text("NAME").zip(ends) {
                Some((name, (start_location, end_location))) => {
                    descriptor.transects.insert(
                        name,
                        Transect {
                            start_location,
                            end_location,
                            note: record.text("NOTE"),
                        },
                    );
                }
                None => tracing::debug!(file, "incomplete transect record"),
            }
        }
        Section::Unknown => {}
    }
}

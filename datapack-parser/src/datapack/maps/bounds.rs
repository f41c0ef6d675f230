//! Map bounds and projection
//!
//! A map image is framed either by a lat/lon rectangle or by a vertical
//! perspective (satellite view) centred on a point. Which one a map uses is
//! decided once, when its `HEADER-COORD` record is read, by the presence of a
//! `CENTER LON` column. After that it is an ordinary enum.
//!
//! Serialized, the two shapes are told apart only by their field names, the same
//! way the map-pack files distinguish them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used by the perspective projection.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordType {
    #[serde(rename = "RECTANGULAR")]
    Rectangular,
    #[serde(rename = "VERTICAL_PERSPECTIVE")]
    VerticalPerspective,
}

impl CoordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordType::Rectangular => "RECTANGULAR",
            CoordType::VerticalPerspective => "VERTICAL_PERSPECTIVE",
        }
    }

    /// Accepts both the underscore and the space spelling.
    pub fn parse(text: &str) -> Option<CoordType> {
        match text.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "RECTANGULAR" => Some(CoordType::Rectangular),
            "VERTICAL_PERSPECTIVE" => Some(CoordType::VerticalPerspective),
            _ => None,
        }
    }
}

impl fmt::Display for CoordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectBounds {
    pub upper_left_lon: f64,
    pub upper_left_lat: f64,
    pub lower_right_lon: f64,
    pub lower_right_lat: f64,
}

impl RectBounds {
    pub const WORLD: RectBounds = RectBounds {
        upper_left_lon: -180.0,
        upper_left_lat: 90.0,
        lower_right_lon: 180.0,
        lower_right_lat: -90.0,
    };

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let (west, east) = ordered(self.upper_left_lon, self.lower_right_lon);
        let (south, north) = ordered(self.lower_right_lat, self.upper_left_lat);
        (west..=east).contains(&lon) && (south..=north).contains(&lat)
    }

    /// Linear position of a point inside the rectangle, in percent of the image.
    /// Points outside the rectangle and degenerate rectangles yield `None`.
    pub fn project(&self, lat: f64, lon: f64) -> Option<ImagePosition> {
        let width = self.lower_right_lon - self.upper_left_lon;
        let height = self.upper_left_lat - self.lower_right_lat;
        if width == 0.0 || height == 0.0 || !self.contains(lat, lon) {
            return None;
        }
        Some(ImagePosition {
            x_percent: (lon - self.upper_left_lon) / width * 100.0,
            y_percent: (self.upper_left_lat - lat) / height * 100.0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalPerspectiveBounds {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Height of the viewpoint above the surface, in kilometres
    pub height: f64,
    /// Kilometres per image pixel at the centre
    pub scale: f64,
}

impl VerticalPerspectiveBounds {
    /// Project a point with the vertical perspective formulas (Snyder, p. 170).
    ///
    /// The image centre is the projection centre. Points on the far side of the
    /// horizon, or a non-positive scale or height, yield `None`.
    pub fn project(&self, lat: f64, lon: f64, frame: FrameSize) -> Option<ImagePosition> {
        if self.scale <= 0.0 || self.height <= 0.0 || frame.is_empty() {
            return None;
        }
        let p = 1.0 + self.height / EARTH_RADIUS_KM;
        let (phi1, phi) = (self.center_lat.to_radians(), lat.to_radians());
        let dlambda = (lon - self.center_lon).to_radians();

        let cos_c = phi1.sin() * phi.sin() + phi1.cos() * phi.cos() * dlambda.cos();
        if cos_c < 1.0 / p {
            return None;
        }
        let k = (p - 1.0) / (p - cos_c);
        let x = EARTH_RADIUS_KM * k * phi.cos() * dlambda.sin();
        let y = EARTH_RADIUS_KM * k * (phi1.cos() * phi.sin() - phi1.sin() * phi.cos() * dlambda.cos());

        let (px, py) = (x / self.scale, y / self.scale);
        Some(ImagePosition {
            x_percent: (frame.width / 2.0 + px) / frame.width * 100.0,
            y_percent: (frame.height / 2.0 - py) / frame.height * 100.0,
        })
    }
}

/// Geographic framing of a map image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bounds {
    Rectangular(RectBounds),
    VerticalPerspective(VerticalPerspectiveBounds),
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::Rectangular(RectBounds::WORLD)
    }
}

impl Bounds {
    pub fn is_rectangular(&self) -> bool {
        matches!(self, Bounds::Rectangular(_))
    }

    pub fn is_vertical_perspective(&self) -> bool {
        matches!(self, Bounds::VerticalPerspective(_))
    }

    pub fn coord_type(&self) -> CoordType {
        match self {
            Bounds::Rectangular(_) => CoordType::Rectangular,
            Bounds::VerticalPerspective(_) => CoordType::VerticalPerspective,
        }
    }

    /// Where a lat/lon point lands on the image, or `None` when it is not visible.
    /// `frame` is only needed by the perspective projection.
    pub fn project(&self, lat: f64, lon: f64, frame: FrameSize) -> Option<ImagePosition> {
        match self {
            Bounds::Rectangular(rect) => rect.project(lat, lon),
            Bounds::VerticalPerspective(vp) => vp.project(lat, lon, frame),
        }
    }
}

/// Pixel size of a rendered map image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Position on an image, in percent from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// Rectangle a child map occupies on its parent's image, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ImageRegion {
    /// Project the corners of `child` (a rectangle in lat/lon) through the
    /// parent's bounds. Both corners must be visible.
    pub fn within(parent: &Bounds, child: &RectBounds, frame: FrameSize) -> Option<ImageRegion> {
        let upper_left = parent.project(child.upper_left_lat, child.upper_left_lon, frame)?;
        let lower_right = parent.project(child.lower_right_lat, child.lower_right_lon, frame)?;
        Some(ImageRegion {
            left: upper_left.x_percent,
            top: upper_left.y_percent,
            right: lower_right.x_percent,
            bottom: lower_right.y_percent,
        })
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize {
        width: 800.0,
        height: 600.0,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rectangular_interpolation() {
        let world = RectBounds::WORLD;
        let centre = world.project(0.0, 0.0).unwrap();
        assert!(close(centre.x_percent, 50.0) && close(centre.y_percent, 50.0));

        let corner = world.project(90.0, -180.0).unwrap();
        assert!(close(corner.x_percent, 0.0) && close(corner.y_percent, 0.0));

        let europe = RectBounds {
            upper_left_lon: -10.0,
            upper_left_lat: 60.0,
            lower_right_lon: 30.0,
            lower_right_lat: 35.0,
        };
        assert!(europe.project(0.0, 0.0).is_none());
        assert!(europe.contains(50.0, 4.0));
    }

    #[test]
    fn test_perspective_centre_and_horizon() {
        let vp = VerticalPerspectiveBounds {
            center_lat: 45.0,
            center_lon: 10.0,
            height: 35786.0,
            scale: 20.0,
        };
        let centre = vp.project(45.0, 10.0, FRAME).unwrap();
        assert!(close(centre.x_percent, 50.0) && close(centre.y_percent, 50.0));

        // antipode is never visible
        assert!(vp.project(-45.0, -170.0, FRAME).is_none());

        // north of the centre is above it on the image, east is to the right
        let north = vp.project(50.0, 10.0, FRAME).unwrap();
        assert!(north.y_percent < 50.0);
        let east = vp.project(45.0, 15.0, FRAME).unwrap();
        assert!(east.x_percent > 50.0);
    }

    #[test]
    fn test_bounds_predicates_are_exclusive() {
        let rect = Bounds::default();
        assert!(rect.is_rectangular() && !rect.is_vertical_perspective());
        let vp = Bounds::VerticalPerspective(VerticalPerspectiveBounds {
            center_lat: 1.0,
            center_lon: 2.0,
            height: 3.0,
            scale: 4.0,
        });
        assert!(vp.is_vertical_perspective() && !vp.is_rectangular());
        assert_eq!(vp.coord_type(), CoordType::VerticalPerspective);
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_value(Bounds::default()).unwrap();
        assert_eq!(json["upperLeftLon"], -180.0);
        assert!(json.get("centerLat").is_none());

        let parsed: Bounds =
            serde_json::from_str(r#"{"centerLat":1,"centerLon":2,"height":3,"scale":4}"#).unwrap();
        assert!(parsed.is_vertical_perspective());
    }

    #[test]
    fn test_region_inside_world() {
        let child = RectBounds {
            upper_left_lon: 0.0,
            upper_left_lat: 45.0,
            lower_right_lon: 90.0,
            lower_right_lat: 0.0,
        };
        let region = ImageRegion::within(&Bounds::default(), &child, FRAME).unwrap();
        assert!(close(region.left, 50.0));
        assert!(close(region.top, 25.0));
        assert!(close(region.width(), 25.0));
        assert!(close(region.height(), 25.0));
    }

    #[test]
    fn test_coord_type_spellings() {
        assert_eq!(CoordType::parse("VERTICAL PERSPECTIVE"), Some(CoordType::VerticalPerspective));
        assert_eq!(CoordType::parse("rectangular"), Some(CoordType::Rectangular));
        assert_eq!(CoordType::parse("mercator"), None);
    }
}

//! Per display type settings
//!
//! Each [DisplayType] owns at most one settings shape. The variant is chosen when
//! the node is built and cannot be swapped afterwards; partial updates go through
//! [TypeSettingsPatch], which names the display type it was written for and is
//! rejected when that does not match the node.

use super::node::{DisplayType, Rgb};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeSettings {
    Event(EventSettings),
    Range(RangeSettings),
    Chron(ChronSettings),
    Point(PointSettings),
    Sequence(SequenceSettings),
    Ruler(RulerSettings),
    Zone(ZoneSettings),
    Meta(MetaSettings),
    None,
}

impl TypeSettings {
    pub fn for_display_type(display_type: DisplayType) -> TypeSettings {
        match display_type {
            DisplayType::Event => TypeSettings::Event(EventSettings::default()),
            DisplayType::Range => TypeSettings::Range(RangeSettings::default()),
            DisplayType::Chron => TypeSettings::Chron(ChronSettings::default()),
            DisplayType::Point => TypeSettings::Point(PointSettings::default()),
            DisplayType::Sequence => TypeSettings::Sequence(SequenceSettings::default()),
            DisplayType::Ruler => TypeSettings::Ruler(RulerSettings::default()),
            DisplayType::Zone => TypeSettings::Zone(ZoneSettings::default()),
            DisplayType::Meta => TypeSettings::Meta(MetaSettings::default()),
            DisplayType::Block
            | DisplayType::Facies
            | DisplayType::Freehand
            | DisplayType::Transect
            | DisplayType::Root
            | DisplayType::Blank => TypeSettings::None,
        }
    }

    /// Whether this variant is the legal one for `display_type`.
    pub fn matches(&self, display_type: DisplayType) -> bool {
        std::mem::discriminant(self)
            == std::mem::discriminant(&TypeSettings::for_display_type(display_type))
    }

    pub fn as_event(&self) -> Option<&EventSettings> {
        match self {
            TypeSettings::Event(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&PointSettings> {
        match self {
            TypeSettings::Point(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&RangeSettings> {
        match self {
            TypeSettings::Range(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceSettings> {
        match self {
            TypeSettings::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Shallow-merge `fields` into the inner settings struct.
    ///
    /// Keys are the struct's field names. Unknown keys and values of the wrong
    /// shape fail the whole merge, leaving `self` unchanged.
    pub(crate) fn merge_fields(&mut self, fields: &Map<String, Value>) -> Result<(), String> {
        fn merge<T>(current: &T, fields: &Map<String, Value>) -> Result<T, String>
        where
            T: Serialize + for<'de> Deserialize<'de>,
        {
            let mut value = serde_json::to_value(current).map_err(|e| e.to_string())?;
            let object = value
                .as_object_mut()
                .ok_or_else(|| "settings are not an object".to_string())?;
            for (key, field) in fields {
                if !object.contains_key(key) {
                    return Err(format!("unknown field '{key}'"));
                }
                object.insert(key.clone(), field.clone());
            }
            serde_json::from_value(value).map_err(|e| e.to_string())
        }

        match self {
            TypeSettings::Event(s) => *s = merge(s, fields)?,
            TypeSettings::Range(s) => *s = merge(s, fields)?,
            TypeSettings::Chron(s) => *s = merge(s, fields)?,
            TypeSettings::Point(s) => *s = merge(s, fields)?,
            TypeSettings::Sequence(s) => *s = merge(s, fields)?,
            TypeSettings::Ruler(s) => *s = merge(s, fields)?,
            TypeSettings::Zone(s) => *s = merge(s, fields)?,
            TypeSettings::Meta(s) => *s = merge(s, fields)?,
            TypeSettings::None if fields.is_empty() => {}
            TypeSettings::None => return Err("column type has no settings".to_string()),
        }
        Ok(())
    }
}

/// A partial settings update aimed at one display type.
///
/// ```rust,ignore
/// let patch = TypeSettingsPatch::new(DisplayType::Point)
///     .set("draw_fill", false)
///     .set("lower_range", 2.5);
/// tree.update_type_settings("Sea Level", patch)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSettingsPatch {
    pub target: DisplayType,
    pub fields: Map<String, Value>,
}

impl TypeSettingsPatch {
    pub fn new(target: DisplayType) -> Self {
        Self {
            target,
            fields: Map::new(),
        }
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    Events,
    Ranges,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Events => "events",
            EventType::Ranges => "ranges",
        }
    }

    pub fn parse(text: &str) -> Option<EventType> {
        match text.trim().to_ascii_lowercase().as_str() {
            "events" => Some(EventType::Events),
            "ranges" => Some(EventType::Ranges),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFrequency {
    Fad,
    Lad,
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSettings {
    pub event_type: EventType,
    /// Data-mining frequency plot, when enabled.
    pub frequency: Option<EventFrequency>,
    pub window_size: f64,
    pub step_size: f64,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            event_type: EventType::Events,
            frequency: None,
            window_size: 2.0,
            step_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeSort {
    #[default]
    FirstOccurrence,
    LastOccurrence,
    Alphabetical,
}

impl RangeSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSort::FirstOccurrence => "first occurrence",
            RangeSort::LastOccurrence => "last occurrence",
            RangeSort::Alphabetical => "alphabetical",
        }
    }

    pub fn parse(text: &str) -> Option<RangeSort> {
        match text.trim().to_ascii_lowercase().as_str() {
            "first occurrence" => Some(RangeSort::FirstOccurrence),
            "last occurrence" => Some(RangeSort::LastOccurrence),
            "alphabetical" => Some(RangeSort::Alphabetical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSettings {
    pub range_sort: RangeSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronSettings {
    /// Plot polarity-reversal frequency instead of the chron itself.
    pub data_mining: bool,
    pub window_size: f64,
    pub step_size: f64,
}

impl Default for ChronSettings {
    fn default() -> Self {
        Self {
            data_mining: false,
            window_size: 2.0,
            step_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointShape {
    #[default]
    Rect,
    Circle,
    Cross,
    Nothing,
}

impl PointShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointShape::Rect => "rect",
            PointShape::Circle => "circle",
            PointShape::Cross => "cross",
            PointShape::Nothing => "nothing",
        }
    }

    pub fn parse(text: &str) -> Option<PointShape> {
        match text.trim().to_ascii_lowercase().as_str() {
            "rect" => Some(PointShape::Rect),
            "circle" => Some(PointShape::Circle),
            "cross" => Some(PointShape::Cross),
            "nothing" => Some(PointShape::Nothing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSettings {
    pub draw_line: bool,
    pub draw_fill: bool,
    pub fill_color: Rgb,
    pub draw_background_gradient: bool,
    pub background_gradient_start: Rgb,
    pub background_gradient_end: Rgb,
    pub draw_curve_gradient: bool,
    pub curve_gradient_start: Rgb,
    pub curve_gradient_end: Rgb,
    pub lower_range: f64,
    pub upper_range: f64,
    pub smoothed: bool,
    pub point_shape: PointShape,
    pub draw_scale: bool,
    pub scale_start: f64,
    pub scale_step: f64,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            draw_line: true,
            draw_fill: true,
            fill_color: Rgb::new(64, 233, 191),
            draw_background_gradient: false,
            background_gradient_start: Rgb::WHITE,
            background_gradient_end: Rgb::WHITE,
            draw_curve_gradient: false,
            curve_gradient_start: Rgb::WHITE,
            curve_gradient_end: Rgb::WHITE,
            lower_range: 0.0,
            upper_range: 0.0,
            smoothed: true,
            point_shape: PointShape::Rect,
            draw_scale: true,
            scale_start: 0.0,
            scale_step: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequenceType {
    #[default]
    Sequence,
    Trend,
}

impl SequenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceType::Sequence => "sequence",
            SequenceType::Trend => "trend",
        }
    }

    pub fn parse(text: &str) -> Option<SequenceType> {
        match text.trim().to_ascii_lowercase().as_str() {
            "sequence" => Some(SequenceType::Sequence),
            "trend" => Some(SequenceType::Trend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SequenceSettings {
    pub sequence_type: SequenceType,
    pub label_marked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justification {
    #[default]
    Left,
    Right,
}

impl Justification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justification::Left => "left",
            Justification::Right => "right",
        }
    }

    pub fn parse(text: &str) -> Option<Justification> {
        match text.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Justification::Left),
            "right" => Some(Justification::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RulerSettings {
    pub justification: Justification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Normal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Normal => "normal",
            Orientation::Vertical => "vertical",
        }
    }

    pub fn parse(text: &str) -> Option<Orientation> {
        match text.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Orientation::Normal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneSettings {
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaSettings {
    /// Set on the composite built from a facies block.
    pub block_series: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_per_display_type() {
        for display_type in DisplayType::ALL {
            assert!(TypeSettings::for_display_type(display_type).matches(display_type));
        }
        assert!(!TypeSettings::Point(PointSettings::default()).matches(DisplayType::Event));
        assert!(TypeSettings::None.matches(DisplayType::Block));
    }

    #[test]
    fn test_merge_fields_is_shallow() {
        let mut settings = TypeSettings::Point(PointSettings::default());
        let patch = TypeSettingsPatch::new(DisplayType::Point)
            .set("draw_fill", false)
            .set("lower_range", 2.5);
        settings.merge_fields(&patch.fields).unwrap();

        let point = settings.as_point().unwrap();
        assert!(!point.draw_fill);
        assert_eq!(point.lower_range, 2.5);
        assert!(point.draw_line);
    }

    #[test]
    fn test_merge_rejects_unknown_or_ill_typed_fields() {
        let mut settings = TypeSettings::Event(EventSettings::default());
        let before = settings.clone();

        let unknown = TypeSettingsPatch::new(DisplayType::Event).set("draw_fill", true);
        assert!(settings.merge_fields(&unknown.fields).is_err());

        let ill_typed = TypeSettingsPatch::new(DisplayType::Event).set("window_size", "wide");
        assert!(settings.merge_fields(&ill_typed.fields).is_err());

        assert_eq!(settings, before);
    }

    #[test]
    fn test_keyword_round_trips() {
        assert_eq!(EventType::parse("Ranges"), Some(EventType::Ranges));
        assert_eq!(RangeSort::parse(RangeSort::Alphabetical.as_str()), Some(RangeSort::Alphabetical));
        assert_eq!(PointShape::parse("circle"), Some(PointShape::Circle));
        assert_eq!(Justification::parse("sideways"), None);
    }
}

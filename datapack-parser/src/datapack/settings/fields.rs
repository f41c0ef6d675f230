//! Column fields stored as `<setting>` entries
//!
//! Reading and writing share one table per settings shape, so a field the
//! reader understands is always one the writer emits under the same name.
//! Values that do not parse are left at whatever the node already had.

use super::document::{ColumnEntry, FontBlock, FontEntry, FontItem, SettingList, SettingValue};
use crate::datapack::columns::{ColumnNode, FontRole, Rgb, TypeSettings};
use crate::datapack::columns::type_settings::{
    EventType, Justification, Orientation, PointShape, RangeSort, SequenceType,
};

/// Number formatting used for every numeric setting (`100.0`, `0.2`).
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Copies settings from a document entry onto typed fields.
pub struct FieldReader<'a, L: SettingList> {
    list: &'a L,
}

impl<'a, L: SettingList> FieldReader<'a, L> {
    pub fn new(list: &'a L) -> Self {
        Self { list }
    }

    fn text(&self, name: &str) -> Option<&'a str> {
        self.list.setting_text(name)
    }

    pub fn string(&self, name: &str, target: &mut String) {
        if let Some(text) = self.text(name) {
            *target = text.to_string();
        }
    }

    pub fn bool(&self, name: &str, target: &mut bool) {
        if let Some(value) = self.text(name).and_then(parse_bool) {
            *target = value;
        }
    }

    pub fn number(&self, name: &str, target: &mut f64) {
        if let Some(value) = self.text(name).and_then(|t| t.trim().parse::<f64>().ok()) {
            *target = value;
        }
    }

    pub fn color(&self, name: &str, target: &mut Rgb) {
        if let Some(value) = self.text(name).and_then(Rgb::parse_css) {
            *target = value;
        }
    }

    pub fn keyword<T>(&self, name: &str, target: &mut T, parse: fn(&str) -> Option<T>) {
        if let Some(value) = self.text(name).and_then(parse) {
            *target = value;
        }
    }
}

/// Writes typed fields into a document entry, replacing existing values in place.
pub struct FieldWriter<'a, L: SettingList> {
    list: &'a mut L,
}

impl<'a, L: SettingList> FieldWriter<'a, L> {
    pub fn new(list: &'a mut L) -> Self {
        Self { list }
    }

    pub fn string(&mut self, name: &str, value: &str) {
        self.list.set_setting(name, value);
    }

    pub fn bool(&mut self, name: &str, value: bool) {
        self.list.set_setting(name, value.to_string());
    }

    pub fn number(&mut self, name: &str, value: f64) {
        self.list.set_setting(name, format_number(value));
    }

    pub fn color(&mut self, name: &str, value: Rgb) {
        self.list.set_setting(name, value.to_string());
    }

    /// Like [color](Self::color), but an empty entry stays empty while the
    /// value is still `unset`, the colour a reader leaves in place for it.
    pub fn color_unless_unset(&mut self, name: &str, value: Rgb, unset: Rgb) {
        let empty = self
            .list
            .setting(name)
            .is_some_and(|entry| entry.value == SettingValue::Empty);
        if !(empty && value == unset) {
            self.color(name, value);
        }
    }
}

pub(crate) fn read_common(entry: &ColumnEntry, node: &mut ColumnNode) {
    let fields = FieldReader::new(entry);
    fields.string("title", &mut node.edit_name);
    fields.bool("isSelected", &mut node.on);
    fields.bool("drawTitle", &mut node.enable_title);
    fields.bool("drawAgeLabel", &mut node.show_age_labels);
    fields.bool("drawUncertaintyLabel", &mut node.show_uncertainty_labels);
    fields.number("width", &mut node.width);
    fields.color("backgroundColor", &mut node.rgb);
}

pub(crate) fn write_common(node: &ColumnNode, width: f64, entry: &mut ColumnEntry) {
    let mut fields = FieldWriter::new(entry);
    fields.string("title", &node.edit_name);
    fields.bool("isSelected", node.on);
    fields.bool("drawTitle", node.enable_title);
    fields.bool("drawAgeLabel", node.show_age_labels);
    fields.bool("drawUncertaintyLabel", node.show_uncertainty_labels);
    fields.number("width", width);
    fields.color_unless_unset("backgroundColor", node.rgb, Rgb::WHITE);
}

pub(crate) fn read_type_fields(entry: &ColumnEntry, settings: &mut TypeSettings) {
    let fields = FieldReader::new(entry);
    match settings {
        TypeSettings::Event(s) => fields.keyword("type", &mut s.event_type, EventType::parse),
        TypeSettings::Range(s) => fields.keyword("rangeSort", &mut s.range_sort, RangeSort::parse),
        TypeSettings::Point(s) => {
            fields.bool("drawLine", &mut s.draw_line);
            fields.bool("drawFill", &mut s.draw_fill);
            fields.color("fillColor", &mut s.fill_color);
            fields.bool("drawBgrndGradient", &mut s.draw_background_gradient);
            fields.color("backGradStart", &mut s.background_gradient_start);
            fields.color("backGradEnd", &mut s.background_gradient_end);
            fields.bool("drawCurveGradient", &mut s.draw_curve_gradient);
            fields.color("curveGradStart", &mut s.curve_gradient_start);
            fields.color("curveGradEnd", &mut s.curve_gradient_end);
            fields.number("minWindow", &mut s.lower_range);
            fields.number("maxWindow", &mut s.upper_range);
            fields.bool("smoothed", &mut s.smoothed);
            fields.keyword("pointType", &mut s.point_shape, PointShape::parse);
            fields.bool("drawScale", &mut s.draw_scale);
            fields.number("scaleStart", &mut s.scale_start);
            fields.number("scaleStep", &mut s.scale_step);
        }
        TypeSettings::Sequence(s) => {
            fields.keyword("type", &mut s.sequence_type, SequenceType::parse);
            fields.bool("labelMarked", &mut s.label_marked);
        }
        TypeSettings::Ruler(s) => {
            fields.keyword("justification", &mut s.justification, Justification::parse)
        }
        TypeSettings::Zone(s) => fields.keyword("orientation", &mut s.orientation, Orientation::parse),
        TypeSettings::Chron(_) | TypeSettings::Meta(_) | TypeSettings::None => {}
    }
}

pub(crate) fn write_type_fields(settings: &TypeSettings, entry: &mut ColumnEntry) {
    let mut fields = FieldWriter::new(entry);
    match settings {
        TypeSettings::Event(s) => fields.string("type", s.event_type.as_str()),
        TypeSettings::Range(s) => fields.string("rangeSort", s.range_sort.as_str()),
        TypeSettings::Point(s) => {
            fields.bool("drawLine", s.draw_line);
            fields.bool("drawFill", s.draw_fill);
            fields.color("fillColor", s.fill_color);
            fields.bool("drawBgrndGradient", s.draw_background_gradient);
            fields.color("backGradStart", s.background_gradient_start);
            fields.color("backGradEnd", s.background_gradient_end);
            fields.bool("drawCurveGradient", s.draw_curve_gradient);
            fields.color("curveGradStart", s.curve_gradient_start);
            fields.color("curveGradEnd", s.curve_gradient_end);
            fields.number("minWindow", s.lower_range);
            fields.number("maxWindow", s.upper_range);
            fields.bool("smoothed", s.smoothed);
            fields.string("pointType", s.point_shape.as_str());
            fields.bool("drawScale", s.draw_scale);
            fields.number("scaleStart", s.scale_start);
            fields.number("scaleStep", s.scale_step);
        }
        TypeSettings::Sequence(s) => {
            fields.string("type", s.sequence_type.as_str());
            fields.bool("labelMarked", s.label_marked);
        }
        TypeSettings::Ruler(s) => fields.string("justification", s.justification.as_str()),
        TypeSettings::Zone(s) => fields.string("orientation", s.orientation.as_str()),
        TypeSettings::Chron(_) | TypeSettings::Meta(_) | TypeSettings::None => {}
    }
}

/// Turn on every font role the block carries and copy its style.
pub(crate) fn read_fonts(fonts: &FontBlock, node: &mut ColumnNode) {
    for font in fonts.fonts() {
        let Some(role) = FontRole::parse(&font.function) else {
            tracing::debug!(function = %font.function, column = %node.name, "unknown font role");
            continue;
        };
        let options = node.font_settings.get_mut(role);
        options.on = true;
        options.inheritable = font.inheritable;
        options.apply_style(&font.style);
    }
}

/// Bring the block in line with the node's enabled font roles.
///
/// Entries for roles that are off are removed; entries with an unknown
/// `function` are kept as they are.
pub(crate) fn write_fonts(node: &ColumnNode, fonts: &mut FontBlock) {
    fonts.items.retain(|item| match item {
        FontItem::Font(font) => match FontRole::parse(&font.function) {
            Some(role) => node.font_settings.get(role).is_some_and(|options| options.on),
            None => true,
        },
        FontItem::Other(_) => true,
    });
    for (role, options) in node.font_settings.enabled() {
        match fonts.font_mut(role.as_str()) {
            Some(font) => {
                font.inheritable = options.inheritable;
                font.style = options.update_style(role, &font.style);
            }
            None => fonts.items.push(FontItem::Font(FontEntry {
                function: role.as_str().to_string(),
                inheritable: options.inheritable,
                attributes: Vec::new(),
                style: options.to_style(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::columns::DisplayType;
    use crate::datapack::settings::document::{ColumnItem, SettingEntry};
    use crate::datapack::settings::id::{ColumnId, ColumnType};

    fn entry_with(settings: &[(&str, &str)]) -> ColumnEntry {
        let mut entry = ColumnEntry::new(ColumnId::new(ColumnType::PointColumn, "Sea Level"));
        for (name, value) in settings {
            entry.items.push(ColumnItem::Setting(SettingEntry::text(*name, *value)));
        }
        entry
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(100.0), "100.0");
        assert_eq!(format_number(0.2), "0.2");
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_point_fields_round_trip() {
        let entry = entry_with(&[
            ("drawFill", "false"),
            ("fillColor", "rgb(1,2,3)"),
            ("minWindow", "2.5"),
            ("pointType", "circle"),
            ("scaleStep", "not a number"),
        ]);
        let mut settings = TypeSettings::for_display_type(DisplayType::Point);
        read_type_fields(&entry, &mut settings);

        let point = settings.as_point().unwrap();
        assert!(!point.draw_fill);
        assert_eq!(point.fill_color, Rgb::new(1, 2, 3));
        assert_eq!(point.lower_range, 2.5);
        assert_eq!(point.point_shape, PointShape::Circle);
        assert_eq!(point.scale_step, 0.0);

        let mut written = ColumnEntry::new(entry.id.clone());
        write_type_fields(&settings, &mut written);
        let mut reread = TypeSettings::for_display_type(DisplayType::Point);
        read_type_fields(&written, &mut reread);
        assert_eq!(reread, settings);
        assert_eq!(written.setting_text("minWindow"), Some("2.5"));
    }

    #[test]
    fn test_common_fields() {
        let entry = entry_with(&[
            ("title", "Sea level curve"),
            ("isSelected", "false"),
            ("width", "80"),
            ("backgroundColor", "rgb(200,100,50)"),
        ]);
        let mut node = ColumnNode::new("Sea Level", DisplayType::Point);
        read_common(&entry, &mut node);
        assert_eq!(node.edit_name, "Sea level curve");
        assert_eq!(node.name, "Sea Level");
        assert!(!node.on);
        assert_eq!(node.width, 80.0);
        assert_eq!(node.rgb, Rgb::new(200, 100, 50));
    }

    #[test]
    fn test_empty_background_stays_empty() {
        let mut entry = ColumnEntry::new(ColumnId::new(ColumnType::MetaColumn, "Europe"));
        entry.items.push(ColumnItem::Setting(SettingEntry::empty("backgroundColor")));
        let mut node = ColumnNode::new("Europe", DisplayType::Meta);
        read_common(&entry, &mut node);

        write_common(&node, node.width, &mut entry);
        assert_eq!(entry.setting("backgroundColor").unwrap().value, SettingValue::Empty);

        node.rgb = Rgb::new(1, 2, 3);
        write_common(&node, node.width, &mut entry);
        assert_eq!(entry.setting_text("backgroundColor"), Some("rgb(1,2,3)"));
    }

    #[test]
    fn test_fonts_sync() {
        let mut node = ColumnNode::new("Forams", DisplayType::Event);
        let mut fonts = FontBlock::default();
        fonts.items.push(FontItem::Font(FontEntry {
            function: "Age Label".into(),
            inheritable: false,
            attributes: Vec::new(),
            style: "font-size: 9;".into(),
        }));
        fonts.items.push(FontItem::Font(FontEntry {
            function: "Legacy Role".into(),
            inheritable: true,
            attributes: Vec::new(),
            style: String::new(),
        }));

        read_fonts(&fonts, &mut node);
        assert_eq!(node.font_settings.get(FontRole::AgeLabel).unwrap().size, 9);

        node.font_settings.get_mut(FontRole::AgeLabel).on = false;
        node.font_settings.get_mut(FontRole::ColumnHeader).on = true;
        write_fonts(&node, &mut fonts);

        let functions: Vec<_> = fonts.fonts().map(|f| f.function.as_str()).collect();
        assert_eq!(functions, vec!["Legacy Role", "Column Header"]);
    }
}

//! Chart-wide settings from the `<settings>` block

use super::document::{SettingEntry, SettingList, SettingValue, SettingsBlock, SettingsDocument};
use super::fields::{format_number, FieldReader, FieldWriter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub top_age: f64,
    pub base_age: f64,
    pub units_per_my: f64,
    pub skip_empty_columns: bool,
    pub variable_colors: String,
    pub no_indent_pattern: bool,
    pub negative_chk: bool,
    pub do_popups: bool,
    pub en_event_col_bg: bool,
    pub en_chart_legend: bool,
    pub en_priority: bool,
    pub en_hide_block_lable: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            top_age: 0.0,
            base_age: 10.0,
            units_per_my: 2.0,
            skip_empty_columns: true,
            variable_colors: "UNESCO".to_string(),
            no_indent_pattern: false,
            negative_chk: false,
            do_popups: false,
            en_event_col_bg: false,
            en_chart_legend: false,
            en_priority: false,
            en_hide_block_lable: false,
        }
    }
}

/// Ages are stored as `<setting name="topAge"><setting name="text">…</setting></setting>`.
fn read_age(block: &SettingsBlock, name: &str) -> Option<f64> {
    let entry = block.setting(name)?;
    let text = match entry.value_text() {
        Some(text) => text,
        None => entry.nested()?.setting_text("text")?,
    };
    text.trim().parse().ok()
}

fn write_age(block: &mut SettingsBlock, name: &str, age: f64) {
    match block.setting_mut(name) {
        Some(entry) if matches!(entry.value, SettingValue::Text(_)) => {
            entry.value = SettingValue::Text(format_number(age))
        }
        Some(entry) => entry.nested_mut().set_setting("text", format_number(age)),
        None => {
            let mut entry = SettingEntry::empty(name)
                .with_attribute("source", "text")
                .with_attribute("unit", "Ma");
            entry.nested_mut().set_setting("text", format_number(age));
            block.push_setting(entry);
        }
    }
}

impl ChartSettings {
    /// Read from the document's `<settings>` block; missing values keep their defaults.
    pub fn from_document(document: &SettingsDocument) -> Self {
        document
            .settings_block()
            .map(ChartSettings::from_block)
            .unwrap_or_default()
    }

    pub fn from_block(block: &SettingsBlock) -> Self {
        let mut chart = ChartSettings::default();
        if let Some(age) = read_age(block, "topAge") {
            chart.top_age = age;
        }
        if let Some(age) = read_age(block, "baseAge") {
            chart.base_age = age;
        }
        let fields = FieldReader::new(block);
        fields.number("unitsPerMY", &mut chart.units_per_my);
        fields.bool("skipEmptyColumns", &mut chart.skip_empty_columns);
        fields.string("variableColors", &mut chart.variable_colors);
        fields.bool("noIndentPattern", &mut chart.no_indent_pattern);
        fields.bool("negativeChk", &mut chart.negative_chk);
        fields.bool("doPopups", &mut chart.do_popups);
        fields.bool("enEventColBG", &mut chart.en_event_col_bg);
        fields.bool("enChartLegend", &mut chart.en_chart_legend);
        fields.bool("enPriority", &mut chart.en_priority);
        fields.bool("enHideBlockLable", &mut chart.en_hide_block_lable);
        chart
    }

    /// Write into the document's `<settings>` block, creating it if needed.
    pub fn write_to(&self, document: &mut SettingsDocument) {
        self.write_block(document.settings_block_mut());
    }

    pub fn write_block(&self, block: &mut SettingsBlock) {
        write_age(block, "topAge", self.top_age);
        write_age(block, "baseAge", self.base_age);
        let mut fields = FieldWriter::new(block);
        fields.number("unitsPerMY", self.units_per_my);
        fields.bool("skipEmptyColumns", self.skip_empty_columns);
        fields.string("variableColors", &self.variable_colors);
        fields.bool("noIndentPattern", self.no_indent_pattern);
        fields.bool("negativeChk", self.negative_chk);
        fields.bool("doPopups", self.do_popups);
        fields.bool("enEventColBG", self.en_event_col_bg);
        fields.bool("enChartLegend", self.en_chart_legend);
        fields.bool("enPriority", self.en_priority);
        fields.bool("enHideBlockLable", self.en_hide_block_lable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_nested_and_flat_ages() {
        let document = SettingsDocument::parse(
            r#"<TSCreator version="1.3">
  <settings>
    <setting name="topAge" source="text" unit="Ma">
      <setting name="text">5.5</setting>
    </setting>
    <setting name="baseAge">66</setting>
    <setting name="doPopups">true</setting>
    <setting name="customFlag">kept</setting>
  </settings>
</TSCreator>"#,
        )
        .unwrap();
        let chart = ChartSettings::from_document(&document);
        assert_eq!(chart.top_age, 5.5);
        assert_eq!(chart.base_age, 66.0);
        assert!(chart.do_popups);
        assert_eq!(chart.units_per_my, 2.0);
    }

    #[test]
    fn test_write_in_place() {
        let mut document = SettingsDocument::parse(
            r#"<TSCreator version="1.3">
  <settings>
    <setting name="topAge" source="text" unit="Ma">
      <setting name="text">5.5</setting>
    </setting>
    <setting name="customFlag">kept</setting>
  </settings>
</TSCreator>"#,
        )
        .unwrap();
        let chart = ChartSettings {
            top_age: 1.0,
            base_age: 20.0,
            ..ChartSettings::default()
        };
        chart.write_to(&mut document);

        let block = document.settings_block().unwrap();
        assert_eq!(block.setting_text("customFlag"), Some("kept"));
        let top = block.setting("topAge").unwrap();
        assert_eq!(top.attributes.len(), 2);
        assert_eq!(top.nested().unwrap().setting_text("text"), Some("1.0"));
        assert_eq!(ChartSettings::from_document(&document), chart);
    }

    #[test]
    fn test_missing_block_is_created() {
        let mut document = SettingsDocument::new("1.3");
        ChartSettings::default().write_to(&mut document);
        assert_eq!(
            ChartSettings::from_document(&document),
            ChartSettings::default()
        );
        assert!(document.to_string().contains("<setting name=\"text\">10.0</setting>"));
    }
}

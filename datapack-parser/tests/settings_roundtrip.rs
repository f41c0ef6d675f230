//! Settings documents applied to and compiled from the sample tree

use datapack_parser::datapack::columns::type_settings::EventType;
use datapack_parser::datapack::columns::{ColumnTree, DisplayType, FontFace, FontRole, TypeSettingsPatch};
use datapack_parser::datapack::diagnostics::codes;
use datapack_parser::datapack::settings::{
    apply_settings, compile_settings, compile_settings_into, ChartSettings, ColumnType, SettingList,
    SettingValue, SettingsDocument,
};
use datapack_parser::datapack::testing::{assert_tree, Samples};

fn europe() -> ColumnTree {
    Samples::datapack("europe").parse()
}

fn sample_document() -> SettingsDocument {
    Samples::settings("europe").parse_settings().unwrap()
}

#[test]
fn test_apply_sample_document() {
    let mut tree = europe();
    let report = apply_settings(&sample_document(), &mut tree);

    assert_eq!(report.applied, 4);
    let found: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| (d.code.as_deref(), d.subject.as_deref()))
        .collect();
    assert_eq!(
        found,
        vec![
            (Some(codes::INVALID_COLUMN_ID), Some("no class here")),
            (Some(codes::TYPE_MISMATCH), Some("Sea Level")),
            (Some(codes::UNKNOWN_COLUMN), Some("Atlantis")),
        ]
    );

    assert_tree(&tree).named("Europe", |europe| {
        europe
            .edit_name("Western Europe")
            .width(180.0)
            .named("Belgium", |belgium| belgium.on(false))
            .named("Alps Events", |events| events.on(true))
            .named("Sea Level", |sequence| sequence.on(false).width(100.0))
    });

    let events = tree.get("Alps Events").unwrap();
    assert_eq!(
        events.type_settings().as_event().map(|s| s.event_type),
        Some(EventType::Ranges)
    );

    let header = tree
        .get("Europe")
        .and_then(|europe| europe.font_settings.get(FontRole::ColumnHeader))
        .unwrap();
    assert!(header.on && header.bold && header.italic);
    assert_eq!((header.face, header.size), (FontFace::Verdana, 14));
}

#[test]
fn test_sample_chart_settings() {
    let chart = ChartSettings::from_document(&sample_document());
    assert_eq!((chart.top_age, chart.base_age), (30.0, 80.0));
    assert_eq!(chart.units_per_my, 3.0);
    assert!(chart.do_popups);
    assert_eq!(chart.variable_colors, "UNESCO");
}

#[test]
fn test_fresh_document_has_one_column_per_node() {
    let tree = europe();
    let document = compile_settings(&tree);

    let columns: Vec<_> = document.all_columns().collect();
    assert_eq!(columns.len(), tree.len());
    assert!(document.unreadable_columns().next().is_none());

    let series = columns
        .iter()
        .find(|entry| entry.id.column_type == ColumnType::BlockSeriesMetaColumn)
        .unwrap();
    let names: Vec<&str> = series.children().map(|child| child.id.name.as_str()).collect();
    assert_eq!(names, vec!["Facies", "Members"]);
}

#[test]
fn test_compiled_document_restores_the_tree() {
    let mut edited = europe();
    edited.rename("Alps Events", "Alpine foraminifera").unwrap();
    edited.set_on("Sea Level", true).unwrap();
    edited
        .update_type_settings(
            "Sea Level",
            TypeSettingsPatch::new(DisplayType::Sequence).set("label_marked", true),
        )
        .unwrap();

    let text = compile_settings(&edited).to_string();
    let document = SettingsDocument::parse(&text).unwrap();

    let mut restored = europe();
    let report = apply_settings(&document, &mut restored);
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(report.applied, edited.len());
    assert_eq!(restored, edited);
}

#[test]
fn test_compile_into_keeps_what_it_does_not_know() {
    let tree = europe();
    let mut document = sample_document();
    compile_settings_into(&tree, &mut document);
    let text = document.to_string();

    assert_eq!(document.version(), Some("1.3"));
    for kept in [
        "stampPrintDate",
        "legacyHint",
        "Marginal Note",
        "class datastore.RangeColumn:Atlantis",
        "no class here",
    ] {
        assert!(text.contains(kept), "{kept} was dropped");
    }

    // the mismatched column is rewritten with the tree's type
    assert!(text.contains("class datastore.SequenceColumn:Sea Level"));
    assert!(!text.contains("class datastore.PointColumn:Sea Level"));

    // every tree node is present once, and the document still applies
    let readable: Vec<_> = document.all_columns().collect();
    assert_eq!(readable.len(), tree.len() + 1);

    let mut reapplied = europe();
    let report = apply_settings(&document, &mut reapplied);
    assert_eq!(report.applied, tree.len());
    assert_eq!(reapplied, tree);
}

#[test]
fn test_compile_into_keeps_font_text_it_cannot_model() {
    let mut document = SettingsDocument::parse(
        r#"<TSCreator version="1.3">
  <column id="class datastore.RootColumn:Chart Root">
    <column id="class datastore.MetaColumn:Europe">
      <fonts>
        <font function="Column Header" inheritable="true">font-family: Times New Roman;font-size: 9.5px;text-decoration: underline;</font>
      </fonts>
    </column>
  </column>
</TSCreator>"#,
    )
    .unwrap();
    let mut tree = europe();
    apply_settings(&document, &mut tree);
    compile_settings_into(&tree, &mut document);

    let europe_entry = document
        .all_columns()
        .find(|entry| entry.id.name == "Europe")
        .unwrap();
    let header = europe_entry.fonts().unwrap().fonts().next().unwrap();
    assert_eq!(header.function, "Column Header");
    assert_eq!(
        header.style,
        "font-family: Times New Roman;font-size: 9.5px;text-decoration: underline;"
    );
}

#[test]
fn test_compile_into_keeps_empty_background() {
    let mut document = sample_document();
    let mut tree = europe();
    apply_settings(&document, &mut tree);
    compile_settings_into(&tree, &mut document);

    let reparsed = SettingsDocument::parse(&document.to_string()).unwrap();
    let events = reparsed
        .all_columns()
        .find(|entry| entry.id.name == "Alps Events")
        .unwrap();
    assert_eq!(
        events.setting("backgroundColor").map(|entry| &entry.value),
        Some(&SettingValue::Empty)
    );
    let europe_entry = reparsed
        .all_columns()
        .find(|entry| entry.id.name == "Europe")
        .unwrap();
    assert_eq!(europe_entry.setting_text("backgroundColor"), Some("rgb(255,255,255)"));
}

#[test]
fn test_chart_title_prefix_is_accepted() {
    let document = sample_document();
    let root = document.columns().next().unwrap();
    assert_eq!(root.id.name, "Chart Title in Chart Root");
    assert_eq!(root.setting_text("isSelected"), Some("true"));
}

//! Text renderings of the sample tree

use datapack_parser::datapack::formats::{to_treeviz_str_with_params, FormatRegistry};
use datapack_parser::datapack::testing::Samples;
use std::collections::HashMap;

#[test]
fn test_europe_treeviz() {
    let tree = Samples::datapack("europe").parse();
    let output = FormatRegistry::default().serialize(&tree, "treeviz").unwrap();
    insta::assert_snapshot!("europe_treeviz", output);
}

#[test]
fn test_show_age_marks_bounded_columns() {
    let tree = Samples::datapack("europe").parse();
    let mut params = HashMap::new();
    params.insert("show-age".to_string(), "true".to_string());
    let output = to_treeviz_str_with_params(&tree, &params);

    assert!(output.contains("§ Europe [0.0..80.0]"));
    assert!(output.contains("◐ Magnetics (3 rows) [0.0..1.8]"));
    // no rows, no range
    assert!(output.contains("○ Ardennes\n"));
    assert!(output.contains("⊢ MA\n"));
}

#[test]
fn test_every_format_renders_the_sample() {
    let tree = Samples::datapack("europe").parse();
    let registry = FormatRegistry::default();
    for format in registry.list_formats() {
        let output = registry.serialize(&tree, &format).unwrap();
        assert!(output.contains("Chalk Facies Members"), "{format}");
    }
}

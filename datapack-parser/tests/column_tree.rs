//! Tree engine operations on a parsed sample

use datapack_parser::datapack::columns::{
    ColumnTree, Direction, DisplayType, TreeError, TypeSettings, TypeSettingsPatch,
};
use datapack_parser::datapack::parsing::parse_datapack_str;
use datapack_parser::datapack::testing::{assert_tree, Samples};
use proptest::prelude::*;

fn europe() -> ColumnTree {
    Samples::datapack("europe").parse()
}

fn names(tree: &ColumnTree) -> Vec<String> {
    tree.iter().map(|node| node.name.clone()).collect()
}

#[test]
fn test_search_shows_matches_and_their_ancestors() {
    let mut tree = europe();
    tree.search("BRABANT");

    let shown: Vec<&str> = tree
        .iter()
        .filter(|node| node.show)
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(shown, vec!["Chart Root", "Europe", "Belgium", "Brabant Blocks"]);
    assert!(tree.get("Belgium").unwrap().expanded);
    assert!(!tree.get("France").unwrap().show);
}

#[test]
fn test_search_shows_descendants_of_a_match() {
    let mut tree = europe();
    tree.search("chalk");
    for name in ["Chalk Facies", "Chalk Facies Facies", "Chalk Facies Members", "France"] {
        assert!(tree.get(name).unwrap().show, "{name} should be shown");
    }
    assert!(!tree.get("Paris Basin").unwrap().show);
}

#[test]
fn test_empty_search_restores_the_view() {
    let mut tree = europe();
    tree.search("magnetics");
    tree.search("   ");

    assert!(tree.iter().all(|node| node.show));
    for node in tree.iter() {
        let top_level = node.parent_name.as_deref() == Some("Chart Root");
        assert_eq!(node.expanded, top_level, "{}", node.name);
    }
}

#[test]
fn test_turning_on_turns_ancestors_on() {
    let mut tree = europe();
    tree.set_on("Europe", false).unwrap();
    tree.set_on("Belgium", false).unwrap();

    tree.set_on("Brabant Blocks", true).unwrap();
    assert_tree(&tree).named("Europe", |europe| {
        europe
            .on(true)
            .named("Belgium", |belgium| belgium.on(true).named("Brabant Blocks", |b| b.on(true)))
    });
}

#[test]
fn test_turning_off_leaves_everything_else() {
    let mut tree = europe();
    let before = tree.clone();
    assert!(!tree.toggle_on("Europe").unwrap());

    for (after, before) in tree.iter().zip(before.iter()) {
        if after.name != "Europe" {
            assert_eq!(after.on, before.on, "{}", after.name);
        }
    }
}

#[test]
fn test_shared_sub_column_under_two_parents() {
    let mut tree =
        parse_datapack_str("Europe\t:\tStratigraphy\nAfrica\t:\tStratigraphy\nStratigraphy\t:\tZone\n");
    assert_eq!(tree.iter().filter(|node| node.name == "Zone").count(), 2);

    tree.search("zone");
    assert!(tree.iter().all(|node| node.show));
    assert!(tree
        .iter()
        .filter(|node| node.name == "Stratigraphy")
        .all(|node| node.expanded));

    tree.set_on("Europe", false).unwrap();
    tree.set_on("Zone", true).unwrap();
    assert!(tree.get("Europe").unwrap().on);
    assert!(!tree.reorder_sibling("Zone", Direction::Right).unwrap());
}

#[test]
fn test_reorder_within_siblings() {
    let mut tree = europe();
    assert!(tree.reorder_sibling("France", Direction::Left).unwrap());
    assert_tree(&tree).named("Europe", |europe| {
        europe.child_names(&["France", "Belgium", "Alps Events", "Sea Level"])
    });

    assert!(!tree.reorder_sibling("France", Direction::Left).unwrap());
    assert!(!tree.reorder_sibling("Chart Root", Direction::Right).unwrap());

    // the index follows the move
    assert!(tree.reorder_sibling("Brabant Blocks", Direction::Right).unwrap());
    assert_eq!(tree.get("Brabant Blocks").unwrap().name, "Brabant Blocks");
    assert_tree(&tree).named("Europe", |europe| {
        europe.named("Belgium", |belgium| belgium.child_names(&["Ardennes", "Brabant Blocks"]))
    });
}

#[test]
fn test_rename_keeps_the_structural_name() {
    let mut tree = europe();
    tree.rename("Alps Events", "Alpine foraminifera").unwrap();

    let node = tree.get("Alps Events").unwrap();
    assert_eq!(node.edit_name, "Alpine foraminifera");
    assert!(tree.get("Alpine foraminifera").is_none());
}

#[test]
fn test_unknown_columns_are_reported() {
    let mut tree = europe();
    assert_eq!(
        tree.set_on("Atlantis", true),
        Err(TreeError::UnknownColumn("Atlantis".to_string()))
    );
    assert!(tree.ancestors("Atlantis").is_err());
    assert_eq!(
        tree.ancestors("Brabant Blocks").unwrap(),
        vec!["Belgium", "Europe", "Chart Root"]
    );
}

#[test]
fn test_type_settings_patch() {
    let mut tree = europe();
    let patch = TypeSettingsPatch::new(DisplayType::Sequence).set("label_marked", true);
    tree.update_type_settings("Sea Level", patch).unwrap();
    match tree.get("Sea Level").unwrap().type_settings() {
        TypeSettings::Sequence(settings) => assert!(settings.label_marked),
        other => panic!("expected sequence settings, got {:?}", other),
    }

    let before = tree.clone();
    let wrong_type = TypeSettingsPatch::new(DisplayType::Point).set("draw_fill", false);
    assert!(matches!(
        tree.update_type_settings("Sea Level", wrong_type),
        Err(TreeError::TypeMismatch { .. })
    ));
    let unknown_field = TypeSettingsPatch::new(DisplayType::Sequence).set("colour", "red");
    assert!(matches!(
        tree.update_type_settings("Sea Level", unknown_field),
        Err(TreeError::InvalidPatch { .. })
    ));
    assert_eq!(tree, before);
}

fn column_name() -> impl Strategy<Value = String> {
    prop::sample::select(names(&europe()))
}

proptest! {
    #[test]
    fn prop_toggle_on_reaches_the_root(toggles in prop::collection::vec(column_name(), 1..20)) {
        let mut tree = europe();
        for name in &toggles {
            let on = tree.toggle_on(name).unwrap();
            prop_assert_eq!(tree.get(name).unwrap().on, on);
            if on {
                for ancestor in tree.ancestors(name).unwrap() {
                    prop_assert!(tree.get(&ancestor).unwrap().on, "{} is off", ancestor);
                }
            }
        }
    }

    #[test]
    fn prop_search_then_clear_is_stable(term in "[a-z ]{0,6}") {
        let mut searched = europe();
        searched.search(&term);
        searched.search("");

        let mut cleared = europe();
        cleared.search("");
        prop_assert_eq!(searched, cleared);
    }

    #[test]
    fn prop_index_survives_reordering(
        moves in prop::collection::vec((column_name(), any::<bool>()), 0..20)
    ) {
        let mut tree = europe();
        for (name, left) in &moves {
            let direction = if *left { Direction::Left } else { Direction::Right };
            tree.reorder_sibling(name, direction).unwrap();
        }
        for node in tree.iter() {
            prop_assert_eq!(&tree.get(&node.name).unwrap().name, &node.name);
        }
    }
}

//! Testing utilities for datapack sources and column trees
//!
//!     Datapacks, map packs and settings documents are all legacy formats with
//!     no reference parser to compare against. They are tab sensitive, lenient
//!     about junk and full of conventions (trailing sentinels, section markers,
//!     `Chart Title in` prefixes) that are easy to get slightly wrong when typed
//!     into a test string. A test against a slightly wrong source tunes the
//!     parser to the wrong thing.
//!
//!     Tests therefore follow two rules:
//!
//!         1. Use the curated sample files (via [Samples])
//!         2. Check trees with the fluent assertions (via [assert_tree])
//!
//! Rule 1: Use Samples for Test Content
//!
//!     The files under `samples/` are kept in step with what real chart data
//!     looks like, real tabs included. They are embedded at compile time, so
//!     tests never touch the filesystem to get them.
//!
//!     ```rust,ignore
//!     use datapack_parser::datapack::testing::Samples;
//!
//!     // A parsed tree
//!     let tree = Samples::datapack("europe").parse();
//!
//!     // Raw text, or a SourceFile for the multi-file entry points
//!     let text = Samples::datapack("europe").source();
//!     let files = Samples::map_packs(&["world", "europe"]);
//!
//!     // A settings document
//!     let document = Samples::settings("europe").parse_settings().unwrap();
//!     ```
//!
//!     Available samples:
//!
//!         - Datapacks: `europe` (every block kind, hierarchy noise, age units),
//!           `minimal`
//!         - Map packs: `world`, `europe`, `antarctica` (vertical perspective),
//!           `not_a_map` (rejected)
//!         - Settings: `europe` (unknown settings, unknown columns, a type
//!           mismatch and an unreadable id)
//!
//!     Inline strings are fine for a single line-level case (one hierarchy line,
//!     one header). Anything that needs a whole file belongs in `samples/`.
//!
//! Rule 2: Use assert_tree for Tree Verification
//!
//!     Counting nodes says little about whether a tree is right. What matters is
//!     the shape and what each column carries. Matching through the tree by
//!     hand gets long quickly:
//!
//!     ```rust-example
//!     let europe = &tree.root().children[1];
//!     assert_eq!(europe.name, "Europe");
//!     assert_eq!(europe.children.len(), 4);
//!     let belgium = &europe.children[0];
//!     assert_eq!(belgium.display_type(), DisplayType::Meta);
//!     // ... and so on for every level
//!     ```
//!
//!     The fluent form says the same thing and reports the path on failure:
//!
//!     ```rust-example
//!     assert_tree(&tree)
//!         .child_names(&["MA", "Europe"])
//!         .named("Europe", |europe| {
//!             europe
//!                 .display_type(DisplayType::Meta)
//!                 .named("Belgium", |belgium| belgium.child_count(2))
//!         });
//!     ```

mod samples;
mod tree_assertions;

pub use samples::{Sample, SampleKind, Samples};
pub use tree_assertions::{assert_tree, ColumnAssertion};

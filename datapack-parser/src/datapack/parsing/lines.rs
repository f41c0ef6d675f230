//! Line classification
//!
//! Datapack text is line oriented and tab sensitive. Every line is classified on
//! its own; the scanner then decides what a classified line means given the
//! block it is in.
//!
//! Hierarchy lines are the backbone of the format:
//!
//! ```text
//! Europe<TAB>:<TAB>Belgium<TAB>France<TAB><TAB>120<TAB>200/220/255
//! ```
//!
//! Everything after the first double tab is meta-column attributes, and the
//! children list itself may end in junk (a `_METACOLUMN_OFF` marker, an HTML
//! attribute fragment, or a blank field) that [strip_trailing_noise] removes.

use crate::datapack::columns::Rgb;
use once_cell::sync::Lazy;
use regex::Regex;

pub const HIERARCHY_SEPARATOR: &str = "\t:\t";

/// `href="..."`, `target="_blank"` and friends leaking in from popup markup
static HTML_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b[a-z][a-z0-9_-]*\s*=\s*""#).unwrap());

/// Cut a candidate children list at its trailing noise.
///
/// The list is truncated at the first element that is the sentinel token or
/// looks like an HTML attribute. When there is no such element, a final
/// whitespace-only element is dropped instead.
pub fn strip_trailing_noise(mut children: Vec<String>, sentinel: &str) -> Vec<String> {
    let noise = children
        .iter()
        .position(|child| child.trim() == sentinel || HTML_ATTRIBUTE.is_match(child));
    match noise {
        Some(position) => children.truncate(position),
        None => {
            if children.last().is_some_and(|last| last.trim().is_empty()) {
                children.pop();
            }
        }
    }
    children
}

/// Attributes trailing a hierarchy line after its double tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaAttributes {
    pub width: Option<f64>,
    pub rgb: Option<Rgb>,
}

impl MetaAttributes {
    pub fn parse(trailing: &str) -> Self {
        let mut attributes = MetaAttributes::default();
        for field in trailing.split('\t').map(str::trim) {
            if attributes.width.is_none() {
                if let Ok(width) = field.parse::<f64>() {
                    attributes.width = Some(width);
                    continue;
                }
            }
            if attributes.rgb.is_none() {
                attributes.rgb = Rgb::parse_slashed(field);
            }
        }
        attributes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyLine {
    pub parent: String,
    pub children: Vec<String>,
    pub attributes: MetaAttributes,
}

/// The kinds of line the scanner distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Hierarchy(HierarchyLine),
    AgeUnits(String),
    FormatVersion(String),
    /// A line whose second field may be a column type keyword
    Header(Vec<&'a str>),
    /// A data row; the leading empty field is already removed
    Row(Vec<&'a str>),
    Blank,
    Other(&'a str),
}

pub fn classify_line<'a>(line: &'a str, sentinel: &str) -> Line<'a> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(hierarchy) = parse_hierarchy_line(line, sentinel) {
        return Line::Hierarchy(hierarchy);
    }
    if let Some((label, value)) = line.split_once(':') {
        let label = label.to_lowercase();
        let value = value.split('\t').map(str::trim).find(|v| !v.is_empty());
        if label.contains("age units") {
            return Line::AgeUnits(value.unwrap_or_default().to_string());
        }
        if label.contains("format version") {
            return Line::FormatVersion(value.unwrap_or_default().to_string());
        }
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if fields[0].trim().is_empty() {
        return Line::Row(fields[1..].to_vec());
    }
    if fields.len() >= 2 {
        return Line::Header(fields);
    }
    Line::Other(line)
}

/// Split a `parent<TAB>:<TAB>children...` line. Returns `None` without the separator.
pub fn parse_hierarchy_line(line: &str, sentinel: &str) -> Option<HierarchyLine> {
    let (parent, rest) = line.split_once(HIERARCHY_SEPARATOR)?;
    let (children_raw, trailing) = match rest.split_once("\t\t") {
        Some((children, trailing)) => (children, Some(trailing)),
        None => (rest, None),
    };
    let candidates = children_raw.split('\t').map(str::to_string).collect();
    let children = strip_trailing_noise(candidates, sentinel)
        .into_iter()
        .map(|child| child.trim().to_string())
        .filter(|child| !child.is_empty())
        .collect();
    Some(HierarchyLine {
        parent: parent.trim().to_string(),
        children,
        attributes: trailing.map(MetaAttributes::parse).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SENTINEL: &str = "_METACOLUMN_OFF";

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case::sentinel(&["A", "B", "_METACOLUMN_OFF", "junk"], &["A", "B"])]
    #[case::html_attribute(&["A", "href=\"http://x.org\"", "B"], &["A"])]
    #[case::unterminated_attribute(&["A", "target=\"_blank"], &["A"])]
    #[case::trailing_blank(&["A", "B", " "], &["A", "B"])]
    #[case::only_last_blank_dropped(&["A", "", ""], &["A", ""])]
    #[case::sentinel_first(&["_METACOLUMN_OFF", "A"], &[])]
    #[case::clean(&["A", "B"], &["A", "B"])]
    #[case::empty(&[], &[])]
    fn test_strip_trailing_noise(#[case] input: &[&str], #[case] expected: &[&str]) {
        assert_eq!(strip_trailing_noise(list(input), SENTINEL), list(expected));
    }

    #[test]
    fn test_sentinel_wins_over_trailing_blank() {
        let stripped = strip_trailing_noise(list(&["A", "_METACOLUMN_OFF", " "]), SENTINEL);
        assert_eq!(stripped, list(&["A"]));
    }

    #[test]
    fn test_hierarchy_line_with_junk() {
        let line = parse_hierarchy_line("Europe\t:\tBelgium\tFrance\t_METACOLUMN_OFF\tjunk", SENTINEL)
            .unwrap();
        assert_eq!(line.parent, "Europe");
        assert_eq!(line.children, list(&["Belgium", "France"]));
        assert_eq!(line.attributes, MetaAttributes::default());
    }

    #[test]
    fn test_hierarchy_line_double_tab_attributes() {
        let line =
            parse_hierarchy_line("Europe\t:\tBelgium\t\t120\t200/220/255\tnotes", SENTINEL).unwrap();
        assert_eq!(line.children, list(&["Belgium"]));
        assert_eq!(line.attributes.width, Some(120.0));
        assert_eq!(line.attributes.rgb, Some(Rgb::new(200, 220, 255)));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_line("   ", SENTINEL), Line::Blank);
        assert_eq!(classify_line("age units:\tMa", SENTINEL), Line::AgeUnits("Ma".into()));
        assert_eq!(
            classify_line("format version:\t1.3", SENTINEL),
            Line::FormatVersion("1.3".into())
        );
        assert_eq!(
            classify_line("\tZone A\t10", SENTINEL),
            Line::Row(vec!["Zone A", "10"])
        );
        assert_eq!(
            classify_line("Belgium\tblock\t120", SENTINEL),
            Line::Header(vec!["Belgium", "block", "120"])
        );
        assert_eq!(classify_line("FAD", SENTINEL), Line::Other("FAD"));
        assert!(matches!(
            classify_line("A\t:\tB", SENTINEL),
            Line::Hierarchy(HierarchyLine { .. })
        ));
    }
}

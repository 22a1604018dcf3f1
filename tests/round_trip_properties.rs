//! Property-based tests for path splitting and dump/load round trips.

use cfgtree::{split_path, Cfg};
use proptest::prelude::*;

/// One generated root-level section: comment, options, and whether it
/// inherits from the section generated before it.
#[derive(Debug, Clone)]
struct GeneratedSection {
    comment: String,
    options: Vec<(String, Vec<String>, String)>,
    inherits_previous: bool,
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Values never start or end with whitespace and hold no format characters.
fn value() -> impl Strategy<Value = String> {
    "[a-z0-9.:/]([a-z0-9.:/ ]{0,10}[a-z0-9.:/])?"
}

fn comment() -> impl Strategy<Value = String> {
    prop::collection::vec("([a-z]{1,6}( [a-z]{1,6}){0,2})?", 0..3)
        .prop_map(|lines| lines.join("\n"))
}

/// Text mixing names with every character the format treats specially.
fn hostile_text() -> impl Strategy<Value = String> {
    "[a-c =#{}+/<\t\n\r]{0,6}"
}

fn options() -> impl Strategy<Value = Vec<(String, Vec<String>, String)>> {
    prop::collection::btree_map(name(), (prop::collection::vec(value(), 1..4), comment()), 0..5)
        .prop_map(|map| {
            map.into_iter()
                .map(|(name, (values, comment))| (format!("o_{name}"), values, comment))
                .collect()
        })
}

fn sections() -> impl Strategy<Value = Vec<GeneratedSection>> {
    prop::collection::vec(
        (comment(), options(), any::<bool>()).prop_map(|(comment, options, inherits_previous)| {
            GeneratedSection {
                comment,
                options,
                inherits_previous,
            }
        }),
        0..5,
    )
}

fn build(root_options: &[(String, Vec<String>, String)], sections: &[GeneratedSection]) -> Cfg {
    let mut cfg = Cfg::new();
    for (name, values, comment) in root_options {
        cfg.set_option_array(name, values.iter().cloned(), comment)
            .unwrap();
    }
    for (n, generated) in sections.iter().enumerate() {
        let path = format!("s_{n}");
        let mut section = cfg.create_section(&path, &generated.comment).unwrap();
        for (name, values, comment) in &generated.options {
            section
                .set_option_array(name, values.iter().cloned(), comment)
                .unwrap();
        }
        if n > 0 && generated.inherits_previous {
            section.set_inheritance(&format!("s_{}", n - 1)).unwrap();
        }
    }
    cfg
}

proptest! {
    #[test]
    fn prop_split_path_drops_empty_segments(path in "[a-z/]{0,24}") {
        let segments = split_path(&path);
        prop_assert!(segments.iter().all(|s| !s.is_empty() && !s.contains('/')));
        let joined = segments.join("/");
        prop_assert_eq!(split_path(&joined), segments);
    }

    #[test]
    fn prop_dump_reloads_equal(root_options in options(), sections in sections()) {
        let cfg = build(&root_options, &sections);
        let reloaded: Cfg = cfg.to_string().parse().unwrap();
        prop_assert!(cfg.equal_with_comments(&reloaded), "dump:\n{}", cfg);
    }

    #[test]
    fn prop_canonical_dump_is_stable(root_options in options(), sections in sections()) {
        let first = build(&root_options, &sections).to_string();
        let reloaded: Cfg = first.parse().unwrap();
        prop_assert_eq!(reloaded.to_string(), first);
    }

    #[test]
    fn prop_accepted_writes_survive_a_dump(
        name in hostile_text(),
        value in hostile_text(),
        comment in hostile_text(),
    ) {
        let mut cfg = Cfg::new();
        let _ = cfg.set_option(&name, &value, &comment);
        let _ = cfg.create_section(&name, &comment);
        let reloaded: Cfg = cfg.to_string().parse().unwrap();
        prop_assert!(cfg.equal_with_comments(&reloaded), "dump:\n{}", cfg);
        let copy = cfg.try_clone().unwrap();
        prop_assert!(cfg.equal_with_comments(&copy));
    }
}

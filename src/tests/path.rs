use super::{check_name, check_value, join_path, normalize_comment, split_path, trim};
use crate::error::Error;

#[test]
fn test_split_ignores_empty_segments() {
    for source in [
        "a/b/c",
        "/a/b/c",
        "//a/b/c",
        "a/b/c/",
        "////a////b//c/////",
    ] {
        assert_eq!(split_path(source), vec!["a", "b", "c"], "source: {source}");
    }
}

#[test]
fn test_split_of_separators_only_is_empty() {
    assert!(split_path("").is_empty());
    assert!(split_path("///").is_empty());
}

#[test]
fn test_join_round_trips_split() {
    let segments = split_path("/x//y/z/");
    assert_eq!(join_path(&segments), "x/y/z");
}

#[test]
fn test_trim_strips_whitespace_and_line_endings() {
    assert_eq!(trim(" \t value \r\n"), "value");
    assert_eq!(trim("in ner"), "in ner");
}

#[test]
fn test_check_name_rejects_text_that_reads_back_differently() {
    assert_eq!(check_name("port_2").unwrap(), "port_2");
    assert_eq!(check_name("a<b c").unwrap(), "a<b c");
    assert!(matches!(check_name(""), Err(Error::MissingName)));
    for name in ["x=y", "a{", "}", "n#c", "a/b", "tail+", " lead", "trail\t", "two\nlines"] {
        assert!(
            matches!(check_name(name), Err(Error::InvalidName(n)) if n == name),
            "name: {name:?}"
        );
    }
}

#[test]
fn test_check_value_rejects_comments_and_edge_whitespace() {
    for value in ["", "1", "a = b", "{x}", "http://h/?q=1", "in ner"] {
        assert!(check_value("v", value).is_ok(), "value: {value:?}");
    }
    for value in [" x", "x ", "1 # c", "a\nb", "a\r"] {
        assert!(
            matches!(check_value("v", value), Err(Error::InvalidValue { .. })),
            "value: {value:?}"
        );
    }
}

#[test]
fn test_normalize_comment_trims_each_line() {
    assert_eq!(normalize_comment(" one \n\t\n two"), "one\n\ntwo");
    assert_eq!(normalize_comment(""), "");
}

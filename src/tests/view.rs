use crate::Cfg;

const LAYERED: &str = "\
defaults {
\ttimeout = 30
\tretry = 1
\tlimits {
\t\tcpu = 2
\t}
}
service {< defaults
\tretry = 3
\tname = api
}
";

#[test]
fn test_section_handles_report_paths() {
    let cfg: Cfg = LAYERED.parse().unwrap();
    let limits = cfg.get_section("service/limits").unwrap();
    // Reached through `service`, but the node lives under `defaults`.
    assert_eq!(limits.path(), "defaults/limits");
    assert_eq!(limits.name(), "limits");
    assert_eq!(limits.parent().unwrap().path(), "defaults");
    assert!(limits.root().is_root());
    assert_eq!(cfg.root().path(), "/");
}

#[test]
fn test_relative_queries_follow_inheritance() {
    let cfg: Cfg = LAYERED.parse().unwrap();
    let service = cfg.get_section("service").unwrap();
    assert_eq!(service.inheritance().unwrap().path(), "defaults");
    assert_eq!(service.get_value("timeout", ""), "30");
    assert_eq!(service.get_value("retry", ""), "3");
    assert_eq!(service.get_value("limits/cpu", ""), "2");
    assert!(service.exists_section("limits"));
    assert!(service.get_section("nope").is_none());
}

#[test]
fn test_listing_deduplicates_along_chain() {
    let cfg: Cfg = LAYERED.parse().unwrap();
    let service = cfg.get_section("service").unwrap();
    assert_eq!(
        service.list_options().collect::<Vec<_>>(),
        vec!["retry", "name", "timeout"]
    );
    assert_eq!(service.list_sections().collect::<Vec<_>>(), vec!["limits"]);
    assert_eq!(cfg.list_sections().collect::<Vec<_>>(), vec!["defaults", "service"]);
}

#[test]
fn test_listing_can_stop_early_and_restart() {
    let cfg: Cfg = LAYERED.parse().unwrap();
    let service = cfg.get_section("service").unwrap();
    let mut names = service.list_options();
    assert_eq!(names.next(), Some("retry"));
    drop(names);
    assert_eq!(service.list_options().count(), 3);
}

#[test]
fn test_section_mut_writes_relative_to_itself() {
    let mut cfg: Cfg = LAYERED.parse().unwrap();
    let mut service = cfg.section_mut("service").unwrap();
    service.set_option("name", "web", "renamed").unwrap();
    service
        .create_section("limits", "")
        .unwrap()
        .set_option_array("cpu", ["4", "8"], "")
        .unwrap();
    assert_eq!(cfg.get_option("service/limits/cpu").as_deref(), Some("4/8"));
    assert_eq!(cfg.get_value("defaults/limits/cpu", ""), "2");
    assert_eq!(cfg.root().option_comment("service/name"), Some("renamed"));
}

#[test]
fn test_section_mut_is_structural() {
    let mut cfg: Cfg = LAYERED.parse().unwrap();
    assert!(cfg.section("service/limits").is_none());
    assert_eq!(cfg.section("defaults/limits").unwrap().path(), "defaults/limits");
    assert!(cfg.section_mut("service/limits").is_none());
    assert!(cfg.section_mut("defaults/limits").is_some());
}

#[test]
fn test_load_into_subsection() {
    let mut cfg: Cfg = LAYERED.parse().unwrap();
    cfg.create_section("extra", "").unwrap();
    cfg.section_mut("extra")
        .unwrap()
        .load_from_reader("inner {< defaults\n}\nflag = on\n".as_bytes())
        .unwrap();
    assert_eq!(cfg.get_value("extra/flag", ""), "on");
    assert_eq!(cfg.get_value("extra/inner/timeout", ""), "30");
    // Links outside the loaded subsection survive.
    assert_eq!(cfg.get_value("service/timeout", ""), "30");
}

#[test]
fn test_debug_shows_path() {
    let cfg: Cfg = LAYERED.parse().unwrap();
    let section = cfg.get_section("defaults/limits").unwrap();
    assert_eq!(format!("{section:?}"), "Section(\"defaults/limits\")");
}

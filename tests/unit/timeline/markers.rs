use super::*;

#[test]
fn default_names_are_disambiguated_with_suffixes() {
    let mut reg = MarkerRegistry::new();
    assert_eq!(reg.add("m", 0.0).unwrap(), "m");
    assert_eq!(reg.add("m", 1.0).unwrap(), "m2");
    assert_eq!(reg.add("m", 2.0).unwrap(), "m3");
    assert_eq!(reg.len(), 3);
}

#[test]
fn colliding_name_never_overwrites_earlier_time() {
    let mut reg = MarkerRegistry::new();
    reg.add("intro", 1.0).unwrap();
    let second = reg.add("intro", 5.0).unwrap();
    assert_eq!(second, "intro2");
    assert_eq!(reg.lookup("intro").unwrap(), 1.0);
    assert_eq!(reg.lookup("intro2").unwrap(), 5.0);
}

#[test]
fn suffix_skips_names_registered_explicitly() {
    let mut reg = MarkerRegistry::new();
    reg.add("m", 0.0).unwrap();
    reg.add("m2", 0.0).unwrap();
    assert_eq!(reg.add("m", 0.0).unwrap(), "m3");
}

#[test]
fn lookup_of_unknown_name_is_unresolved_label() {
    let reg = MarkerRegistry::new();
    let err = reg.lookup("nope").unwrap_err();
    assert!(matches!(err, ChoreoError::UnresolvedLabel(n) if n == "nope"));
}

#[test]
fn rejects_negative_times_and_empty_names() {
    let mut reg = MarkerRegistry::new();
    assert!(reg.add("a", -1.0).is_err());
    assert!(reg.add("  ", 1.0).is_err());
    assert!(reg.is_empty());
}

#[test]
fn markers_keep_registration_order() {
    let mut reg = MarkerRegistry::new();
    reg.add("b", 3.0).unwrap();
    reg.add("a", 1.0).unwrap();
    let names: Vec<_> = reg.markers().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["b", "a"]);
    assert_eq!(reg.latest(), 3.0);
}

#[test]
fn names_that_read_as_times_are_rejected() {
    let mut reg = MarkerRegistry::new();
    for name in ["2", "-1.5", "<", ">0.5", "+=1"] {
        assert!(
            matches!(reg.add(name, 1.0), Err(ChoreoError::Validation(_))),
            "{name}"
        );
    }
    assert!(reg.is_empty());
}

#[test]
fn sign_suffixed_names_are_reachable_by_their_own_text() {
    let mut reg = MarkerRegistry::new();
    reg.add("part", 1.0).unwrap();
    reg.add("part-1", 3.0).unwrap();
    reg.add("scene+2", 7.0).unwrap();

    assert_eq!(reg.lookup_offset("part", -1.0).unwrap(), 3.0);
    assert_eq!(reg.lookup_offset("part", 0.5).unwrap(), 1.5);
    assert_eq!(reg.lookup_offset("scene", 2.0).unwrap(), 7.0);
    let err = reg.lookup_offset("scene", 1.0).unwrap_err();
    assert!(matches!(err, ChoreoError::UnresolvedLabel(n) if n == "scene"));
}

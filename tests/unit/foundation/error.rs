use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChoreoError::unresolved_label("intro")
            .to_string()
            .contains("unresolved label:")
    );
    assert!(
        ChoreoError::invalid_time("x")
            .to_string()
            .contains("invalid time position:")
    );
    assert!(
        ChoreoError::asset("x")
            .to_string()
            .contains("asset load failure:")
    );
    assert!(
        ChoreoError::malformed_diff("x")
            .to_string()
            .contains("malformed diff input:")
    );
    assert!(
        ChoreoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ChoreoError::script("x").to_string().contains("script error:"));
}

#[test]
fn command_wrapper_reports_ordinal_and_root() {
    let err = ChoreoError::command(7, "fadeIn node#3", ChoreoError::unresolved_label("outro"));
    let msg = err.to_string();
    assert!(msg.contains("#7"));
    assert!(msg.contains("fadeIn node#3"));
    assert!(matches!(err.root(), ChoreoError::UnresolvedLabel(name) if name == "outro"));
    assert!(!err.is_superseded());
}

#[test]
fn superseded_is_detected_through_wrappers() {
    let err = ChoreoError::command(1, "add", ChoreoError::Superseded { epoch: 4 });
    assert!(err.is_superseded());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChoreoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

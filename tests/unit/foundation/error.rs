use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NtscError::missing_shader("x")
            .to_string()
            .contains("missing shader:")
    );
    assert!(
        NtscError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        NtscError::resource("x")
            .to_string()
            .contains("resource acquisition failure:")
    );
    assert!(NtscError::device("x").to_string().contains("device error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NtscError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

use super::*;
use std::cell::Cell;

struct CountingLibrary {
    inner: StaticShaderLibrary,
    lookups: Cell<u32>,
}

impl ShaderLibrary for CountingLibrary {
    fn find(&self, name: &str) -> Option<ShaderHandle> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.find(name)
    }
}

#[test]
fn pass_indices_follow_program_layout() {
    assert_eq!(ShaderPass::Capture.index(), 3);
    assert_eq!(ShaderPass::from_index(1), Some(ShaderPass::Decode));
    assert_eq!(ShaderPass::from_index(4), None);
    assert_eq!(ShaderPass::SEQUENCE[0], ShaderPass::Capture);
    assert_eq!(ShaderPass::SEQUENCE[3], ShaderPass::Reconstruct);
}

#[test]
fn find_program_requires_four_passes() {
    assert!(find_program(&StaticShaderLibrary::with_ntsc()).is_ok());
    let mut short = StaticShaderLibrary::empty();
    short.register(PROGRAM_NAME, 2);
    assert!(matches!(
        find_program(&short),
        Err(NtscError::MissingShader(_))
    ));
}

#[test]
fn missing_program_is_sticky() {
    let lib = CountingLibrary {
        inner: StaticShaderLibrary::empty(),
        lookups: Cell::new(0),
    };
    let mut slot = ProgramSlot::default();
    for _ in 0..5 {
        assert!(!slot.resolve(&lib));
    }
    slot.release();
    assert!(!slot.resolve(&lib));
    assert!(slot.is_missing());
    assert_eq!(lib.lookups.get(), 1);
}

#[test]
fn release_allows_re_resolution() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut slot = ProgramSlot::default();
    assert!(slot.resolve(&lib));
    assert_eq!(slot.handle().map(|h| h.pass_count), Some(4));
    slot.release();
    assert_eq!(slot, ProgramSlot::Unresolved);
    assert!(slot.resolve(&lib));
}

use super::*;
use crate::effect::params::CrossTalkMode;

struct Scene {
    enable: bool,
    params: EffectParams,
}

impl VolumeComponent for Scene {
    fn is_active(&self) -> bool {
        self.enable
    }
}

impl ParamsOverride for Scene {
    fn params(&self) -> &EffectParams {
        &self.params
    }
}

fn override_params() -> EffectParams {
    EffectParams {
        cross_talk_mode: CrossTalkMode::Slant,
        brightness: 0.5,
        ..EffectParams::default()
    }
}

#[test]
fn defaults_when_no_override_present() {
    let defaults = EffectParams::default();
    let stack = VolumeStack::new();
    let r = OverrideResolver::<Scene>::new(&defaults, &stack);
    assert_eq!(r.resolve(), defaults);
    assert!(r.active_override().is_none());
}

#[test]
fn inactive_override_is_ignored() {
    let defaults = EffectParams::default();
    let mut stack = VolumeStack::new();
    stack.insert(Scene {
        enable: false,
        params: override_params(),
    });
    assert_eq!(OverrideResolver::<Scene>::new(&defaults, &stack).resolve(), defaults);
}

#[test]
fn active_override_wins_wholesale_and_is_idempotent() {
    let defaults = EffectParams::default();
    let mut stack = VolumeStack::new();
    stack.insert(Scene {
        enable: true,
        params: override_params(),
    });
    let r = OverrideResolver::<Scene>::new(&defaults, &stack);
    let first = r.resolve();
    assert_eq!(first, override_params());
    assert_eq!(r.resolve(), first);
}

#[test]
fn legacy_fields_resolve_to_themselves() {
    let p = override_params();
    assert_eq!(p.resolve(), p);
    assert_eq!(p.resolve(), p.resolve());
}

use crate::effect::params::EffectParams;
use crate::host::volume::{VolumeComponent, VolumeStack};

/// Picks the one authoritative parameter set for the current frame.
pub trait ConfigResolver {
    fn resolve(&self) -> EffectParams;
}

/// A component's own fields are the parameters (legacy camera component).
impl ConfigResolver for EffectParams {
    fn resolve(&self) -> EffectParams {
        self.clone()
    }
}

/// Volume component carrying a full parameter set.
pub trait ParamsOverride: VolumeComponent {
    fn params(&self) -> &EffectParams;
}

/// Active override from the volume stack wins; otherwise the static defaults apply.
pub struct OverrideResolver<'a, C> {
    defaults: &'a EffectParams,
    stack: &'a VolumeStack,
    _component: std::marker::PhantomData<fn() -> C>,
}

impl<'a, C: ParamsOverride> OverrideResolver<'a, C> {
    pub fn new(defaults: &'a EffectParams, stack: &'a VolumeStack) -> Self {
        Self {
            defaults,
            stack,
            _component: std::marker::PhantomData,
        }
    }

    pub fn active_override(&self) -> Option<&'a C> {
        self.stack.get::<C>().filter(|c| c.is_active())
    }
}

impl<C: ParamsOverride> ConfigResolver for OverrideResolver<'_, C> {
    fn resolve(&self) -> EffectParams {
        match self.active_override() {
            Some(component) => component.params().clone(),
            None => self.defaults.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resolve.rs"]
mod tests;

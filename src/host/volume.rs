use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Scene-level override component blended by the host volume system.
pub trait VolumeComponent: Any {
    fn is_active(&self) -> bool;
}

/// Resolved volume components for the current camera, at most one per type.
#[derive(Default)]
pub struct VolumeStack {
    components: HashMap<TypeId, Box<dyn Any>>,
}

impl VolumeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the component of type `C`.
    pub fn insert<C: VolumeComponent>(&mut self, component: C) {
        self.components
            .insert(TypeId::of::<C>(), Box::new(component));
    }

    pub fn get<C: VolumeComponent>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|c| c.downcast_ref::<C>())
    }

    pub fn get_mut<C: VolumeComponent>(&mut self) -> Option<&mut C> {
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|c| c.downcast_mut::<C>())
    }

    pub fn remove<C: VolumeComponent>(&mut self) -> Option<C> {
        self.components
            .remove(&TypeId::of::<C>())
            .and_then(|c| c.downcast::<C>().ok())
            .map(|c| *c)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for VolumeStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeStack")
            .field("components", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/volume.rs"]
mod tests;

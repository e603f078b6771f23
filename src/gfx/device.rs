use std::collections::HashMap;

use crate::foundation::error::{NtscError, NtscResult};
use crate::gfx::command::{CommandList, TemporaryDesc};
use crate::shader::registry::PropertyId;

/// Executes recorded command lists.
pub trait GraphicsDevice {
    fn execute(&mut self, list: &CommandList) -> NtscResult<()>;

    /// Immediate global uniform write, outside any list.
    fn set_global_uint(&mut self, property: PropertyId, value: u32);
}

/// Largest side a temporary target may have.
pub const MAX_TEXTURE_DIMENSION: u32 = 16384;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScratchStats {
    pub acquisitions: u64,
    pub releases: u64,
    pub peak_live: usize,
}

/// Book-keeping for temporary targets, checked at command-list granularity.
#[derive(Debug, Default)]
pub struct ScratchTracker {
    live: HashMap<PropertyId, TemporaryDesc>,
    stats: ScratchStats,
}

impl ScratchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ScratchStats {
        self.stats.clone()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: PropertyId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn acquire(&mut self, id: PropertyId, desc: TemporaryDesc) -> NtscResult<()> {
        if desc.size.is_degenerate() {
            return Err(NtscError::resource(format!(
                "temporary {id:?} requested with degenerate size {}",
                desc.size
            )));
        }
        if desc.size.width > MAX_TEXTURE_DIMENSION || desc.size.height > MAX_TEXTURE_DIMENSION {
            return Err(NtscError::resource(format!(
                "temporary {id:?} requested at {}, above the {MAX_TEXTURE_DIMENSION} texel limit",
                desc.size
            )));
        }
        if self.live.insert(id, desc).is_some() {
            return Err(NtscError::resource(format!(
                "temporary {id:?} acquired twice"
            )));
        }
        self.stats.acquisitions = self.stats.acquisitions.saturating_add(1);
        self.stats.peak_live = self.stats.peak_live.max(self.live.len());
        Ok(())
    }

    pub fn release(&mut self, id: PropertyId) -> NtscResult<TemporaryDesc> {
        let desc = self.live.remove(&id).ok_or_else(|| {
            NtscError::resource(format!("temporary {id:?} released while not acquired"))
        })?;
        self.stats.releases = self.stats.releases.saturating_add(1);
        Ok(desc)
    }

    /// End-of-list leak check; leaked targets are dropped so the next list starts clean.
    pub fn finish(&mut self, list_name: &str) -> NtscResult<()> {
        if self.live.is_empty() {
            return Ok(());
        }
        let mut leaked: Vec<PropertyId> = self.live.drain().map(|(id, _)| id).collect();
        leaked.sort();
        Err(NtscError::resource(format!(
            "command list '{list_name}' leaked temporaries {leaked:?}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/device.rs"]
mod tests;

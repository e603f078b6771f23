use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::{NtscError, NtscResult};
use crate::gfx::command::{Command, CommandList, TextureId};
use crate::gfx::device::{GraphicsDevice, MAX_TEXTURE_DIMENSION, ScratchStats, ScratchTracker};
use crate::host::volume::VolumeStack;
use crate::render::backend::{EffectBackend, FrameContext, FrameOutcome};
use crate::shader::program::StaticShaderLibrary;
use crate::shader::registry::{PropertyId, ShaderRegistry, Uniform};

use super::image::FloatImage;
use super::program;

/// Software device executing command lists with the reference program.
pub struct CpuDevice {
    registry: Arc<ShaderRegistry>,
    textures: HashMap<TextureId, FloatImage>,
    globals: HashMap<PropertyId, u32>,
    scratch: ScratchTracker,
    blits: u64,
}

impl CpuDevice {
    pub fn new(registry: Arc<ShaderRegistry>) -> Self {
        Self {
            registry,
            textures: HashMap::new(),
            globals: HashMap::new(),
            scratch: ScratchTracker::new(),
            blits: 0,
        }
    }

    /// Library exposing the program this device implements.
    pub fn shader_library() -> StaticShaderLibrary {
        StaticShaderLibrary::with_ntsc()
    }

    pub fn bind(&mut self, id: TextureId, image: FloatImage) {
        self.textures.insert(id, image);
    }

    pub fn texture(&self, id: TextureId) -> Option<&FloatImage> {
        self.textures.get(&id)
    }

    pub fn take(&mut self, id: TextureId) -> Option<FloatImage> {
        self.textures.remove(&id)
    }

    pub fn global(&self, property: PropertyId) -> Option<u32> {
        self.globals.get(&property).copied()
    }

    pub fn scratch_stats(&self) -> ScratchStats {
        self.scratch.stats()
    }

    pub fn live_scratch(&self) -> usize {
        self.scratch.live_count()
    }

    pub fn blit_count(&self) -> u64 {
        self.blits
    }

    /// Push one still image through `backend` as frame `index`.
    ///
    /// `destination_size` only matters for backends with a separate destination target.
    /// Pass-through frames return the input unchanged.
    pub fn render_still(
        &mut self,
        backend: &mut dyn EffectBackend,
        frame: FloatImage,
        index: FrameIndex,
        volumes: &VolumeStack,
        destination_size: Option<Extent>,
    ) -> NtscResult<(FrameOutcome, FloatImage)> {
        let targets = backend.frame_targets();
        let color_size = frame.size();
        let destination_size = destination_size.map(Extent::clamped);
        self.bind(targets.source, frame);
        if targets.destination != targets.source {
            let size = destination_size.unwrap_or(color_size);
            if size.width > MAX_TEXTURE_DIMENSION || size.height > MAX_TEXTURE_DIMENSION {
                return Err(NtscError::resource(format!(
                    "destination {size} is above the {MAX_TEXTURE_DIMENSION} texel limit"
                )));
            }
            self.bind(targets.destination, FloatImage::new(size));
        }
        let outcome = backend.render_frame(FrameContext {
            index,
            color_size,
            destination_size,
            volumes,
            device: &mut *self,
        })?;
        let read = match outcome {
            FrameOutcome::Rendered => targets.destination,
            FrameOutcome::PassThrough => targets.source,
        };
        let image = self
            .take(read)
            .ok_or_else(|| NtscError::device(format!("{read:?} was not written")))?;
        Ok((outcome, image))
    }

    fn apply(&mut self, cmd: &Command) -> NtscResult<()> {
        match cmd {
            Command::GetTemporary { id, desc } => {
                self.scratch.acquire(*id, *desc)?;
                self.textures
                    .insert(TextureId::Temporary(*id), FloatImage::new(desc.size));
            }
            Command::ReleaseTemporary { id } => {
                self.scratch.release(*id)?;
                self.textures.remove(&TextureId::Temporary(*id));
            }
            Command::SetGlobalUint { property, value } => {
                self.globals.insert(*property, *value);
            }
            Command::Blit {
                src,
                dst,
                pass,
                config,
            } => {
                let input = self.textures.get(src).ok_or_else(|| {
                    NtscError::device(format!("blit source {src:?} is not bound"))
                })?;
                let dst_size = self
                    .textures
                    .get(dst)
                    .map(FloatImage::size)
                    .ok_or_else(|| {
                        NtscError::device(format!("blit destination {dst:?} is not bound"))
                    })?;
                let frame_count = self
                    .global(self.registry.uniform_id(Uniform::FrameCountNum))
                    .unwrap_or(0);
                let out = program::run_pass(*pass, config, frame_count, input, dst_size);
                self.textures.insert(*dst, out);
                self.blits += 1;
            }
        }
        Ok(())
    }
}

impl GraphicsDevice for CpuDevice {
    #[tracing::instrument(skip_all, fields(list = %list.name, commands = list.commands.len()))]
    fn execute(&mut self, list: &CommandList) -> NtscResult<()> {
        let result = list.commands.iter().try_for_each(|cmd| self.apply(cmd));
        let live: Vec<PropertyId> = self
            .textures
            .keys()
            .filter_map(|id| match id {
                TextureId::Temporary(p) if self.scratch.is_live(*p) => Some(*p),
                _ => None,
            })
            .collect();
        for p in live {
            self.textures.remove(&TextureId::Temporary(p));
        }
        let leaks = self.scratch.finish(&list.name);
        result.and(leaks)
    }

    fn set_global_uint(&mut self, property: PropertyId, value: u32) {
        self.globals.insert(property, value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/device.rs"]
mod tests;

use std::sync::Arc;

use crate::foundation::core::Extent;
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TemporaryDesc, TextureFormat, TextureId};
use crate::render::sequencer::FrameAdapter;
use crate::shader::config::PassConfig;
use crate::shader::program::ShaderPass;
use crate::shader::registry::PropertyId;

/// [`FrameAdapter`] that records the pass sequence into a command list for later submission.
pub struct CommandRecorder<'a> {
    list: &'a mut CommandList,
    dims: Extent,
    source: TextureId,
    destination: TextureId,
    format: TextureFormat,
}

impl<'a> CommandRecorder<'a> {
    /// Record in place on `target` (read and written), with default-format scratch.
    pub fn new(list: &'a mut CommandList, dims: Extent, target: TextureId) -> Self {
        Self {
            list,
            dims,
            source: target,
            destination: target,
            format: TextureFormat::Default,
        }
    }

    pub fn with_destination(mut self, destination: TextureId) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_scratch_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }
}

impl FrameAdapter for CommandRecorder<'_> {
    fn frame_dimensions(&self) -> Extent {
        self.dims
    }

    fn frame_color_target(&self) -> TextureId {
        self.source
    }

    fn destination(&self) -> TextureId {
        self.destination
    }

    fn scratch_format(&self) -> TextureFormat {
        self.format
    }

    fn acquire_scratch(&mut self, id: PropertyId, desc: TemporaryDesc) -> NtscResult<()> {
        self.list.get_temporary(id, desc);
        Ok(())
    }

    fn release_scratch(&mut self, id: PropertyId) -> NtscResult<()> {
        self.list.release_temporary(id);
        Ok(())
    }

    fn write_frame_count(&mut self, property: PropertyId, value: u32) {
        self.list.set_global_uint(property, value);
    }

    fn blit(
        &mut self,
        src: TextureId,
        dst: TextureId,
        pass: ShaderPass,
        config: &Arc<PassConfig>,
    ) -> NtscResult<()> {
        self.list.blit(src, dst, pass, Arc::clone(config));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recorder.rs"]
mod tests;

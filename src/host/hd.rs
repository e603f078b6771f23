use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TextureId};
use crate::host::volume::VolumeStack;
use crate::shader::program::ShaderLibrary;

/// Injection points of the deferred renderer's custom post-process stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InjectionPoint {
    AfterOpaqueAndSky,
    BeforePostProcess,
    AfterPostProcess,
}

/// Camera as seen by a custom post-process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HdCamera {
    /// Pixel size the camera renders at this frame (dynamic resolution applied).
    pub actual_size: Extent,
}

/// Render target handle; `scaled_size` is the region valid this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtHandle {
    pub id: TextureId,
    pub scaled_size: Extent,
}

/// Per-frame inputs for a custom post-process invocation.
#[derive(Clone, Copy, Debug)]
pub struct PostProcessFrame<'a> {
    pub camera: HdCamera,
    pub source: RtHandle,
    pub destination: RtHandle,
    pub volumes: &'a VolumeStack,
    pub index: FrameIndex,
}

/// Custom post-process hook of the deferred renderer.
pub trait CustomPostProcess {
    fn injection_point(&self) -> InjectionPoint;

    fn setup(&mut self, library: &dyn ShaderLibrary);

    fn is_active(&self, volumes: &VolumeStack) -> bool;

    fn render(&mut self, cmd: &mut CommandList, frame: &PostProcessFrame<'_>) -> NtscResult<()>;

    fn cleanup(&mut self);
}

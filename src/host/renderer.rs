use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TextureId};
use crate::gfx::device::GraphicsDevice;
use crate::host::graph::{RenderGraph, TextureHandle};

/// Injection points of the forward renderer, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPassEvent {
    BeforeRenderingPostProcessing,
    AfterRenderingPostProcessing,
    AfterRendering,
}

/// How the renderer runs its enqueued passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Each pass records and submits its own command list.
    Retained,
    /// Passes declare resources on a frame graph that is compiled and executed afterwards.
    RenderGraph,
}

/// Per-frame state for retained execution.
pub struct RenderContext<'a> {
    device: &'a mut dyn GraphicsDevice,
    pub color_size: Extent,
    pub frame: FrameIndex,
}

impl RenderContext<'_> {
    pub fn execute_command_list(&mut self, list: &CommandList) -> NtscResult<()> {
        self.device.execute(list)
    }
}

/// Frame resources exposed to graph recording.
#[derive(Clone, Copy, Debug)]
pub struct FrameResources {
    pub active_color: TextureHandle,
    pub color_size: Extent,
    pub frame: FrameIndex,
}

pub trait ScriptableRenderPass {
    fn name(&self) -> &str;

    fn event(&self) -> RenderPassEvent;

    fn execute(&mut self, ctx: &mut RenderContext<'_>) -> NtscResult<()>;

    fn record_render_graph(
        &mut self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> NtscResult<()>;
}

/// Forward renderer for one camera; passes are enqueued per frame and drained by `render`.
pub struct ScriptableRenderer {
    mode: ExecutionMode,
    queued: Vec<Box<dyn ScriptableRenderPass>>,
}

impl ScriptableRenderer {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            queued: Vec::new(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn enqueue_pass(&mut self, pass: Box<dyn ScriptableRenderPass>) {
        self.queued.push(pass);
    }

    pub fn queued_passes(&self) -> usize {
        self.queued.len()
    }

    pub fn render(
        &mut self,
        device: &mut dyn GraphicsDevice,
        color_size: Extent,
        frame: FrameIndex,
    ) -> NtscResult<()> {
        let mut passes = std::mem::take(&mut self.queued);
        passes.sort_by_key(|p| p.event());
        match self.mode {
            ExecutionMode::Retained => {
                let mut ctx = RenderContext {
                    device,
                    color_size,
                    frame,
                };
                for pass in &mut passes {
                    pass.execute(&mut ctx)?;
                }
                Ok(())
            }
            ExecutionMode::RenderGraph => {
                let mut graph = RenderGraph::new();
                let resources = FrameResources {
                    active_color: graph.import_texture(TextureId::CameraTarget, color_size),
                    color_size,
                    frame,
                };
                for pass in &mut passes {
                    pass.record_render_graph(&mut graph, &resources)?;
                }
                graph.execute(device)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/renderer.rs"]
mod tests;

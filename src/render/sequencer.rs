use std::sync::Arc;

use crate::effect::params::EffectParams;
use crate::effect::sizer;
use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::NtscResult;
use crate::gfx::command::{TemporaryDesc, TextureFormat, TextureId};
use crate::shader::config::PassConfig;
use crate::shader::program::ShaderPass;
use crate::shader::registry::{PropertyId, ScratchSlot, ShaderRegistry, Uniform};

/// The narrow surface each host adapter implements for the pass sequence.
pub trait FrameAdapter {
    fn frame_dimensions(&self) -> Extent;

    fn frame_color_target(&self) -> TextureId;

    /// Where the reconstruct pass writes; the color target unless the host hands out a
    /// separate destination.
    fn destination(&self) -> TextureId {
        self.frame_color_target()
    }

    fn scratch_format(&self) -> TextureFormat {
        TextureFormat::Default
    }

    fn acquire_scratch(&mut self, id: PropertyId, desc: TemporaryDesc) -> NtscResult<()>;

    fn release_scratch(&mut self, id: PropertyId) -> NtscResult<()>;

    fn write_frame_count(&mut self, property: PropertyId, value: u32);

    fn blit(
        &mut self,
        src: TextureId,
        dst: TextureId,
        pass: ShaderPass,
        config: &Arc<PassConfig>,
    ) -> NtscResult<()>;
}

/// Host extras folded into a frame's pass configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanOptions {
    pub uv_scale: Option<[f32; 2]>,
    pub hdrp_keyword: bool,
}

/// Everything the four passes need for one frame, resolved up front.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub frame: Extent,
    pub buffer: Extent,
    pub scanlines: Extent,
    pub config: Arc<PassConfig>,
    /// Present only when the decode pass consumes the temporal dither.
    pub frame_count: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct PassSequencer {
    registry: Arc<ShaderRegistry>,
}

impl PassSequencer {
    pub fn new(registry: Arc<ShaderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ShaderRegistry> {
        &self.registry
    }

    pub fn plan(
        &self,
        params: &EffectParams,
        frame: Extent,
        index: FrameIndex,
        opts: PlanOptions,
    ) -> FramePlan {
        let frame = frame.clamped();
        let scanlines = params.buffer_height.max(1);
        let orientation = params.display_orientation;
        let buffer = sizer::buffer_size(frame, scanlines, orientation).clamped();
        let scan_extent = sizer::scanline_extent(frame, scanlines, orientation);
        let config =
            PassConfig::from_params(params, scan_extent, opts.uv_scale, opts.hdrp_keyword);
        FramePlan {
            frame,
            buffer,
            scanlines: scan_extent,
            config: Arc::new(config),
            frame_count: params.uses_frame_count().then(|| index.as_uniform()),
        }
    }

    /// Drive `adapter` through capture, encode, decode and reconstruct.
    ///
    /// Scratch B is released right after decode, A after reconstruct. On a failing blit the
    /// acquired targets are still released before the error is returned.
    pub fn record<A: FrameAdapter + ?Sized>(
        &self,
        adapter: &mut A,
        plan: &FramePlan,
    ) -> NtscResult<()> {
        if let Some(count) = plan.frame_count {
            adapter.write_frame_count(self.registry.uniform_id(Uniform::FrameCountNum), count);
        }

        let a = self.registry.scratch_id(ScratchSlot::A);
        let b = self.registry.scratch_id(ScratchSlot::B);
        let desc = TemporaryDesc {
            size: plan.buffer,
            format: adapter.scratch_format(),
        };
        let src = adapter.frame_color_target();
        let dst = adapter.destination();
        let (ta, tb) = (TextureId::Temporary(a), TextureId::Temporary(b));

        adapter.acquire_scratch(a, desc)?;
        if let Err(err) = adapter.acquire_scratch(b, desc) {
            adapter.release_scratch(a)?;
            return Err(err);
        }

        let front = blit_front(adapter, src, ta, tb, &plan.config);
        let released_b = adapter.release_scratch(b);
        let back = front
            .and(released_b)
            .and_then(|()| adapter.blit(ta, dst, ShaderPass::Reconstruct, &plan.config));
        let released_a = adapter.release_scratch(a);
        back.and(released_a)
    }

    #[tracing::instrument(skip_all, fields(frame = index.0))]
    pub fn run<A: FrameAdapter + ?Sized>(
        &self,
        adapter: &mut A,
        params: &EffectParams,
        index: FrameIndex,
        opts: PlanOptions,
    ) -> NtscResult<FramePlan> {
        let plan = self.plan(params, adapter.frame_dimensions(), index, opts);
        tracing::trace!(buffer = %plan.buffer, "recording NTSC passes");
        self.record(adapter, &plan)?;
        Ok(plan)
    }
}

fn blit_front<A: FrameAdapter + ?Sized>(
    adapter: &mut A,
    src: TextureId,
    a: TextureId,
    b: TextureId,
    config: &Arc<PassConfig>,
) -> NtscResult<()> {
    adapter.blit(src, a, ShaderPass::Capture, config)?;
    adapter.blit(a, b, ShaderPass::Encode, config)?;
    adapter.blit(b, a, ShaderPass::Decode, config)
}

#[cfg(test)]
#[path = "../../tests/unit/render/sequencer.rs"]
mod tests;

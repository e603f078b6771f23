use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::effect::params::EffectParams;
use crate::foundation::core::Extent;
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TextureFormat, TextureId};
use crate::host::hd::{CustomPostProcess, HdCamera, InjectionPoint, PostProcessFrame, RtHandle};
use crate::host::volume::{VolumeComponent, VolumeStack};
use crate::render::backend::{EffectBackend, FrameContext, FrameOutcome, FrameTargets};
use crate::render::recorder::CommandRecorder;
use crate::render::resolve::ConfigResolver;
use crate::render::sequencer::{PassSequencer, PlanOptions};
use crate::shader::program::{ProgramSlot, ShaderLibrary};
use crate::shader::registry::ShaderRegistry;

/// Volume component holding the effect parameters; `enable` is its activity flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtscVolume {
    pub enable: bool,
    #[serde(flatten)]
    pub params: EffectParams,
}

impl Default for NtscVolume {
    fn default() -> Self {
        Self {
            enable: true,
            params: EffectParams::default(),
        }
    }
}

impl VolumeComponent for NtscVolume {
    fn is_active(&self) -> bool {
        self.enable
    }
}

impl ConfigResolver for NtscVolume {
    fn resolve(&self) -> EffectParams {
        self.params.clone()
    }
}

/// `destination / camera`: the portion of the destination the camera actually covers.
pub fn uv_scale(camera: HdCamera, destination: RtHandle) -> [f32; 2] {
    let cam = camera.actual_size.clamped().as_f32();
    let dst = destination.scaled_size.as_f32();
    [dst[0] / cam[0], dst[1] / cam[1]]
}

/// Custom post-process injected after the deferred renderer's own post stack.
pub struct NtscPostprocessHdrp {
    sequencer: PassSequencer,
    program: ProgramSlot,
    /// State the volume system reports when no volume overrides the component.
    fallback: NtscVolume,
}

impl NtscPostprocessHdrp {
    pub fn new(fallback: NtscVolume, registry: Arc<ShaderRegistry>) -> Self {
        Self {
            sequencer: PassSequencer::new(registry),
            program: ProgramSlot::default(),
            fallback,
        }
    }

    pub fn volume<'a>(&'a self, volumes: &'a VolumeStack) -> &'a NtscVolume {
        volumes.get::<NtscVolume>().unwrap_or(&self.fallback)
    }
}

impl CustomPostProcess for NtscPostprocessHdrp {
    fn injection_point(&self) -> InjectionPoint {
        InjectionPoint::AfterPostProcess
    }

    fn setup(&mut self, library: &dyn ShaderLibrary) {
        self.program.resolve(library);
    }

    fn is_active(&self, volumes: &VolumeStack) -> bool {
        self.program.is_ready() && self.volume(volumes).is_active()
    }

    #[tracing::instrument(skip_all, fields(frame = frame.index.0))]
    fn render(&mut self, cmd: &mut CommandList, frame: &PostProcessFrame<'_>) -> NtscResult<()> {
        let params = self.volume(frame.volumes).resolve();
        let opts = PlanOptions {
            uv_scale: Some(uv_scale(frame.camera, frame.destination)),
            hdrp_keyword: true,
        };
        let mut recorder = CommandRecorder::new(cmd, frame.camera.actual_size, frame.source.id)
            .with_destination(frame.destination.id)
            .with_scratch_format(TextureFormat::Rgba16Float);
        self.sequencer
            .run(&mut recorder, &params, frame.index, opts)?;
        Ok(())
    }

    fn cleanup(&mut self) {
        self.program.release();
    }
}

/// Deferred adapter: the custom post-process registered at its injection point.
pub struct HdrpBackend {
    pass: NtscPostprocessHdrp,
}

impl HdrpBackend {
    pub fn new(
        defaults: EffectParams,
        registry: Arc<ShaderRegistry>,
        library: &dyn ShaderLibrary,
    ) -> Self {
        let fallback = NtscVolume {
            enable: true,
            params: defaults,
        };
        let mut pass = NtscPostprocessHdrp::new(fallback, registry);
        pass.setup(library);
        tracing::debug!(injection = ?pass.injection_point(), "HDRP NTSC post-process registered");
        Self { pass }
    }

    pub fn pass(&self) -> &NtscPostprocessHdrp {
        &self.pass
    }
}

impl EffectBackend for HdrpBackend {
    fn name(&self) -> &'static str {
        "hdrp"
    }

    fn is_active(&self, volumes: &VolumeStack) -> bool {
        self.pass.is_active(volumes)
    }

    fn frame_targets(&self) -> FrameTargets {
        FrameTargets {
            source: TextureId::Source,
            destination: TextureId::Destination,
        }
    }

    fn render_frame(&mut self, ctx: FrameContext<'_>) -> NtscResult<FrameOutcome> {
        if !self.pass.is_active(ctx.volumes) {
            return Ok(FrameOutcome::PassThrough);
        }
        let actual: Extent = ctx.color_size.clamped();
        let frame = PostProcessFrame {
            camera: HdCamera {
                actual_size: actual,
            },
            source: RtHandle {
                id: TextureId::Source,
                scaled_size: actual,
            },
            destination: RtHandle {
                id: TextureId::Destination,
                scaled_size: ctx.destination_size.unwrap_or(actual),
            },
            volumes: ctx.volumes,
            index: ctx.index,
        };
        let mut cmd = CommandList::new("NTSC");
        self.pass.render(&mut cmd, &frame)?;
        ctx.device.execute(&cmd)?;
        Ok(FrameOutcome::Rendered)
    }

    fn shutdown(&mut self) {
        self.pass.cleanup();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backends/hdrp.rs"]
mod tests;

use std::sync::Arc;

use crate::effect::params::{DisplayOrientation, EffectParams};
use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TextureId};
use crate::gfx::device::GraphicsDevice;
use crate::host::camera::{Camera, CameraEvent, CommandListId, PipelineSettings};
use crate::host::volume::VolumeStack;
use crate::render::backend::{EffectBackend, FrameContext, FrameOutcome, FrameTargets};
use crate::render::recorder::CommandRecorder;
use crate::render::resolve::ConfigResolver;
use crate::render::sequencer::{FramePlan, PassSequencer, PlanOptions};
use crate::shader::program::{ProgramSlot, ShaderLibrary};
use crate::shader::registry::{ShaderRegistry, Uniform};

const LIST_NAME: &str = "NTSC";

/// Inputs that change the scratch buffer size; any change re-records the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SizeKey {
    frame: Extent,
    buffer_height: u32,
    orientation: DisplayOrientation,
}

impl SizeKey {
    fn of(params: &EffectParams, frame: Extent) -> Self {
        Self {
            frame: frame.clamped(),
            buffer_height: params.buffer_height,
            orientation: params.display_orientation,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Attachment {
    id: CommandListId,
    key: SizeKey,
}

/// Camera component of the fixed pipeline.
///
/// The pass sequence is recorded once into a command list attached at
/// [`CameraEvent::BeforeImageEffects`]; per-frame work is limited to the frame-count global and
/// rebinding the pass configuration.
pub struct NtscPostprocess {
    pub params: EffectParams,
    sequencer: PassSequencer,
    program: ProgramSlot,
    attached: Option<Attachment>,
    rebuilds: u64,
}

impl NtscPostprocess {
    pub fn new(params: EffectParams, registry: Arc<ShaderRegistry>) -> Self {
        Self {
            params,
            sequencer: PassSequencer::new(registry),
            program: ProgramSlot::default(),
            attached: None,
            rebuilds: 0,
        }
    }

    pub fn enable(
        &mut self,
        camera: &mut Camera,
        settings: &PipelineSettings,
        library: &dyn ShaderLibrary,
    ) {
        self.setup(camera, settings, library);
    }

    /// Re-apply after an edit of `params`.
    pub fn validate(
        &mut self,
        camera: &mut Camera,
        settings: &PipelineSettings,
        library: &dyn ShaderLibrary,
    ) {
        self.setup(camera, settings, library);
    }

    pub fn disable(&mut self, camera: &mut Camera) {
        if let Some(att) = self.attached.take() {
            camera.remove_command_list(att.id);
            tracing::debug!("legacy NTSC command list detached");
        }
        self.program.release();
    }

    pub fn is_active(&self) -> bool {
        self.attached.is_some()
    }

    /// Times the command list has been (re-)recorded.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    fn setup(
        &mut self,
        camera: &mut Camera,
        settings: &PipelineSettings,
        library: &dyn ShaderLibrary,
    ) {
        if !settings.is_legacy() {
            if let Some(att) = self.attached.take() {
                camera.remove_command_list(att.id);
            }
            tracing::debug!("render pipeline asset configured; legacy NTSC stays detached");
            return;
        }
        if !self.program.resolve(library) {
            return;
        }
        if let Err(err) = self.refresh(camera, FrameIndex::default()) {
            tracing::warn!(error = %err, "legacy NTSC setup failed");
        }
    }

    /// Per-frame tick: frame-count global, then list refresh.
    #[tracing::instrument(skip_all, fields(frame = index.0))]
    pub fn update(
        &mut self,
        camera: &mut Camera,
        device: &mut dyn GraphicsDevice,
        index: FrameIndex,
    ) -> NtscResult<()> {
        if !self.is_active() {
            return Ok(());
        }
        if self.params.uses_frame_count() {
            let property = self.sequencer.registry().uniform_id(Uniform::FrameCountNum);
            device.set_global_uint(property, index.as_uniform());
        }
        self.refresh(camera, index)
    }

    fn plan(&self, frame: Extent, index: FrameIndex) -> FramePlan {
        let params = self.params.resolve();
        let mut plan = self
            .sequencer
            .plan(&params, frame, index, PlanOptions::default());
        // The frame count goes through the global set in `update`, not the fixed list.
        plan.frame_count = None;
        plan
    }

    fn record(&self, list: &mut CommandList, plan: &FramePlan) -> NtscResult<()> {
        list.clear();
        let mut recorder = CommandRecorder::new(list, plan.frame, TextureId::CameraTarget);
        self.sequencer.record(&mut recorder, plan)
    }

    fn refresh(&mut self, camera: &mut Camera, index: FrameIndex) -> NtscResult<()> {
        let frame = camera.pixel_size();
        let key = SizeKey::of(&self.params, frame);
        let plan = self.plan(frame, index);

        match self.attached {
            Some(att) if att.key == key => {
                if let Some(list) = camera.command_list_mut(att.id) {
                    list.rebind_config(&plan.config);
                }
                Ok(())
            }
            Some(att) => {
                if let Some(list) = camera.command_list_mut(att.id) {
                    self.record(list, &plan)?;
                }
                self.attached = Some(Attachment { id: att.id, key });
                self.rebuilds += 1;
                tracing::debug!(buffer = %plan.buffer, "legacy NTSC command list rebuilt");
                Ok(())
            }
            None => {
                let mut list = CommandList::new(LIST_NAME);
                self.record(&mut list, &plan)?;
                let id = camera.add_command_list(CameraEvent::BeforeImageEffects, list);
                self.attached = Some(Attachment { id, key });
                self.rebuilds += 1;
                tracing::debug!(buffer = %plan.buffer, "legacy NTSC command list attached");
                Ok(())
            }
        }
    }
}

/// Legacy adapter: one camera carrying the component.
pub struct LegacyBackend {
    component: NtscPostprocess,
    camera: Camera,
}

impl LegacyBackend {
    pub fn new(
        params: EffectParams,
        settings: PipelineSettings,
        registry: Arc<ShaderRegistry>,
        library: &dyn ShaderLibrary,
    ) -> Self {
        let mut camera = Camera::new(Extent::new(1, 1));
        let mut component = NtscPostprocess::new(params, registry);
        component.enable(&mut camera, &settings, library);
        Self { component, camera }
    }

    pub fn component(&self) -> &NtscPostprocess {
        &self.component
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

impl EffectBackend for LegacyBackend {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn is_active(&self, _volumes: &VolumeStack) -> bool {
        self.component.is_active()
    }

    fn frame_targets(&self) -> FrameTargets {
        FrameTargets {
            source: TextureId::CameraTarget,
            destination: TextureId::CameraTarget,
        }
    }

    fn render_frame(&mut self, ctx: FrameContext<'_>) -> NtscResult<FrameOutcome> {
        if !self.component.is_active() {
            return Ok(FrameOutcome::PassThrough);
        }
        self.camera.resize(ctx.color_size);
        self.component
            .update(&mut self.camera, &mut *ctx.device, ctx.index)?;
        self.camera.render(ctx.device)?;
        Ok(FrameOutcome::Rendered)
    }

    fn shutdown(&mut self) {
        self.component.disable(&mut self.camera);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backends/legacy.rs"]
mod tests;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::effect::params::EffectParams;
use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::NtscResult;
use crate::gfx::command::{CommandList, TextureId};
use crate::host::graph::{AccessFlags, RenderGraph};
use crate::host::renderer::{
    ExecutionMode, FrameResources, RenderContext, RenderPassEvent, ScriptableRenderPass,
    ScriptableRenderer,
};
use crate::host::volume::{VolumeComponent, VolumeStack};
use crate::render::backend::{EffectBackend, FrameContext, FrameOutcome, FrameTargets};
use crate::render::recorder::CommandRecorder;
use crate::render::resolve::{ConfigResolver, OverrideResolver, ParamsOverride};
use crate::render::sequencer::{PassSequencer, PlanOptions};
use crate::shader::program::{ProgramSlot, ShaderLibrary};
use crate::shader::registry::ShaderRegistry;

const PASS_NAME: &str = "NTSCPass";

/// Scene-level override; disabled unless a volume turns it on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtscOverride {
    pub enable: bool,
    #[serde(flatten)]
    pub params: EffectParams,
}

impl VolumeComponent for NtscOverride {
    fn is_active(&self) -> bool {
        self.enable
    }
}

impl ParamsOverride for NtscOverride {
    fn params(&self) -> &EffectParams {
        &self.params
    }
}

/// Render pass enqueued after post-processing; operates in place on the camera color.
#[derive(Clone, Debug)]
pub struct NtscRenderPass {
    sequencer: PassSequencer,
    params: EffectParams,
}

impl NtscRenderPass {
    pub fn new(sequencer: PassSequencer) -> Self {
        Self {
            sequencer,
            params: EffectParams::default(),
        }
    }

    pub fn setup(&mut self, params: EffectParams) {
        self.params = params;
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    fn record_into(
        sequencer: &PassSequencer,
        params: &EffectParams,
        list: &mut CommandList,
        target: TextureId,
        size: Extent,
        frame: FrameIndex,
    ) -> NtscResult<()> {
        let mut recorder = CommandRecorder::new(list, size, target);
        sequencer.run(&mut recorder, params, frame, PlanOptions::default())?;
        Ok(())
    }

    /// Commands the retained strategy submits for a frame.
    pub fn record_retained(&self, size: Extent, frame: FrameIndex) -> NtscResult<CommandList> {
        let mut list = CommandList::new(PASS_NAME);
        Self::record_into(
            &self.sequencer,
            &self.params,
            &mut list,
            TextureId::CameraTarget,
            size,
            frame,
        )?;
        Ok(list)
    }
}

impl ScriptableRenderPass for NtscRenderPass {
    fn name(&self) -> &str {
        PASS_NAME
    }

    fn event(&self) -> RenderPassEvent {
        RenderPassEvent::AfterRenderingPostProcessing
    }

    fn execute(&mut self, ctx: &mut RenderContext<'_>) -> NtscResult<()> {
        let list = self.record_retained(ctx.color_size, ctx.frame)?;
        ctx.execute_command_list(&list)
    }

    fn record_render_graph(
        &mut self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> NtscResult<()> {
        let color = frame.active_color;
        let index = frame.frame;
        let sequencer = self.sequencer.clone();
        let params = self.params.clone();
        graph.add_unsafe_pass(PASS_NAME, move |builder| {
            builder.use_texture(color, AccessFlags::ReadWrite)?;
            builder.set_render_func(move |ctx| {
                let target = ctx.texture(color)?;
                let size = ctx.texture_size(color)?;
                Self::record_into(
                    &sequencer,
                    &params,
                    ctx.native_command_list(),
                    target,
                    size,
                    index,
                )
            });
            Ok(())
        })
    }
}

/// Renderer feature owning the pass and the static defaults.
pub struct NtscFeature {
    pub defaults: EffectParams,
    active: bool,
    program: ProgramSlot,
    pass: Option<NtscRenderPass>,
    sequencer: PassSequencer,
}

impl NtscFeature {
    pub fn new(defaults: EffectParams, registry: Arc<ShaderRegistry>) -> Self {
        Self {
            defaults,
            active: true,
            program: ProgramSlot::default(),
            pass: None,
            sequencer: PassSequencer::new(registry),
        }
    }

    pub fn create(&mut self, library: &dyn ShaderLibrary) {
        if self.program.resolve(library) {
            self.pass = Some(NtscRenderPass::new(self.sequencer.clone()));
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active && self.pass.is_some()
    }

    pub fn resolve(&self, volumes: &VolumeStack) -> EffectParams {
        OverrideResolver::<NtscOverride>::new(&self.defaults, volumes).resolve()
    }

    /// Enqueue the pass configured for this frame; `false` when nothing was enqueued.
    pub fn add_render_passes(
        &mut self,
        renderer: &mut ScriptableRenderer,
        volumes: &VolumeStack,
    ) -> bool {
        if !self.active {
            return false;
        }
        let params = self.resolve(volumes);
        let Some(pass) = self.pass.as_mut() else {
            return false;
        };
        pass.setup(params);
        renderer.enqueue_pass(Box::new(pass.clone()));
        true
    }

    pub fn dispose(&mut self) {
        self.pass = None;
        self.program.release();
    }
}

/// Forward+ adapter: one renderer with the feature installed.
pub struct UrpBackend {
    feature: NtscFeature,
    renderer: ScriptableRenderer,
}

impl UrpBackend {
    pub fn new(
        defaults: EffectParams,
        strategy: ExecutionMode,
        registry: Arc<ShaderRegistry>,
        library: &dyn ShaderLibrary,
    ) -> Self {
        let mut feature = NtscFeature::new(defaults, registry);
        feature.create(library);
        tracing::debug!(?strategy, "URP NTSC feature created");
        Self {
            feature,
            renderer: ScriptableRenderer::new(strategy),
        }
    }

    pub fn feature(&self) -> &NtscFeature {
        &self.feature
    }

    pub fn feature_mut(&mut self) -> &mut NtscFeature {
        &mut self.feature
    }

    pub fn strategy(&self) -> ExecutionMode {
        self.renderer.mode()
    }
}

impl EffectBackend for UrpBackend {
    fn name(&self) -> &'static str {
        match self.renderer.mode() {
            ExecutionMode::Retained => "urp",
            ExecutionMode::RenderGraph => "urp-graph",
        }
    }

    fn is_active(&self, _volumes: &VolumeStack) -> bool {
        self.feature.is_active()
    }

    fn frame_targets(&self) -> FrameTargets {
        FrameTargets {
            source: TextureId::CameraTarget,
            destination: TextureId::CameraTarget,
        }
    }

    #[tracing::instrument(skip_all, fields(frame = ctx.index.0))]
    fn render_frame(&mut self, ctx: FrameContext<'_>) -> NtscResult<FrameOutcome> {
        if !self
            .feature
            .add_render_passes(&mut self.renderer, ctx.volumes)
        {
            return Ok(FrameOutcome::PassThrough);
        }
        self.renderer
            .render(ctx.device, ctx.color_size.clamped(), ctx.index)?;
        Ok(FrameOutcome::Rendered)
    }

    fn shutdown(&mut self) {
        self.feature.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backends/urp.rs"]
mod tests;

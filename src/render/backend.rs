use std::sync::Arc;

use crate::backends::hdrp::HdrpBackend;
use crate::backends::legacy::LegacyBackend;
use crate::backends::urp::UrpBackend;
use crate::effect::params::EffectParams;
use crate::foundation::core::{Extent, FrameIndex};
use crate::foundation::error::{NtscError, NtscResult};
use crate::gfx::command::TextureId;
use crate::gfx::device::GraphicsDevice;
use crate::host::camera::PipelineSettings;
use crate::host::renderer::ExecutionMode;
use crate::host::volume::VolumeStack;
use crate::shader::program::ShaderLibrary;
use crate::shader::registry::ShaderRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModernPipeline {
    Universal,
    HighDefinition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivePipeline {
    Legacy,
    Universal,
    HighDefinition,
}

/// What the running host reports about itself.
pub trait HostEnvironment {
    fn pipeline_settings(&self) -> PipelineSettings;

    /// Renderer family of the configured pipeline asset, if any.
    fn modern_pipeline(&self) -> Option<ModernPipeline>;

    fn supports_render_graph(&self) -> bool;
}

/// Plain-data host description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub settings: PipelineSettings,
    pub modern: Option<ModernPipeline>,
    pub render_graph: bool,
}

impl HostInfo {
    pub fn legacy() -> Self {
        Self::default()
    }

    pub fn universal(render_graph: bool) -> Self {
        Self {
            settings: PipelineSettings {
                default_pipeline: Some("UniversalRenderPipelineAsset".to_owned()),
                quality_pipeline: None,
            },
            modern: Some(ModernPipeline::Universal),
            render_graph,
        }
    }

    pub fn high_definition() -> Self {
        Self {
            settings: PipelineSettings {
                default_pipeline: Some("HDRenderPipelineAsset".to_owned()),
                quality_pipeline: None,
            },
            modern: Some(ModernPipeline::HighDefinition),
            render_graph: true,
        }
    }
}

impl HostEnvironment for HostInfo {
    fn pipeline_settings(&self) -> PipelineSettings {
        self.settings.clone()
    }

    fn modern_pipeline(&self) -> Option<ModernPipeline> {
        self.modern
    }

    fn supports_render_graph(&self) -> bool {
        self.render_graph
    }
}

/// Host capabilities, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    pub pipeline: ActivePipeline,
    pub render_graph: bool,
    pub settings: PipelineSettings,
}

impl HostCapabilities {
    pub fn detect(env: &dyn HostEnvironment) -> NtscResult<Self> {
        let settings = env.pipeline_settings();
        let pipeline = if settings.is_legacy() {
            ActivePipeline::Legacy
        } else {
            match env.modern_pipeline() {
                Some(ModernPipeline::Universal) => ActivePipeline::Universal,
                Some(ModernPipeline::HighDefinition) => ActivePipeline::HighDefinition,
                None => {
                    return Err(NtscError::invalid_configuration(
                        "a pipeline asset is configured but its renderer family is unknown",
                    ));
                }
            }
        };
        let caps = Self {
            pipeline,
            render_graph: env.supports_render_graph(),
            settings,
        };
        tracing::debug!(
            pipeline = ?caps.pipeline,
            render_graph = caps.render_graph,
            "host capabilities"
        );
        Ok(caps)
    }

    pub fn urp_strategy(&self) -> ExecutionMode {
        if self.render_graph {
            ExecutionMode::RenderGraph
        } else {
            ExecutionMode::Retained
        }
    }
}

/// Host-supplied inputs for one frame.
pub struct FrameContext<'a> {
    pub index: FrameIndex,
    /// Camera color target size.
    pub color_size: Extent,
    /// Separate destination size, for hosts that hand one out.
    pub destination_size: Option<Extent>,
    pub volumes: &'a VolumeStack,
    pub device: &'a mut dyn GraphicsDevice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// Nothing ran; the frame stays untouched.
    PassThrough,
}

/// Textures a backend reads and writes on the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTargets {
    pub source: TextureId,
    pub destination: TextureId,
}

/// Uniform per-frame surface over the three host adapters.
pub trait EffectBackend {
    fn name(&self) -> &'static str;

    fn is_active(&self, volumes: &VolumeStack) -> bool;

    fn frame_targets(&self) -> FrameTargets;

    fn render_frame(&mut self, ctx: FrameContext<'_>) -> NtscResult<FrameOutcome>;

    /// Release host resources; the backend is inert afterwards.
    fn shutdown(&mut self);
}

/// Run a frame, logging any failure and leaving the frame untouched instead.
pub fn render_or_pass_through(
    backend: &mut dyn EffectBackend,
    ctx: FrameContext<'_>,
) -> FrameOutcome {
    let index = ctx.index;
    match backend.render_frame(ctx) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(
                backend = backend.name(),
                frame = index.0,
                error = %err,
                "NTSC frame skipped"
            );
            FrameOutcome::PassThrough
        }
    }
}

pub fn create_backend(
    caps: &HostCapabilities,
    library: &dyn ShaderLibrary,
    registry: Arc<ShaderRegistry>,
    defaults: EffectParams,
) -> Box<dyn EffectBackend> {
    match caps.pipeline {
        ActivePipeline::Legacy => Box::new(LegacyBackend::new(
            defaults,
            caps.settings.clone(),
            registry,
            library,
        )),
        ActivePipeline::Universal => Box::new(UrpBackend::new(
            defaults,
            caps.urp_strategy(),
            registry,
            library,
        )),
        ActivePipeline::HighDefinition => Box::new(HdrpBackend::new(defaults, registry, library)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;

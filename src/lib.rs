//! NTSC/CRT analog-video emulation as a per-frame post-process.
//!
//! One shared pass sequence (capture, encode, decode with crosstalk, reconstruct) runs on two
//! ping-pong scratch buffers. Three host adapters give it a place in the frame:
//!
//! - **Legacy** camera pipeline: a fixed command list attached before image effects.
//! - **URP-style** forward renderer: a renderer feature enqueuing a render pass, executed either
//!   as a retained command list or inside a frame graph.
//! - **HDRP-style** deferred renderer: a volume-driven custom post-process.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: a [`ConfigResolver`] picks the frame's [`EffectParams`].
//! 2. **Plan**: [`PassSequencer::plan`] sizes the scratch buffers ([`buffer_size`]) and builds
//!    one immutable [`PassConfig`] (keywords + uniforms).
//! 3. **Record**: [`PassSequencer::record`] drives a host [`FrameAdapter`].
//! 4. **Execute**: a [`GraphicsDevice`] runs the recorded [`CommandList`]; [`CpuDevice`] is the
//!    software reference.
//!
//! Host capabilities are detected once ([`HostCapabilities::detect`]) and
//! [`create_backend`] returns the matching [`EffectBackend`].
#![forbid(unsafe_code)]

mod backends;
mod cpu;
mod effect;
mod foundation;
mod gfx;
mod host;
mod render;
mod shader;

pub use backends::hdrp::{HdrpBackend, NtscPostprocessHdrp, NtscVolume, uv_scale};
pub use backends::legacy::{LegacyBackend, NtscPostprocess};
pub use backends::showcase::ShowcaseCycle;
pub use backends::urp::{NtscFeature, NtscOverride, NtscRenderPass, UrpBackend};
pub use cpu::device::CpuDevice;
pub use cpu::image::FloatImage;
pub use cpu::program::run_pass;
pub use effect::params::{
    BlurWidth, CrossTalkMode, DisplayOrientation, EffectParams, IndexedParam,
};
pub use effect::sizer::{buffer_size, clamp_dimension, scanline_extent};
pub use foundation::core::{Extent, FrameIndex};
pub use foundation::error::{NtscError, NtscResult};
pub use gfx::command::{Command, CommandList, TemporaryDesc, TextureFormat, TextureId};
pub use gfx::device::{GraphicsDevice, MAX_TEXTURE_DIMENSION, ScratchStats, ScratchTracker};
pub use host::camera::{Camera, CameraEvent, CommandListId, PipelineSettings};
pub use host::graph::{
    AccessFlags, RenderGraph, TextureHandle, UnsafeGraphContext, UnsafePassBuilder,
};
pub use host::hd::{CustomPostProcess, HdCamera, InjectionPoint, PostProcessFrame, RtHandle};
pub use host::renderer::{
    ExecutionMode, FrameResources, RenderContext, RenderPassEvent, ScriptableRenderPass,
    ScriptableRenderer,
};
pub use host::volume::{VolumeComponent, VolumeStack};
pub use render::backend::{
    ActivePipeline, EffectBackend, FrameContext, FrameOutcome, FrameTargets, HostCapabilities,
    HostEnvironment, HostInfo, ModernPipeline, create_backend, render_or_pass_through,
};
pub use render::recorder::CommandRecorder;
pub use render::resolve::{ConfigResolver, OverrideResolver, ParamsOverride};
pub use render::sequencer::{FrameAdapter, FramePlan, PassSequencer, PlanOptions};
pub use shader::config::{KeywordSet, PassConfig, Uniforms};
pub use shader::program::{
    ProgramSlot, ShaderHandle, ShaderLibrary, ShaderPass, StaticShaderLibrary, find_program,
};
pub use shader::registry::{
    COMPOSITE_LINE_WIDTH, Keyword, KeywordCategory, PROGRAM_NAME, PropertyId, ScratchSlot,
    ShaderRegistry, Uniform,
};

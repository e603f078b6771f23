use super::*;
use crate::cpu::device::CpuDevice;
use crate::cpu::image::FloatImage;
use crate::gfx::command::CommandList;
use crate::shader::program::StaticShaderLibrary;
use crate::shader::registry::PropertyId;

struct FailingDevice;

impl GraphicsDevice for FailingDevice {
    fn execute(&mut self, _list: &CommandList) -> NtscResult<()> {
        Err(NtscError::device("lost"))
    }

    fn set_global_uint(&mut self, _property: PropertyId, _value: u32) {}
}

fn build(host: &HostInfo) -> Box<dyn EffectBackend> {
    let caps = HostCapabilities::detect(host).unwrap();
    create_backend(
        &caps,
        &StaticShaderLibrary::with_ntsc(),
        Arc::new(ShaderRegistry::new()),
        EffectParams::default(),
    )
}

#[test]
fn detects_each_pipeline_family() {
    let legacy = HostCapabilities::detect(&HostInfo::legacy()).unwrap();
    assert_eq!(legacy.pipeline, ActivePipeline::Legacy);

    let urp = HostCapabilities::detect(&HostInfo::universal(false)).unwrap();
    assert_eq!(urp.pipeline, ActivePipeline::Universal);
    assert_eq!(urp.urp_strategy(), ExecutionMode::Retained);

    let graph = HostCapabilities::detect(&HostInfo::universal(true)).unwrap();
    assert_eq!(graph.urp_strategy(), ExecutionMode::RenderGraph);

    let hdrp = HostCapabilities::detect(&HostInfo::high_definition()).unwrap();
    assert_eq!(hdrp.pipeline, ActivePipeline::HighDefinition);
}

#[test]
fn quality_override_alone_counts_as_modern() {
    let host = HostInfo {
        settings: PipelineSettings {
            default_pipeline: None,
            quality_pipeline: Some("Quality".to_owned()),
        },
        modern: Some(ModernPipeline::Universal),
        render_graph: false,
    };
    let caps = HostCapabilities::detect(&host).unwrap();
    assert_eq!(caps.pipeline, ActivePipeline::Universal);
}

#[test]
fn unknown_family_is_configuration_error() {
    let host = HostInfo {
        settings: PipelineSettings {
            default_pipeline: Some("Custom".to_owned()),
            quality_pipeline: None,
        },
        modern: None,
        render_graph: false,
    };
    let err = HostCapabilities::detect(&host).unwrap_err();
    assert!(matches!(err, NtscError::InvalidConfiguration(_)));
}

#[test]
fn factory_picks_adapter_by_capabilities() {
    assert_eq!(build(&HostInfo::legacy()).name(), "legacy");
    assert_eq!(build(&HostInfo::universal(false)).name(), "urp");
    assert_eq!(build(&HostInfo::universal(true)).name(), "urp-graph");
    assert_eq!(build(&HostInfo::high_definition()).name(), "hdrp");
}

#[test]
fn hdrp_targets_are_split() {
    let backend = build(&HostInfo::high_definition());
    let targets = backend.frame_targets();
    assert_eq!(targets.source, TextureId::Source);
    assert_eq!(targets.destination, TextureId::Destination);

    let legacy = build(&HostInfo::legacy());
    assert_eq!(legacy.frame_targets().source, legacy.frame_targets().destination);
}

#[test]
fn device_failure_passes_frame_through() {
    let volumes = VolumeStack::new();
    for host in [
        HostInfo::legacy(),
        HostInfo::universal(false),
        HostInfo::universal(true),
        HostInfo::high_definition(),
    ] {
        let mut backend = build(&host);
        let mut device = FailingDevice;
        let direct = backend.render_frame(FrameContext {
            index: FrameIndex(0),
            color_size: Extent::new(32, 24),
            destination_size: None,
            volumes: &volumes,
            device: &mut device,
        });
        assert!(direct.is_err(), "{}", backend.name());

        let outcome = render_or_pass_through(
            backend.as_mut(),
            FrameContext {
                index: FrameIndex(1),
                color_size: Extent::new(32, 24),
                destination_size: None,
                volumes: &volumes,
                device: &mut device,
            },
        );
        assert_eq!(outcome, FrameOutcome::PassThrough);
    }
}

#[test]
fn shutdown_makes_backend_inert() {
    let volumes = VolumeStack::new();
    let mut backend = build(&HostInfo::legacy());
    assert!(backend.is_active(&volumes));
    backend.shutdown();
    assert!(!backend.is_active(&volumes));
}

#[test]
fn oversized_buffer_passes_frame_through() {
    let registry = Arc::new(ShaderRegistry::new());
    let caps = HostCapabilities::detect(&HostInfo::legacy()).unwrap();
    let params = EffectParams {
        buffer_height: 200_000,
        ..EffectParams::default()
    };
    let mut backend = create_backend(
        &caps,
        &StaticShaderLibrary::with_ntsc(),
        Arc::clone(&registry),
        params,
    );
    let mut device = CpuDevice::new(registry);
    let input = FloatImage::filled(Extent::new(64, 48), [0.25, 0.5, 0.75, 1.0]);
    device.bind(TextureId::CameraTarget, input.clone());
    let volumes = VolumeStack::new();

    let outcome = render_or_pass_through(
        backend.as_mut(),
        FrameContext {
            index: FrameIndex(0),
            color_size: Extent::new(64, 48),
            destination_size: None,
            volumes: &volumes,
            device: &mut device,
        },
    );
    assert_eq!(outcome, FrameOutcome::PassThrough);
    assert_eq!(device.texture(TextureId::CameraTarget), Some(&input));
    assert_eq!(device.live_scratch(), 0);
    assert_eq!(device.blit_count(), 0);
}

use super::*;
use crate::effect::params::{BlurWidth, CrossTalkMode};
use crate::gfx::command::Command;
use crate::gfx::device::GraphicsDevice;
use crate::shader::program::StaticShaderLibrary;
use crate::shader::registry::PropertyId;

#[derive(Default)]
struct ListLog(Vec<CommandList>);

impl GraphicsDevice for ListLog {
    fn execute(&mut self, list: &CommandList) -> NtscResult<()> {
        self.0.push(list.clone());
        Ok(())
    }

    fn set_global_uint(&mut self, _property: PropertyId, _value: u32) {}
}

fn backend(strategy: ExecutionMode, library: &StaticShaderLibrary) -> UrpBackend {
    UrpBackend::new(
        EffectParams::default(),
        strategy,
        Arc::new(ShaderRegistry::new()),
        library,
    )
}

fn render(backend: &mut UrpBackend, volumes: &VolumeStack, i: u64) -> (FrameOutcome, ListLog) {
    let mut log = ListLog::default();
    let outcome = backend
        .render_frame(FrameContext {
            index: FrameIndex(i),
            color_size: Extent::new(1280, 720),
            destination_size: None,
            volumes,
            device: &mut log,
        })
        .unwrap();
    (outcome, log)
}

#[test]
fn override_defaults_to_disabled() {
    let o: NtscOverride = serde_json::from_str(r#"{ "brightness": 0.5 }"#).unwrap();
    assert!(!o.is_active());
    assert_eq!(o.params.brightness, 0.5);
    assert_eq!(o.params.buffer_height, 480);
}

#[test]
fn active_override_replaces_feature_defaults() {
    let mut feature = NtscFeature::new(EffectParams::default(), Arc::new(ShaderRegistry::new()));
    feature.create(&StaticShaderLibrary::with_ntsc());
    let mut volumes = VolumeStack::new();
    assert_eq!(feature.resolve(&volumes), EffectParams::default());

    volumes.insert(NtscOverride {
        enable: true,
        params: EffectParams {
            blur_width: BlurWidth::Wide,
            ..EffectParams::default()
        },
    });
    assert_eq!(feature.resolve(&volumes).blur_width, BlurWidth::Wide);

    let mut renderer = ScriptableRenderer::new(ExecutionMode::Retained);
    assert!(feature.add_render_passes(&mut renderer, &volumes));
    assert_eq!(renderer.queued_passes(), 1);
}

#[test]
fn retained_and_graph_strategies_submit_identical_commands() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut volumes = VolumeStack::new();
    volumes.insert(NtscOverride {
        enable: true,
        params: EffectParams {
            cross_talk_mode: CrossTalkMode::SlantNoise,
            ..EffectParams::default()
        },
    });
    let mut retained = backend(ExecutionMode::Retained, &lib);
    let mut graph = backend(ExecutionMode::RenderGraph, &lib);
    assert_eq!(retained.name(), "urp");
    assert_eq!(graph.name(), "urp-graph");
    for i in 0..3 {
        let (a, la) = render(&mut retained, &volumes, i);
        let (b, lb) = render(&mut graph, &volumes, i);
        assert_eq!(a, FrameOutcome::Rendered);
        assert_eq!(b, FrameOutcome::Rendered);
        assert_eq!(la.0, lb.0);
        assert_eq!(la.0.len(), 1);
        assert_eq!(la.0[0].name, "NTSCPass");
        assert!(matches!(
            la.0[0].commands[0],
            Command::SetGlobalUint { value, .. } if value == i as u32
        ));
    }
}

#[test]
fn inactive_feature_passes_through() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut b = backend(ExecutionMode::Retained, &lib);
    b.feature_mut().set_active(false);
    let volumes = VolumeStack::new();
    assert!(!b.is_active(&volumes));
    let (outcome, log) = render(&mut b, &volumes, 0);
    assert_eq!(outcome, FrameOutcome::PassThrough);
    assert!(log.0.is_empty());
}

#[test]
fn missing_program_disables_feature() {
    let lib = StaticShaderLibrary::empty();
    let mut b = backend(ExecutionMode::RenderGraph, &lib);
    let volumes = VolumeStack::new();
    assert!(!b.is_active(&volumes));
    let (outcome, log) = render(&mut b, &volumes, 0);
    assert_eq!(outcome, FrameOutcome::PassThrough);
    assert!(log.0.is_empty());
}

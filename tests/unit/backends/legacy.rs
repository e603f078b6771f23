use super::*;
use crate::effect::params::CrossTalkMode;
use crate::gfx::command::Command;
use crate::shader::program::StaticShaderLibrary;
use crate::shader::registry::PropertyId;

#[derive(Default)]
struct CountingDevice {
    executed: Vec<CommandList>,
    globals: Vec<(PropertyId, u32)>,
}

impl GraphicsDevice for CountingDevice {
    fn execute(&mut self, list: &CommandList) -> NtscResult<()> {
        self.executed.push(list.clone());
        Ok(())
    }

    fn set_global_uint(&mut self, property: PropertyId, value: u32) {
        self.globals.push((property, value));
    }
}

fn component(params: EffectParams) -> (NtscPostprocess, Camera) {
    let mut camera = Camera::new(Extent::new(1920, 1080));
    let mut c = NtscPostprocess::new(params, Arc::new(ShaderRegistry::new()));
    c.enable(
        &mut camera,
        &PipelineSettings::default(),
        &StaticShaderLibrary::with_ntsc(),
    );
    (c, camera)
}

fn brightness_of(camera: &Camera) -> Option<f32> {
    camera
        .command_lists(CameraEvent::BeforeImageEffects)
        .flat_map(|l| l.commands.iter())
        .find_map(|c| match c {
            Command::Blit { config, .. } => Some(config.uniforms.brightness),
            _ => None,
        })
}

#[test]
fn attaches_before_image_effects_on_enable() {
    let (c, camera) = component(EffectParams::default());
    assert!(c.is_active());
    let lists: Vec<_> = camera
        .command_lists(CameraEvent::BeforeImageEffects)
        .collect();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].temporary_acquisitions(), 2);
    assert_eq!(lists[0].blit_passes().len(), 4);
    assert_eq!(c.rebuild_count(), 1);
}

#[test]
fn modern_pipeline_keeps_component_detached() {
    let mut camera = Camera::new(Extent::new(64, 64));
    let mut c = NtscPostprocess::new(EffectParams::default(), Arc::new(ShaderRegistry::new()));
    let settings = PipelineSettings {
        default_pipeline: Some("Forward".into()),
        quality_pipeline: None,
    };
    c.enable(&mut camera, &settings, &StaticShaderLibrary::with_ntsc());
    assert!(!c.is_active());
    assert_eq!(camera.command_lists(CameraEvent::BeforeImageEffects).count(), 0);
}

#[test]
fn only_size_affecting_edits_rebuild() {
    let (mut c, mut camera) = component(EffectParams::default());
    let mut dev = CountingDevice::default();
    let lib = StaticShaderLibrary::with_ntsc();

    c.params.brightness = 0.25;
    c.validate(&mut camera, &PipelineSettings::default(), &lib);
    c.update(&mut camera, &mut dev, FrameIndex(1)).unwrap();
    assert_eq!(c.rebuild_count(), 1);
    assert_eq!(brightness_of(&camera), Some(0.25));

    c.params.buffer_height = 240;
    c.update(&mut camera, &mut dev, FrameIndex(2)).unwrap();
    assert_eq!(c.rebuild_count(), 2);

    c.params.display_orientation = DisplayOrientation::CCW;
    c.update(&mut camera, &mut dev, FrameIndex(3)).unwrap();
    assert_eq!(c.rebuild_count(), 3);

    camera.resize(Extent::new(1280, 720));
    c.update(&mut camera, &mut dev, FrameIndex(4)).unwrap();
    assert_eq!(c.rebuild_count(), 4);

    c.update(&mut camera, &mut dev, FrameIndex(5)).unwrap();
    assert_eq!(c.rebuild_count(), 4);
}

#[test]
fn frame_count_global_only_under_slant_noise() {
    let (mut c, mut camera) = component(EffectParams::default());
    let mut dev = CountingDevice::default();
    for i in 0..3 {
        c.update(&mut camera, &mut dev, FrameIndex(i)).unwrap();
    }
    assert!(dev.globals.is_empty());

    c.params.cross_talk_mode = CrossTalkMode::SlantNoise;
    for i in 3..6 {
        c.update(&mut camera, &mut dev, FrameIndex(i)).unwrap();
    }
    let values: Vec<_> = dev.globals.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![3, 4, 5]);
    let fixed = camera
        .command_lists(CameraEvent::BeforeImageEffects)
        .flat_map(|l| l.commands.iter())
        .filter(|c| matches!(c, Command::SetGlobalUint { .. }))
        .count();
    assert_eq!(fixed, 0);
}

#[test]
fn disable_detaches_and_allows_re_enable() {
    let (mut c, mut camera) = component(EffectParams::default());
    c.disable(&mut camera);
    assert!(!c.is_active());
    assert_eq!(camera.command_lists(CameraEvent::BeforeImageEffects).count(), 0);
    c.enable(
        &mut camera,
        &PipelineSettings::default(),
        &StaticShaderLibrary::with_ntsc(),
    );
    assert!(c.is_active());
}

#[test]
fn missing_program_never_attaches() {
    let mut camera = Camera::new(Extent::new(64, 64));
    let mut c = NtscPostprocess::new(EffectParams::default(), Arc::new(ShaderRegistry::new()));
    let lib = StaticShaderLibrary::empty();
    c.enable(&mut camera, &PipelineSettings::default(), &lib);
    c.validate(&mut camera, &PipelineSettings::default(), &lib);
    let mut dev = CountingDevice::default();
    c.update(&mut camera, &mut dev, FrameIndex(0)).unwrap();
    assert!(!c.is_active());
    assert!(dev.executed.is_empty());
}

#[test]
fn backend_renders_camera_lists_once_per_frame() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut backend = LegacyBackend::new(
        EffectParams::default(),
        PipelineSettings::default(),
        Arc::new(ShaderRegistry::new()),
        &lib,
    );
    let volumes = VolumeStack::new();
    let mut dev = CountingDevice::default();
    let outcome = backend
        .render_frame(FrameContext {
            index: FrameIndex(0),
            color_size: Extent::new(320, 240),
            destination_size: None,
            volumes: &volumes,
            device: &mut dev,
        })
        .unwrap();
    assert_eq!(outcome, FrameOutcome::Rendered);
    assert_eq!(dev.executed.len(), 1);
    assert_eq!(backend.camera().pixel_size(), Extent::new(320, 240));
    backend.shutdown();
    assert!(!backend.is_active(&volumes));
}

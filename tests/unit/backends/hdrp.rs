use super::*;
use crate::foundation::core::FrameIndex;
use crate::gfx::command::Command;
use crate::gfx::device::GraphicsDevice;
use crate::shader::program::StaticShaderLibrary;
use crate::shader::registry::{Keyword, PropertyId};

#[derive(Default)]
struct ListLog(Vec<CommandList>);

impl GraphicsDevice for ListLog {
    fn execute(&mut self, list: &CommandList) -> NtscResult<()> {
        self.0.push(list.clone());
        Ok(())
    }

    fn set_global_uint(&mut self, _property: PropertyId, _value: u32) {}
}

fn backend(lib: &StaticShaderLibrary) -> HdrpBackend {
    HdrpBackend::new(EffectParams::default(), Arc::new(ShaderRegistry::new()), lib)
}

#[test]
fn volume_enable_defaults_on() {
    let v: NtscVolume = serde_json::from_str("{}").unwrap();
    assert!(v.enable);
    assert_eq!(v.resolve(), EffectParams::default());
}

#[test]
fn uv_scale_is_destination_over_camera() {
    let camera = HdCamera {
        actual_size: Extent::new(1000, 500),
    };
    let dst = RtHandle {
        id: TextureId::Destination,
        scaled_size: Extent::new(1500, 250),
    };
    assert_eq!(uv_scale(camera, dst), [1.5, 0.5]);
}

#[test]
fn renders_source_to_destination_with_half_float_scratch() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut b = backend(&lib);
    let volumes = VolumeStack::new();
    let mut log = ListLog::default();
    let outcome = b
        .render_frame(FrameContext {
            index: FrameIndex(0),
            color_size: Extent::new(800, 600),
            destination_size: Some(Extent::new(400, 600)),
            volumes: &volumes,
            device: &mut log,
        })
        .unwrap();
    assert_eq!(outcome, FrameOutcome::Rendered);
    let list = &log.0[0];
    let mut blits = 0;
    for cmd in &list.commands {
        match cmd {
            Command::GetTemporary { desc, .. } => {
                assert_eq!(desc.format, TextureFormat::Rgba16Float);
                assert_eq!(desc.size, Extent::new(640, 480));
            }
            Command::Blit { config, .. } => {
                blits += 1;
                assert_eq!(config.uniforms.uv_scale, Some([0.5, 1.0]));
                assert!(config.keywords.is_enabled(Keyword::HdrpPipeline));
            }
            _ => {}
        }
    }
    assert_eq!(blits, 4);
    assert_eq!(
        list.commands.iter().find_map(|c| match c {
            Command::Blit { src, .. } => Some(*src),
            _ => None,
        }),
        Some(TextureId::Source)
    );
}

#[test]
fn disabled_volume_passes_through() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut b = backend(&lib);
    let mut volumes = VolumeStack::new();
    assert!(b.is_active(&volumes));
    volumes.insert(NtscVolume {
        enable: false,
        params: EffectParams::default(),
    });
    assert!(!b.is_active(&volumes));
    let mut log = ListLog::default();
    let outcome = b
        .render_frame(FrameContext {
            index: FrameIndex(0),
            color_size: Extent::new(64, 64),
            destination_size: None,
            volumes: &volumes,
            device: &mut log,
        })
        .unwrap();
    assert_eq!(outcome, FrameOutcome::PassThrough);
    assert!(log.0.is_empty());
}

#[test]
fn injection_point_and_cleanup() {
    let lib = StaticShaderLibrary::with_ntsc();
    let mut b = backend(&lib);
    assert_eq!(b.pass().injection_point(), InjectionPoint::AfterPostProcess);
    b.shutdown();
    assert!(!b.is_active(&VolumeStack::new()));
}

use super::*;
use crate::effect::params::EffectParams;

fn config(params: &EffectParams, buffer: Extent) -> PassConfig {
    let scan = if params.display_orientation.is_rotated() {
        buffer.swapped()
    } else {
        buffer
    };
    PassConfig::from_params(params, scan, None, false)
}

fn gradient(w: u32, h: u32) -> FloatImage {
    let mut img = FloatImage::new(Extent::new(w, h));
    for y in 0..h {
        for x in 0..w {
            img.data[(y * w + x) as usize] = [
                x as f32 / w as f32,
                y as f32 / h as f32,
                ((x + y) % 3) as f32 / 2.0,
                1.0,
            ];
        }
    }
    img
}

fn max_diff(a: &FloatImage, b: &FloatImage) -> f32 {
    a.data
        .iter()
        .zip(&b.data)
        .flat_map(|(p, q)| (0..3).map(move |k| (p[k] - q[k]).abs()))
        .fold(0.0, f32::max)
}

#[test]
fn capture_encode_decode_is_near_identity_without_artifacts() {
    let params = EffectParams {
        cross_talk_mode: CrossTalkMode::None,
        artifact_strength: 0.0,
        fringe_strength: 0.0,
        ..EffectParams::default()
    };
    let frame = gradient(8, 6);
    let buffer = frame.size();
    let cfg = config(&params, buffer);
    let a = run_pass(ShaderPass::Capture, &cfg, 0, &frame, buffer);
    let b = run_pass(ShaderPass::Encode, &cfg, 0, &a, buffer);
    let a = run_pass(ShaderPass::Decode, &cfg, 0, &b, buffer);
    assert!(max_diff(&a, &frame) < 0.01, "diff {}", max_diff(&a, &frame));
}

#[test]
fn artifacts_perturb_the_signal() {
    let params = EffectParams {
        cross_talk_mode: CrossTalkMode::None,
        ..EffectParams::default()
    };
    let frame = gradient(8, 6);
    let cfg = config(&params, frame.size());
    let b = run_pass(ShaderPass::Encode, &cfg, 0, &frame, frame.size());
    let a = run_pass(ShaderPass::Decode, &cfg, 0, &b, frame.size());
    assert!(max_diff(&a, &frame) > 0.01);
}

#[test]
fn vertical_crosstalk_bleeds_chroma_between_scanlines() {
    let mut img = FloatImage::new(Extent::new(4, 4));
    for y in 0..4usize {
        for x in 0..4usize {
            // YIQ-space texels with alternating I per scanline.
            img.data[y * 4 + x] = [0.5, if y % 2 == 0 { 0.2 } else { -0.2 }, 0.0, 1.0];
        }
    }
    let none = EffectParams {
        cross_talk_mode: CrossTalkMode::None,
        ..EffectParams::default()
    };
    let vertical = EffectParams::default();
    let plain = run_pass(ShaderPass::Decode, &config(&none, img.size()), 0, &img, img.size());
    let bled = run_pass(ShaderPass::Decode, &config(&vertical, img.size()), 0, &img, img.size());
    // Row 1 blends halfway towards row 0 at the default strength, cancelling I.
    let r_plain = plain.get(1, 1)[0];
    let r_bled = bled.get(1, 1)[0];
    assert!((r_plain - (0.5 - 0.956 * 0.2)).abs() < 1e-5);
    assert!((r_bled - 0.5).abs() < 1e-5);
}

#[test]
fn slant_noise_dither_follows_frame_parity() {
    let img = gradient(6, 6);
    let params = EffectParams {
        cross_talk_mode: CrossTalkMode::SlantNoise,
        ..EffectParams::default()
    };
    let cfg = config(&params, img.size());
    let f0 = run_pass(ShaderPass::Decode, &cfg, 0, &img, img.size());
    let f1 = run_pass(ShaderPass::Decode, &cfg, 1, &img, img.size());
    let f2 = run_pass(ShaderPass::Decode, &cfg, 2, &img, img.size());
    assert_eq!(f0, f2);
    assert_ne!(f0, f1);
}

#[test]
fn gaussian_taps_are_normalized() {
    for (width, n) in [(BlurWidth::Narrow, 4), (BlurWidth::Medium, 8), (BlurWidth::Wide, 24)] {
        let taps = gaussian_taps(width);
        assert_eq!(taps.len(), n);
        let sum: f32 = taps.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((taps[0].0 + taps[n - 1].0).abs() < 1e-6);
    }
}

#[test]
fn flat_field_survives_neutral_reconstruct() {
    let params = EffectParams {
        curvature: false,
        corner_mask: false,
        overscan_scale: 1.0,
        scanline_strength: 0.0,
        brightness: 1.0,
        black_level: 1.0,
        ..EffectParams::default()
    };
    let buffer = Extent::new(16, 12);
    let src = FloatImage::filled(buffer, [0.4, 0.4, 0.4, 1.0]);
    let out = run_pass(
        ShaderPass::Reconstruct,
        &config(&params, buffer),
        0,
        &src,
        Extent::new(32, 24),
    );
    assert_eq!(out.size(), Extent::new(32, 24));
    for px in &out.data {
        assert!((px[0] - 0.4).abs() < 1e-4);
    }
}

#[test]
fn corner_mask_blacks_out_corners_only() {
    let params = EffectParams {
        curvature: false,
        overscan_scale: 1.0,
        scanline_strength: 0.0,
        brightness: 1.0,
        black_level: 1.0,
        ..EffectParams::default()
    };
    let buffer = Extent::new(16, 12);
    let src = FloatImage::filled(buffer, [1.0, 1.0, 1.0, 1.0]);
    let out = run_pass(
        ShaderPass::Reconstruct,
        &config(&params, buffer),
        0,
        &src,
        Extent::new(64, 48),
    );
    assert_eq!(out.get(0, 0)[0], 0.0);
    assert_eq!(out.get(63, 47)[0], 0.0);
    assert!(out.get(32, 24)[0] > 0.99);
    assert!(out.get(32, 0)[0] > 0.99);
}

#[test]
fn scan_space_mapping_round_trips() {
    for orientation in [
        DisplayOrientation::None,
        DisplayOrientation::CW,
        DisplayOrientation::CCW,
    ] {
        let space = ScanSpace {
            orientation,
            size: Extent::new(5, 3),
        };
        for sy in 0..3 {
            for sx in 0..5 {
                let (bx, by) = space.to_buffer(sx, sy);
                assert_eq!(space.from_buffer(bx, by), (sx, sy), "{orientation:?}");
                let (px, py) = space.to_buffer_px(sx as f32 + 0.5, sy as f32 + 0.5);
                assert_eq!((px - 0.5, py - 0.5), (bx as f32, by as f32));
            }
        }
    }
}

#[test]
fn rotated_capture_keeps_frame_orientation() {
    let params = EffectParams {
        display_orientation: DisplayOrientation::CW,
        ..EffectParams::default()
    };
    let frame = gradient(8, 4);
    let cfg = config(&params, frame.size());
    let a = run_pass(ShaderPass::Capture, &cfg, 0, &frame, frame.size());
    assert!(max_diff(&a, &frame) < 1e-5);
}

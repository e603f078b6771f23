//! Software rendition of the four program passes.
//!
//! Encode and decode run in scanline space: `x` along a scanline, `y` across scanlines. For
//! rotated displays the buffer keeps the frame's orientation and scanline space is the rotated
//! view of it, so scanlines run along buffer columns.

use std::f32::consts::FRAC_PI_2;

use rayon::prelude::*;

use crate::effect::params::{BlurWidth, CrossTalkMode, DisplayOrientation};
use crate::foundation::core::Extent;
use crate::foundation::math::lerp;
use crate::shader::config::PassConfig;
use crate::shader::program::ShaderPass;
use crate::shader::registry::{COMPOSITE_LINE_WIDTH, Keyword};

use super::image::FloatImage;

/// Execute one pass from `src` into a new image of `dst_size`.
pub fn run_pass(
    pass: ShaderPass,
    config: &PassConfig,
    frame_count: u32,
    src: &FloatImage,
    dst_size: Extent,
) -> FloatImage {
    match pass {
        ShaderPass::Capture => capture(src, dst_size),
        ShaderPass::Encode => encode(config, src),
        ShaderPass::Decode => decode(config, frame_count, src),
        ShaderPass::Reconstruct => reconstruct(config, src, dst_size),
    }
}

#[derive(Clone, Copy, Debug)]
struct ScanSpace {
    orientation: DisplayOrientation,
    /// Scanline-space extent (`width` along a line, `height` = scanlines).
    size: Extent,
}

impl ScanSpace {
    fn of(config: &PassConfig, buffer: Extent) -> Self {
        let orientation = config.orientation();
        let size = if orientation.is_rotated() {
            buffer.swapped()
        } else {
            buffer
        };
        Self { orientation, size }
    }

    /// Buffer texel holding scanline-space texel `(sx, sy)`.
    fn to_buffer(self, sx: i64, sy: i64) -> (i64, i64) {
        let (w, h) = (i64::from(self.size.width), i64::from(self.size.height));
        match self.orientation {
            DisplayOrientation::None => (sx, sy),
            DisplayOrientation::CW => (h - 1 - sy, sx),
            DisplayOrientation::CCW => (sy, w - 1 - sx),
        }
    }

    fn from_buffer(self, bx: i64, by: i64) -> (i64, i64) {
        let (w, h) = (i64::from(self.size.width), i64::from(self.size.height));
        match self.orientation {
            DisplayOrientation::None => (bx, by),
            DisplayOrientation::CW => (by, h - 1 - bx),
            DisplayOrientation::CCW => (w - 1 - by, bx),
        }
    }

    /// Continuous scanline-space position to buffer pixel position.
    fn to_buffer_px(self, xs: f32, ys: f32) -> (f32, f32) {
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        match self.orientation {
            DisplayOrientation::None => (xs, ys),
            DisplayOrientation::CW => (h - ys, xs),
            DisplayOrientation::CCW => (ys, w - xs),
        }
    }

    /// Normalized frame coordinates to normalized display (scanline-space) coordinates.
    fn display_uv(self, u: f32, v: f32) -> (f32, f32) {
        match self.orientation {
            DisplayOrientation::None => (u, v),
            DisplayOrientation::CW => (v, 1.0 - u),
            DisplayOrientation::CCW => (1.0 - v, u),
        }
    }

    fn texel(self, img: &FloatImage, sx: i64, sy: i64) -> [f32; 4] {
        let sx = sx.clamp(0, i64::from(self.size.width) - 1);
        let sy = sy.clamp(0, i64::from(self.size.height) - 1);
        let (bx, by) = self.to_buffer(sx, sy);
        img.get(bx, by)
    }

    fn sample(self, img: &FloatImage, xs: f32, ys: f32) -> [f32; 4] {
        let (bx, by) = self.to_buffer_px(xs, ys);
        img.sample_px(bx, by)
    }
}

fn map_buffer<F>(buffer: Extent, f: F) -> FloatImage
where
    F: Fn(i64, i64) -> [f32; 4] + Sync,
{
    let mut out = FloatImage::new(buffer);
    let w = out.width as usize;
    out.data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = f(x as i64, y as i64);
            }
        });
    out
}

fn capture(src: &FloatImage, dst_size: Extent) -> FloatImage {
    let dst = dst_size.clamped();
    let (w, h) = (dst.width as f32, dst.height as f32);
    map_buffer(dst, |x, y| {
        let mut px = src.sample((x as f32 + 0.5) / w, (y as f32 + 0.5) / h);
        px[3] = 1.0;
        px
    })
}

fn rgb_to_yiq(c: [f32; 4]) -> [f32; 3] {
    [
        0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2],
        0.596 * c[0] - 0.274 * c[1] - 0.322 * c[2],
        0.211 * c[0] - 0.523 * c[1] + 0.312 * c[2],
    ]
}

fn yiq_to_rgb(y: f32, i: f32, q: f32) -> [f32; 4] {
    [
        y + 0.956 * i + 0.621 * q,
        y - 0.272 * i - 0.647 * q,
        y - 1.106 * i + 1.703 * q,
        1.0,
    ]
}

fn carrier_phase(config: &PassConfig, sx: i64, sy: i64) -> f32 {
    let u = &config.uniforms;
    FRAC_PI_2
        * (sx as f32 * u.chroma_mod_frequency_scale + sy as f32 * u.chroma_phase_shift_scale)
}

fn encode(config: &PassConfig, src: &FloatImage) -> FloatImage {
    let space = ScanSpace::of(config, src.size());
    let artifact = config.uniforms.artifact_strength;
    let fringe = config.uniforms.fringe_strength;
    map_buffer(src.size(), |bx, by| {
        let (sx, sy) = space.from_buffer(bx, by);
        let [y, i, q] = rgb_to_yiq(space.texel(src, sx, sy));
        let prev_y = rgb_to_yiq(space.texel(src, sx - 1, sy))[0];
        let (sin, cos) = carrier_phase(config, sx, sy).sin_cos();
        // Chroma leaking into luma (dot crawl) and luma edges leaking into chroma (fringes).
        let chroma = i * cos + q * sin;
        let edge = y - prev_y;
        [
            y + 0.5 * artifact * chroma,
            i + fringe * edge * cos,
            q + fringe * edge * sin,
            1.0,
        ]
    })
}

fn decode(config: &PassConfig, frame_count: u32, src: &FloatImage) -> FloatImage {
    let space = ScanSpace::of(config, src.size());
    let mode = config.cross_talk();
    let w = 0.25 * config.uniforms.cross_talk_strength;
    map_buffer(src.size(), |bx, by| {
        let (sx, sy) = space.from_buffer(bx, by);
        let c = space.texel(src, sx, sy);
        let neighbour = match mode {
            CrossTalkMode::None => None,
            CrossTalkMode::Vertical => Some((sx, sy - 1)),
            CrossTalkMode::Slant => Some((sx - 1, sy - 1)),
            CrossTalkMode::SlantNoise => {
                let dither = (sy + i64::from(frame_count)) & 1;
                Some((sx + 2 * dither - 1, sy - 1))
            }
        };
        let (i, q) = match neighbour {
            Some((nx, ny)) => {
                let n = space.texel(src, nx, ny);
                (lerp(c[1], n[1], w), lerp(c[2], n[2], w))
            }
            None => (c[1], c[2]),
        };
        yiq_to_rgb(c[0], i, q)
    })
}

fn gaussian_taps(width: BlurWidth) -> Vec<(f32, f32)> {
    let n = width.taps() as i32;
    let sigma = match width {
        BlurWidth::Narrow => 0.6,
        BlurWidth::Medium => 1.2,
        BlurWidth::Wide => 3.0,
    };
    let center = (n - 1) as f32 * 0.5;
    let raw: Vec<(f32, f32)> = (0..n)
        .map(|k| {
            let off = k as f32 - center;
            (off, (-(off * off) / (2.0 * sigma * sigma)).exp())
        })
        .collect();
    let sum: f32 = raw.iter().map(|(_, w)| w).sum();
    raw.into_iter().map(|(off, w)| (off, w / sum)).collect()
}

fn barrel(u: f32, v: f32) -> (f32, f32) {
    let cx = u * 2.0 - 1.0;
    let cy = v * 2.0 - 1.0;
    let wx = cx * (1.0 + 0.1 * cy * cy);
    let wy = cy * (1.0 + 0.1 * cx * cx);
    (wx * 0.5 + 0.5, wy * 0.5 + 0.5)
}

/// 1 inside a rounded rectangle covering the unit square, 0 outside.
fn corner_mask(u: f32, v: f32, radius_px: f32, size: [f32; 2]) -> f32 {
    let px = [u * size[0], v * size[1]];
    let r = radius_px.max(0.0).min(size[0].min(size[1]) * 0.5);
    if r <= 0.0 {
        return 1.0;
    }
    let dx = (r - px[0]).max(px[0] - (size[0] - r)).max(0.0);
    let dy = (r - px[1]).max(px[1] - (size[1] - r)).max(0.0);
    if dx * dx + dy * dy > r * r { 0.0 } else { 1.0 }
}

fn reconstruct(config: &PassConfig, src: &FloatImage, dst_size: Extent) -> FloatImage {
    let space = ScanSpace::of(config, src.size());
    let u = &config.uniforms;
    let curvature = config.keywords.is_enabled(Keyword::Curvature);
    let masked = config.keywords.is_enabled(Keyword::CornerMask);
    let taps = gaussian_taps(config.blur_width());
    let sample_step = u.input_size[0] / COMPOSITE_LINE_WIDTH as f32;
    let lines = u.output_size[1].max(1.0);
    let sigma = (0.5 * u.beam_spread).max(1e-3);
    let dst = dst_size.clamped();
    let (dw, dh) = (dst.width as f32, dst.height as f32);
    let display = match space.orientation {
        DisplayOrientation::None => [dw, dh],
        _ => [dh, dw],
    };
    let scan = space.size.as_f32();
    let black = u.black_level;

    map_buffer(dst, |x, y| {
        let (mut su, mut sv) = space.display_uv((x as f32 + 0.5) / dw, (y as f32 + 0.5) / dh);
        su = (su - 0.5) * u.overscan_scale + 0.5;
        sv = (sv - 0.5) * u.overscan_scale + 0.5;
        if curvature {
            (su, sv) = barrel(su, sv);
        }
        if !(0.0..=1.0).contains(&su) || !(0.0..=1.0).contains(&sv) {
            return [0.0, 0.0, 0.0, 1.0];
        }
        let mask = if !masked {
            1.0
        } else if curvature {
            corner_mask(su, sv, display[0].min(display[1]) * 0.04, display)
        } else {
            corner_mask(su, sv, u.mask_radius, display)
        };

        let (xs, ys) = (su * scan[0], sv * scan[1]);
        let mut c = [0.0f32; 3];
        for (off, w) in &taps {
            let s = space.sample(src, xs + off * sample_step, ys);
            for k in 0..3 {
                c[k] += s[k] * w;
            }
        }

        let f = (sv * lines).fract() - 0.5;
        let beam = u.beam_strength * (-(f * f) / (2.0 * sigma * sigma)).exp();
        let scanline = lerp(1.0, beam, u.scanline_strength);
        let shade = scanline * mask;
        let tone = |v: f32| (v * black - (black - 1.0)) * u.brightness * shade;
        [tone(c[0]), tone(c[1]), tone(c[2]), 1.0]
    })
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/program.rs"]
mod tests;

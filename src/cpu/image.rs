use crate::foundation::core::Extent;
use crate::foundation::error::{NtscError, NtscResult};
use crate::foundation::math::lerp4;

/// Float RGBA texture; channels are display-referred and unclamped.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<[f32; 4]>,
}

impl FloatImage {
    pub fn new(size: Extent) -> Self {
        Self::filled(size, [0.0, 0.0, 0.0, 1.0])
    }

    pub fn filled(size: Extent, px: [f32; 4]) -> Self {
        let size = size.clamped();
        Self {
            width: size.width,
            height: size.height,
            data: vec![px; size.pixel_count()],
        }
    }

    pub fn size(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> NtscResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| NtscError::device("image size overflow"))?;
        if expected == 0 || bytes.len() != expected {
            return Err(NtscError::device(format!(
                "rgba8 buffer of {} bytes does not match {width}x{height}",
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|p| {
                [
                    f32::from(p[0]) / 255.0,
                    f32::from(p[1]) / 255.0,
                    f32::from(p[2]) / 255.0,
                    f32::from(p[3]) / 255.0,
                ]
            })
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for px in &self.data {
            for c in px {
                out.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }

    pub fn from_rgba_image(img: &image::RgbaImage) -> NtscResult<Self> {
        Self::from_rgba8(img.width(), img.height(), img.as_raw())
    }

    pub fn to_rgba_image(&self) -> NtscResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or_else(|| NtscError::device("rgba8 buffer does not fit image dimensions"))
    }

    /// Texel with clamp-to-edge addressing.
    pub fn get(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.data[y * self.width as usize + x]
    }

    /// Bilinear sample at continuous pixel coordinates (texel centers at `n + 0.5`).
    pub fn sample_px(&self, x: f32, y: f32) -> [f32; 4] {
        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);
        let top = lerp4(self.get(x0, y0), self.get(x0 + 1, y0), tx);
        let bottom = lerp4(self.get(x0, y0 + 1), self.get(x0 + 1, y0 + 1), tx);
        lerp4(top, bottom, ty)
    }

    /// Bilinear sample at normalized coordinates.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        self.sample_px(u * self.width as f32, v * self.height as f32)
    }

    /// Mean luma over the whole image.
    pub fn mean_luma(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .data
            .iter()
            .map(|p| 0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2])
            .sum();
        sum / self.data.len() as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/image.rs"]
mod tests;

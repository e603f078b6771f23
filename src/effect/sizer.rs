use crate::effect::params::DisplayOrientation;
use crate::foundation::core::Extent;

/// Raise a host-reported dimension to at least 1.
pub fn clamp_dimension(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

/// Virtual buffer size in scanline space: `(floor(w / h * scanlines), scanlines)` after undoing
/// the display rotation, so scanlines always run along `height`.
pub fn scanline_extent(
    source: Extent,
    target_scanlines: u32,
    orientation: DisplayOrientation,
) -> Extent {
    let source = source.clamped();
    let upright = if orientation.is_rotated() {
        source.swapped()
    } else {
        source
    };
    let scanlines = target_scanlines.max(1);
    let width = u64::from(upright.width) * u64::from(scanlines) / u64::from(upright.height);
    Extent::new(width.clamp(1, u64::from(u32::MAX)) as u32, scanlines)
}

/// Scratch buffer dimensions for a frame of `source` pixels.
///
/// Rotated displays are sized on the swapped frame and swapped back, so the buffer keeps the
/// frame's orientation while its scanline count follows the rotated screen.
pub fn buffer_size(
    source: Extent,
    target_scanlines: u32,
    orientation: DisplayOrientation,
) -> Extent {
    let extent = scanline_extent(source, target_scanlines, orientation);
    if orientation.is_rotated() {
        extent.swapped()
    } else {
        extent
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/sizer.rs"]
mod tests;

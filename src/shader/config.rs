use crate::effect::params::{BlurWidth, CrossTalkMode, DisplayOrientation, EffectParams};
use crate::foundation::core::Extent;
use crate::shader::registry::{COMPOSITE_LINE_WIDTH, Keyword, KeywordCategory};

/// Enabled program keywords for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeywordSet(u16);

impl KeywordSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn set(&mut self, keyword: Keyword, enabled: bool) {
        if enabled {
            self.0 |= keyword.bit();
        } else {
            self.0 &= !keyword.bit();
        }
    }

    pub fn is_enabled(&self, keyword: Keyword) -> bool {
        self.0 & keyword.bit() != 0
    }

    /// Clear every keyword of `category`, then enable `keyword` if given.
    pub fn select(&mut self, category: KeywordCategory, keyword: Option<Keyword>) {
        for k in category.keywords() {
            self.set(*k, false);
        }
        if let Some(k) = keyword {
            debug_assert_eq!(k.category(), category);
            self.set(k, true);
        }
    }

    pub fn enabled_in(&self, category: KeywordCategory) -> impl Iterator<Item = Keyword> + '_ {
        category
            .keywords()
            .iter()
            .copied()
            .filter(|k| self.is_enabled(*k))
    }

    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        Keyword::ALL.into_iter().filter(|k| self.is_enabled(*k))
    }
}

/// Uniform values for the program, in the layout the passes read them.
#[derive(Clone, Debug, PartialEq)]
pub struct Uniforms {
    pub texture_size: [f32; 2],
    pub input_size: [f32; 2],
    pub output_size: [f32; 2],
    pub mask_radius: f32,
    pub cross_talk_strength: f32,
    pub scanline_strength: f32,
    pub beam_spread: f32,
    pub beam_strength: f32,
    pub overscan_scale: f32,
    pub brightness: f32,
    pub black_level: f32,
    pub artifact_strength: f32,
    pub fringe_strength: f32,
    pub chroma_mod_frequency_scale: f32,
    pub chroma_phase_shift_scale: f32,
    pub uv_scale: Option<[f32; 2]>,
}

/// Keyword and uniform state bound to every blit of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PassConfig {
    pub keywords: KeywordSet,
    pub uniforms: Uniforms,
}

pub(crate) fn orientation_keyword(o: DisplayOrientation) -> Keyword {
    match o {
        DisplayOrientation::None => Keyword::TurnNone,
        DisplayOrientation::CW => Keyword::TurnCw,
        DisplayOrientation::CCW => Keyword::TurnCcw,
    }
}

pub(crate) fn blur_keyword(b: BlurWidth) -> Keyword {
    match b {
        BlurWidth::Narrow => Keyword::Tap4,
        BlurWidth::Medium => Keyword::Tap8,
        BlurWidth::Wide => Keyword::Tap24,
    }
}

pub(crate) fn cross_talk_keyword(c: CrossTalkMode) -> Option<Keyword> {
    match c {
        CrossTalkMode::None => None,
        CrossTalkMode::Vertical => Some(Keyword::CrossTalkVertical),
        CrossTalkMode::Slant => Some(Keyword::CrossTalkSlant),
        CrossTalkMode::SlantNoise => Some(Keyword::CrossTalkSlantNoise),
    }
}

impl PassConfig {
    /// Build the frame's configuration from scratch.
    ///
    /// `scanlines` is the sizer's scanline extent; it feeds both the texture-size and
    /// input-size uniforms.
    pub fn from_params(
        params: &EffectParams,
        scanlines: Extent,
        uv_scale: Option<[f32; 2]>,
        hdrp_keyword: bool,
    ) -> Self {
        let mut keywords = KeywordSet::empty();
        keywords.select(
            KeywordCategory::Orientation,
            Some(orientation_keyword(params.display_orientation)),
        );
        keywords.select(
            KeywordCategory::BlurWidth,
            Some(blur_keyword(params.blur_width)),
        );
        keywords.select(
            KeywordCategory::CrossTalk,
            cross_talk_keyword(params.cross_talk_mode),
        );
        keywords.set(Keyword::Curvature, params.curvature);
        keywords.set(Keyword::CornerMask, params.corner_mask);
        keywords.set(Keyword::HdrpPipeline, hdrp_keyword);

        let size = scanlines.as_f32();
        Self {
            keywords,
            uniforms: Uniforms {
                texture_size: size,
                input_size: size,
                output_size: [COMPOSITE_LINE_WIDTH as f32, params.output_height as f32],
                mask_radius: params.corner_radius,
                cross_talk_strength: params.cross_talk_strength,
                scanline_strength: params.scanline_strength,
                beam_spread: params.beam_spread,
                beam_strength: params.beam_strength,
                overscan_scale: params.overscan_scale,
                brightness: params.brightness,
                black_level: params.black_level,
                artifact_strength: params.artifact_strength,
                fringe_strength: params.fringe_strength,
                chroma_mod_frequency_scale: params.chroma_mod_frequency_scale,
                chroma_phase_shift_scale: params.chroma_phase_shift_scale,
                uv_scale,
            },
        }
    }

    pub fn orientation(&self) -> DisplayOrientation {
        if self.keywords.is_enabled(Keyword::TurnCw) {
            DisplayOrientation::CW
        } else if self.keywords.is_enabled(Keyword::TurnCcw) {
            DisplayOrientation::CCW
        } else {
            DisplayOrientation::None
        }
    }

    pub fn blur_width(&self) -> BlurWidth {
        if self.keywords.is_enabled(Keyword::Tap4) {
            BlurWidth::Narrow
        } else if self.keywords.is_enabled(Keyword::Tap24) {
            BlurWidth::Wide
        } else {
            BlurWidth::Medium
        }
    }

    pub fn cross_talk(&self) -> CrossTalkMode {
        if self.keywords.is_enabled(Keyword::CrossTalkSlantNoise) {
            CrossTalkMode::SlantNoise
        } else if self.keywords.is_enabled(Keyword::CrossTalkSlant) {
            CrossTalkMode::Slant
        } else if self.keywords.is_enabled(Keyword::CrossTalkVertical) {
            CrossTalkMode::Vertical
        } else {
            CrossTalkMode::None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/config.rs"]
mod tests;

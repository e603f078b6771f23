use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::error::{NtscError, NtscResult};

/// Chroma/luma crosstalk artifact model applied while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CrossTalkMode {
    None,
    /// Chroma bleeds into vertically adjacent scanlines.
    #[default]
    Vertical,
    /// Chroma bleeds along a diagonal (interlace slant).
    Slant,
    /// `Slant` plus a per-frame temporal dither.
    SlantNoise,
}

/// Tap count of the reconstruct pass gaussian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlurWidth {
    /// 4 taps: sharpest, most ringing.
    Narrow,
    /// 8 taps.
    #[default]
    Medium,
    /// 24 taps: smoothest, heaviest.
    Wide,
}

/// Final rotation of the emulated display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayOrientation {
    #[default]
    None,
    CW,
    CCW,
}

/// Enum parameters that hosts may also expose as clamped integer sliders.
pub trait IndexedParam: Copy + PartialEq + 'static {
    /// Variants in index order, each with its accepted names (first is canonical).
    const VARIANTS: &'static [(Self, &'static [&'static str])];

    fn index(self) -> u32 {
        Self::VARIANTS
            .iter()
            .position(|(v, _)| *v == self)
            .unwrap_or(0) as u32
    }

    /// Out-of-range indices clamp to the nearest variant.
    fn from_clamped_index(index: i64) -> Self {
        let max = Self::VARIANTS.len() as i64 - 1;
        Self::VARIANTS[index.clamp(0, max) as usize].0
    }

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::VARIANTS
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map(|(v, _)| *v)
    }

    fn name(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(v, _)| *v == self)
            .map(|(_, names)| names[0])
            .unwrap_or("")
    }
}

impl IndexedParam for CrossTalkMode {
    const VARIANTS: &'static [(Self, &'static [&'static str])] = &[
        (Self::None, &["None"]),
        (Self::Vertical, &["Vertical"]),
        (Self::Slant, &["Slant"]),
        (Self::SlantNoise, &["SlantNoise", "slant_noise"]),
    ];
}

impl IndexedParam for BlurWidth {
    const VARIANTS: &'static [(Self, &'static [&'static str])] = &[
        (Self::Narrow, &["Narrow", "Tap4"]),
        (Self::Medium, &["Medium", "Tap8"]),
        (Self::Wide, &["Wide", "Tap24"]),
    ];
}

impl IndexedParam for DisplayOrientation {
    const VARIANTS: &'static [(Self, &'static [&'static str])] = &[
        (Self::None, &["None"]),
        (Self::CW, &["CW"]),
        (Self::CCW, &["CCW"]),
    ];
}

impl BlurWidth {
    pub fn taps(self) -> u32 {
        match self {
            Self::Narrow => 4,
            Self::Medium => 8,
            Self::Wide => 24,
        }
    }
}

impl DisplayOrientation {
    pub fn is_rotated(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexOrName {
    Index(i64),
    Name(String),
}

fn deserialize_indexed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: IndexedParam,
{
    match IndexOrName::deserialize(deserializer)? {
        IndexOrName::Index(i) => Ok(T::from_clamped_index(i)),
        IndexOrName::Name(name) => T::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown variant '{name}'"))),
    }
}

macro_rules! indexed_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_indexed(deserializer)
            }
        }
    };
}

indexed_serde!(CrossTalkMode);
indexed_serde!(BlurWidth);
indexed_serde!(DisplayOrientation);

/// Every tunable of the effect, resolved once per frame.
///
/// Values are artistic controls: nothing here is validated or clamped, and out-of-range
/// strengths simply produce whatever the shader makes of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    /// Scanlines of the virtual composite buffer.
    pub buffer_height: u32,
    /// Scanlines of the emulated display.
    pub output_height: u32,
    pub cross_talk_mode: CrossTalkMode,
    pub cross_talk_strength: f32,
    pub brightness: f32,
    pub black_level: f32,
    pub artifact_strength: f32,
    pub fringe_strength: f32,
    pub chroma_mod_frequency_scale: f32,
    pub chroma_phase_shift_scale: f32,
    #[serde(alias = "gaussian_blur_width")]
    pub blur_width: BlurWidth,
    pub curvature: bool,
    pub corner_mask: bool,
    /// Corner radius in output pixels; only used when `curvature` is off.
    pub corner_radius: f32,
    pub scanline_strength: f32,
    pub beam_spread: f32,
    pub beam_strength: f32,
    pub overscan_scale: f32,
    pub display_orientation: DisplayOrientation,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            buffer_height: 480,
            output_height: 240,
            cross_talk_mode: CrossTalkMode::Vertical,
            cross_talk_strength: 2.0,
            brightness: 0.95,
            black_level: 1.0526,
            artifact_strength: 1.0,
            fringe_strength: 0.75,
            chroma_mod_frequency_scale: 1.0,
            chroma_phase_shift_scale: 1.0,
            blur_width: BlurWidth::Medium,
            curvature: true,
            corner_mask: true,
            corner_radius: 16.0,
            scanline_strength: 1.0,
            beam_spread: 0.5,
            beam_strength: 1.0,
            overscan_scale: 0.985,
            display_orientation: DisplayOrientation::None,
        }
    }
}

impl EffectParams {
    /// Whether the shader reads the frame-count uniform under these parameters.
    pub fn uses_frame_count(&self) -> bool {
        self.cross_talk_mode == CrossTalkMode::SlantNoise
    }

    /// Parse a (possibly partial) JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> NtscResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| NtscError::invalid_configuration(format!("effect parameters: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> NtscResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            NtscError::invalid_configuration(format!("read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> NtscResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NtscError::invalid_configuration(format!("effect parameters: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/params.rs"]
mod tests;

use std::collections::HashMap;

use crate::foundation::math::Fnv1a64;

/// Name of the shared post-process program.
pub const PROGRAM_NAME: &str = "Hidden/NTSCPass";

/// Fixed width, in samples, of one virtual composite-video line.
pub const COMPOSITE_LINE_WIDTH: u32 = 1137;

/// Stable numeric id for a shader property or temporary target name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

impl PropertyId {
    pub fn from_name(name: &str) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(name.as_bytes());
        Self(h.finish_u32())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    TextureSize,
    InputSize,
    OutputSize,
    MaskRadius,
    CrossTalkStrength,
    ScanlineStrength,
    BeamSpread,
    BeamStrength,
    OverscanScale,
    Brightness,
    BlackLevel,
    ArtifactStrength,
    FringeStrength,
    ChromaModFrequencyScale,
    ChromaPhaseShiftScale,
    FrameCountNum,
    UvScale,
}

impl Uniform {
    pub const ALL: [Uniform; 17] = [
        Self::TextureSize,
        Self::InputSize,
        Self::OutputSize,
        Self::MaskRadius,
        Self::CrossTalkStrength,
        Self::ScanlineStrength,
        Self::BeamSpread,
        Self::BeamStrength,
        Self::OverscanScale,
        Self::Brightness,
        Self::BlackLevel,
        Self::ArtifactStrength,
        Self::FringeStrength,
        Self::ChromaModFrequencyScale,
        Self::ChromaPhaseShiftScale,
        Self::FrameCountNum,
        Self::UvScale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::TextureSize => "_TextureSize",
            Self::InputSize => "_InputSize",
            Self::OutputSize => "_OutputSize",
            Self::MaskRadius => "_MaskRadius",
            Self::CrossTalkStrength => "_CrossTalkStrength",
            Self::ScanlineStrength => "_ScanlineStrength",
            Self::BeamSpread => "_BeamSpread",
            Self::BeamStrength => "_BeamStrength",
            Self::OverscanScale => "_OverscanScale",
            Self::Brightness => "_Brightness",
            Self::BlackLevel => "_BlackLevel",
            Self::ArtifactStrength => "_ArtifactStrength",
            Self::FringeStrength => "_FringeStrength",
            Self::ChromaModFrequencyScale => "_ChromaModFrequencyScale",
            Self::ChromaPhaseShiftScale => "_ChromaPhaseShiftScale",
            Self::FrameCountNum => "_FrameCountNum",
            Self::UvScale => "_UVScale",
        }
    }
}

/// The two ping-pong scratch targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScratchSlot {
    A,
    B,
}

impl ScratchSlot {
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "_NTSCTex1",
            Self::B => "_NTSCTex2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Orientation,
    BlurWidth,
    CrossTalk,
    Curvature,
    CornerMask,
    Pipeline,
}

impl KeywordCategory {
    pub fn keywords(self) -> &'static [Keyword] {
        match self {
            Self::Orientation => &[Keyword::TurnNone, Keyword::TurnCw, Keyword::TurnCcw],
            Self::BlurWidth => &[Keyword::Tap4, Keyword::Tap8, Keyword::Tap24],
            Self::CrossTalk => &[
                Keyword::CrossTalkVertical,
                Keyword::CrossTalkSlant,
                Keyword::CrossTalkSlantNoise,
            ],
            Self::Curvature => &[Keyword::Curvature],
            Self::CornerMask => &[Keyword::CornerMask],
            Self::Pipeline => &[Keyword::HdrpPipeline],
        }
    }
}

/// Compile-time variant switches of the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Keyword {
    TurnNone,
    TurnCw,
    TurnCcw,
    Tap4,
    Tap8,
    Tap24,
    CrossTalkVertical,
    CrossTalkSlant,
    CrossTalkSlantNoise,
    Curvature,
    CornerMask,
    HdrpPipeline,
}

impl Keyword {
    pub const ALL: [Keyword; 12] = [
        Self::TurnNone,
        Self::TurnCw,
        Self::TurnCcw,
        Self::Tap4,
        Self::Tap8,
        Self::Tap24,
        Self::CrossTalkVertical,
        Self::CrossTalkSlant,
        Self::CrossTalkSlantNoise,
        Self::Curvature,
        Self::CornerMask,
        Self::HdrpPipeline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::TurnNone => "TURN_NONE",
            Self::TurnCw => "TURN_CW",
            Self::TurnCcw => "TURN_CCW",
            Self::Tap4 => "TAPSIZE_TAP4",
            Self::Tap8 => "TAPSIZE_TAP8",
            Self::Tap24 => "TAPSIZE_TAP24",
            Self::CrossTalkVertical => "CROSSTALK_VERTICAL",
            Self::CrossTalkSlant => "CROSSTALK_SLANT",
            Self::CrossTalkSlantNoise => "CROSSTALK_SLANT_NOISE",
            Self::Curvature => "USE_CURVATURE",
            Self::CornerMask => "USE_CORNER_MASK",
            Self::HdrpPipeline => "_UNITY_RENDER_PIPELINE_HDRP",
        }
    }

    pub fn category(self) -> KeywordCategory {
        match self {
            Self::TurnNone | Self::TurnCw | Self::TurnCcw => KeywordCategory::Orientation,
            Self::Tap4 | Self::Tap8 | Self::Tap24 => KeywordCategory::BlurWidth,
            Self::CrossTalkVertical | Self::CrossTalkSlant | Self::CrossTalkSlantNoise => {
                KeywordCategory::CrossTalk
            }
            Self::Curvature => KeywordCategory::Curvature,
            Self::CornerMask => KeywordCategory::CornerMask,
            Self::HdrpPipeline => KeywordCategory::Pipeline,
        }
    }

    pub(crate) fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

/// Interned property ids for every uniform and scratch target the program uses.
///
/// Built once at startup and shared read-only (`Arc<ShaderRegistry>`) by every adapter.
#[derive(Debug)]
pub struct ShaderRegistry {
    uniforms: HashMap<Uniform, PropertyId>,
    scratch: [PropertyId; 2],
    names: HashMap<PropertyId, &'static str>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        let mut uniforms = HashMap::with_capacity(Uniform::ALL.len());
        for u in Uniform::ALL {
            let id = PropertyId::from_name(u.name());
            uniforms.insert(u, id);
            names.insert(id, u.name());
        }
        let scratch = [ScratchSlot::A, ScratchSlot::B].map(|s| {
            let id = PropertyId::from_name(s.name());
            names.insert(id, s.name());
            id
        });
        Self {
            uniforms,
            scratch,
            names,
        }
    }

    pub fn uniform_id(&self, uniform: Uniform) -> PropertyId {
        self.uniforms
            .get(&uniform)
            .copied()
            .unwrap_or_else(|| PropertyId::from_name(uniform.name()))
    }

    pub fn scratch_id(&self, slot: ScratchSlot) -> PropertyId {
        match slot {
            ScratchSlot::A => self.scratch[0],
            ScratchSlot::B => self.scratch[1],
        }
    }

    pub fn name_of(&self, id: PropertyId) -> Option<&'static str> {
        self.names.get(&id).copied()
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/registry.rs"]
mod tests;

use crate::backends::hdrp::NtscVolume;
use crate::effect::params::{BlurWidth, CrossTalkMode, IndexedParam};

#[derive(Clone, Debug, PartialEq)]
struct Saved {
    enable: bool,
    cross_talk_mode: CrossTalkMode,
    blur_width: BlurWidth,
    curvature: bool,
}

/// Demo cycle over the volume's look: blur width every step, curvature every full blur
/// cycle, crosstalk whenever curvature comes back on, and an "off" step after slant.
#[derive(Clone, Debug)]
pub struct ShowcaseCycle {
    cross_talk: u32,
    blur: u32,
    curvature: bool,
    saved: Option<Saved>,
}

impl Default for ShowcaseCycle {
    fn default() -> Self {
        Self {
            cross_talk: 0,
            blur: 0,
            curvature: true,
            saved: None,
        }
    }
}

impl ShowcaseCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the volume's values so [`ShowcaseCycle::restore`] can put them back.
    pub fn begin(&mut self, volume: &NtscVolume) {
        self.saved = Some(Saved {
            enable: volume.enable,
            cross_talk_mode: volume.params.cross_talk_mode,
            blur_width: volume.params.blur_width,
            curvature: volume.params.curvature,
        });
    }

    pub fn step(&mut self, volume: &mut NtscVolume) {
        self.blur = (self.blur + 1) % 3;
        if self.blur == 0 {
            self.curvature = !self.curvature;
            if self.curvature {
                self.cross_talk = (self.cross_talk + 1) % 4;
            }
        }

        if self.cross_talk == 3 {
            volume.enable = false;
            self.cross_talk = 0;
        } else {
            volume.enable = true;
            volume.params.cross_talk_mode =
                CrossTalkMode::from_clamped_index(i64::from(self.cross_talk) + 1);
            volume.params.blur_width = BlurWidth::from_clamped_index(i64::from(self.blur));
            volume.params.curvature = self.curvature;
        }
    }

    pub fn restore(&mut self, volume: &mut NtscVolume) {
        if let Some(saved) = self.saved.take() {
            volume.enable = saved.enable;
            volume.params.cross_talk_mode = saved.cross_talk_mode;
            volume.params.blur_width = saved.blur_width;
            volume.params.curvature = saved.curvature;
        }
    }

    pub fn label(&self, volume: &NtscVolume) -> String {
        if !volume.enable {
            return "No Effects".to_owned();
        }
        format!(
            "Cross-Talk: {}, Curvature: {}, GaussWidth: {}",
            volume.params.cross_talk_mode.name(),
            if volume.params.curvature { "ON" } else { "OFF" },
            volume.params.blur_width.name()
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backends/showcase.rs"]
mod tests;

//! Card configuration: size, styling, copy text and tuning constants.
//!
//! Everything has a default, so a JSON file only needs the fields it changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub width: u32,
    pub height: u32,
    /// Decorative coating bitmap. `None` uses the built-in glitter pattern.
    pub image: Option<PathBuf>,
    pub style: CardStyle,
    pub reveal: RevealTuning,
    pub particles: ParticleTuning,
}

/// Visual styling and displayed text; the only things that differ between card variants.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    /// Lines shown inside the heart once revealed (top to bottom).
    pub message: Vec<MessageLine>,
    /// Prompt under the card while little has been scratched.
    pub hint: String,
    /// Drop a soft shadow behind the coating.
    pub coating_shadow: bool,
    /// 0x00RRGGBB colors.
    pub page_color: u32,
    pub heart_color: u32,
    pub ink_color: u32,
    pub muted_ink_color: u32,
}

/// One line of the invitation. Emphasized lines are drawn larger and darker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageLine {
    pub text: String,
    #[serde(default)]
    pub emphasis: bool,
}

impl MessageLine {
    pub fn plain(text: &str) -> Self {
        Self { text: text.into(), emphasis: false }
    }

    pub fn emphasized(text: &str) -> Self {
        Self { text: text.into(), emphasis: true }
    }
}

/// Reveal tuning constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTuning {
    /// Completion fires once the erased share of the coating exceeds this (percent).
    pub threshold_percent: f32,
    /// Radius of the disc cut out per erase, in backing pixels.
    pub erase_radius: f32,
    /// Frames the leftover coating takes to fade out after completion. 0 = hide at once.
    pub fade_frames: u32,
    /// Hint text is shown while scratched percent stays below this.
    pub hint_below_percent: f32,
}

/// Glitter particle constants. Velocities are px/frame, angles in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub batch: usize,
    pub max_particles: usize,
    pub gravity: f32,
    pub decay: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub upward_bias: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub max_rotation_speed: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            message: vec![
                MessageLine::plain("invite you to celebrate"),
                MessageLine::plain("wedding on"),
                MessageLine::emphasized("22, 23, 25"),
                MessageLine::emphasized("April 2026"),
                MessageLine::plain("New Delhi, India"),
                MessageLine::plain("Save the Date"),
            ],
            hint: "SCRATCH TO REVEAL".into(),
            coating_shadow: true,
            page_color: 0x00_FA_F7_F2,
            heart_color: 0x00_F5_F5_F5,
            ink_color: 0x00_00_00_00,
            muted_ink_color: 0x00_7A_7A_7A,
        }
    }
}

impl Default for RevealTuning {
    fn default() -> Self {
        Self { threshold_percent: 50.0, erase_radius: 22.0, fade_frames: 36, hint_below_percent: 10.0 }
    }
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            batch: 8,
            max_particles: 50,
            gravity: 0.15,
            decay: 0.02,
            min_speed: 2.0,
            max_speed: 6.0,
            upward_bias: 2.0,
            min_size: 2.0,
            max_size: 6.0,
            max_rotation_speed: 10.0,
        }
    }
}

impl CardConfig {
    /// Standalone card: 280x260 with a shadow under the coating.
    pub fn classic() -> Self {
        Self {
            width: 280,
            height: 260,
            image: None,
            style: CardStyle::default(),
            reveal: RevealTuning::default(),
            particles: ParticleTuning::default(),
        }
    }

    /// The larger card the save-the-date page hosts: 320x300, flat coating.
    pub fn save_the_date() -> Self {
        let mut cfg = Self::classic();
        cfg.width = 320;
        cfg.height = 300;
        cfg.style.coating_shadow = false;
        cfg
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        let r = &self.reveal;
        if !(r.threshold_percent > 0.0 && r.threshold_percent < 100.0) {
            return Err(Error::config(format!(
                "reveal.threshold_percent must be in (0, 100), got {}",
                r.threshold_percent
            )));
        }
        if !(r.erase_radius > 0.0) {
            return Err(Error::config(format!("reveal.erase_radius must be > 0, got {}", r.erase_radius)));
        }
        let p = &self.particles;
        if p.max_particles == 0 {
            return Err(Error::config("particles.max_particles must be > 0"));
        }
        if !(p.decay > 0.0) {
            return Err(Error::config(format!("particles.decay must be > 0, got {}", p.decay)));
        }
        if p.min_speed > p.max_speed || p.min_size > p.max_size {
            return Err(Error::config("particles: min values must not exceed max values"));
        }
        Ok(())
    }
}

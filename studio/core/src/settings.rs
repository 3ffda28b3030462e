//! Global Editor Defaults
//!
//! The `globalSettings` record seeds new messages and toggles optional
//! visual effects. Mutating it never retroactively changes messages
//! that already exist - surfaces re-read it only at creation time.

use serde::{Deserialize, Serialize};

use crate::message::AnimationKind;

/// Easing curve applied by surfaces to appearance animations
///
/// Surface-agnostic identifiers; each surface maps them to its native
/// interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    #[default]
    EaseOut,
    /// Slow start and end
    EaseInOut,
    /// Bounce effect at the end
    EaseOutBounce,
}

impl Easing {
    /// Apply the easing curve to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutBounce => {
                let n1 = 7.5625;
                let d1 = 2.75;
                if t < 1.0 / d1 {
                    n1 * t * t
                } else if t < 2.0 / d1 {
                    let t = t - 1.5 / d1;
                    n1 * t * t + 0.75
                } else if t < 2.5 / d1 {
                    let t = t - 2.25 / d1;
                    n1 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / d1;
                    n1 * t * t + 0.984375
                }
            }
        }
    }
}

/// Process-wide defaults used to seed new messages
///
/// Wire shape (camelCase) matches the persisted snapshot's
/// `globalSettings` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    /// Animation style applied to newly created messages
    pub default_type: AnimationKind,
    /// Animation duration (ms) applied to newly created messages
    pub default_duration: u64,
    /// Easing curve surfaces apply to appearance animations
    pub default_easing: Easing,
    /// Optional particle burst when a bubble lands
    pub enable_particles: bool,
    /// Optional glow outline on bubbles
    pub enable_glow: bool,
    /// Optional idle floating of rendered bubbles
    pub enable_floating: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_type: AnimationKind::Fade,
            default_duration: 500,
            default_easing: Easing::EaseOut,
            enable_particles: false,
            enable_glow: false,
            enable_floating: false,
        }
    }
}

impl GlobalSettings {
    /// Merge a partial update into these settings
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(default_type) = patch.default_type {
            self.default_type = default_type;
        }
        if let Some(default_duration) = patch.default_duration {
            self.default_duration = default_duration;
        }
        if let Some(default_easing) = patch.default_easing {
            self.default_easing = default_easing;
        }
        if let Some(enable_particles) = patch.enable_particles {
            self.enable_particles = enable_particles;
        }
        if let Some(enable_glow) = patch.enable_glow {
            self.enable_glow = enable_glow;
        }
        if let Some(enable_floating) = patch.enable_floating {
            self.enable_floating = enable_floating;
        }
    }
}

/// Partial update for [`GlobalSettings::merge`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    /// New default animation style
    pub default_type: Option<AnimationKind>,
    /// New default animation duration (ms)
    pub default_duration: Option<u64>,
    /// New default easing curve
    pub default_easing: Option<Easing>,
    /// Toggle particle effects
    pub enable_particles: Option<bool>,
    /// Toggle glow effects
    pub enable_glow: Option<bool>,
    /// Toggle floating effects
    pub enable_floating: Option<bool>,
}

impl SettingsPatch {
    /// Empty patch (merges nothing)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default animation style
    #[must_use]
    pub fn with_default_type(mut self, kind: AnimationKind) -> Self {
        self.default_type = Some(kind);
        self
    }

    /// Set the default animation duration
    #[must_use]
    pub fn with_default_duration(mut self, ms: u64) -> Self {
        self.default_duration = Some(ms);
        self
    }

    /// Set the default easing curve
    #[must_use]
    pub fn with_default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = Some(easing);
        self
    }

    /// Toggle the particle effect
    #[must_use]
    pub fn with_particles(mut self, enabled: bool) -> Self {
        self.enable_particles = Some(enabled);
        self
    }

    /// Toggle the glow effect
    #[must_use]
    pub fn with_glow(mut self, enabled: bool) -> Self {
        self.enable_glow = Some(enabled);
        self
    }

    /// Toggle the floating effect
    #[must_use]
    pub fn with_floating(mut self, enabled: bool) -> Self {
        self.enable_floating = Some(enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut settings = GlobalSettings::default();
        settings.merge(
            SettingsPatch::new()
                .with_default_duration(900)
                .with_glow(true),
        );

        assert_eq!(settings.default_duration, 900);
        assert!(settings.enable_glow);
        assert_eq!(settings.default_type, AnimationKind::Fade);
        assert!(!settings.enable_particles);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_string(&GlobalSettings::default()).unwrap();
        assert!(json.contains("\"defaultType\""));
        assert!(json.contains("\"defaultDuration\""));
        assert!(json.contains("\"defaultEasing\""));
        assert!(json.contains("\"enableParticles\""));
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseOutBounce,
        ] {
            assert!(easing.apply(0.0).abs() < 0.001);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
        }
    }
}

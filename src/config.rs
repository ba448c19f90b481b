//! Widget configuration.
//!
//! All of the tuned numbers for the star live in [`StarConfig`]: projection,
//! spin, drag physics, hit-testing radii and the floating word field. The
//! word-field constants in particular were tuned by eye; treat them as knobs,
//! not as derived values.

use std::time::Duration;

use glam::Vec3;

/// Coarse input-device class used to pick a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceProfile {
    /// Mouse / trackpad, hover available
    Desktop,
    /// Touch screen, no hover, coarser taps
    Touch,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::Desktop
    }
}

impl DeviceProfile {
    /// Parse a profile name (`desktop` / `touch`), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" | "mouse" => Some(Self::Desktop),
            "touch" | "mobile" => Some(Self::Touch),
            _ => None,
        }
    }
}

/// Error returned by [`StarConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for the star widget
#[derive(Debug, Clone)]
pub struct StarConfig {
    pub profile: DeviceProfile,

    // ── Shape & projection ──
    /// Uniform scale applied to the star's model coordinates
    pub star_scale: f32,
    /// Weak-perspective camera distance
    pub perspective_distance: f32,
    /// Viewport side length at which the star is drawn at full `star_scale`
    pub reference_extent: f32,
    /// Lower bound for the viewport-derived scale factor
    pub min_viewport_scale: f32,

    // ── Spin ──
    /// Angular velocity (rad/frame) while auto-rotating
    pub default_spin: Vec3,
    /// Fraction of the remaining gap closed each frame when blending spin
    pub rotation_catch_up: f32,
    /// Pointer delta → radians (mouse)
    pub drag_sensitivity: f32,
    /// Pointer delta → radians (touch)
    pub touch_drag_sensitivity: f32,
    /// Momentum velocity (px/ms) → radians per frame
    pub momentum_gain: f32,
    /// Per-frame momentum multiplier
    pub momentum_decay: f32,
    /// Momentum below this on both axes counts as settled
    pub momentum_epsilon: f32,
    /// Quiet period before auto-rotation resumes
    pub idle_delay: Duration,

    // ── Hit testing ──
    /// Model-space radius around the pointer ray, scaled by depth
    pub detection_radius: f32,
    /// Fraction of `detection_radius` inside which the nearest vertex is selected
    pub selection_ratio: f32,
    /// Depths of the two unprojected points forming the pointer ray
    pub ray_near_depth: f32,
    pub ray_far_depth: f32,
    /// Screen-space click radius around a hot vertex, scaled by depth
    pub hit_circle_radius: f32,
    /// Press travel (px) below which a release counts as a click (mouse)
    pub mouse_tap_threshold: f32,
    /// Same, for touch
    pub touch_tap_threshold: f32,

    // ── Markers ──
    /// Outward offset of the roman numeral labels
    pub label_offset: f32,
    /// Screen radius of the active-vertex ring
    pub ring_radius: f32,
    /// Per-frame easing rate of the ring opacity
    pub ring_ease: f32,

    // ── Floating word field ──
    pub word_count: usize,
    /// Radius range of the word volume (model units, before `star_scale`)
    pub word_radius_min: f32,
    pub word_radius_max: f32,
    /// Exponent applied to the uniform radius sample; > 1 clusters words near the core
    pub word_radius_bias: f32,
    /// Baseline opacity at the core and at the rim
    pub word_opacity_bright: f32,
    pub word_opacity_dim: f32,
    /// Half-width of the band each word oscillates within around its baseline
    pub word_opacity_band: f32,
    /// Per-frame opacity step range
    pub word_fade_speed: (f32, f32),
    /// Frames between word changes
    pub word_change_frames: (f32, f32),
    /// Upper bound of the shortened countdown after a word-set swap
    pub word_response_frames: f32,

    /// Fixed RNG seed for reproducible word fields
    pub seed: Option<u64>,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            profile: DeviceProfile::Desktop,
            star_scale: 0.6,
            perspective_distance: 1000.0,
            reference_extent: 900.0,
            min_viewport_scale: 0.45,
            default_spin: Vec3::new(0.005, 0.007, 0.003),
            rotation_catch_up: 0.05,
            drag_sensitivity: 0.005,
            touch_drag_sensitivity: 0.003,
            momentum_gain: 0.1,
            momentum_decay: 0.95,
            momentum_epsilon: 0.001,
            idle_delay: Duration::from_millis(2500),
            detection_radius: 40.0,
            selection_ratio: 0.7,
            ray_near_depth: -500.0,
            ray_far_depth: 500.0,
            hit_circle_radius: 20.0,
            mouse_tap_threshold: 5.0,
            touch_tap_threshold: 10.0,
            label_offset: 20.0,
            ring_radius: 10.0,
            ring_ease: 0.1,
            word_count: 120,
            word_radius_min: 20.0,
            word_radius_max: 160.0,
            word_radius_bias: 2.0,
            word_opacity_bright: 0.75,
            word_opacity_dim: 0.3,
            word_opacity_band: 0.15,
            word_fade_speed: (0.002, 0.004),
            word_change_frames: (50.0, 150.0),
            word_response_frames: 30.0,
            seed: None,
        }
    }
}

impl StarConfig {
    /// Preset tuned for the given device class.
    pub fn for_device(profile: DeviceProfile) -> Self {
        match profile {
            DeviceProfile::Desktop => Self::default(),
            DeviceProfile::Touch => Self {
                profile,
                star_scale: 0.5,
                perspective_distance: 800.0,
                hit_circle_radius: 28.0,
                detection_radius: 55.0,
                word_count: 100,
                ..Self::default()
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_word_count(mut self, count: usize) -> Self {
        self.word_count = count;
        self
    }

    pub fn with_idle_delay(mut self, delay: Duration) -> Self {
        self.idle_delay = delay;
        self
    }

    /// Drag sensitivity for the given input kind.
    pub fn drag_sensitivity_for(&self, touch: bool) -> f32 {
        if touch {
            self.touch_drag_sensitivity
        } else {
            self.drag_sensitivity
        }
    }

    /// Tap threshold for the given input kind.
    pub fn tap_threshold_for(&self, touch: bool) -> f32 {
        if touch {
            self.touch_tap_threshold
        } else {
            self.mouse_tap_threshold
        }
    }

    /// Effective shape scale for a viewport: `star_scale` shrunk on small screens.
    pub fn scale_for_viewport(&self, width: f32, height: f32) -> f32 {
        let extent = width.min(height);
        if !extent.is_finite() || extent <= 0.0 {
            return self.star_scale * self.min_viewport_scale;
        }
        let factor = (extent / self.reference_extent).clamp(self.min_viewport_scale, 1.0);
        self.star_scale * factor
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("star_scale", self.star_scale)?;
        positive("perspective_distance", self.perspective_distance)?;
        positive("reference_extent", self.reference_extent)?;
        unit_open_closed("min_viewport_scale", self.min_viewport_scale)?;
        if !self.default_spin.is_finite() {
            return Err(ConfigError {
                field: "default_spin",
                message: "components must be finite".into(),
            });
        }
        unit_open_closed("rotation_catch_up", self.rotation_catch_up)?;
        positive("drag_sensitivity", self.drag_sensitivity)?;
        positive("touch_drag_sensitivity", self.touch_drag_sensitivity)?;
        positive("momentum_gain", self.momentum_gain)?;
        if !(self.momentum_decay > 0.0 && self.momentum_decay < 1.0) {
            return Err(ConfigError {
                field: "momentum_decay",
                message: format!("must lie in (0, 1), got {}", self.momentum_decay),
            });
        }
        positive("momentum_epsilon", self.momentum_epsilon)?;
        if self.idle_delay.is_zero() {
            return Err(ConfigError {
                field: "idle_delay",
                message: "must be non-zero".into(),
            });
        }
        positive("detection_radius", self.detection_radius)?;
        unit_open_closed("selection_ratio", self.selection_ratio)?;
        if !(self.ray_near_depth < self.ray_far_depth) {
            return Err(ConfigError {
                field: "ray_near_depth",
                message: "near depth must be in front of far depth".into(),
            });
        }
        if self.ray_near_depth <= -self.perspective_distance {
            return Err(ConfigError {
                field: "ray_near_depth",
                message: "near depth must stay in front of the camera".into(),
            });
        }
        positive("hit_circle_radius", self.hit_circle_radius)?;
        positive("mouse_tap_threshold", self.mouse_tap_threshold)?;
        positive("touch_tap_threshold", self.touch_tap_threshold)?;
        non_negative("label_offset", self.label_offset)?;
        positive("ring_radius", self.ring_radius)?;
        unit_open_closed("ring_ease", self.ring_ease)?;
        if self.word_count == 0 || self.word_count > 1000 {
            return Err(ConfigError {
                field: "word_count",
                message: format!("must lie in [1, 1000], got {}", self.word_count),
            });
        }
        non_negative("word_radius_min", self.word_radius_min)?;
        if !(self.word_radius_min < self.word_radius_max) {
            return Err(ConfigError {
                field: "word_radius_max",
                message: "must exceed word_radius_min".into(),
            });
        }
        positive("word_radius_bias", self.word_radius_bias)?;
        for (field, v) in [
            ("word_opacity_bright", self.word_opacity_bright),
            ("word_opacity_dim", self.word_opacity_dim),
            ("word_opacity_band", self.word_opacity_band),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError {
                    field,
                    message: format!("must lie in [0, 1], got {}", v),
                });
            }
        }
        ordered_range("word_fade_speed", self.word_fade_speed)?;
        ordered_range("word_change_frames", self.word_change_frames)?;
        positive("word_response_frames", self.word_response_frames)?;
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError {
            field,
            message: format!("must be a positive finite number, got {}", v),
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError {
            field,
            message: format!("must be a non-negative finite number, got {}", v),
        })
    }
}

fn unit_open_closed(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError {
            field,
            message: format!("must lie in (0, 1], got {}", v),
        })
    }
}

fn ordered_range(field: &'static str, (lo, hi): (f32, f32)) -> Result<(), ConfigError> {
    if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(ConfigError {
            field,
            message: format!("expected 0 < min <= max, got ({}, {})", lo, hi),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(StarConfig::default().validate().is_ok());
        assert!(StarConfig::for_device(DeviceProfile::Touch).validate().is_ok());
    }

    #[test]
    fn test_decay_must_be_below_one() {
        let cfg = StarConfig {
            momentum_decay: 1.0,
            ..StarConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field, "momentum_decay");
        assert!(err.to_string().contains("momentum_decay"));
    }

    #[test]
    fn test_word_count_bounds() {
        assert!(StarConfig::default().with_word_count(0).validate().is_err());
        assert!(StarConfig::default().with_word_count(200).validate().is_ok());
    }

    #[test]
    fn test_idle_delay_must_be_positive() {
        let err = StarConfig::default()
            .with_idle_delay(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "idle_delay");
        let cfg = StarConfig::default().with_idle_delay(Duration::from_millis(800));
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.idle_delay, Duration::from_millis(800));
    }

    #[test]
    fn test_viewport_scale_clamped() {
        let cfg = StarConfig::default();
        assert!((cfg.scale_for_viewport(1920.0, 1080.0) - cfg.star_scale).abs() < 1e-6);
        let small = cfg.scale_for_viewport(100.0, 100.0);
        assert!((small - cfg.star_scale * cfg.min_viewport_scale).abs() < 1e-6);
        let zero = cfg.scale_for_viewport(0.0, 600.0);
        assert!(zero > 0.0);
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(DeviceProfile::from_name("Touch"), Some(DeviceProfile::Touch));
        assert_eq!(DeviceProfile::from_name(" desktop "), Some(DeviceProfile::Desktop));
        assert_eq!(DeviceProfile::from_name("watch"), None);
    }

    #[test]
    fn test_touch_preset_has_coarser_input() {
        let cfg = StarConfig::for_device(DeviceProfile::Touch);
        assert!(cfg.tap_threshold_for(true) > cfg.tap_threshold_for(false));
        assert!(cfg.drag_sensitivity_for(true) < cfg.drag_sensitivity_for(false));
    }
}

//! Floating word field: the cloud of labels drifting inside the star.
//!
//! Each word owns a fixed spot in a ball around the core, an opacity that
//! breathes inside a narrow band, and a countdown to its next word change:
//!
//! - **Position**: uniform direction on the sphere, radius biased toward the
//!   center by a power law so the core reads dense and the rim sparse.
//! - **Opacity band**: the baseline comes from the spawn radius (central
//!   words bright, peripheral words dim); the word only oscillates within
//!   `±band` of it.
//! - **Word changes**: on countdown expiry, and whenever the word bottoms out
//!   in its band.
//!
//! Words are never destroyed; the pool is only re-worded and, on reset,
//! re-positioned in place.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::StarConfig;
use crate::geometry::{Perspective, Rotation, Viewport};
use crate::scene::WordSet;

// ── Parameters ──

#[derive(Debug, Clone)]
struct FieldParams {
    radius_min: f32,
    radius_max: f32,
    radius_bias: f32,
    opacity_bright: f32,
    opacity_dim: f32,
    opacity_band: f32,
    fade_speed: (f32, f32),
    change_frames: (f32, f32),
    response_frames: f32,
}

impl FieldParams {
    fn from_config(cfg: &StarConfig) -> Self {
        Self {
            radius_min: cfg.word_radius_min,
            radius_max: cfg.word_radius_max,
            radius_bias: cfg.word_radius_bias,
            opacity_bright: cfg.word_opacity_bright,
            opacity_dim: cfg.word_opacity_dim,
            opacity_band: cfg.word_opacity_band,
            fade_speed: cfg.word_fade_speed,
            change_frames: cfg.word_change_frames,
            response_frames: cfg.word_response_frames,
        }
    }
}

// ── FloatingWord ──

#[derive(Debug, Clone)]
pub struct FloatingWord {
    /// Unscaled model-space position
    pub position: Vec3,
    pub text: String,
    pub opacity: f32,
    /// Center of the opacity band
    pub base_opacity: f32,
    /// +1 brightening, -1 dimming
    fade_direction: f32,
    /// Opacity change per frame
    fade_speed: f32,
    /// Frames until the next word change
    countdown: f32,
}

impl FloatingWord {
    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    /// Opacity band `(lo, hi)` clamped to `[0, 1]`.
    pub fn band(&self, half_width: f32) -> (f32, f32) {
        (
            (self.base_opacity - half_width).max(0.0),
            (self.base_opacity + half_width).min(1.0),
        )
    }
}

/// A word ready to draw: screen position, depth, final opacity.
#[derive(Debug, Clone)]
pub struct ProjectedWord<'a> {
    pub text: &'a str,
    pub screen: Vec2,
    /// Rotated z (larger = farther)
    pub depth: f32,
    pub opacity: f32,
}

// ── WordField ──

pub struct WordField {
    words: Vec<FloatingWord>,
    available: WordSet,
    params: FieldParams,
    rng: StdRng,
}

impl WordField {
    pub fn new(cfg: &StarConfig, available: WordSet) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            words: Vec::with_capacity(cfg.word_count),
            available,
            params: FieldParams::from_config(cfg),
            rng,
        };
        for _ in 0..cfg.word_count {
            let w = field.spawn();
            field.words.push(w);
        }
        field
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[FloatingWord] {
        &self.words
    }

    /// Word set currently being drawn from.
    pub fn available(&self) -> &WordSet {
        &self.available
    }

    /// Half-width of the opacity band.
    pub fn opacity_band(&self) -> f32 {
        self.params.opacity_band
    }

    /// Re-sample every word's position, opacity and word in place.
    pub fn reset(&mut self) {
        for i in 0..self.words.len() {
            let fresh = self.spawn();
            self.words[i] = fresh;
        }
    }

    fn spawn(&mut self) -> FloatingWord {
        let p = &self.params;
        let rng = &mut self.rng;

        // Uniform direction: inverse CDF on the polar angle
        let theta = rng.gen::<f32>() * std::f32::consts::TAU;
        let phi = (rng.gen::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();

        // Power-law radius; bias > 1 pulls toward the core
        let t = rng.gen::<f32>().powf(p.radius_bias);
        let radius = p.radius_min + (p.radius_max - p.radius_min) * t;

        let position = Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        );

        let base_opacity = p.opacity_bright + (p.opacity_dim - p.opacity_bright) * t;
        let opacity = (base_opacity + (rng.gen::<f32>() * 2.0 - 1.0) * p.opacity_band)
            .clamp(0.0, 1.0);
        let fade_direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let fade_speed = p.fade_speed.0 + rng.gen::<f32>() * (p.fade_speed.1 - p.fade_speed.0);
        let countdown = rng.gen::<f32>() * p.change_frames.1;
        let text = pick_word(&self.available, rng).unwrap_or_default();

        FloatingWord {
            position,
            text,
            opacity,
            base_opacity,
            fade_direction,
            fade_speed,
            countdown,
        }
    }

    /// Advance every word by `dt_frames` display frames.
    pub fn update(&mut self, dt_frames: f32) {
        let Self {
            words,
            available,
            params,
            rng,
        } = self;

        for w in words.iter_mut() {
            w.opacity += w.fade_direction * w.fade_speed * dt_frames;

            let (lo, hi) = w.band(params.opacity_band);
            if w.opacity <= lo {
                w.opacity = lo;
                w.fade_direction = 1.0;
                // Swap while the word is at its dimmest
                if let Some(next) = pick_word(available, rng) {
                    w.text = next;
                }
            } else if w.opacity >= hi {
                w.opacity = hi;
                w.fade_direction = -1.0;
            }

            w.countdown -= dt_frames;
            if w.countdown <= 0.0 {
                if let Some(next) = pick_word(available, rng) {
                    w.text = next;
                }
                let (lo, hi) = params.change_frames;
                w.countdown = lo + rng.gen::<f32>() * (hi - lo);
            }
        }
    }

    /// Draw words from `set` from now on. Returns `false` (and leaves every
    /// countdown alone) when `set` is already the active set.
    pub fn set_available_words(&mut self, set: &WordSet) -> bool {
        if self.available.same_as(set) {
            return false;
        }
        self.available = set.clone();
        let response = self.params.response_frames;
        for w in &mut self.words {
            let quick = self.rng.gen::<f32>() * response;
            w.countdown = w.countdown.min(quick);
        }
        log::debug!("word field switched to a set of {} words", set.len());
        true
    }

    /// Rotate, project and sort far-to-near for painter's-order drawing.
    pub fn project_sorted(
        &self,
        rotation: &Rotation,
        perspective: &Perspective,
        scale: f32,
        viewport: &Viewport,
    ) -> Vec<ProjectedWord<'_>> {
        let mut projected: Vec<ProjectedWord<'_>> = self
            .words
            .par_iter()
            .map(|w| {
                let rotated = rotation.apply(w.position * scale);
                ProjectedWord {
                    text: w.text.as_str(),
                    screen: perspective.project(rotated, viewport),
                    depth: rotated.z,
                    opacity: w.opacity * perspective.depth_opacity(rotated.z),
                }
            })
            .collect();
        projected.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        projected
    }
}

fn pick_word(set: &WordSet, rng: &mut StdRng) -> Option<String> {
    if set.is_empty() {
        return None;
    }
    set.get(rng.gen_range(0..set.len())).map(str::to_string)
}

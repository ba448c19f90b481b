//! egui backend for [`FrameList`].
//!
//! Primitives are painted in list order; every opacity in the list
//! multiplies the theme color's alpha. `night` is white on black, `paper`
//! is dark ink on off-white.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke};

use crate::render::frame::{DrawCommand, FrameList, TextKind};

/// Colors and sizes for painting a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub edge: Color32,
    pub word: Color32,
    pub label: Color32,
    pub ring: Color32,
    /// Base font size in points
    pub font_size: f32,
    pub line_width: f32,
}

impl Theme {
    pub fn night() -> Self {
        Self {
            background: Color32::BLACK,
            edge: Color32::WHITE,
            word: Color32::WHITE,
            label: Color32::WHITE,
            ring: Color32::WHITE,
            font_size: 10.0,
            line_width: 1.0,
        }
    }

    pub fn paper() -> Self {
        Self {
            background: Color32::from_rgb(250, 250, 252),
            edge: Color32::from_rgb(25, 25, 38),
            word: Color32::from_rgb(38, 38, 46),
            label: Color32::from_rgb(0, 80, 180),
            ring: Color32::from_rgb(0, 80, 180),
            font_size: 10.0,
            line_width: 1.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::night()
    }
}

/// Paint `frame` into `rect`. Frame coordinates are relative to `rect.min`.
pub fn paint_frame(painter: &egui::Painter, rect: Rect, frame: &FrameList, theme: &Theme) {
    painter.rect_filled(rect, Rounding::ZERO, theme.background);
    let origin = rect.min;

    for cmd in &frame.commands {
        match cmd {
            DrawCommand::Line { from, to, opacity } => {
                painter.line_segment(
                    [pos(origin, *from), pos(origin, *to)],
                    Stroke::new(theme.line_width, fade(theme.edge, *opacity)),
                );
            }
            DrawCommand::Text {
                kind,
                text,
                at,
                size,
                opacity,
            } => {
                let base = match kind {
                    TextKind::Word => theme.word,
                    TextKind::Label => theme.label,
                };
                painter.text(
                    pos(origin, *at),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::monospace(theme.font_size * size),
                    fade(base, *opacity),
                );
            }
            DrawCommand::Ring {
                center,
                radius,
                opacity,
            } => {
                painter.circle_stroke(
                    pos(origin, *center),
                    *radius,
                    Stroke::new(theme.line_width, fade(theme.ring, *opacity)),
                );
            }
        }
    }
}

fn pos(origin: Pos2, p: glam::Vec2) -> Pos2 {
    Pos2::new(origin.x + p.x, origin.y + p.y)
}

/// Scale a color's alpha by `opacity` (clamped to [0, 1]).
pub fn fade(color: Color32, opacity: f32) -> Color32 {
    let a = (color.a() as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

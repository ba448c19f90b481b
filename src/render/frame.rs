//! Per-frame draw list.
//!
//! The controller describes a frame as an ordered list of primitives in
//! screen space; a backend paints them in list order (painter's algorithm).
//! Nothing here knows about egui.

use glam::Vec2;

use crate::geometry::Viewport;

/// Role of a text primitive, for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Floating word in the interior cloud
    Word,
    /// Roman numeral beside a hot vertex
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        opacity: f32,
    },
    Text {
        kind: TextKind,
        text: String,
        at: Vec2,
        /// Font scale relative to the theme's base size
        size: f32,
        opacity: f32,
    },
    /// Active-vertex indicator
    Ring {
        center: Vec2,
        radius: f32,
        opacity: f32,
    },
}

impl DrawCommand {
    pub fn opacity(&self) -> f32 {
        match self {
            DrawCommand::Line { opacity, .. }
            | DrawCommand::Text { opacity, .. }
            | DrawCommand::Ring { opacity, .. } => *opacity,
        }
    }
}

/// Everything to paint for one frame, back to front.
#[derive(Debug, Clone, Default)]
pub struct FrameList {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl FrameList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, opacity: f32) {
        self.commands.push(DrawCommand::Line { from, to, opacity });
    }

    pub fn text(&mut self, kind: TextKind, text: impl Into<String>, at: Vec2, size: f32, opacity: f32) {
        // Fully transparent text is skipped
        if opacity <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Text {
            kind,
            text: text.into(),
            at,
            size,
            opacity,
        });
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            opacity,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn texts(&self, kind: TextKind) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(move |c| matches!(c, DrawCommand::Text { kind: k, .. } if *k == kind))
    }

    pub fn ring_command(&self) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|c| matches!(c, DrawCommand::Ring { .. }))
    }
}

//! Host → core input events.
//!
//! Coordinates are logical pixels relative to the drawing surface's top-left
//! corner. Only the first touch point is tracked.
//!
//! Hosts that deliver input in per-frame batches without per-event
//! timestamps should pass each batch through [`coalesce_moves`], so a drag
//! produces one motion sample per frame instead of one real sample followed
//! by zero-duration ones.

pub mod gesture;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    /// Pointer left the surface; ends any press
    PointerLeave,
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd,
    Resize {
        width: f32,
        height: f32,
        pixel_density: f32,
    },
}

/// Collapse runs of consecutive moves of the same kind to their last position.
pub fn coalesce_moves<I>(events: I) -> Vec<InputEvent>
where
    I: IntoIterator<Item = InputEvent>,
{
    let mut out: Vec<InputEvent> = Vec::new();
    for event in events {
        match (out.last_mut(), event) {
            (Some(InputEvent::PointerMove(p)), InputEvent::PointerMove(at))
            | (Some(InputEvent::TouchMove(p)), InputEvent::TouchMove(at)) => *p = at,
            _ => out.push(event),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_keeps_last_move_of_each_run() {
        let batch = vec![
            InputEvent::PointerDown(Vec2::new(0.0, 0.0)),
            InputEvent::PointerMove(Vec2::new(4.0, 0.0)),
            InputEvent::PointerMove(Vec2::new(9.0, 1.0)),
            InputEvent::PointerMove(Vec2::new(15.0, 2.0)),
            InputEvent::PointerUp,
            InputEvent::PointerMove(Vec2::new(16.0, 2.0)),
            InputEvent::TouchMove(Vec2::new(1.0, 1.0)),
            InputEvent::TouchMove(Vec2::new(2.0, 2.0)),
        ];
        assert_eq!(
            coalesce_moves(batch),
            vec![
                InputEvent::PointerDown(Vec2::new(0.0, 0.0)),
                InputEvent::PointerMove(Vec2::new(15.0, 2.0)),
                InputEvent::PointerUp,
                InputEvent::PointerMove(Vec2::new(16.0, 2.0)),
                InputEvent::TouchMove(Vec2::new(2.0, 2.0)),
            ]
        );
    }
}

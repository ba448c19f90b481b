//! Pointer targeting: hot-vertex detection along a 3D ray and menu item
//! lookup in presenter-supplied bounds.

use glam::{Vec2, Vec3};

use crate::geometry::{Perspective, Segment};
use crate::presentation::ItemBounds;

/// Result of probing the hot vertices with a pointer ray.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Probe {
    /// Closest vertex within its detection radius, with its distance
    pub near: Option<(usize, f32)>,
    /// Set only when `near` is also inside the selection radius
    pub selected: Option<usize>,
}

/// Find the hot vertex the pointer ray points at.
///
/// `rotated` holds the rotated (scaled) position of each hot vertex. A
/// vertex is a candidate when the ray passes within
/// `detection_radius * perspective.scale(z)` of it; the closest candidate is
/// `near`, and it is `selected` only inside `selection_ratio` of its own
/// radius. A degenerate ray detects nothing.
pub fn probe_vertices(
    ray: &Segment,
    rotated: &[Vec3],
    perspective: &Perspective,
    detection_radius: f32,
    selection_ratio: f32,
) -> Probe {
    if ray.is_degenerate() {
        return Probe::default();
    }

    let mut best: Option<(usize, f32, f32)> = None;
    for (i, &p) in rotated.iter().enumerate() {
        let radius = detection_radius * perspective.scale(p.z);
        let d = ray.distance_to(p);
        if !d.is_finite() || d >= radius {
            continue;
        }
        if best.map_or(true, |(_, bd, _)| d < bd) {
            best = Some((i, d, radius));
        }
    }

    match best {
        Some((i, d, radius)) => Probe {
            near: Some((i, d)),
            selected: (d < radius * selection_ratio).then_some(i),
        },
        None => Probe::default(),
    }
}

/// Menu item under `point`.
///
/// When every item carries a depth, overlapping items are tried nearest
/// first; otherwise they are tried in list order.
pub fn menu_item_at(point: Vec2, bounds: &[ItemBounds]) -> Option<usize> {
    let mut ordered: Vec<&ItemBounds> = bounds.iter().collect();
    if !ordered.is_empty() && ordered.iter().all(|b| b.depth.is_some()) {
        ordered.sort_by(|a, b| {
            let da = a.depth.unwrap_or(f32::INFINITY);
            let db = b.depth.unwrap_or(f32::INFINITY);
            da.total_cmp(&db)
        });
    }
    ordered.into_iter().find(|b| b.contains(point)).map(|b| b.index)
}

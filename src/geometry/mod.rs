//! Geometry kernel: rotation, weak perspective and ray distances.
//!
//! Pure functions over `glam` vectors. Model space is right-handed with +y
//! pointing down the screen and +z pointing away from the viewer, so a larger
//! rotated z is farther away and gets a smaller perspective scale.
//!
//! ## Rotation order
//! [`rotate`] applies X, then Y, then Z. The order is part of the contract:
//! the Y step consumes the X-rotated z and the Z step consumes the X/Y-rotated
//! x and y. Anything that projects the star must go through the same function.

use glam::{Vec2, Vec3};

/// Smallest `distance + z` the perspective divide is allowed to see.
pub const MIN_DEPTH_DENOMINATOR: f32 = 1e-3;

/// Squared length under which a direction is treated as zero.
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Drawing surface size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per logical pixel
    pub pixel_density: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_density: if pixel_density.is_finite() && pixel_density > 0.0 {
                pixel_density
            } else {
                1.0
            },
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 1.0)
    }
}

/// Precomputed sines and cosines for one angle triple.
///
/// Build once per frame, then [`Rotation::apply`] to every point.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    sin: Vec3,
    cos: Vec3,
}

impl Rotation {
    pub fn new(angles: Vec3) -> Self {
        Self {
            sin: Vec3::new(angles.x.sin(), angles.y.sin(), angles.z.sin()),
            cos: Vec3::new(angles.x.cos(), angles.y.cos(), angles.z.cos()),
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let (s, c) = (self.sin, self.cos);

        // About X
        let y1 = p.y * c.x - p.z * s.x;
        let z1 = p.y * s.x + p.z * c.x;

        // About Y (uses the X-rotated z)
        let x2 = p.x * c.y + z1 * s.y;
        let z2 = -p.x * s.y + z1 * c.y;

        // About Z (uses the X/Y-rotated x and y)
        let x3 = x2 * c.z - y1 * s.z;
        let y3 = x2 * s.z + y1 * c.z;

        Vec3::new(x3, y3, z2)
    }
}

/// Rotate `point` about X, then Y, then Z.
pub fn rotate(point: Vec3, rx: f32, ry: f32, rz: f32) -> Vec3 {
    Rotation::new(Vec3::new(rx, ry, rz)).apply(point)
}

/// Single-divide depth scaling: `distance / (distance + z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub distance: f32,
}

impl Perspective {
    pub fn new(distance: f32) -> Self {
        Self { distance }
    }

    /// Depth scale at `z`. The denominator is clamped at
    /// [`MIN_DEPTH_DENOMINATOR`] so points at or behind the eye stay finite.
    #[inline]
    pub fn scale(&self, z: f32) -> f32 {
        self.distance / (self.distance + z).max(MIN_DEPTH_DENOMINATOR)
    }

    /// Model point → screen point.
    #[inline]
    pub fn project(&self, p: Vec3, viewport: &Viewport) -> Vec2 {
        let s = self.scale(p.z);
        Vec2::new(p.x * s, p.y * s) + viewport.center()
    }

    /// Screen point → model point on the plane `z = depth`.
    #[inline]
    pub fn unproject(&self, screen: Vec2, depth: f32, viewport: &Viewport) -> Vec3 {
        let s = self.scale(depth);
        let local = (screen - viewport.center()) / s;
        Vec3::new(local.x, local.y, depth)
    }

    /// Segment through the screen point between two depth planes.
    pub fn pointer_ray(
        &self,
        screen: Vec2,
        near_depth: f32,
        far_depth: f32,
        viewport: &Viewport,
    ) -> Segment {
        Segment {
            start: self.unproject(screen, near_depth, viewport),
            end: self.unproject(screen, far_depth, viewport),
        }
    }

    /// Opacity multiplier for a rotated depth, rising with z. 0.55 at the
    /// origin plane, clamped to [0, 1] far out.
    #[inline]
    pub fn depth_opacity(&self, z: f32) -> f32 {
        let t = (self.distance + z) / (2.0 * self.distance);
        (t * 0.9 + 0.1).clamp(0.0, 1.0)
    }
}

/// Closed 3D segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length_squared() <= DEGENERATE_LENGTH_SQ
    }

    pub fn distance_to(&self, p: Vec3) -> f32 {
        point_to_segment_distance(p, self.start, self.end)
    }
}

/// Euclidean distance from `p` to the closest point of segment `[a, b]`.
///
/// The projection parameter is clamped to `[0, 1]`; a zero-length segment
/// degrades to `|p - a|`.
pub fn point_to_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Offset of length `amount` along `dir`, or zero when `dir` has no direction.
#[inline]
pub fn outward_offset(dir: Vec2, amount: f32) -> Vec2 {
    let len_sq = dir.length_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ {
        return Vec2::ZERO;
    }
    dir * (amount / len_sq.sqrt())
}

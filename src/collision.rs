//! Geometry query adapter.
//!
//! The controller never talks to a physics engine directly. Every probe goes
//! through [`GeometryQuery`], which wraps whatever cast primitive the host
//! provides and reports the result as a [`HitRecord`].

use bevy::prelude::*;

/// Classification of a collision surface, attached to colliders at authoring time.
///
/// Colliders without this component are treated as [`SurfaceKind::Obstacle`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[reflect(Component)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceKind {
    /// Generic obstacle geometry. Ceilings ignore it and airborne actors pass
    /// through obstacle walls.
    #[default]
    Obstacle,
    /// Level-edge geometry: walls, ceilings and walkable slopes that always
    /// block the actor.
    Boundary,
}

impl SurfaceKind {
    /// Check if this surface is boundary geometry.
    #[inline]
    pub fn is_boundary(self) -> bool {
        self == Self::Boundary
    }
}

/// Result of a single probe cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Progress along the cast in `[0, 1]`. Hit distance is `fraction * cast_length`.
    pub fraction: f32,
    /// Unit normal of the surface at the hit point.
    pub normal: Vec2,
    /// Surface classification of the collider that was hit.
    pub surface: SurfaceKind,
}

impl HitRecord {
    /// Create a hit record.
    pub fn new(fraction: f32, normal: Vec2, surface: SurfaceKind) -> Self {
        Self {
            fraction,
            normal,
            surface,
        }
    }

    /// A record with a non-positive fraction counts as "no hit".
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.fraction > 0.0
    }

    /// Distance along a cast of the given length.
    #[inline]
    pub fn distance(&self, cast_length: f32) -> f32 {
        self.fraction * cast_length
    }

    /// Angle between the surface normal and world up, in degrees.
    #[inline]
    pub fn surface_angle(&self) -> f32 {
        surface_angle(self.normal)
    }
}

/// Angle between a surface normal and world up, in degrees (0 = flat floor,
/// 90 = vertical wall, 180 = flat ceiling).
pub fn surface_angle(normal: Vec2) -> f32 {
    let normal = normal.normalize_or_zero();
    if normal == Vec2::ZERO {
        return 0.0;
    }
    normal.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Read-only cast primitive against the static obstacle/boundary geometry.
///
/// Implementations must never fail: a miss is `None` (or a record with a
/// non-positive fraction). `direction` is a unit vector.
pub trait GeometryQuery {
    /// Cast from `origin` along `direction` up to `max_distance`.
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<HitRecord>;
}

impl<T: GeometryQuery + ?Sized> GeometryQuery for &T {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<HitRecord> {
        (**self).cast(origin, direction, max_distance)
    }
}

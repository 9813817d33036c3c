//! Actor bounds.

use bevy::prelude::*;

/// Axis-aligned box around the actor's collider.
///
/// Derived from the collider at the start of every resolution step. Resolvers
/// move it with [`ActorBounds::translate`] so that later phases of the same
/// tick see the corrected position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBounds {
    /// Box center in world space.
    pub center: Vec2,
    /// Half of the box size.
    pub half_extents: Vec2,
}

impl ActorBounds {
    /// Create bounds from a center and half extents.
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Create bounds from a center and full size.
    pub fn from_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    /// Bottom-left corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Top-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Half of the width.
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.half_extents.x
    }

    /// Half of the height.
    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_extents.y
    }

    /// Apply a relative displacement immediately.
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}

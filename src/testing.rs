//! Engine-free geometry for exercising the resolvers.
//!
//! [`SegmentGeometry`] answers casts against a list of line segments, so the
//! collision resolvers can be driven tick by tick without a physics world.

use bevy::prelude::*;

use crate::collision::{GeometryQuery, HitRecord, SurfaceKind};

/// One tagged line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
    /// Tag reported for hits on this segment.
    pub surface: SurfaceKind,
}

/// A static level made of line segments.
///
/// Reported normals always face the cast origin, so one-sided segments are
/// not needed to model the outline of a solid.
#[derive(Debug, Clone, Default)]
pub struct SegmentGeometry {
    segments: Vec<Segment>,
}

impl SegmentGeometry {
    /// Create an empty level; every cast misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment from `start` to `end`.
    pub fn with_segment(mut self, start: Vec2, end: Vec2, surface: SurfaceKind) -> Self {
        self.segments.push(Segment {
            start,
            end,
            surface,
        });
        self
    }

    /// Add the four edges of an axis-aligned box.
    pub fn with_box(self, center: Vec2, half_extents: Vec2, surface: SurfaceKind) -> Self {
        let min = center - half_extents;
        let max = center + half_extents;
        self.with_segment(Vec2::new(min.x, max.y), max, surface)
            .with_segment(min, Vec2::new(max.x, min.y), surface)
            .with_segment(min, Vec2::new(min.x, max.y), surface)
            .with_segment(Vec2::new(max.x, min.y), max, surface)
    }

    /// Add a ramp starting at `foot` and rising at `angle_degrees` for `run`
    /// units of horizontal distance. A negative `run` rises to the left.
    pub fn with_ramp(self, foot: Vec2, angle_degrees: f32, run: f32, surface: SurfaceKind) -> Self {
        let rise = run.abs() * angle_degrees.to_radians().tan();
        self.with_segment(foot, foot + Vec2::new(run, rise), surface)
    }

    /// Segments in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl GeometryQuery for SegmentGeometry {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<HitRecord> {
        if max_distance <= 0.0 {
            return None;
        }

        let mut closest: Option<(f32, &Segment)> = None;
        for segment in &self.segments {
            let edge = segment.end - segment.start;
            let denom = direction.perp_dot(edge);
            if denom.abs() < f32::EPSILON {
                continue;
            }

            let offset = segment.start - origin;
            let t = offset.perp_dot(edge) / denom;
            let u = offset.perp_dot(direction) / denom;
            if !(0.0..=1.0).contains(&u) || t < 0.0 || t > max_distance {
                continue;
            }
            if closest.is_none_or(|(best, _)| t < best) {
                closest = Some((t, segment));
            }
        }

        closest.map(|(t, segment)| {
            let edge = segment.end - segment.start;
            let mut normal = edge.perp().normalize();
            if normal.dot(direction) > 0.0 {
                normal = -normal;
            }
            HitRecord::new(t / max_distance, normal, segment.surface)
        })
    }
}

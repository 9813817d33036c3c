//! Cast probe sets and closest-hit selection.
//!
//! A probe set is a row of parallel casts spread evenly across one face of the
//! actor bounds, inset by the buffer length so the outermost probes do not
//! graze geometry the actor is merely touching.

use bevy::prelude::*;

use crate::bounds::ActorBounds;
use crate::collision::{GeometryQuery, HitRecord};

/// Ordered origins of N parallel casts.
///
/// Requires at least two probes; a single probe leaves the spacing undefined.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    origins: Vec<Vec2>,
}

impl ProbeSet {
    /// Spread `count` origins evenly from `start` to `end` (both inclusive).
    pub fn between(start: Vec2, end: Vec2, count: usize) -> Self {
        debug_assert!(count >= 2, "a probe set needs at least two probes, got {count}");
        let last = count.saturating_sub(1) as f32;
        let origins = (0..count)
            .map(|i| start.lerp(end, i as f32 / last))
            .collect();
        Self { origins }
    }

    /// Vertical line through the bounds center, spanning the inset height.
    ///
    /// Used for horizontal casts.
    pub fn vertical_line(bounds: &ActorBounds, buffer: f32, count: usize) -> Self {
        let min = bounds.min();
        let max = bounds.max();
        Self::between(
            Vec2::new(bounds.center.x, min.y + buffer),
            Vec2::new(bounds.center.x, max.y - buffer),
            count,
        )
    }

    /// Horizontal line through the bounds center, spanning the inset width.
    ///
    /// Used for vertical casts.
    pub fn horizontal_line(bounds: &ActorBounds, buffer: f32, count: usize) -> Self {
        let min = bounds.min();
        let max = bounds.max();
        Self::between(
            Vec2::new(min.x + buffer, bounds.center.y),
            Vec2::new(max.x - buffer, bounds.center.y),
            count,
        )
    }

    /// Probe origins in order.
    pub fn origins(&self) -> &[Vec2] {
        &self.origins
    }

    /// Number of probes.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// True when the set has no probes.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Cast every probe. Entries with a non-positive fraction become `None`.
    pub fn cast(
        &self,
        query: &impl GeometryQuery,
        direction: Vec2,
        length: f32,
    ) -> Vec<Option<HitRecord>> {
        self.origins
            .iter()
            .map(|&origin| {
                query
                    .cast(origin, direction, length)
                    .filter(HitRecord::is_hit)
            })
            .collect()
    }
}

/// Bookkeeping for picking a hit out of a probe set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSelection {
    /// Smallest qualifying fraction seen so far.
    pub smallest_fraction: f32,
    /// Index of the selected probe.
    pub selected: Option<usize>,
    /// Whether any probe hit a surface too steep to climb.
    pub encounter_wall: bool,
}

impl Default for ProbeSelection {
    fn default() -> Self {
        Self {
            smallest_fraction: f32::INFINITY,
            selected: None,
            encounter_wall: false,
        }
    }
}

impl ProbeSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit on a surface too steep to climb. The closest wall probe
    /// stays selected.
    pub fn record_wall(&mut self, index: usize, fraction: f32) {
        self.encounter_wall = true;
        self.offer(index, fraction);
    }

    /// Select probe `index` if `fraction` is the closest seen so far.
    ///
    /// Returns whether the probe was selected.
    pub fn offer(&mut self, index: usize, fraction: f32) -> bool {
        if fraction > 0.0 && fraction < self.smallest_fraction {
            self.smallest_fraction = fraction;
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Select the closest hit that satisfies `accept`.
    pub fn closest(hits: &[Option<HitRecord>], accept: impl Fn(&HitRecord) -> bool) -> Self {
        let mut selection = Self::new();
        for (index, hit) in hits.iter().enumerate() {
            if let Some(hit) = hit.as_ref().filter(|hit| accept(hit)) {
                selection.offer(index, hit.fraction);
            }
        }
        selection
    }

    /// The selected hit, looked up in the probe results.
    pub fn hit<'a>(&self, hits: &'a [Option<HitRecord>]) -> Option<&'a HitRecord> {
        self.selected
            .and_then(|index| hits.get(index))
            .and_then(Option::as_ref)
    }
}

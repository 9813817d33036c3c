use bevy::prelude::*;

use super::surface_tangent;
use crate::bounds::ActorBounds;
use crate::collision::{GeometryQuery, HitRecord};
use crate::config::ControllerConfig;
use crate::probe::{ProbeSelection, ProbeSet};
use crate::state::KinematicState;

/// Result of the horizontal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalOutcome {
    /// Stopped flush against a wall; horizontal velocity cleared.
    WallStop,
    /// Grounded actor followed a walkable boundary slope ahead.
    SlopeClimb,
    /// Airborne actor met a walkable boundary face and was set grounded.
    BoundaryLanding,
    /// Grounded actor followed a slope falling away behind it.
    SlopeDescent,
    /// Nothing in the way.
    Free,
}

/// Move the bounds along the horizontal velocity.
///
/// Casts a vertical line of probes forward by half the width plus the step
/// distance. Walls (steeper than the climb limit) and walkable boundary
/// surfaces share one closest-hit selection. When any wall was seen, the
/// actor stops flush against the closest of those hits if it is boundary
/// geometry or the actor is grounded. A closest walkable boundary surface
/// turns the step into motion along the slope. Otherwise a reverse cast looks
/// for a descendable slope behind the actor to follow downhill.
pub fn resolve_horizontal(
    query: &impl GeometryQuery,
    bounds: &mut ActorBounds,
    state: &mut KinematicState,
    config: &ControllerConfig,
    dt: f32,
) -> HorizontalOutcome {
    let sign = state.velocity.x.signum();
    let direction = Vec2::new(sign, 0.0);
    let half_width = bounds.half_width();
    let step = state.velocity.x * dt;
    let cast_length = half_width + step.abs();

    let probes = ProbeSet::vertical_line(
        bounds,
        config.buffer_length,
        config.horizontal_raycast_number,
    );
    let hits = probes.cast(query, direction, cast_length);

    // Walls and walkable boundary faces compete for one closest index.
    let mut selection = ProbeSelection::new();
    for (index, hit) in hits.iter().enumerate() {
        let Some(hit) = hit else {
            continue;
        };
        if hit.surface_angle() > config.max_climbable_slope_angle {
            selection.record_wall(index, hit.fraction);
        } else if hit.surface.is_boundary() {
            selection.offer(index, hit.fraction);
        }
    }

    if let Some(closest) = selection.hit(&hits) {
        if selection.encounter_wall && (closest.surface.is_boundary() || state.grounded) {
            bounds.translate(direction * (closest.distance(cast_length) - half_width));
            state.velocity.x = 0.0;
            return HorizontalOutcome::WallStop;
        }

        let walkable_boundary = closest.surface.is_boundary()
            && closest.surface_angle() <= config.max_climbable_slope_angle;
        if walkable_boundary {
            return if state.grounded {
                follow_slope(bounds, state, closest, sign, dt);
                HorizontalOutcome::SlopeClimb
            } else {
                bounds.translate(Vec2::new(step, 0.0));
                state.grounded = true;
                HorizontalOutcome::BoundaryLanding
            };
        }
    }

    let behind = probes.cast(query, -direction, cast_length);
    let descent = ProbeSelection::closest(&behind, |hit| {
        hit.surface_angle() <= config.max_descendable_slope_angle
    });
    match descent.hit(&behind) {
        Some(slope) if state.grounded => {
            follow_slope(bounds, state, slope, sign, dt);
            HorizontalOutcome::SlopeDescent
        }
        _ => {
            bounds.translate(Vec2::new(step, 0.0));
            HorizontalOutcome::Free
        }
    }
}

fn follow_slope(
    bounds: &mut ActorBounds,
    state: &KinematicState,
    slope: &HitRecord,
    sign: f32,
    dt: f32,
) {
    let tangent = surface_tangent(slope.normal, sign);
    bounds.translate(tangent * state.velocity.length() * dt);
}

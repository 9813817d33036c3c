use bevy::prelude::*;

use crate::bounds::ActorBounds;
use crate::collision::GeometryQuery;
use crate::config::ControllerConfig;
use crate::probe::{ProbeSelection, ProbeSet};
use crate::state::KinematicState;

/// Result of the vertical phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalOutcome {
    /// Snapped onto walkable ground; vertical velocity cleared.
    Grounded,
    /// Slid along a surface too steep to stand on.
    SteepSlide,
    /// Stopped under a boundary ceiling; vertical velocity cleared.
    CeilingStop,
    /// Nothing underfoot or overhead.
    Free,
}

/// How far past the bounds edge a vertical cast reaches.
///
/// Grounded actors only probe the buffer so they stay glued to ground that
/// falls away slowly; airborne actors probe their full step.
fn vertical_reach(state: &KinematicState, config: &ControllerConfig, dt: f32) -> f32 {
    if state.grounded {
        config.buffer_length
    } else {
        (state.velocity.y * dt).abs()
    }
}

/// Resolve falling, or staying on the ground.
///
/// The closest hit below decides: walkable ground snaps the actor onto it and
/// grounds it, anything steeper makes it slide along the surface.
pub fn resolve_downward(
    query: &impl GeometryQuery,
    bounds: &mut ActorBounds,
    state: &mut KinematicState,
    config: &ControllerConfig,
    dt: f32,
) -> VerticalOutcome {
    let half_height = bounds.half_height();
    let cast_length = half_height + vertical_reach(state, config, dt);

    let probes = ProbeSet::horizontal_line(
        bounds,
        config.buffer_length,
        config.vertical_raycast_number,
    );
    let hits = probes.cast(query, Vec2::NEG_Y, cast_length);
    let selection = ProbeSelection::closest(&hits, |_| true);

    let Some(hit) = selection.hit(&hits) else {
        bounds.translate(Vec2::new(0.0, state.velocity.y * dt));
        state.grounded = false;
        return VerticalOutcome::Free;
    };

    let angle = hit.surface_angle();
    if angle > config.max_climbable_slope_angle {
        let slide_sign = if hit.normal.x < 0.0 { 1.0 } else { -1.0 };
        let tangent = Vec2::new(hit.normal.y * slide_sign, -hit.normal.x);
        let slide_scale = angle / 90.0;
        let slide = tangent * state.velocity.y * slide_scale;

        bounds.translate(slide * dt);
        // Raises only; a push against the current direction is ignored.
        state.velocity.x = state.velocity.x.max(slide.x);
        VerticalOutcome::SteepSlide
    } else {
        state.grounded = true;
        bounds.translate(Vec2::NEG_Y * (hit.distance(cast_length) - half_height));
        state.velocity.y = 0.0;
        VerticalOutcome::Grounded
    }
}

/// Resolve rising. Only boundary ceilings stop the actor.
pub fn resolve_upward(
    query: &impl GeometryQuery,
    bounds: &mut ActorBounds,
    state: &mut KinematicState,
    config: &ControllerConfig,
    dt: f32,
) -> VerticalOutcome {
    let half_height = bounds.half_height();
    let cast_length = half_height + vertical_reach(state, config, dt);

    let probes = ProbeSet::horizontal_line(
        bounds,
        config.buffer_length,
        config.vertical_raycast_number,
    );
    let hits = probes.cast(query, Vec2::Y, cast_length);
    let selection = ProbeSelection::closest(&hits, |hit| hit.surface.is_boundary());

    match selection.hit(&hits) {
        Some(ceiling) => {
            bounds.translate(Vec2::Y * (ceiling.distance(cast_length) - half_height));
            state.velocity.y = 0.0;
            VerticalOutcome::CeilingStop
        }
        None => {
            bounds.translate(Vec2::new(0.0, state.velocity.y * dt));
            state.grounded = false;
            VerticalOutcome::Free
        }
    }
}

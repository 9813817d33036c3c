//! Collision resolution.
//!
//! One resolution step moves the actor bounds by the integrated velocity,
//! corrected against the level geometry. It runs the horizontal resolver when
//! there is horizontal velocity, then exactly one of the vertical resolvers.
//! Each phase sees the bounds as already moved by the phases before it.

mod horizontal;
mod vertical;

use bevy::prelude::*;

use crate::bounds::ActorBounds;
use crate::collision::GeometryQuery;
use crate::config::ControllerConfig;
use crate::state::KinematicState;

pub use horizontal::{HorizontalOutcome, resolve_horizontal};
pub use vertical::{VerticalOutcome, resolve_downward, resolve_upward};

/// What one resolution step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Total translation applied to the bounds.
    pub displacement: Vec2,
    /// Horizontal phase result, if it ran.
    pub horizontal: Option<HorizontalOutcome>,
    /// Vertical phase result, if it ran.
    pub vertical: Option<VerticalOutcome>,
}

impl Resolution {
    /// Whether the actor touched down on walkable ground this step.
    pub fn landed(&self) -> bool {
        matches!(self.vertical, Some(VerticalOutcome::Grounded))
            || matches!(self.horizontal, Some(HorizontalOutcome::BoundaryLanding))
    }
}

/// Direction along a surface for travel with horizontal sign `sign`.
///
/// Perpendicular to `normal`; for a walkable slope it points up the slope when
/// moving towards it and down the slope when moving away.
#[inline]
pub fn surface_tangent(normal: Vec2, sign: f32) -> Vec2 {
    Vec2::new(normal.y * sign, -normal.x * sign)
}

/// Resolve one step of motion for an actor occupying `bounds`.
///
/// Gliding actors skip every cast and move by `velocity * dt` unobstructed.
pub fn resolve_collisions(
    query: &impl GeometryQuery,
    bounds: &mut ActorBounds,
    state: &mut KinematicState,
    config: &ControllerConfig,
    dt: f32,
) -> Resolution {
    let start = bounds.center;

    if state.gliding {
        bounds.translate(state.velocity * dt);
        return Resolution {
            displacement: bounds.center - start,
            horizontal: None,
            vertical: None,
        };
    }

    let horizontal = if state.velocity.x != 0.0 {
        Some(resolve_horizontal(query, bounds, state, config, dt))
    } else {
        None
    };

    let vertical = if state.grounded || state.velocity.y < 0.0 {
        Some(resolve_downward(query, bounds, state, config, dt))
    } else if state.velocity.y > 0.0 {
        Some(resolve_upward(query, bounds, state, config, dt))
    } else {
        None
    };

    Resolution {
        displacement: bounds.center - start,
        horizontal,
        vertical,
    }
}

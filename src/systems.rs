//! Core controller systems.
//!
//! Engine-independent systems: velocity integration, glide effect dispatch,
//! config validation and state marker sync. Collision resolution is
//! installed by the physics backend plugin.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::glide::GlideEffectToggled;
use crate::integrator::integrate;
use crate::intent::MovementInput;
use crate::state::{Airborne, GlideTransition, Grounded, KinematicState, MovementAnimation};

/// Integrate velocity from input, gravity and glide mode once per frame.
///
/// Also pushes the horizontal-motion flag to [`MovementAnimation`].
pub fn integrate_velocity(
    time: Res<Time>,
    mut q_controllers: Query<(
        Entity,
        &ControllerConfig,
        &mut KinematicState,
        &mut MovementInput,
        Option<&mut MovementAnimation>,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, config, mut state, mut input, animation) in &mut q_controllers {
        let integration = integrate(&mut state, &mut input, config, dt);

        if integration.jumped {
            debug!("{entity} jumped with vertical speed {}", state.velocity().y);
        }

        if let Some(mut animation) = animation {
            animation.set_if_neq(MovementAnimation {
                is_moving: integration.is_moving,
            });
        }
    }
}

/// Report glide starts and stops as [`GlideEffectToggled`] messages.
pub fn dispatch_glide_effects(
    mut q_controllers: Query<(Entity, &mut KinematicState)>,
    mut effects: MessageWriter<GlideEffectToggled>,
) {
    for (entity, mut state) in &mut q_controllers {
        if state.pending_glide_transition.is_none() {
            continue;
        }
        let Some(transition) = state.take_glide_transition() else {
            continue;
        };

        let enabled = transition == GlideTransition::Started;
        debug!("{entity} glide {}", if enabled { "started" } else { "stopped" });
        effects.write(GlideEffectToggled { entity, enabled });
    }
}

/// Log invalid configurations when they are added or changed.
///
/// Validation is advisory: the controller keeps running with the values it
/// was given.
pub fn validate_configs(q_configs: Query<(Entity, &ControllerConfig), Changed<ControllerConfig>>) {
    for (entity, config) in &q_configs {
        if let Err(err) = config.validate() {
            error!("invalid controller config on {entity}: {err}");
        }
    }
}

/// Sync the [`Grounded`] / [`Airborne`] markers with [`KinematicState`].
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &KinematicState, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, state, has_grounded, has_airborne) in &q_controllers {
        if state.is_grounded() {
            if !has_grounded || has_airborne {
                commands.entity(entity).insert(Grounded).remove::<Airborne>();
            }
        } else if !has_airborne || has_grounded {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}

//! Velocity integrator.
//!
//! Turns directional intent and gravity into a desired velocity. Collision is
//! not considered here; the resolvers correct the motion on the next fixed
//! step. May run several times between two fixed steps.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::glide::{GLIDE_ACCELERATION, glide_target};
use crate::intent::MovementInput;
use crate::state::{Facing, KinematicState};

/// Exponent applied to the gravity multiplier when scaling jump speed.
pub const JUMP_MULTIPLIER_EXPONENT: f32 = 0.375;

/// Exponent applied to the gravity multiplier when scaling gravity.
pub const GRAVITY_MULTIPLIER_EXPONENT: f32 = 1.33;

/// What happened during one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integration {
    /// A jump was triggered this step.
    pub jumped: bool,
    /// The actor has a non-zero horizontal velocity after the step.
    pub is_moving: bool,
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Vector form of [`move_towards`]: moves along the straight line to `target`.
#[inline]
pub fn move_towards_vec(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Run one integration step of `dt` seconds.
pub fn integrate(
    state: &mut KinematicState,
    input: &mut MovementInput,
    config: &ControllerConfig,
    dt: f32,
) -> Integration {
    apply_glide_edges(state, input);

    if state.gliding {
        let target = if state.can_move {
            glide_target(input, config.gliding_speed)
        } else {
            Vec2::ZERO
        };
        state.velocity = move_towards_vec(state.velocity, target, GLIDE_ACCELERATION * dt);
        return Integration {
            jumped: false,
            is_moving: state.velocity.x != 0.0,
        };
    }

    let mut target_speed = 0.0;
    let mut has_horizontal_input = false;
    let mut jumped = false;

    if state.can_move {
        // Sequential overwrite: right wins when both are held.
        if input.left {
            target_speed = -config.max_horizontal_speed;
            has_horizontal_input = true;
        }
        if input.right {
            target_speed = config.max_horizontal_speed;
            has_horizontal_input = true;
        }
        if input.up && state.grounded {
            state.velocity.y =
                config.jump_speed * state.gravity_multiplier.powf(JUMP_MULTIPLIER_EXPONENT);
            state.grounded = false;
            jumped = true;
        }
    }

    let acceleration = if state.grounded {
        config.ground_acceleration
    } else {
        config.air_acceleration
    };
    let max_change = acceleration * dt;

    state.velocity.x = move_towards(state.velocity.x, target_speed, max_change);
    if !has_horizontal_input {
        state.velocity.x = move_towards(state.velocity.x, 0.0, max_change);
    }

    state.velocity.y += state.gravity_multiplier.powf(GRAVITY_MULTIPLIER_EXPONENT)
        * state.gravity_scale
        * config.gravity
        * dt;
    state.velocity.y = state.velocity.y.max(config.terminal_velocity());

    if state.velocity.x > 0.0 {
        state.facing = Facing::Right;
    } else if state.velocity.x < 0.0 {
        state.facing = Facing::Left;
    }

    Integration {
        jumped,
        is_moving: state.velocity.x != 0.0,
    }
}

/// Apply pending glide edges. Stopping is always honoured; starting needs
/// `can_move`. When both edges are pending they are applied in the order
/// that toggles away from the current mode first.
fn apply_glide_edges(state: &mut KinematicState, input: &mut MovementInput) {
    let pressed = input.take_glide_pressed();
    let released = input.take_glide_released();

    if state.gliding {
        if released {
            state.stop_gliding();
        }
        if pressed && state.can_move {
            state.start_gliding();
        }
    } else {
        if pressed && state.can_move {
            state.start_gliding();
        }
        if released {
            state.stop_gliding();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GlideTransition;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> ControllerConfig {
        ControllerConfig::default()
            .with_movement(6.0, 60.0, 30.0)
            .with_jump_speed(8.0)
            .with_gravity(-10.0, 1.0, 2.0)
    }

    fn grounded_state() -> KinematicState {
        let mut state = KinematicState::from_config(&config());
        state.grounded = true;
        state
    }

    #[test]
    fn move_towards_clamps_and_never_overshoots() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(0.0, -10.0, 3.0), -3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(5.0, 5.0, 0.0), 5.0);
    }

    #[test]
    fn move_towards_vec_moves_along_line() {
        let result = move_towards_vec(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0);
        assert!(result.abs_diff_eq(Vec2::new(0.6, 0.8), 1e-6));
        assert_eq!(move_towards_vec(Vec2::ZERO, Vec2::X, 2.0), Vec2::X);
    }

    #[test]
    fn grounded_acceleration_toward_target() {
        let mut state = grounded_state();
        let mut input = MovementInput::new();
        input.set_horizontal(false, true);

        integrate(&mut state, &mut input, &config(), DT);

        assert_relative_eq!(state.velocity.x, 60.0 * DT, epsilon = 1e-6);
        assert_eq!(state.facing(), Facing::Right);
    }

    #[test]
    fn air_acceleration_when_airborne() {
        let mut state = KinematicState::from_config(&config());
        let mut input = MovementInput::new();
        input.set_horizontal(true, false);

        integrate(&mut state, &mut input, &config(), DT);

        assert_relative_eq!(state.velocity.x, -30.0 * DT, epsilon = 1e-6);
        assert_eq!(state.facing(), Facing::Left);
    }

    #[test]
    fn speed_caps_at_max_horizontal_speed() {
        let mut state = grounded_state();
        let mut input = MovementInput::new();
        input.set_horizontal(false, true);

        for _ in 0..120 {
            integrate(&mut state, &mut input, &config(), DT);
            state.velocity.y = 0.0;
        }

        assert_relative_eq!(state.velocity.x, 6.0);
    }

    #[test]
    fn both_directions_held_right_wins() {
        let mut state = grounded_state();
        let mut input = MovementInput::new();
        input.set_horizontal(true, true);

        integrate(&mut state, &mut input, &config(), DT);

        assert!(state.velocity.x > 0.0);
    }

    #[test]
    fn no_input_decays_twice_as_fast() {
        let mut state = grounded_state();
        state.velocity.x = 5.0;
        let mut input = MovementInput::new();

        integrate(&mut state, &mut input, &config(), DT);

        assert_relative_eq!(state.velocity.x, 5.0 - 2.0 * 60.0 * DT, epsilon = 1e-5);
        assert_eq!(state.facing(), Facing::Right);
    }

    #[test]
    fn zero_velocity_keeps_facing() {
        let mut state = grounded_state();
        state.facing = Facing::Left;
        let mut input = MovementInput::new();

        integrate(&mut state, &mut input, &config(), DT);

        assert_eq!(state.velocity.x, 0.0);
        assert_eq!(state.facing(), Facing::Left);
    }

    #[rstest]
    #[case(1.0)]
    #[case(0.5)]
    #[case(2.0)]
    fn jump_consumes_grounded(#[case] multiplier: f32) {
        let mut state = grounded_state();
        state.set_gravity_multiplier(multiplier);
        let mut input = MovementInput::new();
        input.set_jump(true);

        let integration = integrate(&mut state, &mut input, &config(), 0.0);

        assert!(integration.jumped);
        assert!(!state.is_grounded());
        assert_relative_eq!(
            state.velocity.y,
            8.0 * multiplier.powf(0.375),
            epsilon = 1e-5
        );

        // A second evaluation in the same tick has no effect.
        let again = integrate(&mut state, &mut input, &config(), 0.0);
        assert!(!again.jumped);
        assert_relative_eq!(
            state.velocity.y,
            8.0 * multiplier.powf(0.375),
            epsilon = 1e-5
        );
    }

    #[test]
    fn jump_requires_ground() {
        let mut state = KinematicState::from_config(&config());
        let mut input = MovementInput::new();
        input.set_jump(true);

        let integration = integrate(&mut state, &mut input, &config(), 0.0);

        assert!(!integration.jumped);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn jump_tick_uses_air_acceleration() {
        let mut state = grounded_state();
        let mut input = MovementInput::new();
        input.set_horizontal(false, true);
        input.set_jump(true);

        integrate(&mut state, &mut input, &config(), DT);

        assert_relative_eq!(state.velocity.x, 30.0 * DT, epsilon = 1e-6);
    }

    #[test]
    fn gravity_scales_with_multiplier() {
        let mut state = KinematicState::from_config(&config());
        state.set_gravity_multiplier(2.0);
        let mut input = MovementInput::new();

        integrate(&mut state, &mut input, &config(), DT);

        assert_relative_eq!(
            state.velocity.y,
            2f32.powf(1.33) * 1.0 * -10.0 * DT,
            epsilon = 1e-5
        );
    }

    #[test]
    fn fall_speed_approaches_but_never_exceeds_terminal() {
        let mut state = KinematicState::from_config(&config());
        let mut input = MovementInput::new();
        let terminal = config().terminal_velocity();

        let mut previous = 0.0;
        for _ in 0..600 {
            integrate(&mut state, &mut input, &config(), DT);
            assert!(state.velocity.y >= terminal);
            assert!(state.velocity.y <= previous);
            previous = state.velocity.y;
        }

        assert_relative_eq!(state.velocity.y, terminal);
    }

    #[test]
    fn cannot_move_suppresses_input_but_not_gravity() {
        let mut state = grounded_state();
        state.velocity.x = 3.0;
        state.set_can_move(false);
        let mut input = MovementInput::new();
        input.set_horizontal(false, true);
        input.set_jump(true);

        let integration = integrate(&mut state, &mut input, &config(), DT);

        assert!(!integration.jumped);
        assert!(state.is_grounded());
        assert!(state.velocity.x < 3.0);
        assert!(state.velocity.y < 0.0);
    }

    #[test]
    fn glide_press_starts_gliding_and_skips_gravity() {
        let mut state = grounded_state();
        let mut input = MovementInput::new();
        input.press_glide();

        integrate(&mut state, &mut input, &config(), DT);

        assert!(state.is_gliding());
        assert!(!state.is_grounded());
        assert_eq!(state.velocity.y, 0.0);
        assert_eq!(state.take_glide_transition(), Some(GlideTransition::Started));
    }

    #[test]
    fn glide_velocity_chases_target_at_fixed_rate() {
        let mut state = KinematicState::from_config(&config());
        state.start_gliding();
        let mut input = MovementInput::new();
        input.set_horizontal(false, true);

        integrate(&mut state, &mut input, &config(), DT);
        assert_relative_eq!(state.velocity.x, GLIDE_ACCELERATION * DT, epsilon = 1e-6);

        for _ in 0..120 {
            integrate(&mut state, &mut input, &config(), DT);
        }
        assert!(state.velocity.abs_diff_eq(Vec2::new(config().gliding_speed, 0.0), 1e-5));
    }

    #[test]
    fn glide_release_restores_gravity() {
        let mut state = KinematicState::from_config(&config());
        state.start_gliding();
        let mut input = MovementInput::new();
        input.release_glide();

        integrate(&mut state, &mut input, &config(), DT);

        assert!(!state.is_gliding());
        assert_eq!(state.gravity_scale(), config().gravity_scale);
        assert!(state.velocity.y < 0.0);
    }

    #[test]
    fn glide_start_needs_can_move_but_stop_does_not() {
        let mut state = KinematicState::from_config(&config());
        state.set_can_move(false);
        let mut input = MovementInput::new();
        input.press_glide();
        integrate(&mut state, &mut input, &config(), DT);
        assert!(!state.is_gliding());

        state.set_can_move(true);
        state.start_gliding();
        state.set_can_move(false);
        input.release_glide();
        integrate(&mut state, &mut input, &config(), DT);
        assert!(!state.is_gliding());
    }

    #[test]
    fn tap_while_idle_ends_not_gliding() {
        let mut state = KinematicState::from_config(&config());
        let mut input = MovementInput::new();
        input.press_glide();
        input.release_glide();

        integrate(&mut state, &mut input, &config(), DT);

        assert!(!state.is_gliding());
        assert_eq!(state.take_glide_transition(), None);
    }
}

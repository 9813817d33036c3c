//! Integration tests for the character controller.
//!
//! These tests run the full plugin against a Rapier world: integration in
//! `Update`, resolution in `FixedUpdate`, transform write-back and markers.

#![cfg(feature = "rapier2d")]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;
use msg_kinematic_controller::prelude::*;

const ACTOR_HALF: Vec2 = Vec2::new(0.4, 0.9);

#[derive(Resource, Default)]
struct GlideEffects(Vec<GlideEffectToggled>);

fn record_glide_effects(
    mut messages: MessageReader<GlideEffectToggled>,
    mut effects: ResMut<GlideEffects>,
) {
    effects.0.extend(messages.read().copied());
}

/// Create a minimal test app with physics and character controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    app.add_plugins(CharacterControllerPlugin::<Rapier2dBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.init_resource::<GlideEffects>();
    app.add_systems(
        Update,
        record_glide_effects.after(CharacterControllerSet::Effects),
    );

    app.finish();
    app.cleanup();
    app
}

/// Spawn a static box collider.
fn spawn_block(app: &mut App, center: Vec2, half_size: Vec2, surface: SurfaceKind) -> Entity {
    let transform = Transform::from_translation(center.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Fixed,
            Collider::cuboid(half_size.x, half_size.y),
            surface,
        ))
        .id()
}

/// Boundary floor with its top at y = 0.
fn spawn_floor(app: &mut App) -> Entity {
    spawn_block(
        app,
        Vec2::new(0.0, -0.5),
        Vec2::new(50.0, 0.5),
        SurfaceKind::Boundary,
    )
}

fn spawn_character(app: &mut App, position: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            Rapier2dControllerBundle::new(ControllerConfig::player()),
            Collider::cuboid(ACTOR_HALF.x, ACTOR_HALF.y),
        ))
        .id()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn position(app: &App, entity: Entity) -> Vec2 {
    app.world()
        .get::<Transform>(entity)
        .map(|t| t.translation.xy())
        .unwrap_or_default()
}

fn state(app: &App, entity: Entity) -> &KinematicState {
    app.world().get::<KinematicState>(entity).unwrap()
}

fn with_input(app: &mut App, entity: Entity, edit: impl FnOnce(&mut MovementInput)) {
    let mut input = app.world_mut().get_mut::<MovementInput>(entity).unwrap();
    edit(&mut *input);
}

mod grounding {
    use super::*;

    #[test]
    fn falling_character_lands_on_floor() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 3.0));

        run_frames(&mut app, 120);

        let bottom = position(&app, character).y - ACTOR_HALF.y;
        assert!(state(&app, character).is_grounded());
        assert!(bottom.abs() < 1e-3, "bottom at {bottom}");
        assert!(app.world().get::<Grounded>(character).is_some());
        assert!(app.world().get::<Airborne>(character).is_none());
    }

    #[test]
    fn character_without_floor_stays_airborne() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, Vec2::new(0.0, 3.0));

        run_frames(&mut app, 30);

        assert!(!state(&app, character).is_grounded());
        assert!(position(&app, character).y < 3.0);
        assert!(app.world().get::<Airborne>(character).is_some());
    }
}

mod walls {
    use super::*;

    #[test]
    fn running_into_boundary_wall_stops_flush() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        // Left face at x = 3.
        spawn_block(
            &mut app,
            Vec2::new(3.5, 5.0),
            Vec2::new(0.5, 5.0),
            SurfaceKind::Boundary,
        );
        let character = spawn_character(&mut app, Vec2::new(0.0, 0.95));

        run_frames(&mut app, 30);
        with_input(&mut app, character, |input| input.set_horizontal(false, true));

        for _ in 0..180 {
            app.update();
            let right = position(&app, character).x + ACTOR_HALF.x;
            assert!(right <= 3.0 + 1e-3, "pushed into the wall: {right}");
        }

        let right = position(&app, character).x + ACTOR_HALF.x;
        assert!((right - 3.0).abs() < 1e-3, "stopped at {right}");
        assert!(state(&app, character).is_grounded());
    }
}

mod jumping {
    use super::*;

    fn settle_and_jump(app: &mut App, character: Entity) -> f32 {
        run_frames(app, 30);
        assert!(state(app, character).is_grounded());
        let start = position(app, character).y;

        with_input(app, character, |input| input.set_jump(true));
        app.update();
        with_input(app, character, |input| input.set_jump(false));
        start
    }

    #[test]
    fn jump_rises_and_lands_again() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 0.95));

        let start = settle_and_jump(&mut app, character);

        let mut highest = start;
        for _ in 0..30 {
            app.update();
            highest = highest.max(position(&app, character).y);
        }
        assert!(highest > start + 1.0, "apex only {highest}");

        run_frames(&mut app, 120);
        assert!(state(&app, character).is_grounded());
        assert!((position(&app, character).y - start).abs() < 1e-3);
    }

    #[test]
    fn boundary_ceiling_stops_jump() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        // Underside at y = 2.5.
        spawn_block(
            &mut app,
            Vec2::new(0.0, 3.0),
            Vec2::new(50.0, 0.5),
            SurfaceKind::Boundary,
        );
        let character = spawn_character(&mut app, Vec2::new(0.0, 0.95));

        settle_and_jump(&mut app, character);

        let mut highest_top = f32::MIN;
        for _ in 0..60 {
            app.update();
            highest_top = highest_top.max(position(&app, character).y + ACTOR_HALF.y);
        }
        assert!(highest_top <= 2.5 + 1e-3, "head reached {highest_top}");
        assert!(highest_top > 2.4);
    }

    #[test]
    fn obstacle_ceiling_is_jumped_through() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        spawn_block(
            &mut app,
            Vec2::new(0.0, 3.0),
            Vec2::new(50.0, 0.5),
            SurfaceKind::Obstacle,
        );
        let character = spawn_character(&mut app, Vec2::new(0.0, 0.95));

        settle_and_jump(&mut app, character);

        let mut highest_top = f32::MIN;
        for _ in 0..60 {
            app.update();
            highest_top = highest_top.max(position(&app, character).y + ACTOR_HALF.y);
        }
        assert!(highest_top > 2.6, "head stopped at {highest_top}");
    }
}

mod gliding {
    use super::*;

    #[test]
    fn glide_floats_and_reports_effect_toggles() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 5.0));

        with_input(&mut app, character, MovementInput::press_glide);
        app.update();
        let start = position(&app, character).y;

        run_frames(&mut app, 60);
        assert!(state(&app, character).is_gliding());
        assert!((position(&app, character).y - start).abs() < 1e-3);

        with_input(&mut app, character, MovementInput::release_glide);
        run_frames(&mut app, 120);
        assert!(!state(&app, character).is_gliding());
        assert!(state(&app, character).is_grounded());

        let effects = &app.world().resource::<GlideEffects>().0;
        assert_eq!(
            effects,
            &vec![
                GlideEffectToggled {
                    entity: character,
                    enabled: true
                },
                GlideEffectToggled {
                    entity: character,
                    enabled: false
                },
            ]
        );
    }

    #[test]
    fn animation_flag_tracks_horizontal_motion() {
        let mut app = create_test_app();
        spawn_floor(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 0.95));
        run_frames(&mut app, 10);

        with_input(&mut app, character, |input| input.set_horizontal(true, false));
        run_frames(&mut app, 10);
        assert!(app.world().get::<MovementAnimation>(character).unwrap().is_moving);
        assert_eq!(state(&app, character).facing(), Facing::Left);

        with_input(&mut app, character, MovementInput::clear);
        run_frames(&mut app, 60);
        assert!(!app.world().get::<MovementAnimation>(character).unwrap().is_moving);
    }
}

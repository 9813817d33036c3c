//! Platformer Example
//!
//! A small level exercising every surface the controller distinguishes:
//! boundary walls and floor, a walkable boundary slope, a slope too steep to
//! climb, and an obstacle platform that can be jumped through from below.
//!
//! Controls:
//! - **A/D or Arrow Keys**: Move
//! - **Space/W/Up**: Jump (up while gliding)
//! - **S/Down**: Down while gliding
//! - **Shift (hold)**: Glide

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use msg_kinematic_controller::prelude::*;

const PLAYER_HALF: Vec2 = Vec2::new(0.4, 0.9);
const PIXELS_PER_UNIT: f32 = 48.0;

const PLAYER_COLOR: Color = Color::srgb(0.2, 0.6, 0.9);
const GLIDE_COLOR: Color = Color::srgb(0.95, 0.8, 0.3);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platformer - Kinematic Character Controller".into(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(RapierDebugRenderPlugin::default())
        .add_plugins(CharacterControllerPlugin::<Rapier2dBackend>::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_input.before(CharacterControllerSet::Integration),
                (react_to_glide, flip_sprite, update_debug_text)
                    .after(CharacterControllerSet::Effects),
                camera_follow,
            ),
        )
        .run();
}

#[derive(Component)]
struct Player;

#[derive(Component)]
struct DebugText;

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: 1.0 / PIXELS_PER_UNIT,
            ..OrthographicProjection::default_2d()
        }),
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        DebugText,
    ));

    let boundary = Color::srgb(0.35, 0.35, 0.4);
    let obstacle = Color::srgb(0.45, 0.3, 0.2);

    // Floor and side walls.
    spawn_block(&mut commands, Vec2::new(0.0, -0.5), Vec2::new(20.0, 0.5), SurfaceKind::Boundary, boundary);
    spawn_block(&mut commands, Vec2::new(-20.5, 6.0), Vec2::new(0.5, 7.0), SurfaceKind::Boundary, boundary);
    spawn_block(&mut commands, Vec2::new(20.5, 6.0), Vec2::new(0.5, 7.0), SurfaceKind::Boundary, boundary);

    // Ceiling over the left half.
    spawn_block(&mut commands, Vec2::new(-12.0, 5.5), Vec2::new(8.0, 0.5), SurfaceKind::Boundary, boundary);

    // Jump-through platform.
    spawn_block(&mut commands, Vec2::new(-4.0, 2.5), Vec2::new(2.0, 0.2), SurfaceKind::Obstacle, obstacle);

    // 30 degree ramp up to a ledge.
    let ramp_run = 5.0;
    let ramp_rise = ramp_run * 30f32.to_radians().tan();
    spawn_ramp(
        &mut commands,
        Vec2::new(2.0, 0.0),
        ramp_run,
        ramp_rise,
        SurfaceKind::Boundary,
        boundary,
    );
    spawn_block(
        &mut commands,
        Vec2::new(2.0 + ramp_run + 2.0, ramp_rise / 2.0),
        Vec2::new(2.0, ramp_rise / 2.0),
        SurfaceKind::Boundary,
        boundary,
    );

    // 70 degree face: too steep to climb.
    spawn_ramp(
        &mut commands,
        Vec2::new(14.0, 0.0),
        1.5,
        1.5 * 70f32.to_radians().tan(),
        SurfaceKind::Obstacle,
        obstacle,
    );

    commands.spawn((
        Player,
        Transform::from_xyz(-8.0, 2.0, 1.0),
        Sprite {
            color: PLAYER_COLOR,
            custom_size: Some(PLAYER_HALF * 2.0),
            ..default()
        },
        Rapier2dControllerBundle::new(ControllerConfig::player()),
        Collider::cuboid(PLAYER_HALF.x, PLAYER_HALF.y),
    ));
}

fn spawn_block(
    commands: &mut Commands,
    center: Vec2,
    half_size: Vec2,
    surface: SurfaceKind,
    color: Color,
) {
    commands.spawn((
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(half_size.x, half_size.y),
        surface,
        Sprite {
            color,
            custom_size: Some(half_size * 2.0),
            ..default()
        },
    ));
}

/// Right triangle rising from `foot` to the right.
fn spawn_ramp(
    commands: &mut Commands,
    foot: Vec2,
    run: f32,
    rise: f32,
    surface: SurfaceKind,
    color: Color,
) {
    commands.spawn((
        Transform::from_translation(foot.extend(0.0)),
        RigidBody::Fixed,
        Collider::triangle(Vec2::ZERO, Vec2::new(run, 0.0), Vec2::new(run, rise)),
        surface,
        Sprite {
            color,
            custom_size: Some(Vec2::splat(0.1)),
            ..default()
        },
    ));
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut MovementInput, With<Player>>,
) {
    for mut input in &mut query {
        let left = keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
        let right = keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
        let up = keyboard.any_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]);
        let down = keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);

        input.set_horizontal(left, right);
        input.set_vertical(up, down);

        if keyboard.any_just_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            input.press_glide();
        }
        if keyboard.any_just_released([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            input.release_glide();
        }
    }
}

/// Stand-in for a particle effect: tint the player while gliding.
fn react_to_glide(
    mut effects: MessageReader<GlideEffectToggled>,
    mut sprites: Query<&mut Sprite, With<Player>>,
) {
    for effect in effects.read() {
        info!("glide effect {}", if effect.enabled { "on" } else { "off" });
        if let Ok(mut sprite) = sprites.get_mut(effect.entity) {
            sprite.color = if effect.enabled { GLIDE_COLOR } else { PLAYER_COLOR };
        }
    }
}

fn flip_sprite(mut query: Query<(&KinematicState, &mut Sprite), With<Player>>) {
    for (state, mut sprite) in &mut query {
        sprite.flip_x = state.facing() == Facing::Left;
    }
}

fn update_debug_text(
    mut text_query: Query<&mut Text, With<DebugText>>,
    player_query: Query<(&Transform, &KinematicState, &MovementAnimation), With<Player>>,
) {
    let Ok((transform, state, animation)) = player_query.single() else {
        return;
    };
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let velocity = state.velocity();
    **text = format!(
        "Position: ({:.2}, {:.2})\n\
         Velocity: ({:.2}, {:.2})\n\
         Grounded: {}\n\
         Gliding: {}\n\
         Moving: {}\n\
         Facing: {:?}",
        transform.translation.x,
        transform.translation.y,
        velocity.x,
        velocity.y,
        state.is_grounded(),
        state.is_gliding(),
        animation.is_moving,
        state.facing(),
    );
}

fn camera_follow(
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    camera.translation.x = player.translation.x;
    camera.translation.y = player.translation.y;
}

//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.
//!
//! Level geometry is ordinary Rapier colliders; tag the ones that are level
//! boundaries with [`SurfaceKind::Boundary`]. The actor itself is a
//! kinematic position-based body moved by writing its [`Transform`].

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::parry::shape::Shape;
use bevy_rapier2d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::bounds::ActorBounds;
use crate::collision::{GeometryQuery, HitRecord, SurfaceKind};
use crate::config::ControllerConfig;
use crate::intent::MovementInput;
use crate::resolve::{HorizontalOutcome, resolve_collisions};
use crate::state::{KinematicState, MovementAnimation};

/// Rapier2D physics backend for the character controller.
///
/// Casts go through `RapierContext`, which is only reachable as a system
/// parameter, so resolution itself lives in [`rapier_resolve_collisions`].
pub struct Rapier2dBackend;

impl CharacterPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }
}

/// Plugin that sets up Rapier2D-specific systems for the character controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::CharacterControllerSet;

        app.add_systems(
            FixedUpdate,
            rapier_resolve_collisions.in_set(CharacterControllerSet::Resolution),
        );
    }
}

/// Half extents of the box enclosing a collider, before scaling.
///
/// Capsules include their end caps. Shapes without a dedicated case use
/// their local bounding box.
pub fn collider_half_extents(collider: &Collider) -> Vec2 {
    if let Some(cuboid) = collider.as_cuboid() {
        cuboid.half_extents()
    } else if let Some(capsule) = collider.as_capsule() {
        let segment = capsule.segment();
        let half_length = (segment.a() - segment.b()).abs() / 2.0;
        half_length + Vec2::splat(capsule.radius())
    } else if let Some(ball) = collider.as_ball() {
        Vec2::splat(ball.radius())
    } else {
        let half = collider.raw.compute_local_aabb().half_extents();
        Vec2::new(half.x, half.y)
    }
}

/// Actor bounds for a collider placed by `transform`.
pub fn actor_bounds(transform: &Transform, collider: &Collider) -> ActorBounds {
    let scale = transform.scale.xy().abs();
    ActorBounds::new(
        transform.translation.xy(),
        collider_half_extents(collider) * scale,
    )
}

/// Query filter for an actor's probes: skips the actor and sensors, and only
/// sees colliders in `obstacle_groups`.
pub fn probe_filter<'a>(actor: Entity, obstacle_groups: u32) -> QueryFilter<'a> {
    QueryFilter::default()
        .exclude_collider(actor)
        .exclude_rigid_body(actor)
        .exclude_sensors()
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(obstacle_groups),
        ))
}

/// [`GeometryQuery`] over a Rapier world.
///
/// `surface_of` maps a hit collider to its surface kind.
pub struct RapierGeometry<'c, 'w, F> {
    context: &'c RapierContext<'w>,
    filter: QueryFilter<'c>,
    surface_of: F,
}

impl<'c, 'w, F> RapierGeometry<'c, 'w, F>
where
    F: Fn(Entity) -> SurfaceKind,
{
    /// Wrap `context`, casting with `filter`.
    pub fn new(context: &'c RapierContext<'w>, filter: QueryFilter<'c>, surface_of: F) -> Self {
        Self {
            context,
            filter,
            surface_of,
        }
    }
}

impl<F> GeometryQuery for RapierGeometry<'_, '_, F>
where
    F: Fn(Entity) -> SurfaceKind,
{
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<HitRecord> {
        if max_distance <= 0.0 {
            return None;
        }
        self.context
            .cast_ray_and_get_normal(origin, direction, max_distance, true, self.filter)
            .map(|(hit_entity, hit)| {
                HitRecord::new(
                    hit.time_of_impact / max_distance,
                    hit.normal,
                    (self.surface_of)(hit_entity),
                )
            })
    }
}

/// Resolve every grounded or moving actor against the Rapier world and write
/// the corrected position back to its transform.
pub fn rapier_resolve_collisions(
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    surfaces: Query<&SurfaceKind>,
    mut q_actors: Query<(
        Entity,
        &mut Transform,
        &Collider,
        &ControllerConfig,
        &mut KinematicState,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let surface_of = |hit: Entity| surfaces.get(hit).copied().unwrap_or_default();

    for (entity, mut transform, collider, config, mut state) in &mut q_actors {
        let mut bounds = actor_bounds(&transform, collider);
        let geometry = RapierGeometry::new(
            &context,
            probe_filter(entity, config.obstacle_groups),
            surface_of,
        );

        let was_grounded = state.is_grounded();
        let resolution = resolve_collisions(&geometry, &mut bounds, &mut state, config, dt);
        transform.translation += resolution.displacement.extend(0.0);

        trace!(
            "{entity}: moved {:?} (horizontal {:?}, vertical {:?})",
            resolution.displacement, resolution.horizontal, resolution.vertical
        );
        if resolution.landed() && !was_grounded {
            debug!("{entity} landed at {}", transform.translation.xy());
        }
        if resolution.horizontal == Some(HorizontalOutcome::WallStop) {
            debug!("{entity} stopped at wall");
        }
    }
}

/// Bundle for creating a character with Rapier2D physics.
///
/// Bundles the kinematic body with the controller components. Add a
/// [`Collider`] alongside it; its shape defines the actor bounds.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_kinematic_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         Rapier2dControllerBundle::new(ControllerConfig::player()),
///         Collider::cuboid(0.4, 0.9),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier2dControllerBundle {
    /// Kinematic position-based body; the controller writes the transform.
    pub rigid_body: RigidBody,
    /// Rotation stays locked so the bounds remain axis aligned.
    pub locked_axes: LockedAxes,
    pub config: ControllerConfig,
    pub state: KinematicState,
    pub input: MovementInput,
    pub animation: MovementAnimation,
}

impl Default for Rapier2dControllerBundle {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl Rapier2dControllerBundle {
    /// Create a bundle whose state starts from `config`.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            locked_axes: LockedAxes::ROTATION_LOCKED,
            state: KinematicState::from_config(&config),
            config,
            input: MovementInput::default(),
            animation: MovementAnimation::default(),
        }
    }
}

//! # `msg_kinematic_controller`
//!
//! A 2D kinematic platformer character controller with physics backend abstraction.
//!
//! This crate provides a deterministic, cast-based character controller that:
//! - Integrates velocity from directional input with ground/air acceleration,
//!   a jump impulse, scaled gravity and a terminal fall speed
//! - Resolves motion against level geometry with rows of parallel ray casts
//! - Classifies surfaces by slope angle: walkable, descendable or wall
//! - Snaps to ground, climbs and descends slopes, stops at walls and ceilings
//! - Supports a gravity-free glide mode
//! - Abstracts the physics backend (Rapier2D included)
//!
//! ## Architecture
//!
//! The actor is a **kinematic** body: no physics engine moves it. Every tick:
//! 1. [`integrator::integrate`] turns input into a desired velocity (per frame)
//! 2. [`resolve::resolve_collisions`] casts probes along the velocity and moves
//!    the actor bounds as far as the geometry allows (per fixed step)
//! 3. The backend writes the resulting displacement to the transform
//!
//! Surfaces are either obstacles or level boundaries ([`collision::SurfaceKind`]).
//! Boundaries always block; obstacles only block grounded actors and never
//! act as ceilings.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_kinematic_controller::prelude::*;
//!
//! let config = ControllerConfig::player();
//! let state = KinematicState::from_config(&config);
//! let mut input = MovementInput::default();
//! input.set_horizontal(false, true);
//!
//! // These can be spawned with a collider and the backend's bundle
//! assert!(config.validate().is_ok());
//! assert!(!state.is_grounded());
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod bounds;
pub mod collision;
pub mod config;
pub mod glide;
pub mod integrator;
pub mod intent;
pub mod probe;
pub mod resolve;
pub mod state;
pub mod systems;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::CharacterControllerPlugin;
    pub use crate::CharacterControllerSet;
    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::bounds::ActorBounds;
    pub use crate::collision::{GeometryQuery, HitRecord, SurfaceKind};
    pub use crate::config::{ConfigError, ControllerConfig};
    pub use crate::glide::GlideEffectToggled;
    pub use crate::integrator::integrate;
    pub use crate::intent::MovementInput;
    pub use crate::resolve::{Resolution, resolve_collisions};
    pub use crate::state::{Airborne, Facing, Grounded, KinematicState, MovementAnimation};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dControllerBundle};
}

/// System sets for the controller, in execution order within each schedule.
///
/// `Integration` and `Effects` run in `Update`; `Resolution` and `StateSync`
/// run in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Velocity integration from input.
    Integration,
    /// Glide effect messages.
    Effects,
    /// Collision resolution and transform write-back (backend systems).
    Resolution,
    /// Grounded/Airborne marker sync.
    StateSync,
}

/// Main plugin for the character controller system.
///
/// This plugin is generic over a physics backend `B` which provides the
/// geometry casts and installs the resolution system.
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_kinematic_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(CharacterControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct CharacterControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<collision::SurfaceKind>();
        app.register_type::<intent::MovementInput>();
        app.register_type::<state::KinematicState>();
        app.register_type::<state::MovementAnimation>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        app.add_message::<glide::GlideEffectToggled>();

        app.configure_sets(
            Update,
            (
                CharacterControllerSet::Integration,
                CharacterControllerSet::Effects,
            )
                .chain(),
        );
        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Resolution,
                CharacterControllerSet::StateSync,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            Update,
            (
                systems::validate_configs,
                systems::integrate_velocity,
            )
                .chain()
                .in_set(CharacterControllerSet::Integration),
        );
        app.add_systems(
            Update,
            systems::dispatch_glide_effects.in_set(CharacterControllerSet::Effects),
        );
        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(CharacterControllerSet::StateSync),
        );
    }
}

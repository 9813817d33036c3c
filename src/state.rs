//! Kinematic state and state marker components.
//!
//! [`KinematicState`] is the mutable physical state of one actor. It is only
//! written by the integrator and the resolvers during a tick, and by game code
//! through its narrow setter API (buffs adjusting the gravity multiplier,
//! cutscenes disabling movement, ...).

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Horizontal facing of the actor.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// Original orientation.
    #[default]
    Right,
    /// Mirrored orientation.
    Left,
}

/// A glide start or stop that has not been reported yet.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideTransition {
    /// Gliding began.
    Started,
    /// Gliding ended.
    Stopped,
}

/// Mutable physical state of a kinematic actor.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct KinematicState {
    /// Current velocity (world units per second).
    pub(crate) velocity: Vec2,
    /// Whether the actor rests on walkable ground.
    pub(crate) grounded: bool,
    /// Current gravity scale. Zero while gliding.
    pub(crate) gravity_scale: f32,
    /// Gravity scale restored when gliding stops.
    pub(crate) base_gravity_scale: f32,
    /// Externally driven gravity multiplier (buffs, effects).
    pub(crate) gravity_multiplier: f32,
    /// Whether glide mode is active.
    pub(crate) gliding: bool,
    /// When false, directional and jump input is ignored.
    pub(crate) can_move: bool,
    /// Current facing.
    pub(crate) facing: Facing,
    /// Glide transition waiting to be dispatched as a visual-effect toggle.
    pub(crate) pending_glide_transition: Option<GlideTransition>,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::with_gravity_scale(1.0)
    }
}

impl KinematicState {
    /// Create the state for a freshly spawned actor.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::with_gravity_scale(config.gravity_scale)
    }

    /// Create a state with the given initial gravity scale.
    pub fn with_gravity_scale(gravity_scale: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            grounded: false,
            gravity_scale,
            base_gravity_scale: gravity_scale,
            gravity_multiplier: 1.0,
            gliding: false,
            can_move: true,
            facing: Facing::Right,
            pending_glide_transition: None,
        }
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overwrite the velocity (knockback, launch pads, ...).
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Current gravity multiplier.
    #[inline]
    pub fn gravity_multiplier(&self) -> f32 {
        self.gravity_multiplier
    }

    /// Set the gravity multiplier. Also scales jump speed.
    pub fn set_gravity_multiplier(&mut self, multiplier: f32) {
        self.gravity_multiplier = multiplier;
    }

    /// Current gravity scale (zero while gliding).
    #[inline]
    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    /// Whether directional and jump input is accepted.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.can_move
    }

    /// Enable or disable directional and jump input. Gravity and decay still apply.
    pub fn set_can_move(&mut self, can_move: bool) {
        self.can_move = can_move;
    }

    /// Whether the actor rests on walkable ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Force the grounded flag (respawn, teleport onto a platform).
    ///
    /// The next resolution step re-derives it from the geometry.
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Whether glide mode is active.
    #[inline]
    pub fn is_gliding(&self) -> bool {
        self.gliding
    }

    /// Current facing.
    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Take the glide transition that has not been reported yet.
    pub fn take_glide_transition(&mut self) -> Option<GlideTransition> {
        self.pending_glide_transition.take()
    }
}

/// Animation flag pushed to the host animator every integration tick.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct MovementAnimation {
    /// Whether the actor is moving horizontally.
    pub is_moving: bool,
}

/// Marker component indicating the character is grounded.
///
/// Synced from [`KinematicState`] after collision resolution.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_kinematic_controller::prelude::*;
///
/// // Grounded is a marker component - just use it in queries
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

//! Physics backend abstraction.
//!
//! The controller core only needs a cast primitive ([`GeometryQuery`]) and the
//! actor's box. Both live behind engine-specific system parameters, so a
//! backend contributes a plugin that installs its resolution system into
//! [`CharacterControllerSet::Resolution`].
//!
//! [`GeometryQuery`]: crate::collision::GeometryQuery
//! [`CharacterControllerSet::Resolution`]: crate::CharacterControllerSet::Resolution

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// See the `rapier` module's `Rapier2dBackend` for the Rapier2D implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend, including the system
    /// that resolves collisions in [`crate::CharacterControllerSet::Resolution`].
    fn plugin() -> impl Plugin;
}

//! Directional input.
//!
//! The host samples its input devices (keyboard, gamepad, AI, network) and
//! writes the result into [`MovementInput`] every frame. The controller only
//! sees the resulting flags.

use bevy::prelude::*;

/// Directional intent for one actor.
///
/// Held flags describe the current frame. Glide press/release are edges: they
/// stay set until the integrator consumes them, so an edge is never lost when
/// several frames pass between integration runs.
///
/// # Example
///
/// ```rust
/// use msg_kinematic_controller::prelude::*;
///
/// let mut input = MovementInput::new();
/// input.set_horizontal(false, true);
/// input.set_jump(true);
/// assert!(input.has_horizontal());
///
/// input.press_glide();
/// assert!(input.take_glide_pressed());
/// assert!(!input.take_glide_pressed());
/// ```
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct MovementInput {
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
    /// Up (jump) is held.
    pub up: bool,
    /// Down is held. Only affects gliding.
    pub down: bool,
    /// Glide key went down since the last integration.
    pub(crate) glide_pressed: bool,
    /// Glide key went up since the last integration.
    pub(crate) glide_released: bool,
}

impl MovementInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the held horizontal directions.
    pub fn set_horizontal(&mut self, left: bool, right: bool) {
        self.left = left;
        self.right = right;
    }

    /// Set the held vertical directions.
    pub fn set_vertical(&mut self, up: bool, down: bool) {
        self.up = up;
        self.down = down;
    }

    /// Set whether jump (up) is held.
    pub fn set_jump(&mut self, held: bool) {
        self.up = held;
    }

    /// Record that the glide key went down.
    pub fn press_glide(&mut self) {
        self.glide_pressed = true;
    }

    /// Record that the glide key went up.
    pub fn release_glide(&mut self) {
        self.glide_released = true;
    }

    /// Check if any horizontal direction is held.
    pub fn has_horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Consume the glide press edge.
    pub fn take_glide_pressed(&mut self) -> bool {
        std::mem::take(&mut self.glide_pressed)
    }

    /// Consume the glide release edge.
    pub fn take_glide_released(&mut self) -> bool {
        std::mem::take(&mut self.glide_released)
    }

    /// Release every held direction. Pending glide edges are kept.
    pub fn clear(&mut self) {
        self.left = false;
        self.right = false;
        self.up = false;
        self.down = false;
    }
}

//! Glide mode.
//!
//! While gliding the actor floats: gravity is off, velocity chases a target
//! built from the four directions, and collision resolution is bypassed.

use bevy::prelude::*;

use crate::intent::MovementInput;
use crate::state::{GlideTransition, KinematicState};

/// Rate at which velocity approaches the glide target (units / s²).
pub const GLIDE_ACCELERATION: f32 = 16.0;

/// Message sent when the glide visual effect should be switched on or off.
///
/// Fire-and-forget: the controller never reads anything back.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlideEffectToggled {
    /// The gliding actor.
    pub entity: Entity,
    /// Whether the effect should now be playing.
    pub enabled: bool,
}

impl KinematicState {
    /// Enter glide mode: float with no gravity and leave the ground.
    pub fn start_gliding(&mut self) {
        if !self.gliding {
            self.queue_glide_transition(GlideTransition::Started);
        }
        self.gliding = true;
        self.grounded = false;
        self.gravity_scale = 0.0;
    }

    /// Leave glide mode and restore the configured gravity scale.
    pub fn stop_gliding(&mut self) {
        if self.gliding {
            self.queue_glide_transition(GlideTransition::Stopped);
        }
        self.gliding = false;
        self.gravity_scale = self.base_gravity_scale;
    }

    /// Record a transition. One that undoes an unreported transition cancels
    /// it, so the effect only ever toggles away from what it last showed.
    fn queue_glide_transition(&mut self, transition: GlideTransition) {
        self.pending_glide_transition = match self.pending_glide_transition {
            Some(pending) if pending != transition => None,
            _ => Some(transition),
        };
    }
}

/// Target glide velocity for the held directions.
///
/// Each axis is set independently; when both directions of an axis are held
/// the one applied last (right, up) wins.
pub fn glide_target(input: &MovementInput, gliding_speed: f32) -> Vec2 {
    let mut target = Vec2::ZERO;
    if input.left {
        target.x = -gliding_speed;
    }
    if input.right {
        target.x = gliding_speed;
    }
    if input.down {
        target.y = -gliding_speed;
    }
    if input.up {
        target.y = gliding_speed;
    }
    target
}

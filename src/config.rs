//! Controller configuration.
//!
//! All values are design-time tuning: probe counts, slope thresholds, speeds,
//! accelerations and gravity. Angles are in degrees.

use bevy::prelude::*;
use thiserror::Error;

/// Default inset of the probe lines from the bounds edges (world units).
pub const DEFAULT_BUFFER_LENGTH: f32 = 0.05;

/// Default fixed vertical acceleration (world units / s²).
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Reasons a [`ControllerConfig`] cannot drive the controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Probe spacing divides by `count - 1`, so fewer than two probes is undefined.
    #[error("`{field}` needs at least 2 probes, got {count}")]
    TooFewProbes {
        /// Name of the offending field.
        field: &'static str,
        /// Configured probe count.
        count: usize,
    },
    /// Slope thresholds are angles from world up.
    #[error("`{field}` must be within 0..=90 degrees, got {angle}")]
    AngleOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured angle.
        angle: f32,
    },
    /// Speeds, accelerations and scales must be finite and non-negative.
    #[error("`{field}` must be finite and non-negative, got {value}")]
    InvalidMagnitude {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// The probe buffer must leave room between the outermost probes.
    #[error("`buffer_length` must be positive and finite, got {0}")]
    InvalidBuffer(f32),
}

/// Configuration parameters for the kinematic controller.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct ControllerConfig {
    // === Probes ===
    /// Number of parallel probes cast horizontally (at least 2).
    pub horizontal_raycast_number: usize,

    /// Number of parallel probes cast vertically (at least 2).
    pub vertical_raycast_number: usize,

    /// Inset of the probe lines from the edges of the bounds.
    pub buffer_length: f32,

    /// Collision-group filter bits selecting the obstacle layer.
    pub obstacle_groups: u32,

    // === Slopes ===
    /// Steepest surface (degrees from up) that counts as ground when walking into it.
    pub max_climbable_slope_angle: f32,

    /// Steepest surface (degrees from up) followed when walking down and away from it.
    pub max_descendable_slope_angle: f32,

    // === Movement ===
    /// Target horizontal speed while a direction is held.
    pub max_horizontal_speed: f32,

    /// Horizontal acceleration while grounded.
    pub ground_acceleration: f32,

    /// Horizontal acceleration while airborne.
    pub air_acceleration: f32,

    /// Vertical speed applied on jump, before the gravity multiplier adjustment.
    pub jump_speed: f32,

    // === Gravity ===
    /// Fixed vertical acceleration. Negative points down.
    pub gravity: f32,

    /// Scale applied to gravity outside of gliding.
    pub gravity_scale: f32,

    /// Terminal fall speed expressed as a multiple of `gravity`.
    pub max_fall_gravity_scale: f32,

    // === Gliding ===
    /// Target speed per axis while gliding.
    pub gliding_speed: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            horizontal_raycast_number: 3,
            vertical_raycast_number: 3,
            buffer_length: DEFAULT_BUFFER_LENGTH,
            obstacle_groups: u32::MAX,

            max_climbable_slope_angle: 60.0,
            max_descendable_slope_angle: 60.0,

            max_horizontal_speed: 6.0,
            ground_acceleration: 60.0,
            air_acceleration: 30.0,
            jump_speed: 8.0,

            gravity: DEFAULT_GRAVITY,
            gravity_scale: 2.0,
            max_fall_gravity_scale: 2.0,

            gliding_speed: 4.0,
        }
    }
}

impl ControllerConfig {
    /// Create a config optimized for responsive player control.
    pub fn player() -> Self {
        Self {
            ground_acceleration: 80.0,
            air_acceleration: 40.0,
            jump_speed: 9.0,
            ..default()
        }
    }

    /// Create a config with slow acceleration and a low terminal velocity.
    pub fn floaty() -> Self {
        Self {
            ground_acceleration: 20.0,
            air_acceleration: 10.0,
            gravity_scale: 1.0,
            max_fall_gravity_scale: 1.0,
            gliding_speed: 6.0,
            ..default()
        }
    }

    /// Terminal vertical velocity (`max_fall_gravity_scale * gravity`).
    #[inline]
    pub fn terminal_velocity(&self) -> f32 {
        self.max_fall_gravity_scale * self.gravity
    }

    /// Check that the config satisfies the controller's preconditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, count) in [
            ("horizontal_raycast_number", self.horizontal_raycast_number),
            ("vertical_raycast_number", self.vertical_raycast_number),
        ] {
            if count < 2 {
                return Err(ConfigError::TooFewProbes { field, count });
            }
        }

        for (field, angle) in [
            ("max_climbable_slope_angle", self.max_climbable_slope_angle),
            ("max_descendable_slope_angle", self.max_descendable_slope_angle),
        ] {
            if !(0.0..=90.0).contains(&angle) {
                return Err(ConfigError::AngleOutOfRange { field, angle });
            }
        }

        for (field, value) in [
            ("max_horizontal_speed", self.max_horizontal_speed),
            ("ground_acceleration", self.ground_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("jump_speed", self.jump_speed),
            ("gravity_scale", self.gravity_scale),
            ("max_fall_gravity_scale", self.max_fall_gravity_scale),
            ("gliding_speed", self.gliding_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMagnitude { field, value });
            }
        }

        if !self.buffer_length.is_finite() || self.buffer_length <= 0.0 {
            return Err(ConfigError::InvalidBuffer(self.buffer_length));
        }

        Ok(())
    }

    /// Builder: set both probe counts.
    pub fn with_raycast_numbers(mut self, horizontal: usize, vertical: usize) -> Self {
        self.horizontal_raycast_number = horizontal;
        self.vertical_raycast_number = vertical;
        self
    }

    /// Builder: set slope thresholds (degrees).
    pub fn with_slope_angles(mut self, climbable: f32, descendable: f32) -> Self {
        self.max_climbable_slope_angle = climbable;
        self.max_descendable_slope_angle = descendable;
        self
    }

    /// Builder: set movement parameters.
    pub fn with_movement(mut self, max_speed: f32, ground_accel: f32, air_accel: f32) -> Self {
        self.max_horizontal_speed = max_speed;
        self.ground_acceleration = ground_accel;
        self.air_acceleration = air_accel;
        self
    }

    /// Builder: set max horizontal speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_horizontal_speed = max_speed;
        self
    }

    /// Builder: set jump speed.
    pub fn with_jump_speed(mut self, speed: f32) -> Self {
        self.jump_speed = speed;
        self
    }

    /// Builder: set gravity acceleration and scales.
    pub fn with_gravity(mut self, gravity: f32, scale: f32, max_fall_scale: f32) -> Self {
        self.gravity = gravity;
        self.gravity_scale = scale;
        self.max_fall_gravity_scale = max_fall_scale;
        self
    }

    /// Builder: set gliding speed.
    pub fn with_gliding_speed(mut self, speed: f32) -> Self {
        self.gliding_speed = speed;
        self
    }

    /// Builder: set probe buffer length.
    pub fn with_buffer_length(mut self, buffer: f32) -> Self {
        self.buffer_length = buffer;
        self
    }

    /// Builder: set the obstacle collision-group filter.
    pub fn with_obstacle_groups(mut self, groups: u32) -> Self {
        self.obstacle_groups = groups;
        self
    }
}

//! Velocity-seeking movement forces.
//!
//! Directional input is turned into a desired horizontal velocity and the
//! body is pushed toward it with a force proportional to the velocity gap,
//! capped by a per-tick force budget (patterned on Quake's `PM_Accelerate`).
//! Friction switches between a running and a standing value so the body
//! slides freely while steering and stops quickly when input is released.

use bevy::prelude::*;

use crate::player::input::InputSnapshot;
use crate::player::physics::PhysicsTarget;
use crate::settings::{AxisConvention, ControllerConfig};

/// Unit direction in the body's local frame, or `None` when the held flags
/// express no movement (nothing held, or opposing keys cancel).
#[must_use]
pub fn local_direction(input: &InputSnapshot) -> Option<Vec3> {
    let mut m = Vec3::ZERO;
    if input.backward {
        m.z += 1.0;
    }
    if input.forward {
        m.z -= 1.0;
    }
    if input.right {
        m.x += 1.0;
    }
    if input.left {
        m.x -= 1.0;
    }
    m.try_normalize()
}

/// Rotate a local direction into world space for the given yaw.
#[must_use]
pub fn world_direction(local: Vec3, yaw: f32, convention: AxisConvention) -> Vec3 {
    match convention {
        AxisConvention::Normal => Quat::from_rotation_y(-yaw) * local,
        AxisConvention::InvertedForwardAndYaw => {
            Quat::from_rotation_y(yaw) * Vec3::new(local.x, local.y, -local.z)
        }
    }
}

/// Target ground speed for the held modifiers.
#[must_use]
pub fn desired_speed(config: &ControllerConfig, input: &InputSnapshot) -> f32 {
    let mut speed = config.max_speed;
    if input.sprint {
        speed *= config.sprint_move_mult;
    }
    if input.crouch {
        speed *= config.crouch_move_mult;
    }
    speed
}

/// Force that moves `velocity` toward `desired` without exceeding `budget`.
///
/// Only the horizontal gap counts. Returns `Vec3::ZERO` when already there.
#[must_use]
pub fn seek_force(desired: Vec3, velocity: Vec3, responsiveness: f32, budget: f32) -> Vec3 {
    let mut push = desired - velocity;
    push.y = 0.0;
    let gap = push.length();
    if gap <= 0.0 {
        return Vec3::ZERO;
    }
    let amount = budget.min(responsiveness * gap);
    push / gap * amount
}

/// Run one tick of movement against `target`.
///
/// Returns the force applied this tick (`Vec3::ZERO` when none).
pub fn apply_movement(
    config: &ControllerConfig,
    input: &InputSnapshot,
    yaw: f32,
    grounded: bool,
    target: &mut impl PhysicsTarget,
) -> Vec3 {
    let Some(local) = local_direction(input) else {
        target.set_friction(config.standing_friction);
        return Vec3::ZERO;
    };

    let desired = world_direction(local, yaw, config.axis_convention) * desired_speed(config, input);
    let budget = if grounded { config.move_force } else { config.move_force * config.air_move_mult };
    let force = seek_force(desired, target.velocity(), config.responsiveness, budget);
    if force != Vec3::ZERO {
        target.apply_force(force);
    }

    // friction idea from Sonic: slide while steering, stick when idle
    target.set_friction(config.running_friction);
    force
}

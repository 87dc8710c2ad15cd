//! Jump state machine: variable-height jumps and a limited air-jump budget.
//!
//! The policy is re-evaluated every tick from the held state of the jump
//! button rather than on press edges. Holding jump through a landing
//! therefore starts a fresh jump on the first grounded tick.

use bevy::prelude::*;

use crate::player::physics::PhysicsTarget;
use crate::settings::ControllerConfig;

/// What the jump state machine did this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpAction {
    None,
    /// A new jump started; `airborne` marks an air jump.
    Started { airborne: bool },
    /// The continuing hold force was applied.
    Extended,
}

/// Runtime jump state owned by one controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JumpState {
    jumping: bool,
    air_jumps_used: u32,
    /// Seconds of hold force left for the current jump.
    time_remaining: f32,
}

impl JumpState {
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    #[must_use]
    pub fn air_jumps_used(&self) -> u32 {
        self.air_jumps_used
    }

    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Run one tick of the jump policy against `target`.
    ///
    /// # Arguments
    /// * `config` - jump impulse/force/time and the air-jump budget
    /// * `grounded` - rest contact reported by the physics target this tick
    /// * `held` - whether the jump button is held
    /// * `dt` - tick length in seconds
    /// * `target` - body receiving the impulse / continuing force
    pub fn update(
        &mut self,
        config: &ControllerConfig,
        grounded: bool,
        held: bool,
        dt: f32,
        target: &mut impl PhysicsTarget,
    ) -> JumpAction {
        if grounded {
            self.jumping = false;
            self.air_jumps_used = 0;
        }

        if !held {
            self.jumping = false;
            return JumpAction::None;
        }

        if self.jumping {
            if self.time_remaining > 0.0 {
                let mut force = config.jump_force;
                // last partial tick: only push for the part of dt that is left
                if self.time_remaining < dt {
                    force *= self.time_remaining / dt;
                }
                target.apply_force(Vec3::new(0.0, force, 0.0));
                self.time_remaining -= dt;
                return JumpAction::Extended;
            }
            return JumpAction::None;
        }

        if !grounded && self.air_jumps_used >= config.air_jumps {
            return JumpAction::None;
        }

        self.jumping = true;
        self.time_remaining = config.jump_time;
        if !grounded {
            self.air_jumps_used += 1;
            let mut velocity = target.velocity();
            if velocity.y < 0.0 {
                velocity.y = 0.0;
                target.set_velocity(velocity);
            }
        }
        target.apply_impulse(Vec3::new(0.0, config.jump_impulse, 0.0));
        debug!(airborne = !grounded, air_jumps_used = self.air_jumps_used, "jump started");
        JumpAction::Started { airborne: !grounded }
    }
}

//! Fire trigger: turns held fire buttons into fire events.
//!
//! Continuous mode repeats at `fire_rate` while held (every tick when the
//! rate is 0). Discrete mode fires once per press and stays quiet until the
//! buttons are released.

use crate::player::input::InputSnapshot;
use crate::settings::ControllerConfig;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FireState {
    /// Seconds the fire buttons have been held.
    firing: f32,
    held: bool,
}

impl FireState {
    #[must_use]
    pub fn accumulator(&self) -> f32 {
        self.firing
    }

    /// Advance by one tick. Returns whether a fire event triggers.
    pub fn update(&mut self, config: &ControllerConfig, input: &InputSnapshot, dt: f32) -> bool {
        if !input.firing() {
            self.firing = 0.0;
            self.held = false;
            return false;
        }

        let fire = if config.discrete_fire {
            !self.held
        } else if config.fire_rate > 0.0 {
            let before = (self.firing / config.fire_rate).floor();
            let after = ((self.firing + dt) / config.fire_rate).floor();
            before != after
        } else {
            true
        };

        self.held = true;
        self.firing += dt;
        fire
    }
}

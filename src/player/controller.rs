//! The per-tick character controller.
//!
//! `Motor` holds the configuration and runtime state and runs the four
//! sub-models in a fixed order against explicitly passed collaborators:
//! camera rotation, jump, movement, fire. `CharacterController` wraps a
//! `Motor` together with the handles it drives and skips ticks until both a
//! physics target and a camera are attached.

use bevy::prelude::*;

use crate::player::camera::{CameraRig, rotate_camera};
use crate::player::fire::FireState;
use crate::player::input::InputSnapshot;
use crate::player::jump::{JumpAction, JumpState};
use crate::player::movement::apply_movement;
use crate::player::physics::PhysicsTarget;
use crate::settings::ControllerConfig;

/// Mutable state carried between ticks. Starts zeroed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerState {
    pub(crate) jump: JumpState,
    pub(crate) fire: FireState,
}

impl ControllerState {
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.jump.is_jumping()
    }

    #[must_use]
    pub fn air_jumps_used(&self) -> u32 {
        self.jump.air_jumps_used()
    }

    #[must_use]
    pub fn jump_time_remaining(&self) -> f32 {
        self.jump.time_remaining()
    }

    #[must_use]
    pub fn firing_accumulator(&self) -> f32 {
        self.fire.accumulator()
    }
}

/// Summary of one controller tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub pitch: f32,
    pub yaw: f32,
    pub grounded: bool,
    pub jump: JumpAction,
    /// Movement force applied this tick (jump force excluded).
    pub move_force: Vec3,
    pub fired: bool,
}

/// Configuration plus runtime state for one controlled body.
#[derive(Component, Clone, Debug, Default)]
pub struct Motor {
    config: ControllerConfig,
    state: ControllerState,
}

impl Motor {
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self { config, state: ControllerState::default() }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace the configuration wholesale. Runtime state is kept.
    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Run one tick.
    ///
    /// # Arguments
    /// * `dt` - tick length in seconds (same unit as the config's time fields)
    /// * `input` - this tick's input snapshot
    /// * `target` - body receiving forces, impulses and friction
    /// * `camera` - camera receiving the new pitch/yaw
    /// * `on_fire` - called with `input` when the fire trigger triggers
    pub fn step(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        target: &mut impl PhysicsTarget,
        camera: &mut impl CameraRig,
        mut on_fire: impl FnMut(&InputSnapshot),
    ) -> TickReport {
        let grounded = target.grounded();

        let (pitch, yaw) = rotate_camera(&self.config, input, camera);
        let jump = self.state.jump.update(&self.config, grounded, input.jump, dt, target);
        let move_force = apply_movement(&self.config, input, yaw, grounded, target);

        let fired = self.state.fire.update(&self.config, input, dt);
        if fired {
            debug!(accumulator = self.state.fire.accumulator(), "fire");
            on_fire(input);
        }

        TickReport { pitch, yaw, grounded, jump, move_force, fired }
    }
}

type FireHook = Box<dyn FnMut(&InputSnapshot)>;

/// A `Motor` bound to its physics target and camera.
///
/// The handles are generic so callers can hand over owned values or
/// `&mut` borrows; both trait impls forward through `&mut T`.
pub struct CharacterController<T, C> {
    motor: Motor,
    target: Option<T>,
    camera: Option<C>,
    input: InputSnapshot,
    on_fire: Option<FireHook>,
}

impl<T: PhysicsTarget, C: CameraRig> CharacterController<T, C> {
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            motor: Motor::new(config),
            target: None,
            camera: None,
            input: InputSnapshot::default(),
            on_fire: None,
        }
    }

    #[must_use]
    pub fn motor(&self) -> &Motor {
        &self.motor
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        self.motor.config()
    }

    pub fn set_config(&mut self, config: ControllerConfig) {
        self.motor.set_config(config);
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        self.motor.state()
    }

    /// Attach a physics target. `None` leaves the current one in place.
    /// Returns whatever target is held afterwards.
    pub fn set_target(&mut self, target: Option<T>) -> Option<&T> {
        if let Some(target) = target {
            self.target = Some(target);
        }
        self.target.as_ref()
    }

    /// Attach a camera. `None` leaves the current one in place.
    /// Returns whatever camera is held afterwards.
    pub fn set_camera(&mut self, camera: Option<C>) -> Option<&C> {
        if let Some(camera) = camera {
            self.camera = Some(camera);
        }
        self.camera.as_ref()
    }

    /// Detach and return the physics target.
    pub fn clear_target(&mut self) -> Option<T> {
        self.target.take()
    }

    /// Detach and return the camera.
    pub fn clear_camera(&mut self) -> Option<C> {
        self.camera.take()
    }

    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    #[must_use]
    pub fn camera(&self) -> Option<&C> {
        self.camera.as_ref()
    }

    /// Install the fire hook, replacing any previous one.
    pub fn set_fire_hook(&mut self, hook: impl FnMut(&InputSnapshot) + 'static) {
        self.on_fire = Some(Box::new(hook));
    }

    /// Input read by the next `tick`.
    pub fn input_mut(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }

    /// Tick with the stored input. `None` when a handle is missing.
    pub fn tick(&mut self, dt: f32) -> Option<TickReport> {
        let input = self.input;
        self.tick_with_input(dt, &input)
    }

    /// Tick with an explicit input snapshot. `None` when a handle is missing.
    pub fn tick_with_input(&mut self, dt: f32, input: &InputSnapshot) -> Option<TickReport> {
        let (Some(target), Some(camera)) = (self.target.as_mut(), self.camera.as_mut()) else {
            trace!("controller tick skipped: target or camera not attached");
            return None;
        };
        let hook = &mut self.on_fire;
        Some(self.motor.step(dt, input, target, camera, |snapshot| {
            if let Some(hook) = hook.as_mut() {
                hook(snapshot);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::camera::{PITCH_LIMIT, PlayerLook};
    use crate::player::physics::Body;
    use crate::settings::BodySettings;
    use std::cell::Cell;
    use std::f32::consts::TAU;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    type Owned = CharacterController<Body, PlayerLook>;

    fn wired(config: ControllerConfig) -> Owned {
        let mut c = Owned::new(config);
        c.set_target(Some(Body::default()));
        c.set_camera(Some(PlayerLook::default()));
        c
    }

    /// Tick the controller then integrate its body, like a host loop would.
    fn run(c: &mut Owned, input: InputSnapshot, ticks: usize) -> Vec<TickReport> {
        let settings = BodySettings::default();
        let mut reports = Vec::new();
        for _ in 0..ticks {
            if let Some(r) = c.tick_with_input(DT, &input) {
                reports.push(r);
            }
            if let Some(body) = c.target_mut() {
                body.integrate(&settings, DT);
            }
        }
        reports
    }

    #[test]
    fn missing_handles_skip_tick() {
        let mut c = Owned::new(ControllerConfig::default());
        let input = InputSnapshot { forward: true, jump: true, fire: true, look_dx: 50.0, ..Default::default() };
        assert!(c.tick_with_input(DT, &input).is_none());

        c.set_target(Some(Body::default()));
        assert!(c.tick_with_input(DT, &input).is_none());
        assert_eq!(c.state(), &ControllerState::default());
        assert_eq!(c.target().map(Body::pending_force), Some(Vec3::ZERO));

        c.set_camera(Some(PlayerLook::default()));
        assert!(c.tick_with_input(DT, &input).is_some());
    }

    #[test]
    fn setters_ignore_none_and_last_set_wins() {
        let mut c = Owned::new(ControllerConfig::default());
        assert!(c.set_target(None).is_none());

        let first = Body::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let second = Body::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert_eq!(c.set_target(Some(first)).map(|b| b.position.x), Some(1.0));
        assert_eq!(c.set_target(None).map(|b| b.position.x), Some(1.0));
        assert_eq!(c.set_target(Some(second)).map(|b| b.position.x), Some(2.0));

        let cam = PlayerLook { yaw: 1.0, pitch: 0.0 };
        assert_eq!(c.set_camera(Some(cam)), Some(&cam));
        assert_eq!(c.set_camera(None), Some(&cam));

        assert!(c.clear_camera().is_some());
        assert!(c.camera().is_none());
        assert_eq!(c.clear_target().map(|b| b.position.x), Some(2.0));
        assert!(c.target().is_none());
    }

    #[test]
    fn borrowed_handles_are_driven_in_place() {
        let mut body = Body::default();
        let mut look = PlayerLook::default();
        {
            let mut c: CharacterController<&mut Body, &mut PlayerLook> =
                CharacterController::new(ControllerConfig::default());
            c.set_target(Some(&mut body));
            c.set_camera(Some(&mut look));
            let input = InputSnapshot { forward: true, look_dx: 40.0, ..Default::default() };
            assert!(c.tick_with_input(DT, &input).is_some());
        }
        assert!(body.pending_force().length() > 0.0);
        assert!((look.yaw - 0.2).abs() < 1e-6);
    }

    #[test]
    fn forward_scenario_from_rest() {
        let config = ControllerConfig {
            max_speed: 7.0,
            move_force: 25.0,
            responsiveness: 20.0,
            air_move_mult: 0.3,
            ..Default::default()
        };
        let mut c = wired(config);
        let input = InputSnapshot { forward: true, ..Default::default() };
        let report = c.tick_with_input(DT, &input).unwrap();
        assert!(report.grounded);
        assert!((report.move_force - Vec3::new(0.0, 0.0, -25.0)).length() < 1e-4);
        assert_eq!(c.target().map(|b| b.friction), Some(config.running_friction));
    }

    #[test]
    fn running_converges_to_max_speed() {
        let mut c = wired(ControllerConfig::default());
        let input = InputSnapshot { forward: true, ..Default::default() };
        let reports = run(&mut c, input, 180);

        let max = c.config().move_force * 1.0001;
        assert!(reports.iter().all(|r| r.move_force.length() <= max));
        let v = c.target().map(|b| b.velocity).unwrap();
        let horizontal = Vec3::new(v.x, 0.0, v.z).length();
        assert!((horizontal - c.config().max_speed).abs() < 0.05, "speed {horizontal}");
        assert!(v.z < 0.0);
    }

    #[test]
    fn releasing_input_stops_the_body() {
        let mut c = wired(ControllerConfig::default());
        run(&mut c, InputSnapshot { right: true, ..Default::default() }, 120);
        assert!(c.target().unwrap().velocity.x > 6.0);

        let reports = run(&mut c, InputSnapshot::default(), 60);
        assert!(reports.iter().all(|r| r.move_force == Vec3::ZERO));
        assert_eq!(c.target().unwrap().friction, c.config().standing_friction);
        assert!(c.target().unwrap().velocity.length() < 1e-2);
    }

    #[test]
    fn holding_jump_goes_higher_than_tapping() {
        let apex = |hold_ticks: usize| {
            let mut c = wired(ControllerConfig::default());
            let settings = BodySettings::default();
            let mut top: f32 = 0.0;
            for i in 0..120 {
                let input = InputSnapshot { jump: i < hold_ticks, ..Default::default() };
                c.tick_with_input(DT, &input);
                let body = c.target_mut().unwrap();
                body.integrate(&settings, DT);
                top = top.max(body.position.y);
            }
            top
        };
        let tap = apex(1);
        let hold = apex(30);
        assert!(tap > 0.5);
        assert!(hold > tap + 0.5, "tap {tap} hold {hold}");
    }

    #[test]
    fn air_jump_relaunches_falling_body() {
        let mut c = wired(ControllerConfig::default());
        let jump = InputSnapshot { jump: true, ..Default::default() };
        run(&mut c, jump, 1);
        run(&mut c, InputSnapshot::default(), 30);
        assert!(c.target().unwrap().velocity.y < 0.0);

        let reports = run(&mut c, jump, 1);
        assert_eq!(reports[0].jump, JumpAction::Started { airborne: true });
        assert_eq!(c.state().air_jumps_used(), 1);
        assert!(c.target().unwrap().velocity.y > 0.0);

        run(&mut c, InputSnapshot::default(), 1);
        let reports = run(&mut c, jump, 1);
        assert_eq!(reports[0].jump, JumpAction::None);

        run(&mut c, InputSnapshot::default(), 120);
        assert!(c.target().unwrap().on_ground);
        assert_eq!(c.state().air_jumps_used(), 0);
        assert!(!c.state().is_jumping());
    }

    #[test]
    fn orientation_stays_bounded_over_many_ticks() {
        let mut c = wired(ControllerConfig::default());
        let input = InputSnapshot { look_dx: 977.0, look_dy: -313.0, ..Default::default() };
        for r in run(&mut c, input, 600) {
            assert!((0.0..TAU).contains(&r.yaw));
            assert!(r.pitch.abs() <= PITCH_LIMIT);
        }
    }

    #[test]
    fn fire_hook_receives_snapshot() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let mut c = wired(ControllerConfig { fire_rate: 0.5, ..Default::default() });
        c.set_fire_hook(move |input| {
            assert!(input.fire);
            seen.set(seen.get() + 1);
        });
        c.input_mut().fire = true;
        for _ in 0..16 {
            c.tick(0.125);
        }
        assert_eq!(count.get(), 4);

        c.input_mut().fire = false;
        c.tick(0.125);
        assert_eq!(c.state().firing_accumulator(), 0.0);
    }

    #[test]
    fn replacing_config_keeps_state() {
        let mut c = wired(ControllerConfig::default());
        run(&mut c, InputSnapshot { jump: true, ..Default::default() }, 2);
        assert!(c.state().is_jumping());

        c.set_config(ControllerConfig { max_speed: 12.0, ..Default::default() });
        assert_eq!(c.config().max_speed, 12.0);
        assert!(c.state().is_jumping());
    }

    #[test]
    fn identical_runs_are_deterministic() {
        let script = |i: usize| InputSnapshot {
            forward: i % 7 < 4,
            left: i % 11 < 3,
            jump: i % 40 < 10,
            fire: i % 9 == 0,
            look_dx: (i as f32 * 0.37).sin() * 30.0,
            look_dy: (i as f32 * 0.11).cos() * 10.0,
            ..Default::default()
        };
        let play = || {
            let mut c = wired(ControllerConfig { fire_rate: 0.2, ..Default::default() });
            let settings = BodySettings::default();
            for i in 0..300 {
                c.tick_with_input(DT, &script(i));
                c.target_mut().unwrap().integrate(&settings, DT);
            }
            (c.target().unwrap().clone(), c.camera().copied(), c.state().clone())
        };
        assert_eq!(play(), play());
    }
}

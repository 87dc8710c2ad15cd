//! Camera rotation and cursor helpers.
//!
//! `rotate_camera` integrates one tick of look input into pitch/yaw through
//! the `CameraRig` capability. `PlayerLook` is the component-side rig used by
//! the plugin; `cursor_grab` toggles cursor lock/visibility.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::player::input::{InputSnapshot, bound_key};
use crate::settings::{ControllerConfig, Settings};

/// Largest absolute pitch. Kept just inside ±π/2 so the view matrix never
/// degenerates.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-4;

/// Read/write access to a camera's orientation in radians.
pub trait CameraRig {
    /// Current `(pitch, yaw)`.
    fn orientation(&self) -> (f32, f32);
    fn set_orientation(&mut self, pitch: f32, yaw: f32);
}

impl<T: CameraRig + ?Sized> CameraRig for &mut T {
    fn orientation(&self) -> (f32, f32) {
        (**self).orientation()
    }

    fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        (**self).set_orientation(pitch, yaw);
    }
}

/// Stores the player's look orientation (yaw and pitch) in radians.
///
/// - `yaw`: rotation around +Y, kept in `[0, 2π)` by the controller.
/// - `pitch`: rotation around X, kept within `±PITCH_LIMIT`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl PlayerLook {
    /// Camera rotation for this look. Yaw is negated because the controller
    /// treats increasing yaw as turning right while Bevy's +Y rotation turns
    /// a -Z facing camera to the left.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, -self.yaw, self.pitch, 0.0)
    }
}

impl CameraRig for PlayerLook {
    fn orientation(&self) -> (f32, f32) {
        (self.pitch, self.yaw)
    }

    fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Apply one tick of look input to `camera`.
///
/// Rotation is driven by pointer deltas, not elapsed time, so no `dt` is
/// involved. Returns the new `(pitch, yaw)`.
pub fn rotate_camera(config: &ControllerConfig, input: &InputSnapshot, camera: &mut impl CameraRig) -> (f32, f32) {
    let sign = if config.invert_y { -1.0 } else { 1.0 };
    let pitch_delta = config.rotation_scale * input.look_dy * sign;
    let yaw_delta = config.rotation_scale * input.look_dx;

    let (pitch, yaw) = camera.orientation();
    let pitch = (pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    let yaw = wrap_yaw(yaw + yaw_delta);
    camera.set_orientation(pitch, yaw);
    (pitch, yaw)
}

/// Toggle cursor grab and visibility.
///
/// Left click grabs and hides the cursor; the bound `pause` key releases it.
#[allow(clippy::needless_pass_by_value)]
pub fn cursor_grab(
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mb: Res<ButtonInput<MouseButton>>,
    kb: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let Ok(mut w) = windows.get_single_mut() else { return };
    if mb.just_pressed(MouseButton::Left) {
        w.cursor.grab_mode = CursorGrabMode::Locked;
        w.cursor.visible = false;
    }

    if kb.just_pressed(bound_key(&settings, "pause", KeyCode::Escape)) {
        w.cursor.grab_mode = CursorGrabMode::None;
        w.cursor.visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn look(dx: f32, dy: f32) -> InputSnapshot {
        InputSnapshot { look_dx: dx, look_dy: dy, ..Default::default() }
    }

    #[test]
    fn yaw_follows_dx_scaled() {
        let config = ControllerConfig::default();
        let mut cam = PlayerLook::default();
        let (_, yaw) = rotate_camera(&config, &look(100.0, 0.0), &mut cam);
        assert!((yaw - 0.5).abs() < 1e-6);
        assert_eq!(cam.yaw, yaw);
    }

    #[test]
    fn invert_y_flips_pitch_direction() {
        let mut config = ControllerConfig::default();
        config.invert_y = true;
        let mut cam = PlayerLook::default();
        rotate_camera(&config, &look(0.0, 100.0), &mut cam);
        assert!(cam.pitch < 0.0);

        config.invert_y = false;
        let mut cam = PlayerLook::default();
        rotate_camera(&config, &look(0.0, 100.0), &mut cam);
        assert!(cam.pitch > 0.0);
    }

    #[test]
    fn pitch_never_exceeds_limit() {
        let config = ControllerConfig::default();
        let mut cam = PlayerLook::default();
        for i in 0..500 {
            let dy = if i < 250 { 10_000.0 } else { -10_000.0 };
            rotate_camera(&config, &look(0.0, dy), &mut cam);
            assert!(cam.pitch.abs() <= PITCH_LIMIT);
            assert!(cam.pitch.abs() < FRAC_PI_2);
        }
        assert!((cam.pitch - PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn yaw_stays_wrapped() {
        let config = ControllerConfig::default();
        let mut cam = PlayerLook::default();
        let mut state: u32 = 0x1234_5678;
        for _ in 0..2_000 {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let dx = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 4000.0 - 2000.0;
            rotate_camera(&config, &look(dx, 0.0), &mut cam);
            assert!((0.0..TAU).contains(&cam.yaw), "yaw out of range: {}", cam.yaw);
        }
    }

    #[test]
    fn wrap_yaw_edges() {
        assert_eq!(wrap_yaw(0.0), 0.0);
        assert_eq!(wrap_yaw(TAU), 0.0);
        assert!((wrap_yaw(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!(wrap_yaw(-1e-9) < TAU);
        assert!((wrap_yaw(4.0 * TAU + 1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn rig_works_through_mutable_reference() {
        let config = ControllerConfig::default();
        let mut cam = PlayerLook::default();
        let mut rig = &mut cam;
        rotate_camera(&config, &look(20.0, 0.0), &mut rig);
        assert!((cam.yaw - 0.1).abs() < 1e-6);
    }

    #[test]
    fn rotation_faces_minus_z_at_rest() {
        let fwd = PlayerLook::default().rotation() * Vec3::NEG_Z;
        assert!((fwd - Vec3::NEG_Z).length() < 1e-6);
        // positive yaw turns right (+X)
        let fwd = PlayerLook { yaw: FRAC_PI_2, pitch: 0.0 }.rotation() * Vec3::NEG_Z;
        assert!((fwd - Vec3::X).length() < 1e-5);
    }
}

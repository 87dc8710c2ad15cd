//! Per-tick input snapshot and the system that fills it.
//!
//! The controller never polls devices itself; it reads an `InputSnapshot`
//! produced once per frame. `gather_input` builds that snapshot from Bevy's
//! keyboard/mouse state using the key bindings in `Settings.controls`.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::settings::Settings;

/// Boolean/axis input for one tick.
///
/// `look_dx`/`look_dy` are raw pointer-motion units accumulated over the tick.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub fire: bool,
    pub fire_alt: bool,
    pub look_dx: f32,
    pub look_dy: f32,
}

impl InputSnapshot {
    /// Whether either fire button is held.
    #[must_use]
    pub fn firing(&self) -> bool {
        self.fire || self.fire_alt
    }
}

/// Resolve a key binding by action name, falling back to `default` when the
/// binding is missing or names an unknown key.
pub(crate) fn bound_key(settings: &Settings, action: &str, default: KeyCode) -> KeyCode {
    settings
        .controls
        .keybinds
        .get(action)
        .and_then(|s| Settings::keycode_from_str(s))
        .unwrap_or(default)
}

/// Fill the `InputSnapshot` resource from keyboard, mouse buttons and mouse
/// motion for this frame.
///
/// Look deltas are only collected while the cursor is grabbed (hidden), so
/// moving the pointer over a released window does not spin the camera.
///
/// # Arguments
/// * `keys` - keyboard state for movement/jump/sprint/crouch bindings
/// * `buttons` - mouse buttons for fire / alt-fire
/// * `motion` - mouse motion events for this update
/// * `windows` - primary window (cursor visibility)
/// * `settings` - key bindings and `invert_x`
/// * `snapshot` - the resource to overwrite
#[allow(clippy::needless_pass_by_value)]
pub fn gather_input(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<Settings>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    let held = |action: &str, default: KeyCode| keys.pressed(bound_key(&settings, action, default));

    let mut look = Vec2::ZERO;
    for ev in motion.read() {
        look += ev.delta;
    }
    let grabbed = windows.get_single().map(|w| !w.cursor.visible).unwrap_or(false);
    if !grabbed {
        look = Vec2::ZERO;
    }
    if settings.controls.invert_x {
        look.x = -look.x;
    }

    *snapshot = InputSnapshot {
        forward: held("forward", KeyCode::KeyW),
        backward: held("back", KeyCode::KeyS),
        left: held("left", KeyCode::KeyA),
        right: held("right", KeyCode::KeyD),
        jump: held("jump", KeyCode::Space),
        sprint: held("sprint", KeyCode::ShiftLeft),
        crouch: held("crouch", KeyCode::ControlLeft),
        fire: buttons.pressed(MouseButton::Left),
        fire_alt: buttons.pressed(MouseButton::Right),
        look_dx: look.x,
        look_dy: look.y,
    };
}

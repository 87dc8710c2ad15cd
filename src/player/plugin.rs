//! Bevy wiring for the controller.
//!
//! Each frame: `gather_input` fills the `InputSnapshot`, `drive_controllers`
//! ticks every player `Motor` against its `Body` and `PlayerLook`,
//! `integrate_bodies` steps the bodies, and `sync_transforms` copies body
//! position and look rotation onto the entity's `Transform`.

use bevy::prelude::*;

use crate::player::camera::{PlayerLook, cursor_grab};
use crate::player::controller::Motor;
use crate::player::input::{InputSnapshot, gather_input};
use crate::player::physics::{Body, integrate_bodies};
use crate::player::Player;
use crate::settings::Settings;
use crate::settings::loader::{SettingsWatcher, apply_controller_settings, check_settings_changes};

/// Sent whenever a player's fire trigger triggers.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct FireEvent {
    pub entity: Entity,
    pub input: InputSnapshot,
}

/// Registers the controller resources, events and systems.
///
/// Expects a `Settings` resource. Hot reload runs only when a
/// `SettingsWatcher` resource is present.
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputSnapshot>()
            .add_event::<FireEvent>()
            .add_systems(
                Update,
                (
                    check_settings_changes.run_if(resource_exists::<SettingsWatcher>),
                    apply_controller_settings,
                    gather_input,
                    drive_controllers,
                    integrate_bodies,
                    sync_transforms,
                )
                    .chain(),
            )
            .add_systems(Update, cursor_grab);
    }
}

/// Tick every player motor with this frame's input and delta time.
#[allow(clippy::needless_pass_by_value)]
pub fn drive_controllers(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    mut fire: EventWriter<FireEvent>,
    mut players: Query<(Entity, &mut Motor, &mut Body, &mut PlayerLook), With<Player>>,
) {
    let dt = time.delta_seconds();
    for (entity, mut motor, mut body, mut look) in &mut players {
        let report = motor.step(dt, &input, &mut *body, &mut *look, |_| {});
        if report.fired {
            fire.send(FireEvent { entity, input: *input });
        }
    }
}

/// Copy body position (raised to eye height) and look orientation onto the
/// entity transform.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_transforms(settings: Res<Settings>, mut q: Query<(&Body, &PlayerLook, &mut Transform)>) {
    let eye = Vec3::Y * settings.body.eye_height;
    for (body, look, mut tf) in &mut q {
        tf.translation = body.position + eye;
        tf.rotation = look.rotation();
    }
}

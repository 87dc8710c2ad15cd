//! Demo-only systems: spawning the player and drawing a reference floor.
use bevy::prelude::*;
use strafe::player::{Body, FireEvent, Motor, Player, PlayerLook};
use strafe::settings::Settings;
use strafe::settings::loader::FollowsSettings;

/// Half the side length of the drawn floor grid, in world units.
const GRID_HALF_EXTENT: i32 = 40;

/// Spawn the player camera with its motor, body and look components.
///
/// The body starts a little above the ground so the first frames show it
/// settling onto the plane.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(mut commands: Commands, settings: Res<Settings>) {
    let start = Vec3::new(0.0, settings.body.ground_height + 2.0, 0.0);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(start + Vec3::Y * settings.body.eye_height),
            ..default()
        },
        Player,
        Motor::new(settings.controller),
        FollowsSettings,
        Body::new(start, settings.body.mass),
        PlayerLook::default(),
    ));
    info!("player spawned at {start}; click to grab the cursor, Escape to release");
}

/// Draw a line grid on the ground plane so motion is visible.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_ground_grid(mut gizmos: Gizmos, settings: Res<Settings>) {
    let y = settings.body.ground_height;
    let extent = GRID_HALF_EXTENT as f32;
    let color = Color::srgb(0.35, 0.35, 0.4);
    for i in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
        let t = i as f32;
        gizmos.line(Vec3::new(t, y, -extent), Vec3::new(t, y, extent), color);
        gizmos.line(Vec3::new(-extent, y, t), Vec3::new(extent, y, t), color);
    }
}

/// Log fire events; the demo has no weapons to hand them to.
pub fn log_fire_events(mut events: EventReader<FireEvent>) {
    for ev in events.read() {
        info!(entity = ?ev.entity, alt = ev.input.fire_alt, "fire");
    }
}

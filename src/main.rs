use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use strafe::player::ControllerPlugin;
use strafe::settings::loader::{self as settings_loader, SETTINGS_DIR};

mod app;
use app::{draw_ground_grid, log_fire_events, setup};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "strafe".to_string(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(ControllerPlugin);

    // Must follow DefaultPlugins: LogPlugin installs the log subscriber.
    let settings = settings_loader::load_settings_from_dir(SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(SETTINGS_DIR)
        .unwrap_or_else(|e| {
            warn!("settings hot reload disabled: {e}");
            settings_loader::SettingsWatcher::stub(SETTINGS_DIR)
        });

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, setup);
    app.add_systems(Update, draw_ground_grid);
    app.add_systems(Update, log_fire_events);

    app.run();
}

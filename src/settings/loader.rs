//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in a settings directory. If several
//! files are present, the first one (by file name) that parses wins; with
//! none, defaults are used. `check_settings_changes` reloads the resource
//! when the watcher reports a modification, and `apply_controller_settings`
//! pushes a changed controller section into every `Motor` tagged with
//! `FollowsSettings`. Untagged motors keep the config they were built with.
use bevy::prelude::*;
use std::path::{Path, PathBuf};

use crate::player::Motor;
use crate::ron::{RonWatcher, load_ron_files, setup_ron_watcher};
use crate::settings::Settings;

/// Directory the demo reads settings from.
pub const SETTINGS_DIR: &str = "data/settings";

/// Marks a `Motor` whose config tracks the `Settings` resource.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FollowsSettings;

/// Watcher resource plus the directory it reloads from.
#[derive(Resource)]
pub struct SettingsWatcher {
    watcher: RonWatcher,
    dir: PathBuf,
}

impl SettingsWatcher {
    /// An inert watcher that never reports changes.
    #[must_use]
    pub fn stub(dir: impl AsRef<Path>) -> Self {
        SettingsWatcher { watcher: RonWatcher::stub(), dir: dir.as_ref().to_path_buf() }
    }

    /// Force a reload on the next `check_settings_changes`.
    pub fn mark_changed(&self) {
        self.watcher.mark_changed();
    }
}

/// Load settings from the first parseable `.ron` file in `dir`, or defaults.
#[must_use]
pub fn load_settings_from_dir(dir: impl AsRef<Path>) -> Settings {
    let items: Vec<Settings> = load_ron_files(dir.as_ref());
    items.into_iter().next().unwrap_or_else(|| {
        info!("no settings found in {}, using defaults", dir.as_ref().display());
        Settings::defaults()
    })
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` when the directory cannot be watched; callers
/// usually fall back to `SettingsWatcher::stub`.
pub fn setup_settings_watcher(dir: impl AsRef<Path>) -> Result<SettingsWatcher, notify::Error> {
    let dir = dir.as_ref();
    setup_ron_watcher(dir).map(|watcher| SettingsWatcher { watcher, dir: dir.to_path_buf() })
}

/// Reload the `Settings` resource when the watched files change.
///
/// The resource is only written when the reloaded value differs, so change
/// detection downstream fires on real edits only.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }
    let reloaded = load_settings_from_dir(&watcher.dir);
    if *settings != reloaded {
        info!("settings changed, reloading from {}", watcher.dir.display());
        *settings = reloaded;
    }
}

/// Replace the configuration of every `FollowsSettings` motor when
/// `Settings` changed.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_controller_settings(
    settings: Res<Settings>,
    mut motors: Query<&mut Motor, With<FollowsSettings>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut motor in &mut motors {
        if *motor.config() != settings.controller {
            motor.set_config(settings.controller);
        }
    }
}

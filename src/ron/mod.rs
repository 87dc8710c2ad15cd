//! Utilities for loading RON files and watching directories for changes.
//!
//! `load_ron_files` reads every `.ron` file in a directory; `RonWatcher`
//! flips a shared flag when a file in the watched directory is modified so
//! a system can reload on the next frame.

use bevy::prelude::*;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-watcher for RON hot-reload.
pub struct RonWatcher {
    changed: Arc<AtomicBool>,
    _watcher: Option<RecommendedWatcher>, // kept alive for as long as the watcher is
}

impl RonWatcher {
    /// A watcher with no OS backing. Never reports changes unless
    /// `mark_changed` is called; used when watcher creation fails.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher { changed: Arc::new(AtomicBool::new(false)), _watcher: None }
    }

    /// Return whether a change was seen since the last call, clearing the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

/// Parse a single RON document.
///
/// # Errors
/// Returns the `ron` error (with position) when the text is not a valid `T`.
pub fn parse_ron<T: DeserializeOwned>(text: &str) -> Result<T, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in file-name order. Files that fail to read or parse
/// are skipped with a warning. A missing directory yields an empty `Vec`.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: impl AsRef<Path>) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path.as_ref()) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    let mut items = Vec::new();
    for file in files {
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to read {}: {e}", file.display());
                continue;
            }
        };
        match parse_ron::<T>(&text) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` for modifications under `path`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or the
/// path cannot be watched.
pub fn setup_ron_watcher(path: impl AsRef<Path>) -> Result<RonWatcher, notify::Error> {
    let path = path.as_ref();
    let changed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&changed);
    let watched: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()).starts_with(&watched)
                });
                if relevant {
                    flag.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

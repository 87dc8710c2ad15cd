//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are
//! hot-reloadable (see `settings::loader`). Every field has a serde default,
//! so a file only needs to name the values it changes.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How movement input is mapped onto world axes for a given camera setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisConvention {
    /// Forward is local -Z, rotated by `-yaw`.
    #[default]
    Normal,
    /// Forward is local +Z, rotated by `+yaw` (engines with a flipped view axis).
    InvertedForwardAndYaw,
}

/// Tuning for one character controller.
///
/// Time fields are in seconds. Forces, speeds and frictions are expected to
/// be non-negative; this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "ControllerConfig::default_max_speed")]
    pub max_speed: f32, // Target ground speed (units/s).
    #[serde(default = "ControllerConfig::default_move_force")]
    pub move_force: f32, // Largest movement force applied in one tick.
    #[serde(default = "ControllerConfig::default_responsiveness")]
    pub responsiveness: f32, // Force per unit of velocity gap.
    #[serde(default = "ControllerConfig::default_running_friction")]
    pub running_friction: f32, // Friction while movement keys are held.
    #[serde(default = "ControllerConfig::default_standing_friction")]
    pub standing_friction: f32, // Friction with no movement input.
    #[serde(default = "ControllerConfig::default_air_move_mult")]
    pub air_move_mult: f32, // Movement force multiplier while airborne.
    #[serde(default = "ControllerConfig::default_jump_impulse")]
    pub jump_impulse: f32, // Upward impulse when a jump starts.
    #[serde(default = "ControllerConfig::default_jump_force")]
    pub jump_force: f32, // Upward force while jump stays held.
    #[serde(default = "ControllerConfig::default_jump_time")]
    pub jump_time: f32, // How long the hold force lasts (0 disables it).
    #[serde(default = "ControllerConfig::default_air_jumps")]
    pub air_jumps: u32, // Jumps allowed before landing again.
    #[serde(default = "ControllerConfig::default_crouch_move_mult")]
    pub crouch_move_mult: f32,
    #[serde(default = "ControllerConfig::default_sprint_move_mult")]
    pub sprint_move_mult: f32,
    #[serde(default = "ControllerConfig::default_invert_y")]
    pub invert_y: bool, // Moving the pointer down looks down when true.
    #[serde(default = "ControllerConfig::default_rotation_scale")]
    pub rotation_scale: f32, // Radians per pointer-motion unit.
    #[serde(default)]
    pub axis_convention: AxisConvention,
    #[serde(default)]
    pub fire_rate: f32, // Seconds between repeated fire events (0 = every tick).
    #[serde(default)]
    pub discrete_fire: bool, // Fire once per press instead of repeating.
}

impl ControllerConfig {
    fn default_max_speed() -> f32 { 7.0 }
    fn default_move_force() -> f32 { 25.0 }
    fn default_responsiveness() -> f32 { 20.0 }
    fn default_running_friction() -> f32 { 0.0 }
    fn default_standing_friction() -> f32 { 20.0 }
    fn default_air_move_mult() -> f32 { 0.3 }
    fn default_jump_impulse() -> f32 { 8.0 }
    fn default_jump_force() -> f32 { 11.0 }
    fn default_jump_time() -> f32 { 0.35 }
    fn default_air_jumps() -> u32 { 1 }
    fn default_crouch_move_mult() -> f32 { 0.6 }
    fn default_sprint_move_mult() -> f32 { 1.3 }
    fn default_invert_y() -> bool { true }
    fn default_rotation_scale() -> f32 { 0.005 }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: Self::default_max_speed(),
            move_force: Self::default_move_force(),
            responsiveness: Self::default_responsiveness(),
            running_friction: Self::default_running_friction(),
            standing_friction: Self::default_standing_friction(),
            air_move_mult: Self::default_air_move_mult(),
            jump_impulse: Self::default_jump_impulse(),
            jump_force: Self::default_jump_force(),
            jump_time: Self::default_jump_time(),
            air_jumps: Self::default_air_jumps(),
            crouch_move_mult: Self::default_crouch_move_mult(),
            sprint_move_mult: Self::default_sprint_move_mult(),
            invert_y: Self::default_invert_y(),
            rotation_scale: Self::default_rotation_scale(),
            axis_convention: AxisConvention::default(),
            fire_rate: 0.0,
            discrete_fire: false,
        }
    }
}

/// Parameters for the built-in point-mass `Body`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySettings {
    #[serde(default = "BodySettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration (negative is down).
    #[serde(default = "BodySettings::default_max_fall_speed")]
    pub max_fall_speed: f32,
    #[serde(default)]
    pub ground_height: f32, // Height of the ground plane.
    #[serde(default = "BodySettings::default_mass")]
    pub mass: f32, // Mass given to spawned player bodies.
    #[serde(default = "BodySettings::default_eye_height")]
    pub eye_height: f32, // Camera height above the body's position.
}

impl BodySettings {
    fn default_gravity() -> f32 { -20.0 }
    fn default_max_fall_speed() -> f32 { 50.0 }
    fn default_mass() -> f32 { 1.0 }
    fn default_eye_height() -> f32 { 1.6 }
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            max_fall_speed: Self::default_max_fall_speed(),
            ground_height: 0.0,
            mass: Self::default_mass(),
            eye_height: Self::default_eye_height(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("sprint", "LShift"),
            ("crouch", "LCtrl"),
            ("pause", "Escape"),
        ]
        .into_iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { invert_x: false, keybinds: Self::default_keybinds() }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub body: BodySettings,
    #[serde(default)]
    pub controls: ControlsSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Convert a key name from `controls.keybinds` (e.g. "W", "Space",
    /// "LShift", "F1") into a Bevy `KeyCode`. Case-insensitive.
    ///
    /// # Returns
    /// `None` if the name does not match a supported key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }
        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok())
            && (1..=FUNCTION.len()).contains(&n)
        {
            return Some(FUNCTION[n - 1]);
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            "CAPSLOCK" => KeyCode::CapsLock,
            _ => return None,
        })
    }
}

pub mod loader;

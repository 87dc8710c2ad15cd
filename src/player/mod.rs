//! Player controller: camera look, jumping, movement forces and firing.
//!
//! The sub-models live in their own modules and are composed by
//! `controller::Motor`. `plugin::ControllerPlugin` runs them from Bevy
//! systems against `Body` and `PlayerLook` components.
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     Camera3dBundle::default(),
//!     Player,
//!     Motor::new(settings.controller),
//!     Body::new(Vec3::ZERO, 1.0),
//!     PlayerLook::default(),
//! ));
//! app.add_plugins(ControllerPlugin);
//! ```
pub mod camera;
pub mod controller;
pub mod fire;
pub mod input;
pub mod jump;
pub mod movement;
pub mod physics;
pub mod plugin;

use bevy::prelude::*;

pub use camera::{CameraRig, PITCH_LIMIT, PlayerLook, cursor_grab, rotate_camera};
pub use controller::{CharacterController, ControllerState, Motor, TickReport};
pub use input::{InputSnapshot, gather_input};
pub use jump::JumpAction;
pub use physics::{Body, PhysicsTarget, integrate_bodies};
pub use plugin::{ControllerPlugin, FireEvent};

/// Marks the entity driven by the local player's input.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

//! Physics collaborator interface and a minimal point-mass body.
//!
//! The controller talks to whatever simulates the player through
//! `PhysicsTarget`. `Body` is a small reference implementation: gravity,
//! force/impulse integration, a single horizontal ground plane for rest
//! contact and a ground friction coefficient. It is enough to drive the
//! controller in the demo, tests and benches; it does no collision work.
//! Register `integrate_bodies` as a system to step every `Body` each frame.

use bevy::prelude::*;

use crate::settings::{BodySettings, Settings};

/// The rigid body the controller pushes around.
pub trait PhysicsTarget {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Whether vertical rest contact is engaged.
    fn grounded(&self) -> bool;
    /// Continuous force for this step.
    fn apply_force(&mut self, force: Vec3);
    /// Instantaneous change in momentum.
    fn apply_impulse(&mut self, impulse: Vec3);
    fn set_friction(&mut self, friction: f32);
}

impl<T: PhysicsTarget + ?Sized> PhysicsTarget for &mut T {
    fn velocity(&self) -> Vec3 {
        (**self).velocity()
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        (**self).set_velocity(velocity);
    }

    fn grounded(&self) -> bool {
        (**self).grounded()
    }

    fn apply_force(&mut self, force: Vec3) {
        (**self).apply_force(force);
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        (**self).apply_impulse(impulse);
    }

    fn set_friction(&mut self, friction: f32) {
        (**self).set_friction(friction);
    }
}

/// Point-mass body resting on (or falling toward) a ground plane.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec3,
    /// World units per second.
    pub velocity: Vec3,
    pub mass: f32,
    /// Horizontal friction coefficient applied while on the ground.
    pub friction: f32,
    pub on_ground: bool,
    /// Forces accumulated since the last `integrate`.
    force: Vec3,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            friction: 0.0,
            on_ground: true,
            force: Vec3::ZERO,
        }
    }
}

impl Body {
    #[must_use]
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self { position, mass, ..Default::default() }
    }

    /// Unit-mass body at the origin moving at `velocity`.
    #[must_use]
    pub fn with_velocity(velocity: Vec3, on_ground: bool) -> Self {
        Self { velocity, on_ground, ..Default::default() }
    }

    /// Net force queued for the next step.
    #[must_use]
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Advance the body by `dt` seconds.
    ///
    /// Semi-implicit Euler: forces and gravity update velocity, ground
    /// friction damps horizontal speed, then velocity moves the body. Landing
    /// on the plane zeroes downward speed and sets `on_ground`.
    pub fn integrate(&mut self, settings: &BodySettings, dt: f32) {
        let inv_mass = if self.mass > 0.0 { self.mass.recip() } else { 0.0 };
        self.velocity += self.force * inv_mass * dt;
        self.velocity.y += settings.gravity * dt;
        self.velocity.y = self.velocity.y.max(-settings.max_fall_speed);
        self.force = Vec3::ZERO;

        if self.on_ground && self.friction > 0.0 {
            let keep = (1.0 - self.friction * dt).max(0.0);
            self.velocity.x *= keep;
            self.velocity.z *= keep;
        }

        self.position += self.velocity * dt;

        if self.position.y <= settings.ground_height && self.velocity.y <= 0.0 {
            self.position.y = settings.ground_height;
            self.velocity.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }
    }
}

impl PhysicsTarget for Body {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn grounded(&self) -> bool {
        self.on_ground
    }

    fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }
}

/// Step every `Body` with this frame's delta time.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_bodies(time: Res<Time>, settings: Res<Settings>, mut bodies: Query<&mut Body>) {
    let dt = time.delta_seconds();
    for mut body in &mut bodies {
        body.integrate(&settings.body, dt);
    }
}

//! Deterministic simulation module
//!
//! Both scenes live here. This module must be pure and deterministic:
//! - Caller-supplied time deltas only (no internal clock or scheduling)
//! - Seeded RNG only
//! - Stable iteration order (particle array order, then obstacle order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod pendulum;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, circle_contact, resolve_box_collision, resolve_particle_obstacle,
    resolve_particle_pair,
};
pub use geometry::BoxGeometry;
pub use pendulum::{DoublePendulum, PendulumParams, PendulumState, Trace, pendulum_origin};
pub use state::{Hue, Obstacle, Particle, ParticleBox, WorldParams};

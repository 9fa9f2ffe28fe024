//! Particle box state and configuration
//!
//! The world owns every particle, obstacle and the container box. Hosts
//! mutate it through the methods below between calls to `step`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::BoxGeometry;
use crate::consts::*;

/// Opaque color tag: a hue angle in degrees, [0, 360)
///
/// Saturation and lightness are fixed for every particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hue(pub u16);

impl Hue {
    /// CSS color string for canvas renderers
    pub fn to_css(self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.0, PARTICLE_SATURATION, PARTICLE_LIGHTNESS
        )
    }
}

/// A circular particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Hue,
}

/// A static circular obstacle, stored in the box-local frame
///
/// Obstacles move rigidly with the box: their world position is derived
/// from the current box transform, never re-stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub local_pos: Vec2,
    pub radius: f32,
}

/// Live-adjustable world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Bounce coefficient, intended range [0, 1] (not enforced)
    pub restitution: f32,
    /// Velocity damping rate (per second)
    pub friction: f32,
    /// Base particle radius (px)
    pub radius: f32,
    /// Horizontal spawn speed range (velocity x in ±spawn_speed/2)
    pub spawn_speed: f32,
    /// Vertical spawn speed range (velocity y in ±spawn_vertical_speed/2)
    pub spawn_vertical_speed: f32,
    /// Box size as a fraction of the available viewport area, (0, 1]
    pub box_scale: f32,
    /// Constraint relaxation passes per sub-step
    pub solver_iterations: u32,
    /// Sub-steps per frame
    pub sub_steps: u32,
    /// Largest frame delta accepted by `step` (seconds)
    pub max_dt: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            restitution: 0.7,
            friction: 0.2,
            radius: 6.0,
            spawn_speed: 800.0,
            spawn_vertical_speed: 200.0,
            box_scale: 0.6,
            solver_iterations: 6,
            sub_steps: 2,
            max_dt: MAX_FRAME_DT,
        }
    }
}

/// The particle box world
#[derive(Debug, Clone)]
pub struct ParticleBox {
    pub(super) params: WorldParams,
    pub(super) particles: Vec<Particle>,
    pub(super) obstacles: Vec<Obstacle>,
    pub(super) bounds: BoxGeometry,
    view_width: f32,
    view_height: f32,
    rng: Pcg32,
}

impl ParticleBox {
    /// Create a world with default parameters for a viewport
    pub fn new(view_width: f32, view_height: f32, seed: u64) -> Self {
        Self::with_params(view_width, view_height, WorldParams::default(), seed)
    }

    /// Create a world with the given parameters
    ///
    /// Radius and box scale are clamped like their setters. Starts with a
    /// single particle at a random point inside the box.
    pub fn with_params(view_width: f32, view_height: f32, params: WorldParams, seed: u64) -> Self {
        let mut params = params;
        params.radius = params.radius.max(MIN_RADIUS);
        params.box_scale = params.box_scale.clamp(MIN_BOX_SCALE, MAX_BOX_SCALE);

        let bounds = BoxGeometry::fit_viewport(view_width, view_height, params.box_scale, 0.0);
        let mut world = Self {
            params,
            particles: Vec::new(),
            obstacles: Vec::new(),
            bounds,
            view_width,
            view_height,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.add_balls(1);

        log::debug!(
            "Particle box created: viewport {}x{}, box {:.1}x{:.1}, seed {}",
            view_width,
            view_height,
            world.bounds.width,
            world.bounds.height,
            seed
        );
        world
    }

    /// Current parameters
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Particles in solver order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Obstacles in solver order (box-local positions)
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Current container geometry
    pub fn box_geometry(&self) -> &BoxGeometry {
        &self.bounds
    }

    /// Viewport size the box was derived from
    pub fn viewport(&self) -> (f32, f32) {
        (self.view_width, self.view_height)
    }

    /// Recompute the box for a new viewport, keeping its angle
    ///
    /// Entities are left where they are; the next collision pass pulls
    /// anything outside back in.
    pub fn resize(&mut self, view_width: f32, view_height: f32) {
        self.view_width = view_width;
        self.view_height = view_height;
        self.rebuild_box(self.bounds.angle);
    }

    /// Set the base radius (clamped to >= 1) for every particle, current and future
    pub fn set_radius(&mut self, radius: f32) {
        let radius = radius.max(MIN_RADIUS);
        self.params.radius = radius;
        for particle in &mut self.particles {
            particle.radius = radius;
        }
    }

    /// Rotate the box (radians)
    pub fn set_box_angle(&mut self, angle: f32) {
        self.rebuild_box(angle);
    }

    /// Resize the box as a fraction of the viewport, clamped to [0.1, 1]
    pub fn set_box_scale(&mut self, scale: f32) {
        self.params.box_scale = scale.clamp(MIN_BOX_SCALE, MAX_BOX_SCALE);
        self.rebuild_box(self.bounds.angle);
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.params.gravity = gravity;
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.params.restitution = restitution;
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.params.friction = friction;
    }

    pub fn set_spawn_speed(&mut self, speed: f32) {
        self.params.spawn_speed = speed;
    }

    pub fn set_spawn_vertical_speed(&mut self, speed: f32) {
        self.params.spawn_vertical_speed = speed;
    }

    pub fn set_solver_iterations(&mut self, iterations: u32) {
        self.params.solver_iterations = iterations;
    }

    pub fn set_sub_steps(&mut self, sub_steps: u32) {
        self.params.sub_steps = sub_steps;
    }

    pub fn set_max_dt(&mut self, max_dt: f32) {
        self.params.max_dt = max_dt;
    }

    /// Apply a full parameter set (radius and box scale go through their setters)
    pub fn apply_params(&mut self, params: &WorldParams) {
        self.params.gravity = params.gravity;
        self.params.restitution = params.restitution;
        self.params.friction = params.friction;
        self.params.spawn_speed = params.spawn_speed;
        self.params.spawn_vertical_speed = params.spawn_vertical_speed;
        self.params.solver_iterations = params.solver_iterations;
        self.params.sub_steps = params.sub_steps;
        self.params.max_dt = params.max_dt;
        self.set_radius(params.radius);
        self.set_box_scale(params.box_scale);
    }

    /// Place an obstacle at a world point
    ///
    /// Returns false (and changes nothing) when the obstacle would not fit
    /// inside the box.
    #[must_use]
    pub fn add_obstacle(&mut self, world_pos: Vec2, radius: f32) -> bool {
        let local = self.bounds.to_local(world_pos);
        if !self.bounds.contains_inset(local, radius) {
            log::debug!("Obstacle at {:?} rejected: outside box interior", world_pos);
            return false;
        }
        self.obstacles.push(Obstacle {
            local_pos: local,
            radius: radius.max(MIN_RADIUS),
        });
        true
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// World position of an obstacle under the current box transform
    pub fn obstacle_world_position(&self, obstacle: &Obstacle) -> Vec2 {
        self.bounds.to_world(obstacle.local_pos)
    }

    /// Replace all particles with `count` fresh ones at random points in the box
    pub fn add_balls(&mut self, count: usize) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let pos = self.random_point_in_box(self.params.radius);
            let particle = self.spawn_particle(pos);
            self.particles.push(particle);
        }
        log::debug!("Spawned {} particles", count);
    }

    fn rebuild_box(&mut self, angle: f32) {
        self.bounds = BoxGeometry::fit_viewport(
            self.view_width,
            self.view_height,
            self.params.box_scale,
            angle,
        );
    }

    fn random_point_in_box(&mut self, radius: f32) -> Vec2 {
        let limit = (self.bounds.half_extents() - Vec2::splat(radius)).max(Vec2::ONE);
        let local = Vec2::new(
            (self.rng.random::<f32>() * 2.0 - 1.0) * limit.x,
            (self.rng.random::<f32>() * 2.0 - 1.0) * limit.y,
        );
        self.bounds.to_world(local)
    }

    fn spawn_particle(&mut self, pos: Vec2) -> Particle {
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * self.params.spawn_speed,
            (self.rng.random::<f32>() - 0.5) * self.params.spawn_vertical_speed,
        );
        Particle {
            pos,
            vel,
            radius: self.params.radius,
            color: Hue(self.rng.random_range(0..360)),
        }
    }
}

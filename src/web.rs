//! JS bindings for a browser renderer
//!
//! The page owns the animation loop: each frame it calls `step(dt)` on a
//! handle and then pulls flat `Float32Array` snapshots to draw.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::consts::MAX_FRAME_DT;
use crate::settings::Settings;
use crate::sim::{DoublePendulum, ParticleBox, Trace, pendulum_origin};
use crate::{auto_rotate_angle, clamp_frame_dt};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) fails harmlessly
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Physics toys loaded");
}

/// Particle box scene
#[wasm_bindgen]
pub struct ParticleBoxHandle {
    world: ParticleBox,
    settings: Settings,
}

#[wasm_bindgen]
impl ParticleBoxHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> ParticleBoxHandle {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let world = ParticleBox::with_params(width, height, settings.world.clone(), seed);
        log::info!("Particle box initialized with seed: {}", seed);
        let mut handle = ParticleBoxHandle { world, settings };
        handle.settings.apply_to_world(&mut handle.world);
        handle
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(width, height);
    }

    /// Advance one animation frame; `time_ms` drives auto-rotation
    pub fn step(&mut self, dt: f32, time_ms: f64) {
        if self.settings.auto_rotate {
            self.world.set_box_angle(auto_rotate_angle(time_ms));
        }
        self.world.step(dt);
    }

    pub fn set_gravity(&mut self, value: f32) {
        self.settings.world.gravity = value;
        self.world.set_gravity(value);
    }

    pub fn set_restitution(&mut self, value: f32) {
        self.settings.world.restitution = value;
        self.world.set_restitution(value);
    }

    pub fn set_friction(&mut self, value: f32) {
        self.settings.world.friction = value;
        self.world.set_friction(value);
    }

    pub fn set_radius(&mut self, value: f32) {
        self.world.set_radius(value);
        self.settings.world.radius = self.world.params().radius;
    }

    pub fn set_spawn_speed(&mut self, value: f32) {
        self.settings.world.spawn_speed = value;
        self.world.set_spawn_speed(value);
    }

    pub fn set_spawn_vertical_speed(&mut self, value: f32) {
        self.settings.world.spawn_vertical_speed = value;
        self.world.set_spawn_vertical_speed(value);
    }

    pub fn set_solver_iterations(&mut self, value: u32) {
        self.settings.world.solver_iterations = value;
        self.world.set_solver_iterations(value);
    }

    pub fn set_box_angle_deg(&mut self, degrees: f32) {
        self.settings.box_angle_deg = degrees;
        if !self.settings.auto_rotate {
            self.world.set_box_angle(degrees.to_radians());
        }
    }

    pub fn set_box_scale(&mut self, value: f32) {
        self.world.set_box_scale(value);
        self.settings.world.box_scale = self.world.params().box_scale;
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.settings.auto_rotate = enabled;
        if !enabled {
            self.world.set_box_angle(self.settings.box_angle_deg.to_radians());
        }
    }

    pub fn set_obstacle_radius(&mut self, value: f32) {
        self.settings.obstacle_radius = value;
    }

    /// Replace all particles; non-finite or non-positive counts are ignored
    pub fn add_balls(&mut self, count: f64) {
        if !count.is_finite() || count <= 0.0 {
            return;
        }
        let count = count.floor() as usize;
        self.settings.ball_count = count;
        self.world.add_balls(count);
    }

    /// Place an obstacle at a canvas point; false if outside the box
    pub fn add_obstacle(&mut self, x: f32, y: f32) -> bool {
        self.world
            .add_obstacle(Vec2::new(x, y), self.settings.obstacle_radius)
    }

    pub fn clear_obstacles(&mut self) {
        self.world.clear_obstacles();
    }

    pub fn save_settings(&self) {
        self.settings.save();
    }

    /// `[x, y, radius]` per particle
    pub fn particles(&self) -> Vec<f32> {
        self.world
            .particles()
            .iter()
            .flat_map(|p| [p.pos.x, p.pos.y, p.radius])
            .collect()
    }

    /// Hue (degrees) per particle, same order as `particles`
    pub fn hues(&self) -> Vec<u16> {
        self.world.particles().iter().map(|p| p.color.0).collect()
    }

    /// `[x, y, radius]` per obstacle in world space
    pub fn obstacles(&self) -> Vec<f32> {
        self.world
            .obstacles()
            .iter()
            .flat_map(|o| {
                let pos = self.world.obstacle_world_position(o);
                [pos.x, pos.y, o.radius]
            })
            .collect()
    }

    /// `[center_x, center_y, half_width, half_height, angle]`
    pub fn box_geometry(&self) -> Vec<f32> {
        let b = self.world.box_geometry();
        let half = b.half_extents();
        vec![b.center.x, b.center.y, half.x, half.y, b.angle]
    }
}

/// Double pendulum scene
#[wasm_bindgen]
pub struct PendulumHandle {
    pendulum: DoublePendulum,
    trace: Trace,
    origin: Vec2,
}

#[wasm_bindgen]
impl PendulumHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> PendulumHandle {
        let settings = Settings::load();
        let mut handle = PendulumHandle {
            pendulum: DoublePendulum::default(),
            trace: Trace::default(),
            origin: pendulum_origin(width, height),
        };
        settings.apply_to_pendulum(&mut handle.pendulum, &mut handle.trace);
        handle
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.origin = pendulum_origin(width, height);
    }

    /// Advance one animation frame and record the lower bob
    pub fn step(&mut self, dt: f32) {
        self.pendulum.step(clamp_frame_dt(dt, MAX_FRAME_DT));
        let (_, lower) = self.pendulum.bob_positions(self.origin);
        self.trace.record(lower);
    }

    pub fn reset(&mut self, angle1_deg: f32, angle2_deg: f32, velocity1: f32, velocity2: f32) {
        self.pendulum.reset(angle1_deg, angle2_deg, velocity1, velocity2);
        self.trace.clear();
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.pendulum.params.damping = damping;
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace.set_enabled(enabled);
    }

    /// `[pivot_x, pivot_y, bob1_x, bob1_y, bob2_x, bob2_y]`
    pub fn bobs(&self) -> Vec<f32> {
        let (upper, lower) = self.pendulum.bob_positions(self.origin);
        vec![self.origin.x, self.origin.y, upper.x, upper.y, lower.x, lower.y]
    }

    /// `[x, y]` per trace point, oldest first
    pub fn trace(&self) -> Vec<f32> {
        self.trace.points().flat_map(|p| [p.x, p.y]).collect()
    }
}

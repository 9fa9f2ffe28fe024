//! Physics Toys - interactive 2D physics scenes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particle box solver, double pendulum)
//! - `settings`: Serializable, live-adjustable parameters
//! - `web`: JS bindings for a browser renderer (wasm32 only)

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Empty space kept between the viewport edge and the box footprint
    pub const VIEW_MARGIN: f32 = 50.0;

    /// Penetration tolerance left uncorrected to keep resting contacts still
    pub const SLOP: f32 = 0.01;
    /// Fraction of particle-particle overlap removed per solver iteration
    pub const PAIR_CORRECTION: f32 = 0.8;
    /// Fraction of particle-obstacle overlap removed per solver iteration
    pub const OBSTACLE_CORRECTION: f32 = 0.9;

    /// Smallest radius a particle or obstacle can have
    pub const MIN_RADIUS: f32 = 1.0;
    /// Box scale range (fraction of the available viewport area)
    pub const MIN_BOX_SCALE: f32 = 0.1;
    pub const MAX_BOX_SCALE: f32 = 1.0;

    /// Largest frame delta fed to the integrators (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Color tag saturation/lightness (hue is random per particle)
    pub const PARTICLE_SATURATION: u8 = 70;
    pub const PARTICLE_LIGHTNESS: u8 = 55;

    /// Fixed internal sub-steps of the pendulum integrator
    pub const PENDULUM_SUB_STEPS: u32 = 6;
    /// Maximum number of points kept in the pendulum trace
    pub const TRACE_CAPACITY: usize = 1500;

    /// Auto-rotation: angular frequency (per millisecond) and amplitude (degrees)
    pub const AUTO_ROTATE_RATE: f64 = 0.0002;
    pub const AUTO_ROTATE_AMPLITUDE_DEG: f32 = 30.0;
}

/// Clamp a wall-clock frame delta to `[0, max_dt]`
///
/// Non-finite deltas (first frame, clock glitches) become zero.
#[inline]
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    }
}

/// Box angle for the auto-rotate mode at the given host time (milliseconds)
///
/// Swings between -30° and +30°.
#[inline]
pub fn auto_rotate_angle(time_ms: f64) -> f32 {
    let swing = (time_ms * consts::AUTO_ROTATE_RATE).sin() as f32;
    (swing * consts::AUTO_ROTATE_AMPLITUDE_DEG).to_radians()
}

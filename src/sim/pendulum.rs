//! Double pendulum integrator and bob trace
//!
//! Angles are measured from the downward vertical; with screen coordinates
//! (y grows downward) a bob sits at `pivot + l * (sin a, cos a)`.

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PENDULUM_SUB_STEPS, TRACE_CAPACITY};

/// Physical parameters of the two links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumParams {
    /// Upper link length (px)
    pub length1: f32,
    /// Lower link length (px)
    pub length2: f32,
    pub mass1: f32,
    pub mass2: f32,
    /// Gravitational constant (m/s², or px/s² when `pixels_per_meter` is None)
    pub gravity: f32,
    /// Scale applied to `gravity` when it is expressed in meters
    pub pixels_per_meter: Option<f32>,
    /// Fraction of angular velocity removed every sub-step (not dt-scaled)
    pub damping: f32,
    /// Internal sub-steps per `step` call
    pub sub_steps: u32,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            length1: 160.0,
            length2: 160.0,
            mass1: 1.0,
            mass2: 1.0,
            gravity: 9.81,
            pixels_per_meter: None,
            damping: 0.001,
            sub_steps: PENDULUM_SUB_STEPS,
        }
    }
}

impl PendulumParams {
    /// Gravity in the integrator's length units
    pub fn effective_gravity(&self) -> f32 {
        match self.pixels_per_meter {
            Some(scale) => self.gravity * scale,
            None => self.gravity,
        }
    }
}

/// Angles (radians) and angular velocities (rad/s) of both links
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub angle1: f32,
    pub angle2: f32,
    pub angular_velocity1: f32,
    pub angular_velocity2: f32,
}

impl Default for PendulumState {
    fn default() -> Self {
        Self {
            angle1: FRAC_PI_2,
            angle2: FRAC_PI_2 + 0.4,
            angular_velocity1: 0.0,
            angular_velocity2: 0.0,
        }
    }
}

/// Two-link pendulum advanced with damped semi-implicit Euler
#[derive(Debug, Clone, Default)]
pub struct DoublePendulum {
    pub params: PendulumParams,
    state: PendulumState,
}

impl DoublePendulum {
    pub fn new(params: PendulumParams) -> Self {
        Self {
            params,
            state: PendulumState::default(),
        }
    }

    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    /// Replace the whole state (angles in degrees, velocities in rad/s)
    pub fn reset(&mut self, angle1_deg: f32, angle2_deg: f32, velocity1: f32, velocity2: f32) {
        self.state = PendulumState {
            angle1: angle1_deg.to_radians(),
            angle2: angle2_deg.to_radians(),
            angular_velocity1: velocity1,
            angular_velocity2: velocity2,
        };
        log::info!(
            "Pendulum reset: angles ({}°, {}°), velocities ({}, {})",
            angle1_deg,
            angle2_deg,
            velocity1,
            velocity2
        );
    }

    /// Advance by `dt` seconds, split into `sub_steps` equal sub-steps
    ///
    /// The host clamps `dt` to a frame budget before calling.
    pub fn step(&mut self, dt: f32) {
        let steps = self.params.sub_steps.max(1);
        let step_dt = dt / steps as f32;
        for _ in 0..steps {
            self.sub_step(step_dt);
        }
    }

    /// Angular accelerations of both links for the current state
    pub fn accelerations(&self) -> (f32, f32) {
        let PendulumParams {
            length1: l1,
            length2: l2,
            mass1: m1,
            mass2: m2,
            ..
        } = self.params;
        let g = self.params.effective_gravity();
        let PendulumState {
            angle1: a1,
            angle2: a2,
            angular_velocity1: w1,
            angular_velocity2: w2,
        } = self.state;

        let delta = a1 - a2;
        let den = 2.0 * m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos();

        let acc1 = (-g * (2.0 * m1 + m2) * a1.sin()
            - m2 * g * (a1 - 2.0 * a2).sin()
            - 2.0 * delta.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos()))
            / (l1 * den);

        let acc2 = 2.0
            * delta.sin()
            * (w1 * w1 * l1 * (m1 + m2) + g * (m1 + m2) * a1.cos() + w2 * w2 * l2 * m2 * delta.cos())
            / (l2 * den);

        (acc1, acc2)
    }

    /// Bob positions for a pivot at `origin`
    pub fn bob_positions(&self, origin: Vec2) -> (Vec2, Vec2) {
        let p1 = origin + Vec2::new(self.state.angle1.sin(), self.state.angle1.cos()) * self.params.length1;
        let p2 = p1 + Vec2::new(self.state.angle2.sin(), self.state.angle2.cos()) * self.params.length2;
        (p1, p2)
    }

    fn sub_step(&mut self, dt: f32) {
        let (acc1, acc2) = self.accelerations();
        let keep = 1.0 - self.params.damping;
        let s = &mut self.state;

        s.angular_velocity1 = (s.angular_velocity1 + acc1 * dt) * keep;
        s.angular_velocity2 = (s.angular_velocity2 + acc2 * dt) * keep;
        s.angle1 += s.angular_velocity1 * dt;
        s.angle2 += s.angular_velocity2 * dt;
    }
}

/// Pivot position used by the pendulum scene: horizontally centered, a third down
pub fn pendulum_origin(view_width: f32, view_height: f32) -> Vec2 {
    Vec2::new(view_width / 2.0, view_height / 3.0)
}

/// Bounded history of the lower bob's positions (oldest first)
#[derive(Debug, Clone)]
pub struct Trace {
    points: VecDeque<Vec2>,
    capacity: usize,
    enabled: bool,
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(TRACE_CAPACITY)
    }
}

impl Trace {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            enabled: true,
        }
    }

    /// Append a point, evicting the oldest once full. Ignored while disabled.
    pub fn record(&mut self, point: Vec2) {
        if !self.enabled || self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Turning tracing off drops the recorded path
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.points.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_energy(p: &DoublePendulum) -> f32 {
        let PendulumParams {
            length1: l1,
            length2: l2,
            mass1: m1,
            mass2: m2,
            ..
        } = p.params;
        let g = p.params.effective_gravity();
        let s = p.state();
        let (w1, w2) = (s.angular_velocity1, s.angular_velocity2);
        let kinetic = 0.5 * (m1 + m2) * l1 * l1 * w1 * w1
            + 0.5 * m2 * l2 * l2 * w2 * w2
            + m2 * l1 * l2 * w1 * w2 * (s.angle1 - s.angle2).cos();
        // Height measured downward from the pivot, so potential is -y
        let potential =
            -(m1 + m2) * g * l1 * s.angle1.cos() - m2 * g * l2 * s.angle2.cos();
        kinetic + potential
    }

    #[test]
    fn test_reset_converts_degrees() {
        let mut p = DoublePendulum::default();
        p.reset(90.0, 180.0, 0.5, -0.25);
        let s = p.state();
        assert!((s.angle1 - FRAC_PI_2).abs() < 1e-6);
        assert!((s.angle2 - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(s.angular_velocity1, 0.5);
        assert_eq!(s.angular_velocity2, -0.25);
    }

    #[test]
    fn test_hanging_pendulum_stays_at_rest() {
        let mut p = DoublePendulum::default();
        p.reset(0.0, 0.0, 0.0, 0.0);
        for _ in 0..100 {
            p.step(1.0 / 60.0);
        }
        let s = p.state();
        assert_eq!(s.angle1, 0.0);
        assert_eq!(s.angle2, 0.0);
    }

    #[test]
    fn test_released_pendulum_swings_down() {
        let mut p = DoublePendulum::default();
        p.reset(90.0, 90.0, 0.0, 0.0);
        p.step(1.0 / 30.0);
        let (acc1, _) = p.accelerations();
        assert!(p.state().angular_velocity1 < 0.0);
        assert!(p.state().angle1 < FRAC_PI_2);
        assert!(acc1.is_finite());
    }

    #[test]
    fn test_trajectory_bitwise_reproducible() {
        let run = || {
            let mut p = DoublePendulum::new(PendulumParams {
                damping: 0.0,
                ..Default::default()
            });
            p.reset(90.0, 115.0, 0.0, 0.0);
            let mut angles = Vec::new();
            for i in 0..500 {
                p.step(1.0 / 60.0 + (i % 7) as f32 * 1e-4);
                angles.push((p.state().angle1.to_bits(), p.state().angle2.to_bits()));
            }
            angles
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_energy_roughly_conserved_without_damping() {
        let mut p = DoublePendulum::new(PendulumParams {
            damping: 0.0,
            pixels_per_meter: Some(100.0),
            ..Default::default()
        });
        p.reset(30.0, 30.0, 0.0, 0.0);
        let start = total_energy(&p);
        for _ in 0..120 {
            p.step(1.0 / 60.0);
        }
        let end = total_energy(&p);
        assert!((end - start).abs() < start.abs() * 0.05);
    }

    #[test]
    fn test_damping_drains_energy() {
        let mut p = DoublePendulum::new(PendulumParams {
            damping: 0.01,
            pixels_per_meter: Some(100.0),
            ..Default::default()
        });
        p.reset(60.0, 60.0, 0.0, 0.0);
        let rest = {
            let mut hanging = p.clone();
            hanging.reset(0.0, 0.0, 0.0, 0.0);
            total_energy(&hanging)
        };
        let start = total_energy(&p) - rest;
        for _ in 0..600 {
            p.step(1.0 / 60.0);
        }
        let end = total_energy(&p) - rest;
        assert!(end < start * 0.5);
    }

    #[test]
    fn test_pixels_per_meter_scales_gravity() {
        let params = PendulumParams {
            pixels_per_meter: Some(100.0),
            ..Default::default()
        };
        assert!((params.effective_gravity() - 981.0).abs() < 1e-3);
        assert_eq!(PendulumParams::default().effective_gravity(), 9.81);
    }

    #[test]
    fn test_bob_positions() {
        let mut p = DoublePendulum::default();
        p.reset(0.0, 90.0, 0.0, 0.0);
        let (b1, b2) = p.bob_positions(Vec2::new(400.0, 200.0));
        assert!((b1 - Vec2::new(400.0, 360.0)).length() < 1e-3);
        assert!((b2 - Vec2::new(560.0, 360.0)).length() < 1e-3);
        assert_eq!(pendulum_origin(800.0, 600.0), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_trace_bounded_fifo() {
        let mut trace = Trace::default();
        for i in 0..2000 {
            trace.record(Vec2::new(i as f32, 0.0));
            assert!(trace.len() <= TRACE_CAPACITY);
        }
        assert_eq!(trace.len(), TRACE_CAPACITY);
        assert_eq!(trace.points().next(), Some(Vec2::new(500.0, 0.0)));
        assert_eq!(trace.points().last(), Some(Vec2::new(1999.0, 0.0)));
    }

    #[test]
    fn test_trace_disable_clears() {
        let mut trace = Trace::new(10);
        trace.record(Vec2::ONE);
        trace.record(Vec2::ZERO);
        trace.set_enabled(false);
        assert!(trace.is_empty());
        trace.record(Vec2::ONE);
        assert!(trace.is_empty());
        trace.set_enabled(true);
        trace.record(Vec2::ONE);
        assert_eq!(trace.len(), 1);
    }
}

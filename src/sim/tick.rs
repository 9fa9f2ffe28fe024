//! Particle box time stepping
//!
//! Each frame is split into sub-steps. A sub-step integrates every particle
//! (gravity, damping, position) and then relaxes the contact constraints
//! `solver_iterations` times, Gauss-Seidel style: pairs in particle order,
//! then particle x obstacle in particle-then-obstacle order, then the box.
//!
//! Pair checks are all-pairs, O(n²) per iteration. This is the dominant cost
//! and bounds the practical particle count to the low thousands.

use super::collision::{resolve_box_collision, resolve_particle_obstacle, resolve_particle_pair};
use super::state::ParticleBox;
use crate::clamp_frame_dt;

impl ParticleBox {
    /// Advance the world by a frame delta (seconds), clamped to `max_dt`
    pub fn step(&mut self, dt: f32) {
        let dt = clamp_frame_dt(dt, self.params.max_dt);
        let steps = self.params.sub_steps.max(1);
        let step_dt = dt / steps as f32;

        for _ in 0..steps {
            self.integrate(step_dt);
            for _ in 0..self.params.solver_iterations {
                self.relax();
            }
        }
    }

    /// One constraint relaxation pass over all contacts
    pub fn relax(&mut self) {
        self.resolve_particle_pairs();
        self.resolve_obstacles();

        let restitution = self.params.restitution;
        for particle in &mut self.particles {
            resolve_box_collision(particle, &self.bounds, restitution);
        }
    }

    /// Sum of overlap depths over all particle pairs
    pub fn total_penetration(&self) -> f32 {
        let mut total = 0.0;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let overlap = a.radius + b.radius - a.pos.distance(b.pos);
                if overlap > 0.0 {
                    total += overlap;
                }
            }
        }
        total
    }

    /// Kinetic energy with unit particle mass
    pub fn kinetic_energy(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| 0.5 * p.vel.length_squared())
            .sum()
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.params.gravity;
        let damping = (1.0 - self.params.friction * dt).max(0.0);

        for particle in &mut self.particles {
            particle.vel.y += gravity * dt;
            particle.vel *= damping;
            particle.pos += particle.vel * dt;
        }
    }

    fn resolve_particle_pairs(&mut self) {
        let restitution = self.params.restitution;
        let n = self.particles.len();
        for i in 0..n {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                resolve_particle_pair(a, b, restitution);
            }
        }
    }

    fn resolve_obstacles(&mut self) {
        let restitution = self.params.restitution;
        for particle in &mut self.particles {
            for obstacle in &self.obstacles {
                let center = self.bounds.to_world(obstacle.local_pos);
                resolve_particle_obstacle(particle, center, obstacle.radius, restitution);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::sim::state::{Hue, Particle, ParticleBox, WorldParams};

    fn still_world(particles: &[Vec2], radius: f32) -> ParticleBox {
        let params = WorldParams {
            gravity: 0.0,
            friction: 0.0,
            radius,
            box_scale: 1.0,
            ..Default::default()
        };
        let mut world = ParticleBox::with_params(1000.0, 1000.0, params, 1);
        world.particles = particles
            .iter()
            .map(|&pos| Particle {
                pos,
                vel: Vec2::ZERO,
                radius,
                color: Hue::default(),
            })
            .collect();
        world
    }

    #[test]
    fn test_gravity_accelerates_down() {
        let mut world = still_world(&[Vec2::new(500.0, 500.0)], 6.0);
        world.set_gravity(1200.0);
        world.step(1.0 / 60.0);
        let p = &world.particles()[0];
        assert!(p.vel.y > 0.0);
        assert!(p.pos.y > 500.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_dt_clamped_to_max() {
        let mut a = still_world(&[Vec2::new(500.0, 500.0)], 6.0);
        let mut b = a.clone();
        a.set_gravity(100.0);
        b.set_gravity(100.0);
        a.step(5.0);
        b.step(a.params().max_dt);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_friction_damps_velocity() {
        let mut world = still_world(&[Vec2::new(500.0, 500.0)], 6.0);
        world.particles[0].vel = Vec2::new(100.0, 0.0);
        world.set_friction(3.0);
        world.step(1.0 / 30.0);
        let vx = world.particles()[0].vel.x;
        assert!(vx < 100.0 && vx > 0.0);

        // Damping never flips direction, even with absurd friction
        world.set_friction(1.0e6);
        world.step(1.0 / 30.0);
        assert_eq!(world.particles()[0].vel.x, 0.0);
    }

    #[test]
    fn test_chain_penetration_non_increasing() {
        let mut world = still_world(
            &[
                Vec2::new(480.0, 500.0),
                Vec2::new(488.0, 500.0),
                Vec2::new(496.0, 500.0),
            ],
            6.0,
        );
        let initial = world.total_penetration();
        assert!(initial > 0.0);
        let mut last = initial;
        for _ in 0..world.params().solver_iterations {
            world.relax();
            let current = world.total_penetration();
            assert!(current <= last + 1e-4, "penetration grew: {last} -> {current}");
            last = current;
        }
        assert!(last < initial / 2.0);
    }

    #[test]
    fn test_coincident_particles_separate_along_x() {
        let mut world = still_world(&[Vec2::new(500.0, 500.0), Vec2::new(500.0, 500.0)], 6.0);
        world.relax();
        let (a, b) = (&world.particles()[0], &world.particles()[1]);
        assert!(a.pos.x < b.pos.x);
        assert_eq!(a.pos.y, b.pos.y);
    }

    #[test]
    fn test_particles_settle_inside_box() {
        let mut world = ParticleBox::new(800.0, 600.0, 9);
        world.add_balls(120);
        world.set_box_angle(0.4);
        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }
        let bounds = *world.box_geometry();
        let half = bounds.half_extents();
        for p in world.particles() {
            let local = bounds.to_local(p.pos);
            assert!(local.x.abs() <= half.x - p.radius + 1e-2);
            assert!(local.y.abs() <= half.y - p.radius + 1e-2);
            assert!(p.pos.is_finite() && p.vel.is_finite());
        }
    }

    #[test]
    fn test_obstacle_deflects_falling_particle() {
        let mut world = still_world(&[Vec2::new(500.0, 450.0)], 6.0);
        assert!(world.add_obstacle(Vec2::new(500.0, 500.0), 20.0));
        world.set_gravity(1200.0);
        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        let p = &world.particles()[0];
        let o = world.obstacles()[0].clone();
        let center = world.obstacle_world_position(&o);
        assert!(p.pos.distance(center) >= p.radius + o.radius - 1.0);
    }

    #[test]
    fn test_step_deterministic_for_seed() {
        let run = || {
            let mut world = ParticleBox::new(800.0, 600.0, 2024);
            world.add_balls(60);
            world.set_box_angle(-0.2);
            for i in 0..90 {
                world.step(1.0 / 60.0 + (i % 3) as f32 * 0.001);
            }
            world.particles().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_zero_sub_steps_treated_as_one() {
        let mut a = still_world(&[Vec2::new(500.0, 500.0)], 6.0);
        let mut b = a.clone();
        a.set_gravity(500.0);
        b.set_gravity(500.0);
        a.set_sub_steps(0);
        b.set_sub_steps(1);
        a.step(0.02);
        b.step(0.02);
        assert_eq!(a.particles(), b.particles());
    }
}

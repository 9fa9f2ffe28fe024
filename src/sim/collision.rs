//! Contact resolution for circles and the oriented box
//!
//! Each resolver nudges positions out of overlap (partially, minus a slop)
//! and then applies an impulse along the contact normal if the bodies are
//! still approaching. Particles have no mass field; all carry equal mass.

use glam::Vec2;

use super::geometry::BoxGeometry;
use super::state::Particle;
use crate::consts::{OBSTACLE_CORRECTION, PAIR_CORRECTION, SLOP};

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first center toward the second
    pub normal: Vec2,
    /// How far the circles overlap
    pub penetration: f32,
}

/// Check overlap between circles centered at `a` and `b`
///
/// Coincident centers get the normal +x (and a distance of 1) so the
/// resolvers always have a direction to push along.
pub fn circle_contact(a: Vec2, b: Vec2, min_dist: f32) -> Option<Contact> {
    let mut delta = b - a;
    let mut dist = delta.length();
    if dist == 0.0 {
        delta = Vec2::X;
        dist = 1.0;
    }

    if dist < min_dist {
        Some(Contact {
            normal: delta / dist,
            penetration: min_dist - dist,
        })
    } else {
        None
    }
}

/// Separate two overlapping particles and exchange an equal-mass impulse
///
/// Returns true if the pair was in contact.
pub fn resolve_particle_pair(a: &mut Particle, b: &mut Particle, restitution: f32) -> bool {
    let Some(contact) = circle_contact(a.pos, b.pos, a.radius + b.radius) else {
        return false;
    };
    let n = contact.normal;

    let correction = (contact.penetration - SLOP).max(0.0) / 2.0 * PAIR_CORRECTION;
    a.pos -= n * correction;
    b.pos += n * correction;

    let vel_along_normal = (b.vel - a.vel).dot(n);
    if vel_along_normal >= 0.0 {
        // Separating or resting: position fix only
        return true;
    }

    let impulse = -(1.0 + restitution) * vel_along_normal / 2.0;
    a.vel -= n * impulse;
    b.vel += n * impulse;
    true
}

/// Push a particle out of a static obstacle and reflect its approach velocity
///
/// The obstacle has infinite mass, so the particle takes the full impulse.
/// Returns true if the particle was in contact.
pub fn resolve_particle_obstacle(
    particle: &mut Particle,
    obstacle_pos: Vec2,
    obstacle_radius: f32,
    restitution: f32,
) -> bool {
    let Some(contact) = circle_contact(obstacle_pos, particle.pos, particle.radius + obstacle_radius)
    else {
        return false;
    };
    let n = contact.normal;

    particle.pos += n * ((contact.penetration - SLOP).max(0.0) * OBSTACLE_CORRECTION);

    let vel_along_normal = particle.vel.dot(n);
    if vel_along_normal < 0.0 {
        let impulse = -(1.0 + restitution) * vel_along_normal;
        particle.vel += n * impulse;
    }
    true
}

/// Clamp a particle inside the box, bouncing off each wall it crossed
///
/// All four walls are checked every call, so a corner hit corrects both axes.
pub fn resolve_box_collision(particle: &mut Particle, bounds: &BoxGeometry, restitution: f32) {
    let mut local_pos = bounds.to_local(particle.pos);
    let mut local_vel = bounds.rotate_to_local(particle.vel);
    let half = bounds.half_extents();
    let r = particle.radius;

    if local_pos.x - r < -half.x {
        local_pos.x = -half.x + r;
        local_vel.x *= -restitution;
    }
    if local_pos.x + r > half.x {
        local_pos.x = half.x - r;
        local_vel.x *= -restitution;
    }
    if local_pos.y - r < -half.y {
        local_pos.y = -half.y + r;
        local_vel.y *= -restitution;
    }
    if local_pos.y + r > half.y {
        local_pos.y = half.y - r;
        local_vel.y *= -restitution;
    }

    particle.pos = bounds.to_world(local_pos);
    particle.vel = bounds.rotate_to_world(local_vel);
}

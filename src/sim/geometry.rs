//! Oriented box geometry for the particle container
//!
//! The box is a rectangle centered in the viewport and rotated by `angle`.
//! Its local frame is centered on `center` and rotated by `-angle`, so the
//! box appears axis-aligned there:
//! - local -> world: rotate by `angle`, then translate by `center`
//! - world -> local: translate by `-center`, then rotate by `-angle`

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::VIEW_MARGIN;

/// The rotatable, resizable container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    /// World-space center (always the viewport midpoint)
    pub center: Vec2,
    /// Full width along the local x axis
    pub width: f32,
    /// Full height along the local y axis
    pub height: f32,
    /// Rotation (radians)
    pub angle: f32,
}

impl BoxGeometry {
    /// Derive the box for a viewport
    ///
    /// The candidate size is the margin-adjusted viewport area times `scale`.
    /// It is then shrunk uniformly until its rotated footprint fits that
    /// same available area.
    pub fn fit_viewport(view_width: f32, view_height: f32, scale: f32, angle: f32) -> Self {
        let available_width = (view_width - VIEW_MARGIN * 2.0).max(0.0);
        let available_height = (view_height - VIEW_MARGIN * 2.0).max(0.0);
        let width = available_width * scale;
        let height = available_height * scale;

        let (bound_width, bound_height) = rotated_extent(width, height, angle);
        let bound_width = if bound_width > 0.0 { bound_width } else { 1.0 };
        let bound_height = if bound_height > 0.0 { bound_height } else { 1.0 };

        let fit = 1.0_f32
            .min(available_width / bound_width)
            .min(available_height / bound_height);

        Self {
            center: Vec2::new(view_width / 2.0, view_height / 2.0),
            width: width * fit,
            height: height * fit,
            angle,
        }
    }

    /// Half width and half height
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Rotate a direction from world axes into box axes (no translation)
    #[inline]
    pub fn rotate_to_local(&self, v: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle).rotate(v)
    }

    /// Rotate a direction from box axes into world axes (no translation)
    #[inline]
    pub fn rotate_to_world(&self, v: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle).rotate(v)
    }

    /// World point -> box-local point
    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        self.rotate_to_local(world - self.center)
    }

    /// Box-local point -> world point
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.center + self.rotate_to_world(local)
    }

    /// Whether a local point stays inside the box after shrinking it by `inset`
    pub fn contains_inset(&self, local: Vec2, inset: f32) -> bool {
        let limit = self.half_extents() - Vec2::splat(inset);
        local.x.abs() <= limit.x && local.y.abs() <= limit.y
    }

    /// Size of the axis-aligned rectangle enclosing the rotated box
    pub fn rotated_bounds(&self) -> Vec2 {
        let (w, h) = rotated_extent(self.width, self.height, self.angle);
        Vec2::new(w, h)
    }

    /// World-space corners, counter-clockwise in local space
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.half_extents();
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|local| self.to_world(local))
    }
}

/// Axis-aligned extent of a `width` x `height` rectangle rotated by `angle`
fn rotated_extent(width: f32, height: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + height * sin, width * sin + height * cos)
}

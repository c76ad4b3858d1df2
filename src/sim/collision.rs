//! Axis-aligned bounding box overlap
//!
//! Every collision in the game reduces to one strict overlap test. Boxes that
//! merely touch do not collide, which is what lets a player stand exactly on
//! a ground top while walking across neighbouring ground tiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in level space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    pub fn new(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    pub fn from_edges(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Same box shifted by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Strict overlap on both axes; shared edges are not a collision
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when the box lies entirely beyond any one side of `bounds`
    pub fn is_outside(&self, bounds: &Aabb) -> bool {
        self.right() < bounds.left()
            || self.left() > bounds.right()
            || self.bottom() < bounds.top()
            || self.top() > bounds.bottom()
    }
}

/// Anything that exposes a collision box
pub trait Collidable {
    fn collision_box(&self) -> Aabb;
}

impl Collidable for Aabb {
    fn collision_box(&self) -> Aabb {
        *self
    }
}

/// Check whether two collidables overlap
#[inline]
pub fn check_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.collision_box().overlaps(&b.collision_box())
}

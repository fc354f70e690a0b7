//! Particle and pointer state

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A drifting point of the background field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    /// Draw radius
    pub size: f32,
    /// Repulsion strength multiplier
    pub density: f32,
    /// Spawn position (kept for anchoring, not read by the physics)
    pub base: Vec2,
}

impl Particle {
    /// Random particle inside `bounds`
    pub fn random(rng: &mut impl Rng, bounds: Vec2) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * bounds.x,
            rng.random::<f32>() * bounds.y,
        );
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 0.5,
                (rng.random::<f32>() - 0.5) * 0.5,
            ),
            size: rng.random::<f32>() * 2.0 + 1.0,
            density: rng.random::<f32>() * 30.0 + 1.0,
            base: pos,
        }
    }

    /// Integrate one frame, reflecting off the surface edges
    pub fn advance(&mut self, bounds: Vec2) {
        self.pos += self.vel;
        reflect_axis(&mut self.pos.x, &mut self.vel.x, bounds.x);
        reflect_axis(&mut self.pos.y, &mut self.vel.y, bounds.y);
    }

    /// Push away from `pointer` if within `radius`. Position-only impulse;
    /// velocity is untouched. Returns whether the particle moved.
    pub fn repel(&mut self, pointer: Vec2, radius: f32, bounds: Vec2) -> bool {
        let delta = pointer - self.pos;
        let distance = delta.length();
        if distance == 0.0 || distance >= radius {
            return false;
        }
        let force = (radius - distance) / radius;
        self.pos -= delta / distance * force * self.density;
        self.pos = self.pos.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO));
        true
    }
}

/// Flip the velocity component at an edge and pin the position onto it
#[inline]
fn reflect_axis(pos: &mut f32, vel: &mut f32, max: f32) {
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = -*vel;
    } else if *pos > max {
        *pos = max.max(0.0);
        *vel = -*vel;
    }
}

/// Last known pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// `None` once the pointer left the viewport
    pub pos: Option<Vec2>,
    pub radius: f32,
}

impl Pointer {
    pub fn new(radius: f32) -> Self {
        Self { pos: None, radius }
    }
}

//! Particle field simulation
//!
//! Physics is pure and seeded; only `animator` touches the scheduler:
//! - Positions in CSS pixels, velocities in pixels per frame
//! - Edge reflection keeps every particle on the surface
//! - Pointer repulsion is a position impulse, never a velocity change

pub mod animator;
pub mod field;
pub mod particle;

pub use animator::{FieldAnimator, RunState};
pub use field::ParticleField;
pub use particle::{Particle, Pointer};

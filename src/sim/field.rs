//! Particle field: a fixed-size set of drifting points with pointer repulsion
//!
//! The field is pure state; drawing goes through a `Painter` and frame pacing
//! is owned by `FieldAnimator`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particle::{Particle, Pointer};
use crate::consts::{CONNECTION_ALPHA, PARTICLE_ALPHA, PARTICLE_RGB};
use crate::platform::Viewport;
use crate::renderer::{Painter, Rgba, buffer_size};
use crate::settings::{DeviceTier, Settings};

const PARTICLE_COLOR: Rgba = Rgba::new(PARTICLE_RGB.0, PARTICLE_RGB.1, PARTICLE_RGB.2, PARTICLE_ALPHA);

pub struct ParticleField {
    particles: Vec<Particle>,
    /// Surface size in CSS pixels
    bounds: Vec2,
    dpr: f32,
    tier: DeviceTier,
    count: usize,
    pointer: Pointer,
    /// Max connection distance, `None` when connections are off
    connect_distance: Option<f32>,
    rng: Pcg32,
    /// Steps since the last regeneration
    steps: u64,
}

impl ParticleField {
    pub fn new(settings: &Settings, tier: DeviceTier, viewport: Viewport, seed: u64) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            dpr: 1.0,
            tier,
            count: settings.particle_count(tier),
            pointer: Pointer::new(settings.pointer_radius),
            connect_distance: settings.connections(tier),
            rng: Pcg32::seed_from_u64(seed),
            steps: 0,
        };
        field.resize(viewport);
        log::info!(
            "Particle field: {} particles ({} tier)",
            field.count,
            tier.as_str()
        );
        field
    }

    /// Adopt a new viewport and regenerate every particle
    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = Vec2::new(viewport.width as f32, viewport.height as f32).max(Vec2::ZERO);
        self.dpr = viewport.dpr as f32;
        self.regenerate();
    }

    /// Throw away all particles and spawn a fresh set
    pub fn regenerate(&mut self) {
        let bounds = self.bounds;
        let rng = &mut self.rng;
        self.particles = (0..self.count)
            .map(|_| Particle::random(rng, bounds))
            .collect();
        self.steps = 0;
    }

    /// Update pointer position (ignored on touch tiers)
    pub fn set_pointer(&mut self, pos: Option<Vec2>) {
        if self.tier.pointer_interaction() {
            self.pointer.pos = pos;
        }
    }

    /// Advance physics by one frame
    pub fn step(&mut self) {
        let bounds = self.bounds;
        let pointer = self.pointer.pos.filter(|_| self.tier.pointer_interaction());
        let radius = self.pointer.radius;

        for particle in &mut self.particles {
            particle.advance(bounds);
            if let Some(pointer) = pointer {
                particle.repel(pointer, radius, bounds);
            }
        }
        self.steps += 1;
    }

    /// Draw particles at their current positions
    pub fn render(&self, painter: &mut impl Painter) {
        painter.clear(self.bounds.x, self.bounds.y);
        for particle in &self.particles {
            painter.fill_circle(particle.pos, particle.size, PARTICLE_COLOR);
        }
    }

    /// Lines between particle pairs closer than the connection distance
    pub fn render_connections(&self, painter: &mut impl Painter) {
        let Some(max) = self.connect_distance else {
            return;
        };
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.pos.distance(b.pos);
                if distance < max {
                    let alpha = (1.0 - distance / max) * CONNECTION_ALPHA;
                    painter.stroke_line(a.pos, b.pos, 1.0, PARTICLE_COLOR.with_alpha(alpha));
                }
            }
        }
    }

    /// One animation frame: draw, move, then connect the moved particles
    pub fn frame(&mut self, painter: &mut impl Painter) {
        self.render(painter);
        self.step();
        self.render_connections(painter);
    }

    /// Size the painter's buffer for the current surface
    pub fn configure(&self, painter: &mut impl Painter) {
        painter.configure(self.bounds.x, self.bounds.y, self.dpr);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Device-pixel buffer size
    pub fn buffer_size(&self) -> (u32, u32) {
        buffer_size(self.bounds.x, self.bounds.y, self.dpr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{PaintOp, RecordingPainter};
    use proptest::prelude::*;

    fn field(tier: DeviceTier, width: f64, height: f64) -> ParticleField {
        ParticleField::new(
            &Settings::default(),
            tier,
            Viewport::new(width, height, 2.0),
            42,
        )
    }

    #[test]
    fn test_counts_per_tier() {
        assert_eq!(field(DeviceTier::Desktop, 1280.0, 800.0).particles().len(), 80);
        assert_eq!(field(DeviceTier::Mobile, 390.0, 844.0).particles().len(), 40);
    }

    #[test]
    fn test_spawn_ranges() {
        let f = field(DeviceTier::Desktop, 1280.0, 800.0);
        for p in f.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x <= 1280.0);
            assert!(p.pos.y >= 0.0 && p.pos.y <= 800.0);
            assert!(p.vel.x.abs() <= 0.25 && p.vel.y.abs() <= 0.25);
            assert!((1.0..3.0).contains(&p.size));
            assert!((1.0..31.0).contains(&p.density));
            assert_eq!(p.base, p.pos);
        }
    }

    #[test]
    fn test_resize_regenerates() {
        let mut f = field(DeviceTier::Desktop, 1280.0, 800.0);
        let before = f.particles().to_vec();
        f.step();
        f.resize(Viewport::new(640.0, 480.0, 1.5));

        assert_eq!(f.steps(), 0);
        assert_eq!(f.bounds(), Vec2::new(640.0, 480.0));
        assert_eq!(f.buffer_size(), (960, 720));
        assert_eq!(f.particles().len(), before.len());
        assert_ne!(f.particles(), &before[..]);
        assert!(f.particles().iter().all(|p| p.pos.x <= 640.0 && p.pos.y <= 480.0));
    }

    #[test]
    fn test_pointer_ignored_on_mobile() {
        let mut f = field(DeviceTier::Mobile, 390.0, 844.0);
        f.set_pointer(Some(Vec2::new(100.0, 100.0)));
        assert_eq!(f.pointer().pos, None);
    }

    #[test]
    fn test_pointer_parts_particles() {
        let mut f = field(DeviceTier::Desktop, 1280.0, 800.0);
        let pointer = Vec2::new(640.0, 400.0);
        f.set_pointer(Some(pointer));

        // Park a ring of still particles around the pointer
        let offsets = [10.0, 40.0, 80.0, 120.0, 149.0];
        for (i, d) in offsets.iter().enumerate() {
            let p = &mut f.particles[i];
            p.pos = pointer + Vec2::new(*d, 0.0);
            p.vel = Vec2::ZERO;
        }
        let far = pointer + Vec2::new(0.0, 200.0);
        f.particles[5].pos = far;
        f.particles[5].vel = Vec2::ZERO;
        let velocities: Vec<Vec2> = f.particles().iter().map(|p| p.vel).collect();

        f.step();

        for (i, d) in offsets.iter().enumerate() {
            let p = f.particles()[i];
            let after = p.pos.distance(pointer);
            let expected = d + (1.0 - d / 150.0) * p.density;
            assert!((after - expected).abs() < 1e-3, "particle {} at {}", i, after);
        }
        assert_eq!(f.particles()[5].pos, far);
        // Impulse never touches velocity (reflection aside)
        for (p, v) in f.particles().iter().zip(velocities) {
            assert_eq!(p.vel.abs(), v.abs());
        }
    }

    #[test]
    fn test_frame_draws_every_particle() {
        let mut f = field(DeviceTier::Desktop, 800.0, 600.0);
        let mut painter = RecordingPainter::new();
        let drawn_at: Vec<Vec2> = f.particles().iter().map(|p| p.pos).collect();

        f.frame(&mut painter);

        assert_eq!(painter.ops[0], PaintOp::Clear { width: 800.0, height: 600.0 });
        assert_eq!(painter.circles(), 80);
        assert_eq!(painter.lines(), 0);
        // Drawn before the move
        if let PaintOp::Circle { center, .. } = painter.ops[1] {
            assert_eq!(center, drawn_at[0]);
        }
        assert_eq!(f.steps(), 1);
    }

    #[test]
    fn test_connections_when_enabled() {
        let settings = Settings {
            connect_particles: true,
            ..Default::default()
        };
        let mut f = ParticleField::new(
            &settings,
            DeviceTier::Desktop,
            Viewport::new(200.0, 200.0, 1.0),
            7,
        );
        let mut painter = RecordingPainter::new();
        f.frame(&mut painter);
        // 80 particles in a 200x200 box: plenty of close pairs
        assert!(painter.lines() > 0);
        for op in &painter.ops {
            if let PaintOp::Line { color, .. } = op {
                assert!(color.a > 0.0 && color.a <= CONNECTION_ALPHA);
            }
        }
    }

    #[test]
    fn test_configure_painter() {
        let f = field(DeviceTier::Desktop, 1280.0, 720.0);
        let mut painter = RecordingPainter::new();
        f.configure(&mut painter);
        assert_eq!(painter.buffer, (2560, 1440));
        assert_eq!(painter.scale, 2.0);
    }

    proptest! {
        #[test]
        fn prop_particles_stay_in_bounds(
            seed in any::<u64>(),
            width in 1.0f64..2000.0,
            height in 1.0f64..2000.0,
            steps in 1usize..500,
        ) {
            let mut f = ParticleField::new(
                &Settings::default(),
                DeviceTier::Desktop,
                Viewport::new(width, height, 1.0),
                seed,
            );
            for _ in 0..steps {
                f.step();
            }
            let bounds = f.bounds();
            for p in f.particles() {
                prop_assert!(p.pos.x >= 0.0 && p.pos.x <= bounds.x);
                prop_assert!(p.pos.y >= 0.0 && p.pos.y <= bounds.y);
            }
        }
    }
}

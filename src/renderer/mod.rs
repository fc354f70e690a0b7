//! 2D drawing surface
//!
//! The particle field draws through `Painter`. In the browser that is a
//! `CanvasRenderingContext2d`; natively and in tests, `RecordingPainter`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;

use glam::Vec2;

/// Straight RGBA colour, alpha in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Drawing commands issued by the particle field (CSS pixel coordinates)
pub trait Painter {
    /// Size the backing buffer for a viewport and scale drawing by `dpr`
    fn configure(&mut self, width: f32, height: f32, dpr: f32);
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Rgba);
}

/// A recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Clear { width: f32, height: f32 },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba },
}

/// Keeps the commands of the current frame (a `clear` starts a new one)
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub ops: Vec<PaintOp>,
    /// Number of frames started
    pub frames: u64,
    /// Backing buffer size in device pixels, from the last `configure`
    pub buffer: (u32, u32),
    pub scale: f32,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Circle { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Line { .. }))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn configure(&mut self, width: f32, height: f32, dpr: f32) {
        self.buffer = buffer_size(width, height, dpr);
        self.scale = dpr;
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ops.clear();
        self.frames += 1;
        self.ops.push(PaintOp::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(PaintOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, _line_width: f32, color: Rgba) {
        self.ops.push(PaintOp::Line { from, to, color });
    }
}

/// Device-pixel buffer size for a CSS-pixel surface
#[inline]
pub fn buffer_size(width: f32, height: f32, dpr: f32) -> (u32, u32) {
    ((width * dpr).floor() as u32, (height * dpr).floor() as u32)
}

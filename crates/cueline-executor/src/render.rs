use std::f64::consts::TAU;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use cueline_core::{Color, LineSegment, Vector2};

/// Number of straight pieces a circle is drawn with.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Draws the overlay.
///
/// Coordinates passed in are in the reference frame; mapping them onto the device is
/// up to the implementation.
pub trait LineRenderer: Send {
    /// Start a new frame, discarding everything drawn before.
    fn clear(&mut self);

    fn draw_line(&mut self, segment: &LineSegment, color: Color);

    fn draw_circle(&mut self, center: Vector2, radius: f64, color: Color);

    /// Show the frame.
    fn present(&mut self) -> Result<()>;
}

/// Vertex layout uploaded to the GPU: position in normalized device coordinates,
/// then RGBA. 6 floats = 24 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4],
}

impl LineVertex {
    pub const STRIDE_BYTES: usize = 6 * 4;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every two vertices form a line.
    LineList,
    /// Consecutive vertices are connected.
    LineStrip,
}

/// One draw call worth of vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub topology: Topology,
    pub vertices: Vec<LineVertex>,
}

impl DrawBatch {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Map a point of a `width` x `height` viewport to normalized device coordinates,
/// with the y axis pointing up.
pub fn to_ndc(p: Vector2, width: f64, height: f64) -> [f32; 2] {
    [
        (p.x / width * 2.0 - 1.0) as f32,
        (1.0 - p.y / height * 2.0) as f32,
    ]
}

/// Collects the vertex batches of a frame, ready for upload to a GPU line pipeline.
pub struct NdcLineBuffer {
    width: f64,
    height: f64,
    pending: Vec<DrawBatch>,
    presented: Vec<DrawBatch>,
    frames_presented: u64,
}

impl NdcLineBuffer {
    /// Create a buffer for a `width` x `height` viewport, in the same units as the
    /// coordinates that will be drawn.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pending: Vec::new(),
            presented: Vec::new(),
            frames_presented: 0,
        }
    }

    fn vertex(&self, p: Vector2, color: Color) -> LineVertex {
        let [x, y] = to_ndc(p, self.width, self.height);
        LineVertex {
            x,
            y,
            color: color.to_array(),
        }
    }

    /// Batches of the last presented frame.
    pub fn presented(&self) -> &[DrawBatch] {
        &self.presented
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl LineRenderer for NdcLineBuffer {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_line(&mut self, segment: &LineSegment, color: Color) {
        let vertices = vec![
            self.vertex(segment.start, color),
            self.vertex(segment.end, color),
        ];
        self.pending.push(DrawBatch {
            topology: Topology::LineList,
            vertices,
        });
    }

    fn draw_circle(&mut self, center: Vector2, radius: f64, color: Color) {
        let vertices = (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let theta = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
                let p = center + radius * Vector2::new(theta.cos(), theta.sin());
                self.vertex(p, color)
            })
            .collect();
        self.pending.push(DrawBatch {
            topology: Topology::LineStrip,
            vertices,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.presented = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
        Ok(())
    }
}

/// Writes every presented frame to the log instead of a screen.
#[derive(Default)]
pub struct LogRenderer {
    lines: Vec<LineSegment>,
    circles: usize,
    frame: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineRenderer for LogRenderer {
    fn clear(&mut self) {
        self.lines.clear();
        self.circles = 0;
    }

    fn draw_line(&mut self, segment: &LineSegment, _color: Color) {
        self.lines.push(*segment);
    }

    fn draw_circle(&mut self, _center: Vector2, _radius: f64, _color: Color) {
        self.circles += 1;
    }

    fn present(&mut self) -> Result<()> {
        self.frame += 1;
        log::debug!(
            "Frame {}: {} lines, {} circles",
            self.frame,
            self.lines.len(),
            self.circles
        );
        for (idx, line) in self.lines.iter().enumerate() {
            log::trace!(
                "  line {}: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                idx,
                line.start.x,
                line.start.y,
                line.end.x,
                line.end.y
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_to_ndc_corners() {
        assert_eq!(to_ndc(Vector2::new(0.0, 0.0), 1920.0, 1080.0), [-1.0, 1.0]);
        assert_eq!(to_ndc(Vector2::new(1920.0, 1080.0), 1920.0, 1080.0), [1.0, -1.0]);
        assert_eq!(to_ndc(Vector2::new(960.0, 540.0), 1920.0, 1080.0), [0.0, 0.0]);
    }

    #[test]
    fn test_line_batches() {
        let mut buffer = NdcLineBuffer::new(100.0, 100.0);
        buffer.clear();
        buffer.draw_line(
            &LineSegment::new(Vector2::new(0.0, 0.0), Vector2::new(50.0, 100.0)),
            Color::RED,
        );
        assert!(buffer.presented().is_empty());
        buffer.present().unwrap();

        let batches = buffer.presented();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].topology, Topology::LineList);
        assert_eq!(batches[0].vertices[0].x, -1.0);
        assert_eq!(batches[0].vertices[0].y, 1.0);
        assert_eq!(batches[0].vertices[1].x, 0.0);
        assert_eq!(batches[0].vertices[1].y, -1.0);
        assert_eq!(batches[0].vertices[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(batches[0].as_bytes().len(), 2 * LineVertex::STRIDE_BYTES);
        assert_eq!(buffer.frames_presented(), 1);
    }

    #[test]
    fn test_circle_is_closed_strip() {
        let mut buffer = NdcLineBuffer::new(200.0, 200.0);
        buffer.draw_circle(Vector2::new(100.0, 100.0), 50.0, Color::WHITE);
        buffer.present().unwrap();

        let batch = &buffer.presented()[0];
        assert_eq!(batch.topology, Topology::LineStrip);
        assert_eq!(batch.vertices.len(), CIRCLE_SEGMENTS + 1);
        let first = batch.vertices[0];
        let last = batch.vertices[CIRCLE_SEGMENTS];
        assert_abs_diff_eq!(first.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(first.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(last.x, first.x, epsilon = 1e-6);
        assert_abs_diff_eq!(last.y, first.y, epsilon = 1e-6);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut buffer = NdcLineBuffer::new(100.0, 100.0);
        buffer.draw_line(
            &LineSegment::new(Vector2::zeros(), Vector2::new(1.0, 1.0)),
            Color::RED,
        );
        buffer.clear();
        buffer.present().unwrap();
        assert!(buffer.presented().is_empty());
    }
}

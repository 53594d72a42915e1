use std::f64::consts::TAU;

use anyhow::Result;
use cueline_core::{Detection, ObjectClass, Rect, Vector2};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    detector::Detector,
    source::{Frame, FrameSource},
};

const TABLE: Rect = Rect {
    x: 100.0,
    y: 80.0,
    width: 1080.0,
    height: 560.0,
};
const BALL_RADIUS: f64 = 12.0;
const POCKET_RADIUS: f64 = 20.0;
const ORBIT_RADIUS: f64 = 220.0;
/// Orbit angle advanced per frame, in radians
const ORBIT_STEP: f64 = TAU / 240.0;
/// Maximum position noise, in pixels
const JITTER: f64 = 0.75;

/// Blank frames of a fixed size, for running the loop without a game window.
pub struct MockSource {
    width: u32,
    height: u32,
    remaining: Option<u64>,
}

impl MockSource {
    /// Create a source of `width` x `height` frames. With `max_frames` set, the source
    /// is exhausted after that many frames.
    pub fn new(width: u32, height: u32, max_frames: Option<u64>) -> Self {
        Self {
            width,
            height,
            remaining: max_frames,
        }
    }
}

impl FrameSource for MockSource {
    fn name(&self) -> String {
        format!("Mock ({}x{})", self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        Ok(Some(Frame::blank(self.width, self.height)))
    }
}

/// A synthetic 1280x720 table where the cue ball circles the target ball.
///
/// Detections are rescaled to the size of the incoming frame and carry a little
/// seeded noise, like a real model would.
pub struct MockDetector {
    frame_count: u64,
    rng: StdRng,
}

impl MockDetector {
    pub const WIDTH: f64 = 1280.0;
    pub const HEIGHT: f64 = 720.0;

    pub fn new(seed: u64) -> Self {
        Self {
            frame_count: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pockets() -> [Vector2; 6] {
        let Rect {
            x,
            y,
            width,
            height,
        } = TABLE;
        [
            Vector2::new(x, y),
            Vector2::new(x + width / 2.0, y),
            Vector2::new(x + width, y),
            Vector2::new(x, y + height),
            Vector2::new(x + width / 2.0, y + height),
            Vector2::new(x + width, y + height),
        ]
    }

    fn circle(&mut self, center: Vector2, radius: f64, class: ObjectClass) -> Detection {
        let cx = center.x + self.rng.gen_range(-JITTER..=JITTER);
        let cy = center.y + self.rng.gen_range(-JITTER..=JITTER);
        let confidence = self.rng.gen_range(0.6..1.0);
        Detection::new(
            Rect::new(cx - radius, cy - radius, 2.0 * radius, 2.0 * radius),
            class,
            confidence,
        )
    }
}

impl Detector for MockDetector {
    fn name(&self) -> String {
        "Mock".to_string()
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        self.frame_count += 1;

        let target = TABLE.center() + Vector2::new(150.0, 0.0);
        let angle = self.frame_count as f64 * ORBIT_STEP;
        let cue = target + ORBIT_RADIUS * Vector2::new(angle.cos(), angle.sin());

        let mut detections = vec![Detection::new(TABLE, ObjectClass::PlayArea, 0.95)];
        for pocket in Self::pockets() {
            detections.push(self.circle(pocket, POCKET_RADIUS, ObjectClass::Hole));
        }
        detections.push(self.circle(target, BALL_RADIUS, ObjectClass::Ball));
        detections.push(self.circle(cue, BALL_RADIUS, ObjectClass::White));

        let sx = frame.width as f64 / Self::WIDTH;
        let sy = frame.height as f64 / Self::HEIGHT;
        for det in detections.iter_mut() {
            det.bbox = Rect::new(
                det.bbox.x * sx,
                det.bbox.y * sy,
                det.bbox.width * sx,
                det.bbox.height * sy,
            );
        }
        Ok(detections)
    }
}

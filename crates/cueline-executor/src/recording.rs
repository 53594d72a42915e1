use std::{collections::VecDeque, fs, path::Path};

use anyhow::{Context, Result};
use cueline_core::Detection;
use serde::{Deserialize, Serialize};

use crate::{
    detector::Detector,
    source::{Frame, FrameSource},
};

/// Detections of one captured frame, as stored in a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Capture width in pixels
    pub width: u32,
    /// Capture height in pixels
    pub height: u32,
    /// Detections in capture pixels
    pub detections: Vec<Detection>,
}

/// A sequence of recorded frames that can be replayed through the frame loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recording {}", path.display()))
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write recording {}", path.display()))
    }

    /// Split the recording into a frame source and a detector that replay it in
    /// lockstep.
    pub fn into_parts(self) -> (ReplaySource, RecordedDetector) {
        let mut sizes = VecDeque::with_capacity(self.frames.len());
        let mut detections = VecDeque::with_capacity(self.frames.len());
        for frame in self.frames {
            sizes.push_back((frame.width, frame.height));
            detections.push_back(frame.detections);
        }
        (ReplaySource { sizes }, RecordedDetector { detections })
    }
}

/// Produces blank frames with the recorded capture sizes.
pub struct ReplaySource {
    sizes: VecDeque<(u32, u32)>,
}

impl FrameSource for ReplaySource {
    fn name(&self) -> String {
        "Replay".to_string()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self
            .sizes
            .pop_front()
            .map(|(width, height)| Frame::blank(width, height)))
    }
}

/// Hands out the recorded detections, one frame at a time.
pub struct RecordedDetector {
    detections: VecDeque<Vec<Detection>>,
}

impl Detector for RecordedDetector {
    fn name(&self) -> String {
        "Recorded".to_string()
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        self.detections
            .pop_front()
            .context("Recording has no detections left")
    }
}

use anyhow::Result;
use image::RgbImage;

/// A single captured frame.
///
/// Sources that replay pre-computed detections have no pixels to hand out and
/// produce frames with only their dimensions.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub image: Option<RgbImage>,
}

impl Frame {
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image: Some(image),
        }
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            image: None,
        }
    }
}

/// Supplies captured frames to the frame loop.
pub trait FrameSource: Send {
    /// Human readable name, for logs.
    fn name(&self) -> String;

    /// Capture the next frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted. An error means this frame
    /// could not be captured (eg. the game window is gone); the loop skips it and
    /// tries again on the next tick.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

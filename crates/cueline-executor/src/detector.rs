use anyhow::{bail, Context, Result};
use cueline_core::{Detection, DetectorSettings, Rect};
use image::imageops::{self, FilterType};

use crate::source::Frame;

/// Number of floats per detection row in the model output: x, y, w, h, confidence,
/// class.
pub const OUTPUT_ROW_LEN: usize = 6;

/// Turns frames into detections.
pub trait Detector: Send {
    fn name(&self) -> String;

    /// Detect objects in the frame. Boxes are in the frame's pixel space and already
    /// filtered by confidence.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Runs the detection model on a prepared input tensor.
pub trait InferenceBackend: Send {
    /// Run the model on an NCHW tensor and return the flat output tensor.
    fn run(&mut self, input: &[f32], shape: [usize; 4]) -> Result<Vec<f32>>;
}

/// Resize a frame to the model input size and lay it out as a normalized NCHW RGB
/// tensor.
pub fn preprocess(frame: &Frame, input_width: u32, input_height: u32) -> Result<Vec<f32>> {
    let Some(image) = frame.image.as_ref() else {
        bail!("Frame has no pixel data");
    };
    let resized = imageops::resize(image, input_width, input_height, FilterType::Triangle);

    let plane = (input_width * input_height) as usize;
    let mut tensor = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let idx = (y * input_width + x) as usize;
        for c in 0..3 {
            tensor[c * plane + idx] = pixel[c] as f32 / 255.0;
        }
    }
    Ok(tensor)
}

/// Decode the raw model output into detections.
///
/// Rows whose confidence is not strictly above `threshold` are dropped. Box values
/// are truncated to whole pixels. A trailing partial row is ignored.
pub fn decode_detections(output: &[f32], threshold: f32) -> Vec<Detection> {
    output
        .chunks_exact(OUTPUT_ROW_LEN)
        .filter(|row| row[4] > threshold)
        .map(|row| Detection {
            bbox: Rect::new(
                row[0].trunc() as f64,
                row[1].trunc() as f64,
                row[2].trunc() as f64,
                row[3].trunc() as f64,
            ),
            class_id: row[5] as i32,
            confidence: row[4],
        })
        .collect()
}

/// A [`Detector`] that runs a model through an [`InferenceBackend`].
pub struct TensorDetector {
    backend: Box<dyn InferenceBackend>,
    settings: DetectorSettings,
}

impl TensorDetector {
    pub fn new(backend: Box<dyn InferenceBackend>, settings: DetectorSettings) -> Self {
        Self { backend, settings }
    }
}

impl Detector for TensorDetector {
    fn name(&self) -> String {
        format!(
            "Tensor detector ({}x{})",
            self.settings.input_width, self.settings.input_height
        )
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let DetectorSettings {
            confidence_threshold,
            input_width,
            input_height,
        } = self.settings.clone();

        let input = preprocess(frame, input_width, input_height)?;
        let output = self
            .backend
            .run(
                &input,
                [1, 3, input_height as usize, input_width as usize],
            )
            .context("Failed to run detection model")?;

        // Boxes come out in model input pixels
        let sx = frame.width as f64 / input_width as f64;
        let sy = frame.height as f64 / input_height as f64;
        let detections = decode_detections(&output, confidence_threshold)
            .into_iter()
            .map(|mut det| {
                det.bbox = Rect::new(
                    det.bbox.x * sx,
                    det.bbox.y * sy,
                    det.bbox.width * sx,
                    det.bbox.height * sy,
                );
                det
            })
            .collect();
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cueline_core::ObjectClass;
    use image::{Rgb, RgbImage};

    struct FixedBackend {
        output: Vec<f32>,
    }

    impl InferenceBackend for FixedBackend {
        fn run(&mut self, input: &[f32], shape: [usize; 4]) -> Result<Vec<f32>> {
            assert_eq!(input.len(), shape.iter().product::<usize>());
            Ok(self.output.clone())
        }
    }

    struct FailingBackend;

    impl InferenceBackend for FailingBackend {
        fn run(&mut self, _input: &[f32], _shape: [usize; 4]) -> Result<Vec<f32>> {
            bail!("session lost")
        }
    }

    #[test]
    fn test_decode_threshold_is_exclusive() {
        let output = [
            10.0, 20.0, 30.0, 40.0, 0.9, 6.0, //
            1.0, 2.0, 3.0, 4.0, 0.4, 0.0, //
            5.0, 6.0, 7.0, 8.0, 0.41, 3.0,
        ];
        let dets = decode_detections(&output, 0.4);
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].class(), ObjectClass::White);
        assert_eq!(dets[1].class(), ObjectClass::Hole);
        assert_eq!(dets[1].confidence, 0.41);
    }

    #[test]
    fn test_decode_truncates_boxes() {
        let output = [10.9, 20.5, 30.99, 40.1, 0.8, 4.0];
        let dets = decode_detections(&output, 0.4);
        assert_eq!(dets[0].bbox, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(dets[0].class(), ObjectClass::PlayArea);
    }

    #[test]
    fn test_decode_ignores_partial_row() {
        let output = [10.0, 20.0, 30.0, 40.0, 0.9, 0.0, 1.0, 2.0];
        assert_eq!(decode_detections(&output, 0.4).len(), 1);
        assert!(decode_detections(&[], 0.4).is_empty());
    }

    #[test]
    fn test_preprocess_layout() {
        let mut image = RgbImage::new(4, 4);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([255, 0, 51]);
        }
        let tensor = preprocess(&Frame::from_image(image), 2, 2).unwrap();

        assert_eq!(tensor.len(), 3 * 2 * 2);
        assert!(tensor[0..4].iter().all(|v| (*v - 1.0).abs() < 1e-6));
        assert!(tensor[4..8].iter().all(|v| v.abs() < 1e-6));
        assert!(tensor[8..12].iter().all(|v| (*v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_preprocess_requires_pixels() {
        assert!(preprocess(&Frame::blank(10, 10), 2, 2).is_err());
    }

    #[test]
    fn test_tensor_detector_maps_to_frame_pixels() {
        let backend = FixedBackend {
            output: vec![
                64.0, 32.0, 16.0, 16.0, 0.95, 6.0, //
                0.0, 0.0, 8.0, 8.0, 0.1, 0.0,
            ],
        };
        let settings = DetectorSettings {
            confidence_threshold: 0.4,
            input_width: 128,
            input_height: 64,
        };
        let mut detector = TensorDetector::new(Box::new(backend), settings);

        let frame = Frame::from_image(RgbImage::new(256, 256));
        let dets = detector.detect(&frame).unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].bbox, Rect::new(128.0, 128.0, 32.0, 64.0));
    }

    #[test]
    fn test_tensor_detector_propagates_backend_error() {
        let mut detector =
            TensorDetector::new(Box::new(FailingBackend), DetectorSettings::default());
        let frame = Frame::from_image(RgbImage::new(32, 32));
        let err = detector.detect(&frame).unwrap_err();
        assert!(format!("{:#}", err).contains("session lost"));
    }
}

use serde::{Deserialize, Serialize};

use crate::{Rect, Vector2};

/// The classes the detection model is trained on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// An object ball
    Ball,
    Force,
    Guideline,
    /// A pocket
    Hole,
    /// The playable area of the table
    PlayArea,
    Spin,
    /// The cue ball
    White,
    Unknown,
}

impl ObjectClass {
    pub fn id(self) -> i32 {
        match self {
            ObjectClass::Ball => 0,
            ObjectClass::Force => 1,
            ObjectClass::Guideline => 2,
            ObjectClass::Hole => 3,
            ObjectClass::PlayArea => 4,
            ObjectClass::Spin => 5,
            ObjectClass::White => 6,
            ObjectClass::Unknown => 7,
        }
    }
}

impl From<i32> for ObjectClass {
    fn from(id: i32) -> Self {
        match id {
            0 => ObjectClass::Ball,
            1 => ObjectClass::Force,
            2 => ObjectClass::Guideline,
            3 => ObjectClass::Hole,
            4 => ObjectClass::PlayArea,
            5 => ObjectClass::Spin,
            6 => ObjectClass::White,
            _ => ObjectClass::Unknown,
        }
    }
}

/// A single box reported by the detection model, in capture pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: Rect,
    pub class_id: i32,
    /// Confidence in `[0, 1]`. Already thresholded by the detector.
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Rect, class: ObjectClass, confidence: f32) -> Self {
        Self {
            bbox,
            class_id: class.id(),
            confidence,
        }
    }

    pub fn class(&self) -> ObjectClass {
        ObjectClass::from(self.class_id)
    }

    pub fn center(&self) -> Vector2 {
        self.bbox.center()
    }

    /// Radius of the circle inscribed in the box.
    pub fn radius(&self) -> f64 {
        self.bbox.width.min(self.bbox.height) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids() {
        for id in 0..8 {
            assert_eq!(ObjectClass::from(id).id(), id);
        }
        assert_eq!(ObjectClass::from(6), ObjectClass::White);
        assert_eq!(ObjectClass::from(42), ObjectClass::Unknown);
        assert_eq!(ObjectClass::from(-1), ObjectClass::Unknown);
    }

    #[test]
    fn test_detection_circle() {
        let det = Detection::new(Rect::new(10.0, 20.0, 30.0, 40.0), ObjectClass::Ball, 0.9);
        assert_eq!(det.center(), Vector2::new(25.0, 40.0));
        assert_eq!(det.radius(), 15.0);
        assert_eq!(det.class(), ObjectClass::Ball);
    }
}

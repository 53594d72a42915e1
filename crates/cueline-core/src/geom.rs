use serde::{Deserialize, Serialize};

use crate::Vector2;

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One edge of a [`Rect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub p1: Vector2,
    pub p2: Vector2,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The four edges in the fixed order top, bottom, left, right.
    ///
    /// Intersection tests walk the edges in this order and stop at the first hit, so
    /// the order decides which edge wins when a segment passes through a corner.
    pub fn edges(&self) -> [Edge; 4] {
        let left = self.x;
        let right = self.x + self.width;
        let top = self.y;
        let bottom = self.y + self.height;
        [
            Edge {
                p1: Vector2::new(left, top),
                p2: Vector2::new(right, top),
            },
            Edge {
                p1: Vector2::new(left, bottom),
                p2: Vector2::new(right, bottom),
            },
            Edge {
                p1: Vector2::new(left, top),
                p2: Vector2::new(left, bottom),
            },
            Edge {
                p1: Vector2::new(right, top),
                p2: Vector2::new(right, bottom),
            },
        ]
    }
}

/// What a ball is used for in the shot.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BallRole {
    Cue,
    Target,
    #[default]
    Other,
}

/// A ball detected in a single frame.
///
/// `Ball::default()` (zero center, zero radius, [`BallRole::Other`]) stands for a
/// ball that was not detected. The geometry functions accept it like any other ball.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Ball {
    /// Center of the ball, in reference frame pixels
    pub center: Vector2,
    /// Radius of the ball, in reference frame pixels. Never negative.
    pub radius: f64,
    pub role: BallRole,
}

impl Ball {
    pub fn new(center: Vector2, radius: f64, role: BallRole) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            role,
        }
    }

    pub fn cue(x: f64, y: f64, radius: f64) -> Self {
        Self::new(Vector2::new(x, y), radius, BallRole::Cue)
    }

    pub fn target(x: f64, y: f64, radius: f64) -> Self {
        Self::new(Vector2::new(x, y), radius, BallRole::Target)
    }
}

/// The table as seen in a single frame.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Playable area
    pub bounds: Rect,
    /// Pocket centers, in detection order
    pub pockets: Vec<Vector2>,
}

impl Table {
    pub fn new(bounds: Rect, pockets: Vec<Vector2>) -> Self {
        Self { bounds, pockets }
    }
}

/// A single line of the guideline.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub start: Vector2,
    pub end: Vector2,
}

impl LineSegment {
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A flat RGBA color with components in `[0, 1]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_edges_order() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let [top, bottom, left, right] = rect.edges();

        assert_eq!(top.p1, Vector2::new(10.0, 20.0));
        assert_eq!(top.p2, Vector2::new(110.0, 20.0));
        assert_eq!(bottom.p1, Vector2::new(10.0, 70.0));
        assert_eq!(bottom.p2, Vector2::new(110.0, 70.0));
        assert_eq!(left.p1, Vector2::new(10.0, 20.0));
        assert_eq!(left.p2, Vector2::new(10.0, 70.0));
        assert_eq!(right.p1, Vector2::new(110.0, 20.0));
        assert_eq!(right.p2, Vector2::new(110.0, 70.0));
    }

    #[test]
    fn test_ball_default_is_absent_sentinel() {
        let ball = Ball::default();
        assert_eq!(ball.center, Vector2::zeros());
        assert_eq!(ball.radius, 0.0);
        assert_eq!(ball.role, BallRole::Other);
    }

    #[test]
    fn test_ball_radius_clamped() {
        let ball = Ball::cue(1.0, 2.0, -3.0);
        assert_eq!(ball.radius, 0.0);
    }

    #[test]
    fn test_segment_length() {
        let seg = LineSegment::new(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
        assert_relative_eq!(seg.length(), 5.0);
    }
}

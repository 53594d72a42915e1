use cueline_core::{Rect, ReferenceFrame, Vector2};

/// Maps capture pixel coordinates into the reference frame.
///
/// The two axes are scaled independently, so a non-matching aspect ratio stretches
/// the picture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rescale {
    pub sx: f64,
    pub sy: f64,
}

impl Rescale {
    /// Build the mapping from a `source_width` x `source_height` capture.
    ///
    /// A non-positive source dimension gives a zero factor on that axis, collapsing
    /// everything onto the origin rather than producing infinities.
    pub fn new(source_width: f64, source_height: f64, reference: &ReferenceFrame) -> Self {
        let factor = |reference: f64, source: f64| {
            if source > 0.0 {
                reference / source
            } else {
                log::warn!("Invalid capture dimension {}, scaling to zero", source);
                0.0
            }
        };
        Self {
            sx: factor(reference.width, source_width),
            sy: factor(reference.height, source_height),
        }
    }

    pub fn point(&self, p: Vector2) -> Vector2 {
        Vector2::new(p.x * self.sx, p.y * self.sy)
    }

    /// Scale a circle radius.
    ///
    /// Only the horizontal factor is used, so circles stay circles but their size
    /// follows the width of the capture alone.
    pub fn radius(&self, r: f64) -> f64 {
        r * self.sx
    }

    pub fn rect(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x * self.sx,
            rect.y * self.sy,
            rect.width * self.sx,
            rect.height * self.sy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_independent_axes() {
        let rescale = Rescale::new(200.0, 200.0, &ReferenceFrame::FULL_HD);
        let p = rescale.point(Vector2::new(10.0, 10.0));
        assert_relative_eq!(p.x, 96.0);
        assert_relative_eq!(p.y, 54.0);
        assert_relative_eq!(rescale.radius(10.0), 96.0);
    }

    #[test]
    fn test_identity_at_reference_size() {
        let rescale = Rescale::new(1920.0, 1080.0, &ReferenceFrame::FULL_HD);
        let r = rescale.rect(&Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_zero_source_dimension() {
        let rescale = Rescale::new(0.0, 540.0, &ReferenceFrame::FULL_HD);
        assert_eq!(rescale.sx, 0.0);
        assert_relative_eq!(rescale.sy, 2.0);
        let p = rescale.point(Vector2::new(100.0, 100.0));
        assert!(p.x.is_finite());
        assert_eq!(p.x, 0.0);
    }
}

use crate::{Rect, Vector2};

/// Euclidean distance between two points.
pub fn distance(p1: Vector2, p2: Vector2) -> f64 {
    (p2 - p1).norm()
}

/// Scales `v` to unit length.
///
/// A zero vector is returned unchanged instead of producing NaNs.
pub fn normalize(v: Vector2) -> Vector2 {
    let mag = v.norm();
    if mag == 0.0 {
        return v;
    }
    v / mag
}

/// Reflects `incident` about a surface with the given unit `normal`.
///
/// The guideline does not follow cushion banks, so nothing calls this yet.
pub fn reflect(incident: Vector2, normal: Vector2) -> Vector2 {
    incident - 2.0 * incident.dot(&normal) * normal
}

/// Finds where the segment from `start` to `end` crosses the border of `rect`.
///
/// The edges are tested in the order top, bottom, left, right and the first edge
/// crossed anywhere within both the segment and the edge (parameters in `[0, 1]`,
/// inclusive) wins, even if another edge is crossed closer to `start`. Edges parallel
/// to the segment are skipped. Returns `None` if no edge is crossed.
pub fn segment_intersects_rect_edges(start: Vector2, end: Vector2, rect: &Rect) -> Option<Vector2> {
    let dir = end - start;
    for edge in rect.edges() {
        let side = edge.p2 - edge.p1;
        let denom = dir.x * side.y - dir.y * side.x;
        if denom == 0.0 {
            continue;
        }

        let offset = start - edge.p1;
        let t = (offset.y * side.x - offset.x * side.y) / denom;
        let u = (offset.y * dir.x - offset.x * dir.y) / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return Some(start + t * dir);
        }
    }
    None
}

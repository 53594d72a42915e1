//! Aiming geometry for a single cue ball / target ball shot.
//!
//! Everything here is a pure function of the balls and the table of one frame. No
//! physics is simulated: the target ball is assumed to leave along the line of
//! centers at contact, and nothing after its first rail or pocket is predicted.

use cueline_core::{
    math::{distance, normalize, segment_intersects_rect_edges},
    Ball, LineSegment, ShotMode, ShotParams, Table, Vector2,
};

/// Position of the cue ball's center at the moment it touches the target ball.
///
/// The ghost ball sits on the line through both centers, `cue.radius + target.radius`
/// away from the target on the cue side. With a combined radius of zero it is the
/// target's center.
pub fn ghost_ball(cue: &Ball, target: &Ball) -> Vector2 {
    let combined_radius = cue.radius + target.radius;
    if combined_radius == 0.0 {
        return target.center;
    }
    let direction = normalize(target.center - cue.center);
    target.center - direction * combined_radius
}

/// The default overlay: aim line, ghost ball line, then a line from the target ball
/// to every pocket.
///
/// The result always has `2 + table.pockets.len()` segments in exactly this order:
///
/// 1. cue center to target center
/// 2. target center to ghost ball
/// 3. target center to each pocket, in the table's pocket order
pub fn compute_guideline(cue: &Ball, target: &Ball, table: &Table) -> Vec<LineSegment> {
    let mut guideline = Vec::with_capacity(2 + table.pockets.len());

    guideline.push(LineSegment::new(cue.center, target.center));

    let ghost = ghost_ball(cue, target);
    guideline.push(LineSegment::new(target.center, ghost));

    for pocket in &table.pockets {
        guideline.push(LineSegment::new(target.center, *pocket));
    }

    guideline
}

/// Best guess of where the shot goes: cue ball to ghost ball, then target ball to
/// its exit point.
///
/// The target ball leaves along the ghost-to-target direction. The exit point is the
/// first pocket (in table order) strictly within `params.capture_radius` of the target
/// ball. Without such a pocket, the exit ray of length `params.extension` is clipped
/// against the table bounds, and left at full length if it does not cross them.
pub fn predict_shot_path(
    cue: &Ball,
    target: &Ball,
    table: &Table,
    params: &ShotParams,
) -> [LineSegment; 2] {
    let ghost = ghost_ball(cue, target);
    let approach = LineSegment::new(cue.center, ghost);

    let direction = normalize(target.center - ghost);
    let far_point = target.center + direction * params.extension;

    let exit = match table
        .pockets
        .iter()
        .find(|pocket| distance(target.center, **pocket) < params.capture_radius)
    {
        Some(pocket) => {
            log::trace!("Exit snapped to pocket ({:.1}, {:.1})", pocket.x, pocket.y);
            *pocket
        }
        None => match segment_intersects_rect_edges(target.center, far_point, &table.bounds) {
            Some(hit) => hit,
            None => {
                log::trace!("Exit ray does not cross the table bounds");
                far_point
            }
        },
    };

    [approach, LineSegment::new(target.center, exit)]
}

/// Segments to draw for the given overlay mode.
pub fn shot_segments(
    mode: ShotMode,
    cue: &Ball,
    target: &Ball,
    table: &Table,
    params: &ShotParams,
) -> Vec<LineSegment> {
    match mode {
        ShotMode::Guideline => compute_guideline(cue, target, table),
        ShotMode::PredictedPath => predict_shot_path(cue, target, table, params).to_vec(),
    }
}

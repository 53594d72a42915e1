use cueline_core::{Ball, BallRole, Detection, ObjectClass, ReferenceFrame, Table};
use serde::Serialize;

mod coord_utils;

pub use coord_utils::Rescale;

/// How a field is chosen when several detections of its class appear in one frame.
///
/// The classifier scans the detections once, in order. Different fields use
/// different rules, and the choice is observable when the model reports duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    /// Keep the first match, ignore the rest.
    First,
    /// Every match overwrites the previous one.
    Last,
}

impl Pick {
    fn apply<T>(self, slot: &mut Option<T>, value: T) {
        match self {
            Pick::First => {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
            Pick::Last => *slot = Some(value),
        }
    }
}

/// Rule for the cue ball (`White`).
pub const CUE_PICK: Pick = Pick::Last;
/// Rule for the target ball (`Ball`).
pub const TARGET_PICK: Pick = Pick::First;
/// Rule for the table bounds (`PlayArea`).
pub const TABLE_PICK: Pick = Pick::Last;

/// The entities extracted from one frame, in reference frame coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameEntities {
    pub cue: Ball,
    pub target: Ball,
    pub table: Table,
}

/// Classify the detections of one frame, starting from empty entities.
///
/// See [`classify_into`].
pub fn classify(
    detections: &[Detection],
    source_width: f64,
    source_height: f64,
    reference: &ReferenceFrame,
) -> FrameEntities {
    let mut entities = FrameEntities::default();
    classify_into(
        &mut entities.cue,
        &mut entities.target,
        &mut entities.table,
        detections,
        source_width,
        source_height,
        reference,
    );
    entities
}

/// Map raw detections in a `source_width` x `source_height` capture to the cue
/// ball, the target ball and the table.
///
/// - cue ball: the last `White` detection
/// - target ball: the first `Ball` detection
/// - pockets: every `Hole` detection, in order; the previous pockets are dropped
/// - table bounds: the last `PlayArea` detection
///
/// Classes without a detection leave the corresponding output untouched, so the
/// caller decides what "absent" looks like. Other classes are ignored. Never fails.
pub fn classify_into(
    cue: &mut Ball,
    target: &mut Ball,
    table: &mut Table,
    detections: &[Detection],
    source_width: f64,
    source_height: f64,
    reference: &ReferenceFrame,
) {
    let rescale = Rescale::new(source_width, source_height, reference);
    table.pockets.clear();

    let mut cue_found = None;
    let mut target_found = None;
    let mut bounds_found = None;

    for det in detections {
        let center = rescale.point(det.center());
        let radius = rescale.radius(det.radius());

        match det.class() {
            ObjectClass::White => {
                CUE_PICK.apply(&mut cue_found, Ball::new(center, radius, BallRole::Cue));
            }
            ObjectClass::Ball => {
                TARGET_PICK.apply(
                    &mut target_found,
                    Ball::new(center, radius, BallRole::Target),
                );
            }
            ObjectClass::Hole => table.pockets.push(center),
            ObjectClass::PlayArea => {
                TABLE_PICK.apply(&mut bounds_found, rescale.rect(&det.bbox));
            }
            class => log::trace!("Ignoring {:?} detection", class),
        }
    }

    if let Some(ball) = cue_found {
        *cue = ball;
    }
    if let Some(ball) = target_found {
        *target = ball;
    }
    if let Some(bounds) = bounds_found {
        table.bounds = bounds;
    }

    log::debug!(
        "Classified {} detections: cue={} target={} pockets={} table={}",
        detections.len(),
        cue_found.is_some(),
        target_found.is_some(),
        table.pockets.len(),
        bounds_found.is_some()
    );
}

use anyhow::Result;
use cueline_core::{Ball, CuelineSettings, LineSegment, ShotMode, Table};
use cueline_shot::shot_segments;

pub fn shot(
    settings: &CuelineSettings,
    cue: &Ball,
    target: &Ball,
    table: &Table,
    predict: bool,
) -> Vec<LineSegment> {
    let mode = if predict {
        ShotMode::PredictedPath
    } else {
        ShotMode::Guideline
    };
    shot_segments(mode, cue, target, table, &settings.shot)
}

/// Print the segments of a single shot as JSON.
pub fn print_shot(
    settings: &CuelineSettings,
    cue: &Ball,
    target: &Ball,
    table: &Table,
    predict: bool,
) -> Result<()> {
    let segments = shot(settings, cue, target, table, predict);
    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cueline_core::{Rect, Vector2};

    #[test]
    fn test_shot_modes() {
        let settings = CuelineSettings::default();
        let cue = Ball::cue(100.0, 100.0, 10.0);
        let target = Ball::target(200.0, 100.0, 10.0);
        let table = Table::new(
            Rect::new(0.0, 0.0, 400.0, 200.0),
            vec![Vector2::new(400.0, 100.0), Vector2::new(0.0, 0.0)],
        );

        assert_eq!(shot(&settings, &cue, &target, &table, false).len(), 4);

        let path = shot(&settings, &cue, &target, &table, true);
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].end, Vector2::new(400.0, 100.0));
    }
}

use std::time::Duration;

use cueline_core::{CuelineSettings, LineSegment};
use cueline_shot::{ghost_ball, shot_segments};
use cueline_world::{classify, FrameEntities};
use serde::Serialize;
use tokio::{sync::broadcast, time::MissedTickBehavior};

mod detector;
mod mock;
mod recording;
mod render;
mod source;

pub use detector::{
    decode_detections, preprocess, Detector, InferenceBackend, TensorDetector, OUTPUT_ROW_LEN,
};
pub use mock::{MockDetector, MockSource};
pub use recording::{RecordedDetector, RecordedFrame, Recording, ReplaySource};
pub use render::{
    to_ndc, DrawBatch, LineRenderer, LineVertex, LogRenderer, NdcLineBuffer, Topology,
    CIRCLE_SEGMENTS,
};
pub use source::{Frame, FrameSource};

/// What the loop computed for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Index of the frame, counting skipped frames
    pub index: u64,
    pub entities: FrameEntities,
    pub segments: Vec<LineSegment>,
}

/// Outcome of a single loop iteration.
#[derive(Debug, Clone)]
pub enum Step {
    Rendered(FrameReport),
    /// Capture or detection failed; nothing was drawn.
    Skipped,
    /// The source has no more frames.
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub rendered: u64,
    pub skipped: u64,
}

/// The capture -> detect -> classify -> compute -> render pipeline.
///
/// The loop owns its collaborators; they are released when the loop is dropped.
/// Nothing is carried over between frames.
pub struct FrameLoop {
    settings: CuelineSettings,
    source: Box<dyn FrameSource>,
    detector: Box<dyn Detector>,
    renderer: Box<dyn LineRenderer>,
    frame_index: u64,
}

impl FrameLoop {
    pub fn new(
        settings: CuelineSettings,
        source: Box<dyn FrameSource>,
        detector: Box<dyn Detector>,
        renderer: Box<dyn LineRenderer>,
    ) -> Self {
        log::info!(
            "Frame loop: source={} detector={} mode={:?}",
            source.name(),
            detector.name(),
            settings.overlay.mode
        );
        Self {
            settings,
            source,
            detector,
            renderer,
            frame_index: 0,
        }
    }

    pub fn settings(&self) -> &CuelineSettings {
        &self.settings
    }

    /// Run one iteration of the pipeline.
    pub fn step(&mut self) -> Step {
        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Step::Exhausted,
            Err(err) => {
                log::warn!("Failed to capture frame: {:#}", err);
                self.frame_index += 1;
                return Step::Skipped;
            }
        };
        let index = self.frame_index;
        self.frame_index += 1;

        let detections = match self.detector.detect(&frame) {
            Ok(detections) => detections,
            Err(err) => {
                log::warn!("Detection failed on frame {}: {:#}", index, err);
                return Step::Skipped;
            }
        };

        let entities = classify(
            &detections,
            frame.width as f64,
            frame.height as f64,
            &self.settings.reference,
        );
        let FrameEntities { cue, target, table } = &entities;
        let overlay = &self.settings.overlay;
        let segments = shot_segments(overlay.mode, cue, target, table, &self.settings.shot);

        self.renderer.clear();
        for segment in &segments {
            self.renderer.draw_line(segment, overlay.color);
        }
        if overlay.draw_ghost_ball {
            self.renderer.draw_circle(
                ghost_ball(cue, target),
                cue.radius,
                overlay.ghost_ball_color,
            );
        }
        if let Err(err) = self.renderer.present() {
            log::warn!("Failed to present frame {}: {:#}", index, err);
        }

        Step::Rendered(FrameReport {
            index,
            entities,
            segments,
        })
    }

    /// Run until the source is exhausted, as fast as possible, and collect the
    /// reports of the rendered frames.
    pub fn run_to_end(&mut self) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        loop {
            match self.step() {
                Step::Rendered(report) => reports.push(report),
                Step::Skipped => {}
                Step::Exhausted => break,
            }
        }
        reports
    }

    /// Run one iteration per frame interval until a stop signal arrives or the source
    /// is exhausted.
    pub async fn run_real_time(&mut self, mut stop_rx: broadcast::Receiver<()>) -> LoopStats {
        let period = Duration::from_millis(self.settings.overlay.frame_interval_ms.max(1));
        let mut frame_interval = tokio::time::interval(period);
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = LoopStats::default();
        loop {
            tokio::select! {
                _ = stop_rx.recv() => {
                    log::info!("Frame loop stopped");
                    break;
                }
                _ = frame_interval.tick() => {
                    match self.step() {
                        Step::Rendered(_) => stats.rendered += 1,
                        Step::Skipped => stats.skipped += 1,
                        Step::Exhausted => {
                            log::info!("Frame source exhausted");
                            break;
                        }
                    }
                }
            }
        }
        stats
    }
}

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use cueline_core::CuelineSettings;
use cueline_executor::{FrameLoop, NdcLineBuffer, Recording};

/// Replay a recording through the frame loop and write one JSON report per frame.
pub fn replay(settings: CuelineSettings, input: &Path, output: Option<&Path>) -> Result<()> {
    let recording = Recording::load(input)?;
    let frame_count = recording.frames.len();
    let (source, detector) = recording.into_parts();

    let renderer = NdcLineBuffer::new(settings.reference.width, settings.reference.height);
    let mut frame_loop = FrameLoop::new(
        settings,
        Box::new(source),
        Box::new(detector),
        Box::new(renderer),
    );
    let reports = frame_loop.run_to_end();
    tracing::info!(
        "Replayed {} of {} frames from {}",
        reports.len(),
        frame_count,
        input.display()
    );

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &reports)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

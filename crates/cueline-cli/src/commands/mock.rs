use anyhow::Result;
use cueline_core::CuelineSettings;
use cueline_executor::{FrameLoop, LogRenderer, MockDetector, MockSource};
use tokio::sync::broadcast;

/// Run the real-time loop on the synthetic table until ctrl-c or until `frames`
/// frames have been produced.
pub async fn run_mock(
    settings: CuelineSettings,
    width: u32,
    height: u32,
    frames: Option<u64>,
    seed: u64,
) -> Result<()> {
    let mut frame_loop = FrameLoop::new(
        settings,
        Box::new(MockSource::new(width, height, frames)),
        Box::new(MockDetector::new(seed)),
        Box::new(LogRenderer::new()),
    );

    let (stop_tx, stop_rx) = broadcast::channel(1);
    let signal_task = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutting down");
                let _ = stop_tx.send(());
            }
            Err(err) => tracing::error!("Failed to listen for ctrl-c: {}", err),
        }
    });

    let stats = frame_loop.run_real_time(stop_rx).await;
    signal_task.abort();

    tracing::info!(
        "Mock loop finished: {} frames rendered, {} skipped",
        stats.rendered,
        stats.skipped
    );
    Ok(())
}

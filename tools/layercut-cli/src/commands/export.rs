//! Real-time export to a JSON-lines frame log.

use std::path::PathBuf;

use layercut_common::config::AppConfig;
use layercut_render_engine::{
    export_realtime, ExportJob, ExportProgress, IntervalScheduler, JsonlCaptureSurface,
    SteppedScheduler,
};
use layercut_timeline_core::Store;

use super::load_document;

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    config: &AppConfig,
    fps: Option<u32>,
    refresh_hz: Option<u32>,
    simulate_clock: bool,
) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let (_, document) = load_document(&path)?;
    let mut store = Store::from_snapshot(document.snapshot);

    let mut job = ExportJob::from_defaults(&config.export);
    if let Some(fps) = fps {
        job.fps = fps;
    }
    if let Some(refresh_hz) = refresh_hz {
        job.refresh_hz = refresh_hz;
    }

    let output_path = output.unwrap_or_else(|| path.join("exports").join("frames.jsonl"));
    let mut surface = JsonlCaptureSurface::create(&output_path)?;

    println!("  Output: {}", output_path.display());
    println!("  Duration: {:.2}s", store.state().total_duration);
    println!("  Rate: {}fps (refresh {}Hz)", job.fps, job.refresh_hz);

    let progress_cb: Box<dyn Fn(ExportProgress) + Send> = Box::new(|p| {
        print!(
            "\r  Progress: {:.1}% ({}/{} frames, {:.0}s left)  ",
            p.progress * 100.0,
            p.frames_captured,
            p.total_frames,
            p.eta_secs,
        );
    });

    let result = if simulate_clock {
        let mut scheduler = SteppedScheduler::new(job.refresh_hz);
        export_realtime(&mut store, &mut scheduler, &mut surface, &job, Some(progress_cb)).await
    } else {
        let mut scheduler = IntervalScheduler::new(job.refresh_hz);
        export_realtime(&mut store, &mut scheduler, &mut surface, &job, Some(progress_cb)).await
    };

    match result {
        Ok(summary) => {
            println!(
                "\nExport complete: {} ({} frames)",
                output_path.display(),
                summary.frames_captured
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            println!("\nExport failed: {e}");
            Err(e.into())
        }
    }
}

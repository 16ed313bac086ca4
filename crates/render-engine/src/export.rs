//! Real-time export.
//!
//! Export plays the project from 0 and captures the composed canvas at the
//! requested frame rate while it plays. It is not an offline re-encode:
//! the export takes exactly `total_duration` of playback time.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use layercut_common::error::{LayercutError, LayercutResult};
use layercut_common::{ExportDefaults, FrameClock, RateController};
use layercut_timeline_core::Store;

use crate::compositor::{compose_frame, FrameComposition};
use crate::playback::{FrameScheduler, TickOutcome, Transport};

/// Capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportJob {
    /// Captured frames per second.
    pub fps: u32,

    /// Display refresh rate driving playback.
    pub refresh_hz: u32,
}

impl ExportJob {
    pub fn from_defaults(defaults: &ExportDefaults) -> Self {
        Self {
            fps: defaults.fps,
            refresh_hz: defaults.refresh_hz,
        }
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Frames captured so far.
    pub frames_captured: u64,

    /// Frames expected for the whole project.
    pub total_frames: u64,

    /// Remaining playback time in seconds.
    pub eta_secs: f64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Capturing,
    Finalizing,
    Complete,
    Failed,
}

/// Outcome of a finished export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSummary {
    pub frames_captured: u64,
    pub duration_secs: f64,
}

/// Sink for captured frames (a media recorder, a file, a test double).
pub trait CaptureSurface: Send {
    fn begin(&mut self, fps: u32, duration_secs: f64) -> LayercutResult<()>;

    fn capture(&mut self, frame: &FrameComposition) -> LayercutResult<()>;

    fn finish(&mut self) -> LayercutResult<()>;

    /// Surface name for logs.
    fn name(&self) -> &str;
}

/// Play the project from 0 and capture it into `surface`.
///
/// On any failure playback is paused and the error is returned; frames
/// already handed to the surface are left to it.
pub async fn export_realtime<S, C>(
    store: &mut Store,
    scheduler: &mut S,
    surface: &mut C,
    job: &ExportJob,
    progress: Option<ProgressCallback>,
) -> LayercutResult<ExportSummary>
where
    S: FrameScheduler,
    C: CaptureSurface,
{
    let duration = store.state().total_duration;
    if !(duration > 0.0) {
        return Err(LayercutError::export("Project has no duration to export"));
    }
    if job.fps == 0 {
        return Err(LayercutError::export("Export frame rate must be positive"));
    }

    let total_frames = (duration * job.fps as f64).ceil() as u64;
    let report = |stage: ExportStage, frames: u64, time: f64| {
        if let Some(cb) = &progress {
            cb(ExportProgress {
                progress: (time / duration).clamp(0.0, 1.0),
                frames_captured: frames,
                total_frames,
                eta_secs: (duration - time).max(0.0),
                stage,
            });
        }
    };

    tracing::info!(
        fps = job.fps,
        duration_secs = duration,
        surface = surface.name(),
        "Starting real-time export"
    );
    report(ExportStage::Preparing, 0, 0.0);

    surface.begin(job.fps, duration)?;
    {
        let mut transport = Transport::new(store);
        transport.stop();
        transport.play();
    }

    let mut clock = FrameClock::new();
    let mut rate = RateController::new(job.fps);
    let mut frames = 0u64;

    let captured: LayercutResult<()> = loop {
        let Some(now) = scheduler.next_frame().await else {
            break Err(LayercutError::export(
                "Frame scheduler stopped before the export finished",
            ));
        };
        match Transport::new(store).tick(clock.tick(now)) {
            TickOutcome::Ended => break Ok(()),
            TickOutcome::Idle => {
                break Err(LayercutError::export("Playback stopped during export"));
            }
            TickOutcome::Advanced => {}
        }

        let state = store.state();
        let time = state.current_time;
        if !rate.should_tick(FrameClock::secs_to_ns(time)) {
            continue;
        }
        if let Err(e) = surface.capture(&compose_frame(state, time)) {
            break Err(e);
        }
        frames += 1;
        report(ExportStage::Capturing, frames, time);
    };

    if let Err(e) = captured {
        Transport::new(store).pause();
        tracing::error!(error = %e, frames, "Export failed");
        report(ExportStage::Failed, frames, store.state().current_time);
        return Err(e);
    }

    report(ExportStage::Finalizing, frames, duration);
    surface.finish()?;
    report(ExportStage::Complete, frames, duration);

    tracing::info!(frames, duration_secs = duration, "Export complete");
    Ok(ExportSummary {
        frames_captured: frames,
        duration_secs: duration,
    })
}

#[derive(Serialize)]
struct CaptureHeader {
    fps: u32,
    duration_secs: f64,
}

/// Writes one JSON frame description per line, after a header line.
pub struct JsonlCaptureSurface {
    path: PathBuf,
    writer: BufWriter<File>,
    frames: u64,
}

impl JsonlCaptureSurface {
    pub fn create(path: impl AsRef<Path>) -> LayercutResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            frames: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> LayercutResult<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl CaptureSurface for JsonlCaptureSurface {
    fn begin(&mut self, fps: u32, duration_secs: f64) -> LayercutResult<()> {
        self.write_line(&CaptureHeader { fps, duration_secs })
    }

    fn capture(&mut self, frame: &FrameComposition) -> LayercutResult<()> {
        self.write_line(frame)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> LayercutResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

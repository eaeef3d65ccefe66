use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use eyesee_core::detection::infrastructure::model_resolver;
use eyesee_core::detection::infrastructure::onnx_ssd_model::OnnxSsdModel;
use eyesee_core::pipeline::frame_pump::FramePump;
use eyesee_core::pipeline::live_session::{LiveSession, TickOutcome};
use eyesee_core::pipeline::pipeline_logger::LogPipelineLogger;
use eyesee_core::shared::constants::{DEFAULT_CONFIDENCE, DEFAULT_TICK_INTERVAL_MS};
use eyesee_core::snapshot::snapshot_counter::SnapshotCounter;
use eyesee_core::snapshot::snapshot_writer::SnapshotWriter;
use eyesee_core::video::infrastructure::ffmpeg_camera::{CameraConfig, FfmpegCamera};
use eyesee_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Level shown when `RUST_LOG` is unset, so snapshot confirmations and
/// fallback warnings reach the console.
const DEFAULT_LOG_FILTER: &str = "info";

fn log_env(filter_var: &str) -> env_logger::Env<'_> {
    env_logger::Env::new()
        .filter_or(filter_var, DEFAULT_LOG_FILTER)
        .write_style(env_logger::DEFAULT_WRITE_STYLE_ENV)
}

/// Live webcam face detection without a window.
#[derive(Parser)]
#[command(name = "eyesee")]
struct Cli {
    /// Camera device (e.g. /dev/video0, 0, "video=USB Camera").
    #[arg(long)]
    camera: Option<String>,

    /// Capture backend (v4l2, avfoundation, dshow).
    #[arg(long)]
    input_format: Option<String>,

    /// Directory holding the detector model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Directory snapshots are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f32,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    interval_ms: u64,

    /// Stop after this many ticks (runs until Ctrl+C otherwise).
    #[arg(long)]
    max_ticks: Option<usize>,

    /// Start with face detection disabled.
    #[arg(long)]
    no_detect: bool,

    /// Save a snapshot every N ticks.
    #[arg(long)]
    snapshot_every: Option<usize>,

    /// Save a single snapshot after the first captured frame.
    #[arg(long)]
    snapshot_once: bool,
}

fn main() {
    env_logger::Builder::from_env(log_env(env_logger::DEFAULT_FILTER_ENV)).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let model_files = model_resolver::resolve_ssd_model(cli.model_dir.as_deref())?;
    log::info!("Loading detector model {}", model_files.topology.display());
    let model = OnnxSsdModel::load(&model_files)?;

    let counter = SnapshotCounter::scan(&cli.output_dir)?;
    let snapshots = SnapshotWriter::new(
        cli.output_dir.clone(),
        counter,
        Box::new(ImageFileWriter::new()),
    );
    log::info!(
        "Snapshots go to {} starting at index {}",
        cli.output_dir.display(),
        snapshots.next_index()
    );

    let camera = FfmpegCamera::open(&camera_config(&cli));
    if !camera.is_open() {
        log::warn!("Camera unavailable; ticks will be skipped until it is fixed and restarted");
    }

    let mut session = LiveSession::new(
        Box::new(camera),
        Box::new(model),
        snapshots,
        cli.confidence,
    )
    .with_logger(Box::new(LogPipelineLogger::default()));
    if cli.no_detect {
        session.toggle_detection();
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    let pump = FramePump::new(Duration::from_millis(cli.interval_ms));
    let mut tick = 0usize;
    let mut last_count = None;
    let mut snapshot_pending = cli.snapshot_once;
    let ticks = pump.run(&mut session, |session, outcome| {
        tick += 1;
        let captured = matches!(outcome, TickOutcome::Frame(_));
        if let TickOutcome::Frame(live) = outcome {
            if last_count != Some(live.face_count) {
                log::info!("Faces detected: {}", live.face_count);
                last_count = Some(live.face_count);
            }
        }

        if snapshot_due(cli.snapshot_every, tick, captured, &mut snapshot_pending) {
            if let Err(e) = session.save_snapshot() {
                log::error!("Snapshot failed: {e}");
            }
        }

        let limit_reached = cli.max_ticks.is_some_and(|max| tick >= max);
        if limit_reached || stop.load(Ordering::SeqCst) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    session.shutdown();
    log::info!("Stopped after {ticks} ticks");
    Ok(())
}

fn camera_config(cli: &Cli) -> CameraConfig {
    let mut config = CameraConfig::default();
    if let Some(device) = &cli.camera {
        config.device = device.clone();
    }
    if let Some(format) = &cli.input_format {
        config.input_format = format.clone();
    }
    config
}

/// A one-shot snapshot waits for the first captured frame; periodic ones
/// fire on every `every`-th tick.
fn snapshot_due(every: Option<usize>, tick: usize, captured: bool, once_pending: &mut bool) -> bool {
    if *once_pending && captured {
        *once_pending = false;
        return true;
    }
    every.is_some_and(|n| tick % n == 0)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.interval_ms == 0 {
        return Err("Interval must be at least 1 ms".into());
    }
    if cli.max_ticks == Some(0) {
        return Err("--max-ticks must be positive".into());
    }
    if cli.snapshot_every == Some(0) {
        return Err("--snapshot-every must be positive".into());
    }
    if cli.output_dir.exists() && !cli.output_dir.is_dir() {
        return Err(format!(
            "Output path is not a directory: {}",
            cli.output_dir.display()
        )
        .into());
    }
    if let Some(dir) = &cli.model_dir {
        if !dir.is_dir() {
            return Err(format!("Model directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}

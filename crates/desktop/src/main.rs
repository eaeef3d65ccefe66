mod app;
mod assets;
mod settings;
mod theme;

use std::cell::Cell;
use std::process;
use std::time::Duration;

use eyesee_core::detection::infrastructure::model_resolver;
use eyesee_core::detection::infrastructure::onnx_ssd_model::OnnxSsdModel;
use eyesee_core::pipeline::live_session::LiveSession;
use eyesee_core::snapshot::snapshot_counter::SnapshotCounter;
use eyesee_core::snapshot::snapshot_writer::SnapshotWriter;
use eyesee_core::video::infrastructure::ffmpeg_camera::{CameraConfig, FfmpegCamera};
use eyesee_core::video::infrastructure::image_file_writer::ImageFileWriter;
use iced::Task;

use app::{App, PIXEL_FONT};
use assets::Assets;
use settings::Settings;

/// Level shown when `RUST_LOG` is unset, so snapshot confirmations and
/// fallback warnings reach the console.
const DEFAULT_LOG_FILTER: &str = "info";

fn log_env(filter_var: &str) -> env_logger::Env<'_> {
    env_logger::Env::new()
        .filter_or(filter_var, DEFAULT_LOG_FILTER)
        .write_style(env_logger::DEFAULT_WRITE_STYLE_ENV)
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(log_env(env_logger::DEFAULT_FILTER_ENV)).init();

    let settings = Settings::load();
    let session = match build_session(&settings) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let assets = Assets::load(&settings.asset_dir);
    let font = assets.font.clone();
    let tick_interval = Duration::from_millis(settings.tick_interval_ms.max(1));

    // Boot runs once; the session moves into the app on that call.
    let pending = Cell::new(Some((session, assets)));
    let boot = move || {
        let (session, assets) = pending.take().unwrap_or_else(|| {
            log::error!("Application booted twice");
            process::exit(1);
        });
        (App::new(session, assets, tick_interval), Task::none())
    };

    let mut application = iced::application(boot, App::update, App::view)
        .title("Eye See - Face Detection App")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(900.0, 700.0),
            exit_on_close_request: false,
            ..Default::default()
        });
    if let Some(bytes) = font {
        application = application.font(bytes).default_font(PIXEL_FONT);
    }
    application.run()
}

fn build_session(settings: &Settings) -> Result<LiveSession, Box<dyn std::error::Error>> {
    let model_files = model_resolver::resolve_ssd_model(settings.model_dir.as_deref())?;
    log::info!("Loading detector model {}", model_files.topology.display());
    let model = OnnxSsdModel::load(&model_files)?;

    let counter = SnapshotCounter::scan(&settings.output_dir)?;
    let snapshots = SnapshotWriter::new(
        settings.output_dir.clone(),
        counter,
        Box::new(ImageFileWriter::new()),
    );

    let mut camera_config = CameraConfig::default();
    if let Some(device) = &settings.camera_device {
        camera_config.device = device.clone();
    }
    if let Some(format) = &settings.camera_format {
        camera_config.input_format = format.clone();
    }
    let camera = FfmpegCamera::open(&camera_config);

    Ok(LiveSession::new(
        Box::new(camera),
        Box::new(model),
        snapshots,
        settings.threshold(),
    ))
}

pub mod frame_pump;
pub mod live_session;
pub mod pipeline_logger;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{CaptureError, FrameSource};

/// Where and how to open the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Device URL as the capture backend expects it, e.g. `/dev/video0`
    /// (v4l2), `0` (avfoundation) or `video=USB Camera` (dshow).
    pub device: String,
    /// libavdevice input format name.
    pub input_format: String,
    pub framerate: u32,
    /// Requested capture size; `None` keeps the device default.
    pub video_size: Option<(u32, u32)>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: default_device().to_string(),
            input_format: default_input_format().to_string(),
            framerate: 30,
            video_size: Some((640, 480)),
        }
    }
}

fn default_input_format() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "avfoundation"
    }
    #[cfg(target_os = "windows")]
    {
        "dshow"
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        "v4l2"
    }
}

fn default_device() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "0"
    }
    #[cfg(target_os = "windows")]
    {
        "video=Integrated Camera"
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        "/dev/video0"
    }
}

/// Webcam frame source backed by libavdevice through ffmpeg-next.
///
/// A device that fails to open is logged and left closed; every subsequent
/// `capture` then reports [`CaptureError::Unavailable`]. The device is
/// released exactly once, by [`FrameSource::release`] or on drop.
pub struct FfmpegCamera {
    device: Option<OpenDevice>,
    description: String,
}

struct OpenDevice {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Option<(ScalerInput, ffmpeg_next::software::scaling::Context)>,
    stream_index: usize,
}

/// Decoded-frame layout a scaler was built for. Devices may renegotiate
/// either one mid-stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScalerInput {
    format: ffmpeg_next::format::Pixel,
    width: u32,
    height: u32,
}

fn scaler_is_stale(current: Option<ScalerInput>, incoming: ScalerInput) -> bool {
    current != Some(incoming)
}

impl FfmpegCamera {
    pub fn open(config: &CameraConfig) -> Self {
        let description = format!("{} ({})", config.device, config.input_format);
        let device = match open_device(config) {
            Ok(device) => {
                log::info!("Opened camera {description}");
                Some(device)
            }
            Err(e) => {
                log::error!("Failed to open camera {description}: {e}");
                None
            }
        };
        Self {
            device,
            description,
        }
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }
}

impl FrameSource for FfmpegCamera {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let Some(device) = self.device.as_mut() else {
            return Err(CaptureError::Unavailable("camera is not open".into()));
        };
        device.read_frame()
    }

    fn release(&mut self) {
        if self.device.take().is_some() {
            log::info!("Released camera {}", self.description);
        }
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        self.release();
    }
}

fn open_device(config: &CameraConfig) -> Result<OpenDevice, Box<dyn std::error::Error>> {
    ffmpeg_next::init()?;
    ffmpeg_next::device::register_all();

    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name() == config.input_format)
        .ok_or_else(|| format!("Capture format '{}' is not available", config.input_format))?;

    let mut options = ffmpeg_next::Dictionary::new();
    options.set("framerate", &config.framerate.to_string());
    if let Some((w, h)) = config.video_size {
        options.set("video_size", &format!("{w}x{h}"));
    }

    let context = ffmpeg_next::format::open_with(
        config.device.as_str(),
        &ffmpeg_next::format::Format::Input(format),
        options,
    )?;
    let input = match context {
        ffmpeg_next::format::context::Context::Input(input) => input,
        ffmpeg_next::format::context::Context::Output(_) => {
            return Err("Capture device opened as an output".into())
        }
    };

    let stream = input
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or("No video stream found on capture device")?;
    let stream_index = stream.index();
    let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
    let decoder = codec_ctx.decoder().video()?;

    Ok(OpenDevice {
        input,
        decoder,
        scaler: None,
        stream_index,
    })
}

impl OpenDevice {
    /// Reads packets until one decodes into a frame.
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        loop {
            if let Some(frame) = self.try_receive()? {
                return Ok(frame);
            }

            let mut packet = ffmpeg_next::Packet::empty();
            packet
                .read(&mut self.input)
                .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
            if packet.stream() != self.stream_index {
                continue;
            }
            self.decoder
                .send_packet(&packet)
                .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, CaptureError> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let width = decoded.width();
        let height = decoded.height();
        let layout = ScalerInput {
            format: decoded.format(),
            width,
            height,
        };
        if scaler_is_stale(self.scaler.as_ref().map(|(input, _)| *input), layout) {
            if self.scaler.is_some() {
                log::info!("Camera switched to {:?} {width}x{height}", layout.format);
            }
            let scaler = ffmpeg_next::software::scaling::Context::get(
                layout.format,
                width,
                height,
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
            self.scaler = Some((layout, scaler));
        }
        let Some((_, scaler)) = self.scaler.as_mut() else {
            return Ok(None);
        };

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler
            .run(&decoded, &mut rgb_frame)
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        Ok(Some(Frame::new(pixels, width, height)))
    }
}

/// Copies pixel data from an RGB24 ffmpeg frame into a tightly-packed buffer,
/// dropping any per-row stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}

pub mod ffmpeg_camera;
pub mod image_file_writer;

//! Concat Adapters - 外部媒体工具拼接

mod ffmpeg_concatenator;

pub use ffmpeg_concatenator::{FfmpegConcatenator, FfmpegConcatenatorConfig};

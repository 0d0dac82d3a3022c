//! Video probing and frame extraction through ffprobe/ffmpeg

pub mod frame;
pub mod processor;

pub use frame::{clamp_capture_second, FrameExtractor};
pub use processor::{VideoMetadata, VideoProbe};

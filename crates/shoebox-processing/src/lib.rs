//! Shoebox Media Processing Library
//!
//! Thumbnail generation for images and videos. Decoding, resizing and JPEG
//! encoding go through the `image` and `mozjpeg` crates; video frames are
//! pulled out with an external ffmpeg binary.

pub mod codec;
pub mod compression;
pub mod image;
pub mod thumbnail;
pub mod validator;
pub mod video;

// Re-export commonly used types
pub use codec::{FfmpegCodec, MediaCodec, VideoFrame};
pub use compression::JpegEncoder;
pub use thumbnail::{ThumbnailError, ThumbnailGenerator, Thumbnailer};
pub use validator::{MediaValidator, ValidationError};
pub use video::{FrameExtractor, VideoMetadata, VideoProbe};

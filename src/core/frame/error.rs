use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Animation contains no frames")]
    NoFrames,
    #[error("Invalid frame dimensions: {width}x{height} with {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },
}

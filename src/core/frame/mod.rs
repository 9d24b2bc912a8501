//! 抽帧 - 从 GIF（或静态图片）中取出一张代表帧，供描述 / OCR / 安全检测共用

pub mod error;
pub mod extractor;
pub mod frame;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::FrameError;
pub use extractor::{FrameConfig, FrameExtractor, FrameSelection};
pub use frame::Frame;

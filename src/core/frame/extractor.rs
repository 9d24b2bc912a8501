use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat};
use log::debug;
use serde::Deserialize;

use super::error::FrameError;
use super::frame::Frame;

/// Which frame of an animation stands in for the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSelection {
    #[default]
    First,
    Middle,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub selection: FrameSelection,
    /// Longer-side pixel bound applied before inference; 0 keeps the decoded size.
    pub max_dimension: u32,
}

/// 抽取代表帧：GIF 按配置选帧，其他静态格式直接解码
pub struct FrameExtractor {
    config: FrameConfig,
}

impl FrameExtractor {
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, path: &Path) -> Result<Frame, FrameError> {
        let bytes = std::fs::read(path)?;
        let format = image::guess_format(&bytes)?;
        debug!("Detected {:?} input ({} bytes)", format, bytes.len());

        let frame = match format {
            ImageFormat::Gif => self.extract_gif(&bytes)?,
            _ => {
                let img = image::load_from_memory_with_format(&bytes, format)?;
                Frame::from_rgba_image(img.to_rgba8(), 0, 0)
            }
        };

        frame.fit_within(self.config.max_dimension)
    }

    fn extract_gif(&self, bytes: &[u8]) -> Result<Frame, FrameError> {
        let decoder = GifDecoder::new(Cursor::new(bytes))?;
        let mut frames = decoder.into_frames();

        match self.config.selection {
            FrameSelection::First => {
                let first = frames.next().ok_or(FrameError::NoFrames)??;
                Ok(Frame::from_rgba_image(first.into_buffer(), 0, 0))
            }
            FrameSelection::Middle => {
                // 先数帧，第二遍只保留选中的那一帧
                let count = GifDecoder::new(Cursor::new(bytes))?
                    .into_frames()
                    .try_fold(0usize, |n, frame| frame.map(|_| n + 1))?;
                if count == 0 {
                    return Err(FrameError::NoFrames);
                }

                let index = count / 2;
                let mut timestamp_ms = 0;
                for (i, frame) in frames.enumerate() {
                    let frame = frame?;
                    if i == index {
                        debug!(
                            "Selected middle frame #{} of {} at {}ms",
                            index, count, timestamp_ms
                        );
                        return Ok(Frame::from_rgba_image(
                            frame.into_buffer(),
                            timestamp_ms,
                            index as u64,
                        ));
                    }
                    timestamp_ms += delay_ms(&frame);
                }
                Err(FrameError::NoFrames)
            }
        }
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn delay_ms(frame: &image::Frame) -> u64 {
    let (numer, denom) = frame.delay().numer_denom_ms();
    if denom == 0 {
        0
    } else {
        (numer / denom) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::test_support::{write_test_gif, BLUE, GREEN, RED};
    use tempfile::TempDir;

    fn dominant_channel(frame: &Frame) -> usize {
        let px = &frame.data[0..3];
        (0..3).max_by_key(|&i| px[i]).unwrap()
    }

    #[test]
    fn test_extract_first_frame() {
        let temp = TempDir::new().unwrap();
        let path = write_test_gif(temp.path(), "three.gif", 8, 6, &[RED, GREEN, BLUE]);

        let frame = FrameExtractor::new().extract(&path).unwrap();
        assert_eq!((frame.width, frame.height), (8, 6));
        assert_eq!(frame.frame_number, 0);
        assert_eq!(frame.timestamp.as_millis(), 0);
        assert_eq!(dominant_channel(&frame), 0);
    }

    #[test]
    fn test_extract_middle_frame() {
        let temp = TempDir::new().unwrap();
        let path = write_test_gif(temp.path(), "three.gif", 8, 6, &[RED, GREEN, BLUE]);

        let extractor = FrameExtractor::with_config(FrameConfig {
            selection: FrameSelection::Middle,
            ..Default::default()
        });
        let frame = extractor.extract(&path).unwrap();
        assert_eq!(frame.frame_number, 1);
        assert_eq!(frame.timestamp.as_millis(), 100);
        assert_eq!(dominant_channel(&frame), 1);
    }

    #[test]
    fn test_extract_middle_frame_of_even_length() {
        let temp = TempDir::new().unwrap();
        let path = write_test_gif(temp.path(), "four.gif", 8, 6, &[RED, GREEN, BLUE, RED]);

        let extractor = FrameExtractor::with_config(FrameConfig {
            selection: FrameSelection::Middle,
            ..Default::default()
        });
        let frame = extractor.extract(&path).unwrap();
        assert_eq!(frame.frame_number, 2);
        assert_eq!(frame.timestamp.as_millis(), 200);
        assert_eq!(dominant_channel(&frame), 2);
    }

    #[test]
    fn test_extract_middle_of_single_frame() {
        let temp = TempDir::new().unwrap();
        let path = write_test_gif(temp.path(), "one.gif", 5, 5, &[GREEN]);

        let extractor = FrameExtractor::with_config(FrameConfig {
            selection: FrameSelection::Middle,
            ..Default::default()
        });
        let frame = extractor.extract(&path).unwrap();
        assert_eq!((frame.frame_number, frame.timestamp.as_millis()), (0, 0));
        assert_eq!(dominant_channel(&frame), 1);
    }

    #[test]
    fn test_extract_applies_max_dimension() {
        let temp = TempDir::new().unwrap();
        let path = write_test_gif(temp.path(), "wide.gif", 40, 20, &[RED]);

        let extractor = FrameExtractor::with_config(FrameConfig {
            max_dimension: 10,
            ..Default::default()
        });
        let frame = extractor.extract(&path).unwrap();
        assert_eq!((frame.width, frame.height), (10, 5));
    }

    #[test]
    fn test_extract_still_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("still.png");
        let png = Frame::new(4, 4, vec![90u8; 4 * 4 * 4], 0, 0).to_png().unwrap();
        std::fs::write(&path, png).unwrap();

        let frame = FrameExtractor::new().extract(&path).unwrap();
        assert_eq!((frame.width, frame.height), (4, 4));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = FrameExtractor::new().extract(&temp.path().join("absent.gif"));
        assert!(matches!(result, Err(FrameError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_is_image_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("junk.gif");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = FrameExtractor::new().extract(&path);
        assert!(matches!(result, Err(FrameError::Image(_))));
    }

    #[test]
    fn test_truncated_gif_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("truncated.gif");
        std::fs::write(&path, b"GIF89a\x08\x00").unwrap();

        assert!(FrameExtractor::new().extract(&path).is_err());
    }
}

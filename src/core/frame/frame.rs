use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageOutputFormat, RgbaImage};

use super::error::FrameError;

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        Self {
            width,
            height,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        }
    }

    pub fn from_rgba_image(img: RgbaImage, timestamp_ms: u64, frame_number: u64) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw(), timestamp_ms, frame_number)
    }

    fn to_rgba_image(&self) -> Result<RgbaImage, FrameError> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            FrameError::InvalidDimensions {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            },
        )
    }

    /// Downscale so the longer side is at most `max_side`, keeping aspect ratio.
    /// Frames already within bounds (or `max_side == 0`) are returned unchanged.
    pub fn fit_within(self, max_side: u32) -> Result<Frame, FrameError> {
        let longer = self.width.max(self.height);
        if max_side == 0 || longer <= max_side {
            return Ok(self);
        }

        let scale = max_side as f64 / longer as f64;
        let target_width = ((self.width as f64 * scale).round() as u32).max(1);
        let target_height = ((self.height as f64 * scale).round() as u32).max(1);

        let img = self.to_rgba_image()?;
        let resized = image::imageops::resize(
            &img,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
            timestamp: self.timestamp,
            frame_number: self.frame_number,
        })
    }

    /// PNG 编码，用于上传推理服务
    pub fn to_png(&self) -> Result<Vec<u8>, FrameError> {
        let img = DynamicImage::ImageRgba8(self.to_rgba_image()?);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageOutputFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 4];
        let frame = Frame::new(100, 100, data, 1000, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.data.len(), 100 * 100 * 4);
        assert_eq!(frame.timestamp.as_millis(), 1000);
        assert_eq!(frame.frame_number, 30);
    }

    #[test]
    fn test_fit_within_downscales_longer_side() {
        let frame = Frame::new(200, 100, vec![255u8; 200 * 100 * 4], 0, 0);
        let resized = frame.fit_within(50).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.data.len(), 50 * 25 * 4);
    }

    #[test]
    fn test_fit_within_keeps_small_frames() {
        let frame = Frame::new(32, 32, vec![0u8; 32 * 32 * 4], 0, 7);
        let same = frame.fit_within(64).unwrap();
        assert_eq!((same.width, same.height, same.frame_number), (32, 32, 7));

        let unbounded = same.fit_within(0).unwrap();
        assert_eq!(unbounded.width, 32);
    }

    #[test]
    fn test_to_png_roundtrips_dimensions() {
        let frame = Frame::new(16, 8, vec![200u8; 16 * 8 * 4], 0, 0);
        let png = frame.to_png().unwrap();

        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let frame = Frame::new(10, 10, vec![0u8; 12], 0, 0);
        assert!(matches!(
            frame.to_png(),
            Err(FrameError::InvalidDimensions { width: 10, height: 10, len: 12 })
        ));
    }
}

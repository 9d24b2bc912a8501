use std::fs::File;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame as AnimationFrame, Rgba, RgbaImage};

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const GREEN: [u8; 4] = [0, 255, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];

/// Writes a solid-colour animated GIF, one frame per colour, 100ms per frame.
pub fn write_test_gif(dir: &Path, name: &str, width: u32, height: u32, colors: &[[u8; 4]]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create gif fixture");

    {
        let mut encoder = GifEncoder::new(file);
        let frames = colors.iter().map(|&color| {
            let buffer = RgbaImage::from_pixel(width, height, Rgba(color));
            AnimationFrame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(100, 1))
        });
        encoder.encode_frames(frames).expect("encode gif fixture");
    }

    path
}

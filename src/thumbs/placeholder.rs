//! Fallback image served when no thumbnail can be produced.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::sync::LazyLock;

const SIZE: u32 = 64;
const BACKGROUND: Rgb<u8> = Rgb([0x33, 0x33, 0x33]);
const FRAME: Rgb<u8> = Rgb([0x99, 0x99, 0x99]);

/// Encoded once per process.
static PLACEHOLDER: LazyLock<Vec<u8>> = LazyLock::new(|| {
    let img = RgbImage::from_fn(SIZE, SIZE, |x, y| {
        let edge = x < 2 || y < 2 || x >= SIZE - 2 || y >= SIZE - 2;
        // Diagonal cross marks "no preview"
        let cross = x == y || x + y == SIZE - 1;
        if edge || cross { FRAME } else { BACKGROUND }
    });

    let mut bytes = Vec::new();
    let encoded = JpegEncoder::new_with_quality(&mut bytes, 85).encode_image(&img);
    match encoded {
        Ok(()) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode placeholder thumbnail");
            Vec::new()
        }
    }
});

/// JPEG bytes of the placeholder thumbnail.
pub fn placeholder_jpeg() -> &'static [u8] {
    &PLACEHOLDER
}

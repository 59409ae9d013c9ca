//! Shared test utilities for the thumbdir test suite.
//!
//! Synthetic image writers (real encoded files the prober and resampler can
//! read), small filesystem helpers, and a config that never shells out.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! create_test_png(&tmp.path().join("b.png"), 40, 30);
//! touch(&tmp.path().join("tn_b.jpg"));
//!
//! let dir = Directory::open(tmp.path(), hermetic_config()).unwrap();
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use image::{ImageFormat, RgbImage};

use crate::config::IndexConfig;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a `width`x`height` gradient JPEG.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let writer = BufWriter::new(File::create(path).unwrap());
    image::codecs::jpeg::JpegEncoder::new(writer)
        .encode_image(&img)
        .unwrap();
}

pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn create_test_gif(path: &Path, width: u32, height: u32) {
    image::DynamicImage::ImageRgb8(gradient(width, height))
        .to_rgba8()
        .save_with_format(path, ImageFormat::Gif)
        .unwrap();
}

// =========================================================================
// Filesystem
// =========================================================================

/// Create an empty file.
pub fn touch(path: &Path) {
    fs::write(path, b"").unwrap();
}

/// Set a file's modification time to `secs` after the epoch.
pub fn set_modified(path: &Path, secs: i64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs as u64))
        .unwrap();
}

// =========================================================================
// Config
// =========================================================================

/// Stock config with the external converter disabled, so thumbnail
/// generation always runs in-process.
pub fn hermetic_config() -> IndexConfig {
    let mut config = IndexConfig::default();
    config.thumbnails.converter = String::new();
    config
}

//! Built-in resampling strategy using the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe dimensions | `image::ImageReader::into_dimensions` (content-sniffed, no full decode) |
//! | Decode (GIF, JPEG, PNG) | `image` crate decoders |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resample | `image::DynamicImage::resize_exact` with `Triangle` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! BMP is probed for dimensions but not resampled here; sources in any format
//! other than GIF, JPEG and PNG fail this strategy.

use super::geometry::{Dimensions, Plan, plan_geometry};
use super::spec::{Quality, ThumbnailJob};
use super::strategy::{GenerateError, ThumbnailStrategy};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Formats the built-in path can decode.
const RESAMPLE_FORMATS: &[ImageFormat] = &[ImageFormat::Gif, ImageFormat::Jpeg, ImageFormat::Png];

/// Read image dimensions from the file header, sniffing the format from content.
pub fn probe_dimensions(path: &Path) -> Result<Dimensions, GenerateError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let (width, height) = reader.into_dimensions().map_err(|e| GenerateError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Dimensions::new(width, height))
}

/// Decode `path`, refusing anything outside [`RESAMPLE_FORMATS`].
fn load_image(path: &Path) -> Result<DynamicImage, GenerateError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    match reader.format() {
        Some(format) if RESAMPLE_FORMATS.contains(&format) => {}
        other => {
            return Err(GenerateError::UnsupportedFormat(format!(
                "{} ({})",
                path.display(),
                other.map_or("unknown".to_string(), |f| format!("{f:?}"))
            )));
        }
    }
    reader.decode().map_err(|e| GenerateError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Encode as baseline JPEG at `quality`. Alpha is dropped.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), GenerateError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let quality = u8::try_from(quality.value()).unwrap_or(100);
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| GenerateError::Encode(e.to_string()))
}

/// Pure Rust thumbnailer: crop, resample, encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinResampler;

impl BuiltinResampler {
    pub fn new() -> Self {
        Self
    }
}

impl ThumbnailStrategy for BuiltinResampler {
    fn name(&self) -> &'static str {
        "built-in resampler"
    }

    fn generate(&self, job: &ThumbnailJob) -> Result<(), GenerateError> {
        let img = load_image(&job.source)?;
        let source = Dimensions::new(img.width(), img.height());

        match plan_geometry(source, job.spec) {
            Plan::Copy => {
                std::fs::copy(&job.source, &job.target)?;
                Ok(())
            }
            Plan::Resample { crop, output } => {
                let thumb = img.crop_imm(crop.x, crop.y, crop.width, crop.height).resize_exact(
                    output.width,
                    output.height,
                    FilterType::Triangle,
                );
                save_jpeg(&thumb, &job.target, job.quality)
            }
        }
    }
}

//! Pure calculation functions for thumbnail geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Dimension math is integer-only: derived sides are truncated, and crop
//! offsets are `(source - cropped) / 2`, so odd remainders bias toward the
//! top/left edge.

use super::spec::ThumbnailSpec;
use serde::Serialize;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Region of the source image that gets resampled into the thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    fn full(source: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: source.width,
            height: source.height,
        }
    }
}

/// What the resampler has to do for a given source and spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Spec has no sides set: copy the source byte-for-byte.
    Copy,
    /// Crop `crop` out of the source, then resample it to `output`.
    Resample { crop: CropRect, output: Dimensions },
}

/// Derive the missing side of `spec` from the source aspect ratio.
///
/// Returns `None` for an unscaled spec. A derived side never drops below 1px.
///
/// # Examples
/// ```
/// # use thumbdir::thumbs::{Dimensions, ThumbnailSpec, target_dimensions};
/// // 400x300 source, fixed width 120 → 120x90
/// let spec = ThumbnailSpec::new(Some(120), None);
/// assert_eq!(
///     target_dimensions(Dimensions::new(400, 300), spec),
///     Some(Dimensions::new(120, 90))
/// );
/// ```
pub fn target_dimensions(source: Dimensions, spec: ThumbnailSpec) -> Option<Dimensions> {
    let src_w = u64::from(source.width.max(1));
    let src_h = u64::from(source.height.max(1));

    let (w, h) = match (spec.width, spec.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, truncate(u64::from(w) * src_h / src_w)),
        (None, Some(h)) => (truncate(u64::from(h) * src_w / src_h), h),
        (None, None) => return None,
    };

    Some(Dimensions::new(w, h))
}

/// Compute the centered region of `source` with the aspect ratio of `target`.
///
/// If the target is narrower than the source, the crop trims the width;
/// otherwise it trims the height. The result is never letterboxed.
pub fn cover_crop(source: Dimensions, target: Dimensions) -> CropRect {
    let src_w = u64::from(source.width.max(1));
    let src_h = u64::from(source.height.max(1));
    let tgt_w = u64::from(target.width.max(1));
    let tgt_h = u64::from(target.height.max(1));

    // tgt_w / tgt_h < src_w / src_h, cross-multiplied
    if tgt_w * src_h < src_w * tgt_h {
        // Target is narrower: keep full height, trim width
        let width = truncate(src_h * tgt_w / tgt_h).min(source.width);
        CropRect {
            x: (source.width - width) / 2,
            y: 0,
            width,
            height: source.height,
        }
    } else {
        // Target is wider or equal: keep full width, trim height
        let height = truncate(src_w * tgt_h / tgt_w).min(source.height);
        CropRect {
            x: 0,
            y: (source.height - height) / 2,
            width: source.width,
            height,
        }
    }
}

/// Plan the resample for `source` under `spec`.
///
/// - Both sides set → cover-crop to exactly `spec`.
/// - One side set → the whole source, scaled to the derived size (no crop).
/// - Neither set → [`Plan::Copy`].
pub fn plan_geometry(source: Dimensions, spec: ThumbnailSpec) -> Plan {
    let Some(output) = target_dimensions(source, spec) else {
        return Plan::Copy;
    };

    let crop = if spec.width.is_some() && spec.height.is_some() {
        cover_crop(source, output)
    } else {
        CropRect::full(source)
    };

    Plan::Resample { crop, output }
}

fn truncate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    // =========================================================================
    // target_dimensions
    // =========================================================================

    #[test]
    fn fixed_width_derives_height() {
        let spec = ThumbnailSpec::new(Some(120), None);
        assert_eq!(target_dimensions(dims(400, 300), spec), Some(dims(120, 90)));
    }

    #[test]
    fn fixed_height_derives_width() {
        let spec = ThumbnailSpec::new(None, Some(100));
        assert_eq!(target_dimensions(dims(300, 400), spec), Some(dims(75, 100)));
    }

    #[test]
    fn derived_side_truncates() {
        // 120 * 333 / 1000 = 39.96 → 39
        let spec = ThumbnailSpec::new(Some(120), None);
        assert_eq!(target_dimensions(dims(1000, 333), spec), Some(dims(120, 39)));
    }

    #[test]
    fn derived_side_never_zero() {
        let spec = ThumbnailSpec::new(Some(120), None);
        assert_eq!(target_dimensions(dims(10_000, 10), spec), Some(dims(120, 1)));
    }

    #[test]
    fn both_sides_used_as_is() {
        let spec = ThumbnailSpec::fixed(100, 100);
        assert_eq!(target_dimensions(dims(400, 200), spec), Some(dims(100, 100)));
    }

    #[test]
    fn unscaled_spec_has_no_target() {
        assert_eq!(target_dimensions(dims(400, 200), ThumbnailSpec::default()), None);
    }

    // =========================================================================
    // cover_crop
    // =========================================================================

    #[test]
    fn wide_source_square_target_trims_width() {
        // aspect 2.0 > 1.0 → crop width to 200, centered
        let crop = cover_crop(dims(400, 200), dims(100, 100));
        assert_eq!(
            crop,
            CropRect {
                x: 100,
                y: 0,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn tall_source_square_target_trims_height() {
        let crop = cover_crop(dims(200, 400), dims(100, 100));
        assert_eq!(
            crop,
            CropRect {
                x: 0,
                y: 100,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn same_aspect_keeps_everything() {
        let crop = cover_crop(dims(800, 600), dims(160, 120));
        assert_eq!(crop, CropRect::full(dims(800, 600)));
    }

    #[test]
    fn odd_remainder_biases_top_left() {
        // 301 wide, crop to 200 → 101 spare, offset 50
        let crop = cover_crop(dims(301, 200), dims(100, 100));
        assert_eq!(crop.x, 50);
        assert_eq!(crop.width, 200);

        let crop = cover_crop(dims(200, 301), dims(100, 100));
        assert_eq!(crop.y, 50);
        assert_eq!(crop.height, 200);
    }

    #[test]
    fn crop_stays_inside_source() {
        let crop = cover_crop(dims(7, 3), dims(5, 11));
        assert!(crop.x + crop.width <= 7);
        assert!(crop.y + crop.height <= 3);
        assert!(crop.width >= 1 && crop.height >= 1);
    }

    // =========================================================================
    // plan_geometry
    // =========================================================================

    #[test]
    fn plan_fixed_spec_cover_crops() {
        let plan = plan_geometry(dims(400, 200), ThumbnailSpec::fixed(100, 100));
        assert_eq!(
            plan,
            Plan::Resample {
                crop: CropRect {
                    x: 100,
                    y: 0,
                    width: 200,
                    height: 200
                },
                output: dims(100, 100),
            }
        );
    }

    #[test]
    fn plan_single_side_uses_whole_source() {
        let plan = plan_geometry(dims(1000, 333), ThumbnailSpec::new(Some(120), None));
        assert_eq!(
            plan,
            Plan::Resample {
                crop: CropRect::full(dims(1000, 333)),
                output: dims(120, 39),
            }
        );
    }

    #[test]
    fn plan_unscaled_is_copy() {
        assert_eq!(
            plan_geometry(dims(640, 480), ThumbnailSpec::default()),
            Plan::Copy
        );
    }
}

//! Parameter types for thumbnail generation.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between the [`cache`](super::cache) (which decides where a thumbnail goes)
//! and the [`strategy`](super::strategy) implementations (which do the pixel
//! work or shell out to a converter).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 85). Clamped on construction.
//! - [`ThumbnailSpec`]: target geometry, written `WIDTHxHEIGHT` with either side optional.
//! - [`ThumbnailJob`]: one unit of work for a strategy (source, target, spec and quality).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Quality setting for lossy thumbnail encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid thumbnail dimensions {0:?}: expected WIDTHxHEIGHT, e.g. \"120x\", \"x120\" or \"160x120\"")]
pub struct SpecParseError(pub String);

/// Target thumbnail geometry.
///
/// Either side may be unset, meaning "derive it from the source aspect ratio".
/// With both sides unset the thumbnail is an unscaled copy of the source.
/// A zero side is treated as unset.
///
/// | Written | width | height | Result |
/// |---|---|---|---|
/// | `"160x120"` | 160 | 120 | cover-crop to exactly 160×120 |
/// | `"120x"` | 120 | - | fixed width, height follows aspect |
/// | `"x120"` | - | 120 | fixed height, width follows aspect |
/// | `"x"` | - | - | byte-identical copy |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThumbnailSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ThumbnailSpec {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.filter(|&w| w > 0),
            height: height.filter(|&h| h > 0),
        }
    }

    /// Both sides fixed: the thumbnail is cover-cropped to exactly this size.
    pub fn fixed(width: u32, height: u32) -> Self {
        Self::new(Some(width), Some(height))
    }

    /// True when neither side is set and the "thumbnail" is a plain copy.
    pub fn is_unscaled(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

impl FromStr for ThumbnailSpec {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (w, h) = trimmed.split_once(['x', 'X']).unwrap_or((trimmed, ""));

        let side = |part: &str| -> Result<Option<u32>, SpecParseError> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<u32>()
                .map(Some)
                .map_err(|_| SpecParseError(s.to_string()))
        };

        Ok(Self::new(side(w)?, side(h)?))
    }
}

impl fmt::Display for ThumbnailSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(w) = self.width {
            write!(f, "{w}")?;
        }
        f.write_str("x")?;
        if let Some(h) = self.height {
            write!(f, "{h}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ThumbnailSpec {
    type Error = SpecParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ThumbnailSpec> for String {
    fn from(spec: ThumbnailSpec) -> Self {
        spec.to_string()
    }
}

/// Everything a strategy needs to produce one thumbnail file.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub spec: ThumbnailSpec,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn parse_width_only() {
        let spec: ThumbnailSpec = "120x".parse().unwrap();
        assert_eq!(spec, ThumbnailSpec::new(Some(120), None));
    }

    #[test]
    fn parse_height_only() {
        let spec: ThumbnailSpec = "x90".parse().unwrap();
        assert_eq!(spec, ThumbnailSpec::new(None, Some(90)));
    }

    #[test]
    fn parse_both_sides() {
        assert_eq!(
            "160x120".parse::<ThumbnailSpec>().unwrap(),
            ThumbnailSpec::fixed(160, 120)
        );
    }

    #[test]
    fn parse_bare_number_is_width() {
        assert_eq!(
            "200".parse::<ThumbnailSpec>().unwrap(),
            ThumbnailSpec::new(Some(200), None)
        );
    }

    #[test]
    fn parse_empty_sides_is_unscaled() {
        let spec: ThumbnailSpec = "x".parse().unwrap();
        assert!(spec.is_unscaled());
        assert!("".parse::<ThumbnailSpec>().unwrap().is_unscaled());
    }

    #[test]
    fn zero_side_counts_as_unset() {
        assert_eq!(
            "0x100".parse::<ThumbnailSpec>().unwrap(),
            ThumbnailSpec::new(None, Some(100))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("wide".parse::<ThumbnailSpec>().is_err());
        assert!("12x-4".parse::<ThumbnailSpec>().is_err());
    }

    #[test]
    fn display_matches_written_form() {
        assert_eq!(ThumbnailSpec::new(Some(120), None).to_string(), "120x");
        assert_eq!(ThumbnailSpec::new(None, Some(90)).to_string(), "x90");
        assert_eq!(ThumbnailSpec::fixed(160, 120).to_string(), "160x120");
        assert_eq!(ThumbnailSpec::default().to_string(), "x");
    }
}

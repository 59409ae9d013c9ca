//! External converter strategy (ImageMagick `convert` or compatible).
//!
//! Invocation, with no shell in between:
//!
//! ```text
//! convert <source> -thumbnail "<W>x<H>>" -quality <Q> <target>
//! ```
//!
//! The trailing `>` in the geometry means "only shrink": the output fits
//! within `WxH`, keeps the source aspect ratio, and is never enlarged.
//! An unset side is left empty, which ImageMagick reads as "any".
//! Success is the converter's exit status.

use super::spec::{ThumbnailJob, ThumbnailSpec};
use super::strategy::{GenerateError, ThumbnailStrategy};
use std::process::Command;

/// Shells out to an ImageMagick-compatible converter.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: String,
}

impl ExternalConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the full argument list for `job`.
    pub fn arguments(job: &ThumbnailJob) -> Vec<String> {
        vec![
            job.source.to_string_lossy().into_owned(),
            "-thumbnail".to_string(),
            shrink_geometry(job.spec),
            "-quality".to_string(),
            job.quality.value().to_string(),
            job.target.to_string_lossy().into_owned(),
        ]
    }
}

/// ImageMagick geometry string that fits within `spec` without enlarging.
pub fn shrink_geometry(spec: ThumbnailSpec) -> String {
    format!("{spec}>")
}

impl ThumbnailStrategy for ExternalConverter {
    fn name(&self) -> &'static str {
        "external converter"
    }

    fn generate(&self, job: &ThumbnailJob) -> Result<(), GenerateError> {
        let output = Command::new(&self.program)
            .args(Self::arguments(job))
            .output()
            .map_err(|source| GenerateError::ConverterUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(GenerateError::ConverterFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

//! The ordered strategy chain behind every cache miss.
//!
//! [`ThumbnailGenerator::generate`] probes the source first; files that are
//! not readable images never reach a strategy. An unscaled spec is a plain
//! copy. Otherwise each strategy is tried in order and the first success
//! wins; success counts only if the target file exists. A failed
//! strategy's partial output is removed before the next one
//! runs, so a half-written file can never be mistaken for a cache hit.

use super::convert::ExternalConverter;
use super::resample::{BuiltinResampler, probe_dimensions};
use super::spec::{Quality, ThumbnailJob, ThumbnailSpec};
use super::strategy::{GenerateError, ThumbnailStrategy};
use crate::config::ThumbnailsConfig;
use std::path::Path;

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// How a thumbnail was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produced {
    /// Unscaled spec: the source was copied.
    Copied,
    /// The named strategy succeeded.
    By(&'static str),
}

pub struct ThumbnailGenerator {
    strategies: Vec<Box<dyn ThumbnailStrategy>>,
    spec: ThumbnailSpec,
    quality: Quality,
}

impl ThumbnailGenerator {
    /// The standard chain: external converter (unless disabled), then the
    /// built-in resampler.
    pub fn from_config(config: &ThumbnailsConfig) -> Self {
        let mut strategies: Vec<Box<dyn ThumbnailStrategy>> = Vec::new();
        if !config.converter.trim().is_empty() {
            strategies.push(Box::new(ExternalConverter::new(config.converter.trim())));
        }
        strategies.push(Box::new(BuiltinResampler::new()));
        Self::with_strategies(strategies, config.dimensions, Quality::new(config.quality))
    }

    /// Build a generator with an explicit strategy list (allows testing with mocks).
    pub fn with_strategies(
        strategies: Vec<Box<dyn ThumbnailStrategy>>,
        spec: ThumbnailSpec,
        quality: Quality,
    ) -> Self {
        Self {
            strategies,
            spec,
            quality,
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Produce the thumbnail for `source` at `target`.
    pub fn generate(&self, source: &Path, target: &Path) -> Result<Produced> {
        probe_dimensions(source)?;

        if self.spec.is_unscaled() {
            std::fs::copy(source, target)?;
            return Ok(Produced::Copied);
        }

        let job = ThumbnailJob {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            spec: self.spec,
            quality: self.quality,
        };

        let mut last_error = GenerateError::NoStrategy;
        for strategy in &self.strategies {
            // Exit status alone is not proof: converters may write elsewhere
            // (one file per GIF frame) and still succeed.
            let outcome = strategy.generate(&job).and_then(|()| {
                if target.is_file() {
                    Ok(())
                } else {
                    Err(GenerateError::MissingOutput(target.display().to_string()))
                }
            });
            match outcome {
                Ok(()) => {
                    tracing::debug!(
                        source = %source.display(),
                        strategy = strategy.name(),
                        "thumbnail generated"
                    );
                    return Ok(Produced::By(strategy.name()));
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.display(),
                        strategy = strategy.name(),
                        error = %e,
                        "thumbnail strategy failed"
                    );
                    if target.exists() {
                        let _ = std::fs::remove_file(target);
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

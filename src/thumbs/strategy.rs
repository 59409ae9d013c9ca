//! Thumbnail strategy trait and shared error type.
//!
//! A [`ThumbnailStrategy`] turns one [`ThumbnailJob`] into a file on disk or
//! reports why it couldn't. The [`ThumbnailGenerator`](super::ThumbnailGenerator)
//! holds an ordered list of strategies and tries each in turn:
//!
//! | Order | Strategy | Needs |
//! |---|---|---|
//! | 1 | [`ExternalConverter`](super::ExternalConverter) | an ImageMagick-compatible `convert` on `PATH` |
//! | 2 | [`BuiltinResampler`](super::BuiltinResampler) | nothing: GIF/JPEG/PNG decoders are compiled in |

use super::spec::ThumbnailJob;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),
    #[error("Converter {program:?} is not available: {source}")]
    ConverterUnavailable {
        program: String,
        source: std::io::Error,
    },
    #[error("Converter {program:?} exited with {status}: {stderr}")]
    ConverterFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),
    #[error("Strategy reported success but wrote no output at {0}")]
    MissingOutput(String),
    #[error("No thumbnail strategy available")]
    NoStrategy,
}

/// One way of producing a thumbnail.
///
/// Implementations must write the complete file at `job.target` on success
/// and may leave a partial file behind on failure; the generator cleans up.
pub trait ThumbnailStrategy: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Produce the thumbnail described by `job`.
    fn generate(&self, job: &ThumbnailJob) -> Result<(), GenerateError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::thumbs::spec::{Quality, ThumbnailSpec};
    use std::sync::{Arc, Mutex};

    /// What a [`MockStrategy`] does when asked to generate.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum MockOutcome {
        /// Write a few bytes to the target and succeed.
        Write,
        /// Fail without touching the target.
        Fail,
        /// Write a partial file, then fail.
        FailAfterWrite,
        /// Report success without writing anything.
        SucceedWithoutWriting,
    }

    /// Strategy that records jobs instead of processing images.
    /// Uses Mutex (not RefCell) so it satisfies the `Sync` bound.
    pub struct MockStrategy {
        pub label: &'static str,
        pub outcome: MockOutcome,
        pub jobs: Arc<Mutex<Vec<ThumbnailJob>>>,
    }

    impl MockStrategy {
        pub fn new(label: &'static str, outcome: MockOutcome) -> Self {
            Self {
                label,
                outcome,
                jobs: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Shared handle to the recorded jobs, usable after the mock is boxed.
        pub fn recorder(&self) -> Arc<Mutex<Vec<ThumbnailJob>>> {
            Arc::clone(&self.jobs)
        }
    }

    impl ThumbnailStrategy for MockStrategy {
        fn name(&self) -> &'static str {
            self.label
        }

        fn generate(&self, job: &ThumbnailJob) -> Result<(), GenerateError> {
            self.jobs.lock().unwrap().push(job.clone());
            match self.outcome {
                MockOutcome::Write => {
                    std::fs::write(&job.target, self.label)?;
                    Ok(())
                }
                MockOutcome::SucceedWithoutWriting => Ok(()),
                MockOutcome::Fail => Err(GenerateError::UnsupportedFormat(self.label.into())),
                MockOutcome::FailAfterWrite => {
                    std::fs::write(&job.target, "partial")?;
                    Err(GenerateError::Encode(self.label.into()))
                }
            }
        }
    }

    #[test]
    fn mock_records_jobs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mock = MockStrategy::new("mock", MockOutcome::Write);
        let job = ThumbnailJob {
            source: tmp.path().join("a.jpg"),
            target: tmp.path().join("tn_a.jpg"),
            spec: ThumbnailSpec::fixed(100, 100),
            quality: Quality::new(85),
        };

        mock.generate(&job).unwrap();

        let jobs = mock.recorder();
        let jobs = jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].spec, ThumbnailSpec::fixed(100, 100));
        assert!(tmp.path().join("tn_a.jpg").exists());
    }

    #[test]
    fn mock_failure_leaves_no_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mock = MockStrategy::new("mock", MockOutcome::Fail);
        let job = ThumbnailJob {
            source: tmp.path().join("a.jpg"),
            target: tmp.path().join("tn_a.jpg"),
            spec: ThumbnailSpec::default(),
            quality: Quality::default(),
        };

        assert!(mock.generate(&job).is_err());
        assert!(!job.target.exists());
    }
}

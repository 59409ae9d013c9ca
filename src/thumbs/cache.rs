//! Filesystem thumbnail cache keyed by source filename.
//!
//! There is no manifest: the existence of a file at a deterministic path is
//! the only state. Entries are never invalidated when the source changes,
//! which suits static or append-only media folders.
//!
//! ## Naming
//!
//! `prefix` + filename with its final extension stripped + `.jpg`, original
//! case preserved:
//!
//! ```text
//! Holiday.PNG  →  tn_Holiday.jpg
//! a.tar.gz     →  tn_a.tar.jpg
//! README       →  tn_README.jpg
//! ```
//!
//! ## Resolution order
//!
//! 1. `<dir>/<thumb name>`: a user-supplied override sitting next to the
//!    source. Returned as-is, never validated or regenerated.
//! 2. `<dir>/<cache_dir>/<thumb name>`: a previously generated thumbnail.
//! 3. Miss: [`ThumbnailCache::resolve_or_create`] creates the cache directory
//!    and runs the [`ThumbnailGenerator`]. A failed attempt is not remembered;
//!    the next request tries again.
//!
//! Concurrent first requests for the same thumbnail may both generate it.
//! Generation is idempotent and writes whole files, so the last writer wins
//! with equivalent content.

use super::generator::ThumbnailGenerator;
use crate::config::ThumbnailsConfig;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Extension of every thumbnail file, regardless of source format.
pub const THUMBNAIL_EXTENSION: &str = "jpg";

/// Where a cached thumbnail came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailOrigin {
    /// User-supplied file next to the source.
    Override,
    /// Found in the generated-cache subdirectory.
    Cached,
    /// Generated during this request.
    Generated,
}

/// A thumbnail that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedThumbnail {
    /// Path relative to the served directory, `/`-separated (e.g. `thumbs/tn_a.jpg`).
    pub path: String,
    pub origin: ThumbnailOrigin,
}

pub struct ThumbnailCache {
    dir: PathBuf,
    prefix: String,
    cache_dir: String,
    generator: ThumbnailGenerator,
}

impl ThumbnailCache {
    pub fn new(dir: impl Into<PathBuf>, config: &ThumbnailsConfig) -> Self {
        Self::with_generator(dir, config, ThumbnailGenerator::from_config(config))
    }

    /// Build a cache around an explicit generator (allows testing with mocks).
    pub fn with_generator(
        dir: impl Into<PathBuf>,
        config: &ThumbnailsConfig,
        generator: ThumbnailGenerator,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: config.prefix.clone(),
            cache_dir: config.cache_dir.clone(),
            generator,
        }
    }

    /// Deterministic thumbnail filename for `filename`.
    pub fn thumb_name(&self, filename: &str) -> String {
        thumb_name(&self.prefix, filename)
    }

    /// Absolute path of the generated-cache subdirectory.
    pub fn cache_dir_path(&self) -> PathBuf {
        self.dir.join(&self.cache_dir)
    }

    /// Absolute path for a reference returned by this cache.
    pub fn absolute(&self, thumbnail: &CachedThumbnail) -> PathBuf {
        self.dir.join(&thumbnail.path)
    }

    /// Find an existing thumbnail without generating anything.
    pub fn lookup(&self, filename: &str) -> Option<CachedThumbnail> {
        let name = self.thumb_name(filename);

        if self.dir.join(&name).is_file() {
            return Some(CachedThumbnail {
                path: name,
                origin: ThumbnailOrigin::Override,
            });
        }

        if self.cache_dir_path().join(&name).is_file() {
            return Some(CachedThumbnail {
                path: self.cached_reference(&name),
                origin: ThumbnailOrigin::Cached,
            });
        }

        None
    }

    /// Create the generated-cache subdirectory (and parents) if missing.
    pub fn ensure_cache_dir(&self) -> io::Result<PathBuf> {
        let path = self.cache_dir_path();
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Return an existing thumbnail or generate one into the cache directory.
    ///
    /// `None` means no thumbnail is available for this request; callers render
    /// without one or substitute the placeholder.
    pub fn resolve_or_create(&self, filename: &str) -> Option<CachedThumbnail> {
        if let Some(hit) = self.lookup(filename) {
            tracing::debug!(file = filename, path = %hit.path, "thumbnail cache hit");
            return Some(hit);
        }

        let cache_dir = match self.ensure_cache_dir() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(
                    dir = %self.cache_dir_path().display(),
                    error = %e,
                    "cannot create thumbnail cache directory"
                );
                return None;
            }
        };

        let name = self.thumb_name(filename);
        let source = self.dir.join(filename);
        match self.generator.generate(&source, &cache_dir.join(&name)) {
            Ok(_) => Some(CachedThumbnail {
                path: self.cached_reference(&name),
                origin: ThumbnailOrigin::Generated,
            }),
            Err(e) => {
                tracing::warn!(file = filename, error = %e, "no thumbnail available");
                None
            }
        }
    }

    fn cached_reference(&self, name: &str) -> String {
        format!("{}/{}", self.cache_dir, name)
    }
}

/// `prefix` + `filename` without its last extension + `.jpg`.
pub fn thumb_name(prefix: &str, filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(pos) => &filename[..pos],
        None => filename,
    };
    format!("{prefix}{stem}.{THUMBNAIL_EXTENSION}")
}

/// True if `filename` looks like a thumbnail artifact for `prefix`.
pub fn is_thumbnail_artifact(prefix: &str, filename: &str) -> bool {
    !prefix.is_empty() && filename.starts_with(prefix)
}

impl std::fmt::Debug for ThumbnailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailCache")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .field("cache_dir", &self.cache_dir)
            .field("strategies", &self.generator.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_jpeg;
    use crate::thumbs::spec::{Quality, ThumbnailSpec};
    use crate::thumbs::strategy::tests::{MockOutcome, MockStrategy};
    use crate::thumbs::ThumbnailJob;
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn config() -> ThumbnailsConfig {
        ThumbnailsConfig {
            converter: String::new(),
            ..ThumbnailsConfig::default()
        }
    }

    fn mock_cache(dir: &Path, outcome: MockOutcome) -> (ThumbnailCache, Arc<Mutex<Vec<ThumbnailJob>>>) {
        let mock = MockStrategy::new("mock", outcome);
        let jobs = mock.recorder();
        let generator = ThumbnailGenerator::with_strategies(
            vec![Box::new(mock)],
            ThumbnailSpec::fixed(40, 40),
            Quality::default(),
        );
        (ThumbnailCache::with_generator(dir, &config(), generator), jobs)
    }

    // =========================================================================
    // Naming
    // =========================================================================

    #[test]
    fn thumb_name_strips_last_extension() {
        assert_eq!(thumb_name("tn_", "photo.png"), "tn_photo.jpg");
        assert_eq!(thumb_name("tn_", "a.tar.gz"), "tn_a.tar.jpg");
    }

    #[test]
    fn thumb_name_preserves_case() {
        assert_eq!(thumb_name("tn_", "Holiday.PNG"), "tn_Holiday.jpg");
    }

    #[test]
    fn thumb_name_without_extension() {
        assert_eq!(thumb_name("tn_", "README"), "tn_README.jpg");
    }

    #[test]
    fn artifact_detection_uses_prefix() {
        assert!(is_thumbnail_artifact("tn_", "tn_a.jpg"));
        assert!(!is_thumbnail_artifact("tn_", "a.jpg"));
        assert!(!is_thumbnail_artifact("", "a.jpg"));
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[test]
    fn lookup_miss_on_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let cache = ThumbnailCache::new(tmp.path(), &config());
        assert_eq!(cache.lookup("a.jpg"), None);
        assert!(!cache.cache_dir_path().exists());
    }

    #[test]
    fn lookup_prefers_user_override() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tn_a.jpg"), "override").unwrap();
        fs::create_dir_all(tmp.path().join("thumbs")).unwrap();
        fs::write(tmp.path().join("thumbs/tn_a.jpg"), "cached").unwrap();

        let cache = ThumbnailCache::new(tmp.path(), &config());
        assert_eq!(
            cache.lookup("a.jpg"),
            Some(CachedThumbnail {
                path: "tn_a.jpg".into(),
                origin: ThumbnailOrigin::Override
            })
        );
    }

    #[test]
    fn lookup_finds_generated_cache() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("thumbs")).unwrap();
        fs::write(tmp.path().join("thumbs/tn_a.jpg"), "cached").unwrap();

        let cache = ThumbnailCache::new(tmp.path(), &config());
        let hit = cache.lookup("a.jpg").unwrap();
        assert_eq!(hit.path, "thumbs/tn_a.jpg");
        assert_eq!(hit.origin, ThumbnailOrigin::Cached);
        assert_eq!(cache.absolute(&hit), tmp.path().join("thumbs/tn_a.jpg"));
    }

    // =========================================================================
    // resolve_or_create
    // =========================================================================

    #[test]
    fn override_is_never_regenerated() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 80, 60);
        fs::write(tmp.path().join("tn_a.jpg"), "override").unwrap();

        let (cache, jobs) = mock_cache(tmp.path(), MockOutcome::Write);
        let hit = cache.resolve_or_create("a.jpg").unwrap();

        assert_eq!(hit.origin, ThumbnailOrigin::Override);
        assert!(jobs.lock().unwrap().is_empty());
        assert!(!tmp.path().join("thumbs").exists());
    }

    #[test]
    fn miss_generates_into_cache_dir() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 80, 60);

        let (cache, jobs) = mock_cache(tmp.path(), MockOutcome::Write);
        let hit = cache.resolve_or_create("a.jpg").unwrap();

        assert_eq!(hit.path, "thumbs/tn_a.jpg");
        assert_eq!(hit.origin, ThumbnailOrigin::Generated);
        let jobs = jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, tmp.path().join("a.jpg"));
        assert_eq!(jobs[0].target, tmp.path().join("thumbs/tn_a.jpg"));
    }

    #[test]
    fn second_resolve_hits_cache() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 80, 60);

        let (cache, jobs) = mock_cache(tmp.path(), MockOutcome::Write);
        let first = cache.resolve_or_create("a.jpg").unwrap();
        let second = cache.resolve_or_create("a.jpg").unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(second.origin, ThumbnailOrigin::Cached);
        assert_eq!(jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn failed_generation_is_retried_next_time() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 80, 60);

        let (cache, jobs) = mock_cache(tmp.path(), MockOutcome::Fail);
        assert_eq!(cache.resolve_or_create("a.jpg"), None);
        assert_eq!(cache.resolve_or_create("a.jpg"), None);
        assert_eq!(jobs.lock().unwrap().len(), 2);
    }

    #[test]
    fn unwritable_cache_dir_degrades_to_none() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("a.jpg"), 80, 60);
        // A regular file where the cache directory should be
        fs::write(tmp.path().join("thumbs"), "in the way").unwrap();

        let (cache, jobs) = mock_cache(tmp.path(), MockOutcome::Write);
        assert!(cache.ensure_cache_dir().is_err());
        assert_eq!(cache.resolve_or_create("a.jpg"), None);
        assert!(jobs.lock().unwrap().is_empty());
    }

    #[test]
    fn real_generation_with_builtin_resampler() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("wide.jpg"), 400, 200);
        let config = ThumbnailsConfig {
            dimensions: ThumbnailSpec::fixed(100, 100),
            ..config()
        };

        let cache = ThumbnailCache::new(tmp.path(), &config);
        let hit = cache.resolve_or_create("wide.jpg").unwrap();

        let dims = crate::thumbs::probe_dimensions(&cache.absolute(&hit)).unwrap();
        assert_eq!((dims.width, dims.height), (100, 100));
    }
}

//! Per-file metadata for one listing or detail view.
//!
//! [`MetadataResolver`] turns a name from the [`ContentIndex`] into a
//! [`FileRecord`]: stat data, image dimensions when the file is a raster
//! image the prober can read, a thumbnail reference, and its position with
//! circular neighbors. Positions come from the index itself, never from
//! searching the listing.

use crate::index::{ContentIndex, modified_time};
use crate::thumbs::{CachedThumbnail, Dimensions, ThumbnailCache, probe_dimensions};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Extensions (lowercase) worth probing for pixel dimensions.
pub const DIMENSIONAL_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "jpe", "png", "gif", "bmp"];

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{0} is not in the directory listing")]
    NotInIndex(String),
    #[error("{name} disappeared: {source}")]
    Vanished {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// State of a file's thumbnail at the time the record was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThumbnailRef {
    /// A thumbnail file exists.
    Ready(CachedThumbnail),
    /// Not generated yet; a thumbnail request will create it.
    Pending,
    /// Generation was attempted and failed.
    Unavailable,
    /// The file is not a dimensional image.
    NotApplicable,
}

impl ThumbnailRef {
    pub fn path(&self) -> Option<&str> {
        match self {
            ThumbnailRef::Ready(thumb) => Some(&thumb.path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    /// Text after the last `.`, lowercased. `None` when there is no dot or
    /// nothing follows it.
    pub extension: Option<String>,
    pub size: u64,
    /// Modification time, seconds since the epoch.
    pub modified: i64,
    /// Set only for images that probed successfully.
    pub dimensions: Option<Dimensions>,
    pub thumbnail: ThumbnailRef,
    /// 1-based position in the content index.
    pub position: usize,
    pub previous: String,
    pub next: String,
}

impl FileRecord {
    pub fn is_dimensional(&self) -> bool {
        self.dimensions.is_some()
    }
}

/// Lowercased text after the last `.`, if any.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

pub fn is_dimensional_extension(extension: Option<&str>) -> bool {
    extension.is_some_and(|ext| DIMENSIONAL_EXTENSIONS.contains(&ext))
}

/// Resolves [`FileRecord`]s for one directory.
///
/// With `eager` set, missing thumbnails are generated on the spot (the
/// listing path with `generate_on_list`); otherwise only existing ones are
/// reported and the rest come back as [`ThumbnailRef::Pending`].
pub struct MetadataResolver<'a> {
    dir: PathBuf,
    cache: &'a ThumbnailCache,
    eager: bool,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(dir: impl Into<PathBuf>, cache: &'a ThumbnailCache, eager: bool) -> Self {
        Self {
            dir: dir.into(),
            cache,
            eager,
        }
    }

    pub fn resolve(&self, index: &ContentIndex, name: &str) -> Result<FileRecord, ResolveError> {
        let position = index
            .position(name)
            .ok_or_else(|| ResolveError::NotInIndex(name.to_string()))?;
        self.resolve_at(index, position)
    }

    /// Resolve the entry at a known zero-based `position`.
    pub fn resolve_at(
        &self,
        index: &ContentIndex,
        position: usize,
    ) -> Result<FileRecord, ResolveError> {
        let (name, (previous, next)) = index
            .get(position)
            .zip(index.neighbors(position))
            .ok_or_else(|| ResolveError::NotInIndex(format!("#{position}")))?;

        let meta = fs::metadata(self.dir.join(name)).map_err(|source| ResolveError::Vanished {
            name: name.to_string(),
            source,
        })?;

        let extension = extension_of(name);
        let dimensions = if is_dimensional_extension(extension.as_deref()) {
            self.probe(name)
        } else {
            None
        };
        let thumbnail = match dimensions {
            Some(_) => self.thumbnail_for(name),
            None => ThumbnailRef::NotApplicable,
        };

        Ok(FileRecord {
            name: name.to_string(),
            extension,
            size: meta.len(),
            modified: modified_time(&meta),
            dimensions,
            thumbnail,
            position: position + 1,
            previous: previous.to_string(),
            next: next.to_string(),
        })
    }

    /// Resolve the entries at `positions`, in that order. Entries that
    /// vanished since the scan are skipped.
    pub fn resolve_many(
        &self,
        index: &ContentIndex,
        positions: impl IntoIterator<Item = usize>,
    ) -> Vec<FileRecord> {
        positions
            .into_iter()
            .filter_map(|position| match self.resolve_at(index, position) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping entry");
                    None
                }
            })
            .collect()
    }

    fn probe(&self, name: &str) -> Option<Dimensions> {
        match probe_dimensions(&self.dir.join(name)) {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::debug!(file = name, error = %e, "dimension probe failed");
                None
            }
        }
    }

    fn thumbnail_for(&self, name: &str) -> ThumbnailRef {
        let found = if self.eager {
            self.cache.resolve_or_create(name)
        } else {
            self.cache.lookup(name)
        };
        match (found, self.eager) {
            (Some(thumb), _) => ThumbnailRef::Ready(thumb),
            (None, true) => ThumbnailRef::Unavailable,
            (None, false) => ThumbnailRef::Pending,
        }
    }
}

//! The three request shapes a front end can make against one directory.
//!
//! | Request | Success | Failure |
//! |---------|---------|---------|
//! | [`Directory::list`] | [`Listing`]: records, column bounds, extension counts | never fails; an unreadable directory lists nothing |
//! | [`Directory::detail`] | one dimensional [`FileRecord`] with neighbors | [`RequestError::NotEligible`] (show the list instead) |
//! | [`Directory::thumbnail`] | [`ThumbnailResponse`]: a file or the placeholder | [`RequestError::NotFound`] (404) |
//!
//! A [`Directory`] snapshots the filesystem when it is opened. Open a fresh
//! one per request so additions and removals are picked up.

use crate::classify::FileClassifier;
use crate::config::{ConfigError, IndexConfig, load_config};
use crate::index::ContentIndex;
use crate::layout::{ColumnBounds, partition};
use crate::record::{FileRecord, MetadataResolver, extension_of};
use crate::sort::{SortKey, sort_records};
use crate::thumbs::{CachedThumbnail, ThumbnailCache, placeholder_jpeg};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not eligible for detail view: {0}")]
    NotEligible(String),
}

/// Parameters of a list request. Both are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Only list files with this extension (case-insensitive, leading `.` ignored).
    pub extension: Option<String>,
    /// Re-sort the listing. `None` keeps the index's default order.
    pub sort: Option<SortKey>,
}

impl ListRequest {
    fn extension_filter(&self) -> Option<String> {
        let ext = self.extension.as_deref()?.trim().trim_start_matches('.');
        (!ext.is_empty()).then(|| ext.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub records: Vec<FileRecord>,
    pub columns: ColumnBounds,
    /// Eligible files per lowercased extension, before filtering.
    pub extensions: BTreeMap<String, usize>,
    /// Number of eligible files in the directory, before filtering.
    pub total_in_folder: usize,
}

/// Answer to a thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailResponse {
    /// Serve this file.
    File {
        path: PathBuf,
        thumbnail: CachedThumbnail,
    },
    /// No thumbnail could be produced; serve these bytes instead.
    Placeholder(&'static [u8]),
}

impl ThumbnailResponse {
    pub fn content_type(&self) -> &'static str {
        "image/jpeg"
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ThumbnailResponse::Placeholder(_))
    }
}

pub struct Directory {
    root: PathBuf,
    config: IndexConfig,
    cache: ThumbnailCache,
    index: ContentIndex,
}

impl Directory {
    /// Validate `config` and scan `root`.
    pub fn open(root: impl Into<PathBuf>, config: IndexConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let root = root.into();
        let classifier = FileClassifier::new(&config.listing, &config.thumbnails)?;
        let index = ContentIndex::build(
            &root,
            &classifier,
            config.listing.sort,
            config.listing.date_source,
        );
        let cache = ThumbnailCache::new(&root, &config.thumbnails);
        Ok(Self {
            root,
            config,
            cache,
            index,
        })
    }

    /// Open `root` with the `thumbdir.toml` it contains, or stock defaults.
    pub fn open_with_config_file(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let config = load_config(&root)?;
        Self::open(root, config)
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    pub fn list(&self, request: &ListRequest) -> Listing {
        let mut extensions = BTreeMap::new();
        for name in self.index.iter() {
            if let Some(ext) = extension_of(name) {
                *extensions.entry(ext).or_insert(0) += 1;
            }
        }

        let filter = request.extension_filter();
        let resolver = self.resolver(self.config.thumbnails.generate_on_list);
        let positions = (0..self.index.len()).filter(|&position| {
            match (&filter, self.index.get(position)) {
                (None, _) => true,
                (Some(wanted), Some(name)) => extension_of(name).as_ref() == Some(wanted),
                (Some(_), None) => false,
            }
        });
        let mut records = resolver.resolve_many(&self.index, positions);
        sort_records(&mut records, request.sort);

        let columns = partition(records.len(), self.config.listing.columns);
        Listing {
            records,
            columns,
            extensions,
            total_in_folder: self.index.len(),
        }
    }

    pub fn detail(&self, name: &str) -> Result<FileRecord, RequestError> {
        let not_eligible = || RequestError::NotEligible(name.to_string());
        let record = self
            .resolver(self.config.thumbnails.generate_on_list)
            .resolve(&self.index, name)
            .map_err(|e| {
                tracing::debug!(error = %e, "detail request rejected");
                not_eligible()
            })?;
        if record.is_dimensional() {
            Ok(record)
        } else {
            Err(not_eligible())
        }
    }

    pub fn thumbnail(&self, name: &str) -> Result<ThumbnailResponse, RequestError> {
        if !self.index.contains(name) {
            return Err(RequestError::NotFound(name.to_string()));
        }
        match self.cache.resolve_or_create(name) {
            Some(thumbnail) => Ok(ThumbnailResponse::File {
                path: self.cache.absolute(&thumbnail),
                thumbnail,
            }),
            None => {
                tracing::info!(file = name, "serving placeholder thumbnail");
                Ok(ThumbnailResponse::Placeholder(placeholder_jpeg()))
            }
        }
    }

    fn resolver(&self, eager: bool) -> MetadataResolver<'_> {
        MetadataResolver::new(&self.root, &self.cache, eager)
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("root", &self.root)
            .field("files", &self.index.len())
            .field("cache", &self.cache)
            .finish()
    }
}

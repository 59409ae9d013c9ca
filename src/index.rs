//! The ordered set of eligible filenames in a directory.
//!
//! A [`ContentIndex`] is rebuilt from the live filesystem for every request,
//! so files added or removed between requests show up without any cache
//! invalidation. Everything downstream (positions, circular neighbors, the
//! listing itself) is derived from it.
//!
//! An unreadable directory yields an empty index: callers always get a
//! (possibly empty) listing rather than an error.

use crate::classify::FileClassifier;
use crate::config::DateSource;
use crate::sort::{DefaultOrder, OrderField, name_key, sort_by_direction};
use std::collections::HashMap;
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::UNIX_EPOCH;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ContentIndex {
    /// Scan `dir` once, keep eligible entries, and order them by `order`.
    pub fn build(
        dir: &Path,
        classifier: &FileClassifier,
        order: DefaultOrder,
        date_source: DateSource,
    ) -> Self {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory");
                return Self::default();
            }
        };

        let mut found: Vec<(String, i64)> = Vec::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(entry = ?entry.file_name(), "skipping non UTF-8 filename");
                continue;
            };
            // fs::metadata follows symlinks; dangling links drop out here.
            let Ok(meta) = fs::metadata(entry.path()) else {
                continue;
            };
            if classifier.is_eligible(&name, meta.is_file()) {
                found.push((name, file_timestamp(&meta, date_source)));
            }
        }

        match order.field {
            OrderField::Name => sort_by_direction(&mut found, order.direction, |(name, _)| {
                name_key(name)
            }),
            OrderField::Date => {
                sort_by_direction(&mut found, order.direction, |(_, time)| *time)
            }
        }

        let index = Self::from_names(found.into_iter().map(|(name, _)| name));
        tracing::debug!(dir = %dir.display(), files = index.len(), "content index built");
        index
    }

    /// Build from already-ordered names. Later duplicates are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            let name = name.into();
            if index.positions.contains_key(&name) {
                continue;
            }
            index.positions.insert(name.clone(), index.names.len());
            index.names.push(name);
        }
        index
    }

    /// Zero-based position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Circular `(previous, next)` around `position`. The first entry's
    /// previous is the last, the last entry's next is the first; a single
    /// entry is its own neighbor.
    pub fn neighbors(&self, position: usize) -> Option<(&str, &str)> {
        let len = self.names.len();
        if position >= len {
            return None;
        }
        let previous = (position + len - 1) % len;
        let next = (position + 1) % len;
        Some((&self.names[previous], &self.names[next]))
    }
}

/// Seconds since the epoch for the timestamp `source` selects.
pub fn file_timestamp(meta: &Metadata, source: DateSource) -> i64 {
    match source {
        DateSource::Changed => changed_time(meta).unwrap_or_else(|| modified_time(meta)),
        DateSource::Modified => modified_time(meta),
    }
}

/// Modification time in seconds since the epoch; 0 when unavailable.
pub fn modified_time(meta: &Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(unix)]
fn changed_time(meta: &Metadata) -> Option<i64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ctime())
}

#[cfg(not(unix))]
fn changed_time(_meta: &Metadata) -> Option<i64> {
    None
}

//! # thumbdir
//!
//! A directory lister with cached image thumbnails. Point it at a folder of
//! media and it answers three questions: what is in here, what does this one
//! image look like, and where is its thumbnail.
//!
//! # Architecture: One Snapshot Per Request
//!
//! Every request rebuilds its view of the directory from the live
//! filesystem. Nothing is remembered between requests except thumbnail files
//! on disk:
//!
//! ```text
//! read_dir ─→ FileClassifier ─→ ContentIndex ─→ MetadataResolver ─→ FileRecord
//!                                     │                 │
//!                                     │                 └─→ ThumbnailCache ─→ ThumbnailGenerator
//!                                     └─→ positions, circular neighbors
//! ```
//!
//! [`listing::Directory`] wires these together and exposes the three request
//! shapes (list, detail, thumbnail). Everything is synchronous; concurrent
//! requests are independent.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Which directory entries may be listed (hidden, self, thumbnails, allow-list masks) |
//! | [`index`] | Ordered, deduplicated set of eligible filenames with circular neighbors |
//! | [`record`] | Per-file metadata: size, date, pixel dimensions, thumbnail state |
//! | [`sort`] | Default index order and the six per-request orders |
//! | [`layout`] | Balanced column bounds for the list view |
//! | [`thumbs`] | Thumbnail naming, cache lookup, generation strategies, placeholder |
//! | [`listing`] | List / detail / thumbnail requests against one directory |
//! | [`config`] | `thumbdir.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting (sizes, dates, listing and record views) |
//!
//! # Design Decisions
//!
//! ## Degrade, Never Fail
//!
//! Only two things reach the caller as errors: an invalid config, and a
//! request for a name that is not in the listing ([`listing::RequestError`]).
//! An unreadable directory lists nothing. A corrupt image is listed as a
//! plain file. A thumbnail that cannot be made is reported as unavailable,
//! and a thumbnail request then answers with a placeholder image.
//!
//! ## The Filesystem Is the Cache
//!
//! Thumbnails live in a subdirectory of the served folder under deterministic
//! names (`thumbs/tn_<stem>.jpg`). There is no manifest and no invalidation:
//! a thumbnail exists or it does not. A hand-made `tn_<stem>.jpg` placed next
//! to the image takes precedence and is never touched.
//!
//! ## Strategies, Not Fallback Chains
//!
//! Generation is an ordered list of [`thumbs::ThumbnailStrategy`]
//! implementations: the external converter when configured, then the
//! built-in `image`-crate resampler. The first success wins; a failed
//! strategy's partial output is removed before the next one runs.
//!
//! ## Case-Insensitive Names
//!
//! Allow-list masks, name sorting, and extension grouping all ignore case,
//! in both the default index order and per-request sorts. Sorting is stable.
//!
//! ## Explicit Configuration
//!
//! The resolved [`config::IndexConfig`] is passed into each component when
//! it is built. There are no process-wide settings.

pub mod classify;
pub mod config;
pub mod index;
pub mod layout;
pub mod listing;
pub mod output;
pub mod record;
pub mod sort;
pub mod thumbs;

#[cfg(test)]
pub(crate) mod test_helpers;

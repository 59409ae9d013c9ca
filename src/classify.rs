//! Which directory entries are eligible for listing.
//!
//! An entry is eligible when all of these hold:
//!
//! | Rule | Excludes |
//! |------|----------|
//! | regular file (symlinks followed) | directories, sockets, broken links |
//! | no leading `.` | `.`, `..`, hidden files |
//! | not the serving program | `listing.self_name` |
//! | not the config file | `thumbdir.toml` |
//! | no thumbnail prefix | `tn_*` overrides and artifacts |
//! | matches the allow-list | everything else, when masks are configured |
//!
//! Masks are shell-style (`*`, `?`, `[...]`) and match the whole filename
//! case-insensitively, so `*.jpg` also admits `PHOTO.JPG`.

use crate::config::{CONFIG_FILENAME, ListingConfig, ThumbnailsConfig};
use crate::thumbs::cache::is_thumbnail_artifact;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Compile masks into a case-insensitive set. Blank masks are ignored;
/// `None` means every filename is allowed.
pub fn build_allow_list(masks: &[String]) -> Result<Option<GlobSet>, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for mask in masks.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
        let glob = GlobBuilder::new(mask)
            .case_insensitive(true)
            .literal_separator(true)
            .build()?;
        builder.add(glob);
        any = true;
    }
    if any {
        Ok(Some(builder.build()?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct FileClassifier {
    self_name: Option<String>,
    prefix: String,
    allow: Option<GlobSet>,
}

impl FileClassifier {
    pub fn new(
        listing: &ListingConfig,
        thumbnails: &ThumbnailsConfig,
    ) -> Result<Self, globset::Error> {
        Ok(Self {
            self_name: listing.self_name.clone(),
            prefix: thumbnails.prefix.clone(),
            allow: build_allow_list(&listing.allowed_files)?,
        })
    }

    /// Decide eligibility from the bare filename and whether it is a regular file.
    pub fn is_eligible(&self, name: &str, is_file: bool) -> bool {
        is_file
            && !name.is_empty()
            && !name.starts_with('.')
            && self.self_name.as_deref() != Some(name)
            && name != CONFIG_FILENAME
            && !is_thumbnail_artifact(&self.prefix, name)
            && self.matches_allow_list(name)
    }

    pub fn matches_allow_list(&self, name: &str) -> bool {
        match &self.allow {
            Some(set) => set.is_match(name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(masks: &[&str]) -> FileClassifier {
        let listing = ListingConfig {
            allowed_files: masks.iter().map(|m| m.to_string()).collect(),
            self_name: Some("index.cgi".to_string()),
            ..ListingConfig::default()
        };
        FileClassifier::new(&listing, &ThumbnailsConfig::default()).unwrap()
    }

    #[test]
    fn masks_match_case_insensitively() {
        let c = classifier(&["*.jpg", "*.png"]);
        assert!(c.is_eligible("photo.jpg", true));
        assert!(c.is_eligible("PHOTO.JPG", true));
        assert!(c.is_eligible("Shot.Png", true));
        assert!(!c.is_eligible("notes.txt", true));
    }

    #[test]
    fn wildcard_in_extension() {
        let c = classifier(&["*.htm*"]);
        assert!(c.is_eligible("index.htm", true));
        assert!(c.is_eligible("page.HTML", true));
        assert!(!c.is_eligible("page.xhtml.bak", true));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let c = classifier(&["track?.mp3"]);
        assert!(c.is_eligible("track1.mp3", true));
        assert!(!c.is_eligible("track12.mp3", true));
    }

    #[test]
    fn hidden_and_dot_entries_excluded() {
        let c = classifier(&[]);
        assert!(!c.is_eligible(".hidden.jpg", true));
        assert!(!c.is_eligible(".", true));
        assert!(!c.is_eligible("..", true));
    }

    #[test]
    fn thumbnails_and_self_excluded() {
        let c = classifier(&[]);
        assert!(!c.is_eligible("tn_photo.jpg", true));
        assert!(!c.is_eligible("index.cgi", true));
        assert!(!c.is_eligible(CONFIG_FILENAME, true));
        assert!(c.is_eligible("photo.jpg", true));
    }

    #[test]
    fn directories_excluded() {
        let c = classifier(&[]);
        assert!(!c.is_eligible("thumbs", false));
        assert!(!c.is_eligible("album.jpg", false));
    }

    #[test]
    fn empty_allow_list_allows_everything() {
        let c = classifier(&["", "  "]);
        assert!(c.matches_allow_list("anything.xyz"));
        assert!(c.is_eligible("Makefile", true));
    }

    #[test]
    fn broken_mask_is_an_error() {
        assert!(build_allow_list(&["[abc".to_string()]).is_err());
    }
}

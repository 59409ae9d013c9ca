//! CLI output formatting.
//!
//! # Output Format
//!
//! ## List
//!
//! Records are grouped into the configured columns, each record showing its
//! position in the directory and its metadata as indented context lines:
//!
//! ```text
//! Column 1
//! 001 a.jpg
//!     Size: 2.3 kB
//!     Date: 05 Mar 2024
//!     Dimensions: 60x40
//!     Thumbnail: tn_a.jpg (override)
//! 002 b.png
//!     Size: 812 B
//!     Date: 05 Mar 2024
//!     Dimensions: 40x60
//!     Thumbnail: thumbs/tn_b.jpg (generated)
//!
//! Column 2
//! 004 notes.txt
//!     Size: 10 B
//!     Date: 01 Jan 2024
//!
//! Extensions
//!     jpg: 1 file
//!     png: 2 files
//!     txt: 1 file
//!
//! 4 files in folder
//! ```
//!
//! ## Show
//!
//! The same record block followed by circular navigation:
//!
//! ```text
//! 002 b.png
//!     ...
//!     Previous: a.jpg
//!     Next: notes.txt
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::listing::{Listing, ThumbnailResponse};
use crate::record::{FileRecord, ThumbnailRef};
use crate::thumbs::ThumbnailOrigin;
use chrono::DateTime;
use std::fmt::Write;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Fallback when the configured date format cannot be rendered.
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable file size.
///
/// ```
/// use thumbdir::output::normalize_size;
///
/// assert_eq!(normalize_size(512), "512 B");
/// assert_eq!(normalize_size(2560), "2.5 kB");
/// assert_eq!(normalize_size(3 * 1024 * 1024), "3.0 MB");
/// ```
pub fn normalize_size(bytes: u64) -> String {
    if bytes > MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.1} kB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Render a Unix timestamp (UTC) with a `strftime`-style format.
///
/// An unrenderable format falls back to `%Y-%m-%d`.
pub fn format_date(timestamp: i64, format: &str) -> String {
    let Some(datetime) = DateTime::from_timestamp(timestamp, 0) else {
        return timestamp.to_string();
    };
    let mut out = String::new();
    if write!(out, "{}", datetime.format(format)).is_ok() {
        return out;
    }
    datetime.format(FALLBACK_DATE_FORMAT).to_string()
}

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn origin_label(origin: ThumbnailOrigin) -> &'static str {
    match origin {
        ThumbnailOrigin::Override => "override",
        ThumbnailOrigin::Cached => "cached",
        ThumbnailOrigin::Generated => "generated",
    }
}

fn thumbnail_line(thumbnail: &ThumbnailRef) -> Option<String> {
    match thumbnail {
        ThumbnailRef::Ready(thumb) => Some(format!(
            "{}Thumbnail: {} ({})",
            indent(1),
            thumb.path,
            origin_label(thumb.origin)
        )),
        ThumbnailRef::Pending => Some(format!("{}Thumbnail: pending", indent(1))),
        ThumbnailRef::Unavailable => Some(format!("{}Thumbnail: unavailable", indent(1))),
        ThumbnailRef::NotApplicable => None,
    }
}

fn file_count(n: usize) -> String {
    if n == 1 {
        "1 file".to_string()
    } else {
        format!("{n} files")
    }
}

/// Header plus metadata lines for one record.
pub fn format_record(record: &FileRecord, date_format: &str) -> Vec<String> {
    let mut lines = vec![format!("{} {}", format_index(record.position), record.name)];
    lines.push(format!("{}Size: {}", indent(1), normalize_size(record.size)));
    lines.push(format!(
        "{}Date: {}",
        indent(1),
        format_date(record.modified, date_format)
    ));
    if let Some(dims) = record.dimensions {
        lines.push(format!(
            "{}Dimensions: {}x{}",
            indent(1),
            dims.width,
            dims.height
        ));
    }
    lines.extend(thumbnail_line(&record.thumbnail));
    lines
}

/// Detail view: the record followed by its circular neighbors.
pub fn format_detail(record: &FileRecord, date_format: &str) -> Vec<String> {
    let mut lines = format_record(record, date_format);
    lines.push(format!("{}Previous: {}", indent(1), record.previous));
    lines.push(format!("{}Next: {}", indent(1), record.next));
    lines
}

pub fn format_listing(listing: &Listing, date_format: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for (column, range) in listing.columns.ranges().enumerate() {
        if range.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Column {}", column + 1));
        for record in &listing.records[range] {
            lines.extend(format_record(record, date_format));
        }
    }

    if !listing.extensions.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Extensions".to_string());
        for (ext, count) in &listing.extensions {
            lines.push(format!("{}{}: {}", indent(1), ext, file_count(*count)));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{} in folder", file_count(listing.total_in_folder)));
    lines
}

pub fn format_thumbnail(name: &str, response: &ThumbnailResponse) -> Vec<String> {
    match response {
        ThumbnailResponse::File { path, thumbnail } => vec![
            format!("{} → {}", name, path.display()),
            format!("{}Origin: {}", indent(1), origin_label(thumbnail.origin)),
        ],
        ThumbnailResponse::Placeholder(bytes) => vec![
            format!("{} → placeholder", name),
            format!("{}{} bytes, {}", indent(1), bytes.len(), response.content_type()),
        ],
    }
}

pub fn print_listing(listing: &Listing, date_format: &str) {
    for line in format_listing(listing, date_format) {
        println!("{}", line);
    }
}

pub fn print_detail(record: &FileRecord, date_format: &str) {
    for line in format_detail(record, date_format) {
        println!("{}", line);
    }
}

pub fn print_thumbnail(name: &str, response: &ThumbnailResponse) {
    for line in format_thumbnail(name, response) {
        println!("{}", line);
    }
}

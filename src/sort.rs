//! Ordering for the content index and for listing requests.
//!
//! Two closed vocabularies:
//!
//! - [`DefaultOrder`]: the order a [`ContentIndex`](crate::index::ContentIndex)
//!   is built in, chosen in config as `name+`, `name-`, `date+` or `date-`.
//! - [`SortKey`]: the six per-request orders a listing can ask for, written
//!   as two-letter codes (`na`, `nd`, `da`, `dd`, `ea`, `ed`).
//!
//! Names and extensions compare case-insensitively everywhere; names that
//! differ only in case fall back to the exact string, so unique names never
//! tie. Keys are computed once per element and all sorts are stable: equal
//! keys keep their input order, in both directions.

use crate::record::FileRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

/// Field the content index is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    Name,
    Date,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid sort order {0:?}: expected one of name+, name-, date+, date-")]
pub struct OrderParseError(pub String);

/// Default order of the content index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DefaultOrder {
    pub field: OrderField,
    pub direction: Direction,
}

impl DefaultOrder {
    pub const NAME_ASC: Self = Self {
        field: OrderField::Name,
        direction: Direction::Ascending,
    };

    pub fn new(field: OrderField, direction: Direction) -> Self {
        Self { field, direction }
    }
}

impl Default for DefaultOrder {
    fn default() -> Self {
        Self::NAME_ASC
    }
}

impl FromStr for DefaultOrder {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (field, direction) = match lower.as_str() {
            "name+" => (OrderField::Name, Direction::Ascending),
            "name-" => (OrderField::Name, Direction::Descending),
            "date+" => (OrderField::Date, Direction::Ascending),
            "date-" => (OrderField::Date, Direction::Descending),
            _ => return Err(OrderParseError(s.to_string())),
        };
        Ok(Self::new(field, direction))
    }
}

impl fmt::Display for DefaultOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            OrderField::Name => "name",
            OrderField::Date => "date",
        };
        let sign = match self.direction {
            Direction::Ascending => '+',
            Direction::Descending => '-',
        };
        write!(f, "{field}{sign}")
    }
}

impl TryFrom<String> for DefaultOrder {
    type Error = OrderParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DefaultOrder> for String {
    fn from(order: DefaultOrder) -> Self {
        order.to_string()
    }
}

/// Sort key shared by every name ordering: case-insensitive first, then the
/// exact name, so unique names never tie.
pub fn name_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_string())
}

/// Stable sort by a key computed once per element. `Descending` reverses
/// the key, so equal keys keep their input order in both directions.
pub fn sort_by_direction<T, K, F>(items: &mut [T], direction: Direction, key: F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    match direction {
        Direction::Ascending => items.sort_by_cached_key(key),
        Direction::Descending => items.sort_by_cached_key(|item| Reverse(key(item))),
    }
}

/// Per-request listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    NameAsc,
    NameDesc,
    DateAsc,
    DateDesc,
    ExtAsc,
    ExtDesc,
}

/// Precomputed value a record is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RecordKey {
    Text(String, String),
    Number(i64),
}

type KeyFn = fn(&FileRecord) -> RecordKey;

/// Code → key → (record key, direction), indexed by `SortKey as usize`.
static SORT_TABLE: [(&str, SortKey, KeyFn, Direction); 6] = [
    ("na", SortKey::NameAsc, by_name, Direction::Ascending),
    ("nd", SortKey::NameDesc, by_name, Direction::Descending),
    ("da", SortKey::DateAsc, by_date, Direction::Ascending),
    ("dd", SortKey::DateDesc, by_date, Direction::Descending),
    ("ea", SortKey::ExtAsc, by_extension, Direction::Ascending),
    ("ed", SortKey::ExtDesc, by_extension, Direction::Descending),
];

fn by_name(record: &FileRecord) -> RecordKey {
    let (folded, exact) = name_key(&record.name);
    RecordKey::Text(folded, exact)
}

fn by_date(record: &FileRecord) -> RecordKey {
    RecordKey::Number(record.modified)
}

/// Missing extensions sort as the empty string (first when ascending).
/// Equal extensions tie, keeping input order.
fn by_extension(record: &FileRecord) -> RecordKey {
    let ext = record.extension.as_deref().unwrap_or("").to_lowercase();
    RecordKey::Text(ext, String::new())
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::DateAsc,
        SortKey::DateDesc,
        SortKey::ExtAsc,
        SortKey::ExtDesc,
    ];

    /// Look up a two-letter code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        SORT_TABLE
            .iter()
            .find(|(c, ..)| *c == code)
            .map(|(_, key, ..)| *key)
    }

    pub fn code(self) -> &'static str {
        self.entry().0
    }

    pub fn direction(self) -> Direction {
        self.entry().3
    }

    fn record_key(self) -> KeyFn {
        self.entry().2
    }

    fn entry(self) -> &'static (&'static str, SortKey, KeyFn, Direction) {
        &SORT_TABLE[self as usize]
    }
}

/// Stable-sort `records` by `key`. `None` leaves the order untouched.
pub fn sort_records(records: &mut [FileRecord], key: Option<SortKey>) {
    if let Some(key) = key {
        sort_by_direction(records, key.direction(), key.record_key());
    }
}

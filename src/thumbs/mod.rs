//! Thumbnail generation and caching: external converter first, pure Rust second.
//!
//! | Concern | Module | Crate / function |
//! |---|---|---|
//! | **Geometry** | [`geometry`] | pure integer math (cover-crop, derived sides) |
//! | **Parameters** | [`spec`] | `ThumbnailSpec`, `Quality`, `ThumbnailJob` |
//! | **Strategies** | [`strategy`], [`convert`], [`resample`] | `std::process::Command`; `image` crate |
//! | **Chain** | [`generator`] | ordered strategies, first success wins |
//! | **Cache** | [`cache`] | deterministic filenames, no manifest |
//! | **Fallback** | [`placeholder`] | small JPEG, generated once per process |
//!
//! The module is split so that the math can be unit tested without images,
//! and the chain without a converter or real pixels (see the mock strategy
//! in `strategy::tests`).

pub mod cache;
pub mod convert;
pub mod generator;
pub mod geometry;
pub mod placeholder;
pub mod resample;
pub mod spec;
pub mod strategy;

pub use cache::{CachedThumbnail, ThumbnailCache, ThumbnailOrigin, thumb_name};
pub use convert::ExternalConverter;
pub use generator::{Produced, ThumbnailGenerator};
pub use geometry::{CropRect, Dimensions, Plan, cover_crop, plan_geometry, target_dimensions};
pub use placeholder::placeholder_jpeg;
pub use resample::{BuiltinResampler, probe_dimensions};
pub use spec::{Quality, SpecParseError, ThumbnailJob, ThumbnailSpec};
pub use strategy::{GenerateError, ThumbnailStrategy};

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the corruption module.
pub mod error;

/// Severity levels and per-severity parameter tables.
pub mod severity;

/// Local pixel shuffle used by glass blur.
pub mod shuffle;

/// Gaussian and glass blur.
pub mod blur;

/// Names of the reference corruptions, grouped in catalogs.
pub mod catalog;

/// Reference corruption library.
pub mod library;

/// Noise corruptions.
pub mod noise;

/// Digital and color corruptions.
pub mod digital;

/// Routing of corruption names to their implementation.
pub mod dispatch;

mod unit;

pub use crate::blur::TransformEngine;
pub use crate::catalog::Catalog;
pub use crate::dispatch::{Dispatcher, CUSTOM_CORRUPTIONS};
pub use crate::error::CorruptionError;
pub use crate::library::{BuiltinLibrary, CorruptionLibrary};
pub use crate::severity::Severity;

//! Filter operations
//!
//! Gaussian smoothing over (H, W, C) images, with control over whether the
//! channel axis takes part in the smoothing.

/// Filter kernels
pub mod kernels;

/// Error types for the filter module.
mod error;
pub use error::FilterError;

/// Channel-aware gaussian smoothing primitive.
mod gaussian;
pub use gaussian::*;

/// Calling convention detection for the smoothing primitive.
mod compat;
pub use compat::ChannelConvention;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;

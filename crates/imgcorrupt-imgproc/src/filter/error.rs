use imgcorrupt_image::ImageError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel is empty.
    #[error("Invalid kernel length ({0}, {1})")]
    InvalidKernelLength(usize, usize),

    /// The standard deviation is negative or not finite.
    #[error("Invalid gaussian sigma {0}")]
    InvalidSigma(f64),

    /// The channel axis does not name the last axis of an (H, W, C) image.
    #[error("Invalid channel axis {0} for a 3-dimensional image")]
    InvalidChannelAxis(isize),

    /// No calling convention of the smoothing primitive keeps channels apart.
    #[error("The gaussian smoothing primitive supports no channel-preserving calling convention")]
    IncompatibleConvention,

    /// A configured calling convention failed the capability probe.
    #[error("The gaussian smoothing primitive does not honor the {0} calling convention")]
    UnsupportedConvention(&'static str),

    /// Underlying image error.
    #[error(transparent)]
    Image(#[from] ImageError),
}

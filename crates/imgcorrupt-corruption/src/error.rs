use imgcorrupt_image::ImageError;
use imgcorrupt_imgproc::filter::FilterError;

/// An error type for the corruption module.
#[derive(thiserror::Error, Debug)]
pub enum CorruptionError {
    /// The severity is not an integer in 1..=5.
    #[error("Invalid severity {0}, expected an integer between 1 and 5")]
    InvalidSeverity(i64),

    /// Neither the custom transforms nor the reference library know the name.
    #[error("Unknown corruption: {0}")]
    UnknownCorruption(String),

    /// The reference catalog lists the name but the library does not implement it.
    #[error("Corruption {0} is not implemented by this library")]
    UnsupportedCorruption(String),

    /// The corruption cannot handle images with this many channels.
    #[error("Corruption {name} does not support images with {channels} channels")]
    UnsupportedChannels {
        /// Name of the corruption.
        name: String,
        /// Number of channels of the input image.
        channels: usize,
    },

    /// The gaussian smoothing primitive cannot be called in a channel-preserving way.
    #[error("Broken filter installation. {0}")]
    FilterCompatibility(FilterError),

    /// Error raised by a filter call.
    #[error("Filter error. {0}")]
    Filter(FilterError),

    /// Error to create or convert an image.
    #[error("Image error. {0}")]
    Image(#[from] ImageError),

    /// Error to encode or decode an intermediate image.
    #[error("Codec error. {0}")]
    Codec(#[from] image::ImageError),

    /// A random distribution rejected its parameters.
    #[error("Invalid distribution parameter. {0}")]
    Distribution(String),
}

impl From<FilterError> for CorruptionError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::IncompatibleConvention | FilterError::UnsupportedConvention(_) => {
                CorruptionError::FilterCompatibility(err)
            }
            FilterError::Image(err) => CorruptionError::Image(err),
            err => CorruptionError::Filter(err),
        }
    }
}

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must match in size do not.
    #[error("Image size mismatch ({0}x{1} vs {2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when a pixel coordinate is outside the image.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a channel index is outside the image.
    #[error("Channel index {0} out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),
}

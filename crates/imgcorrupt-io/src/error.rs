/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// The file extension does not name an image format.
    #[error("File does not have a valid image extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] imgcorrupt_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The number of channels has no 8-bit color type.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),
}

use std::path::PathBuf;

use imgcorrupt::{corruption::CorruptionError, image::ImageError, io::IoError};

/// An error type for batch runs.
#[derive(thiserror::Error, Debug)]
pub enum RunnerError {
    /// The configuration file cannot be parsed.
    #[error("Failed to parse the configuration. {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration is complete but contradictory or empty.
    #[error("Invalid configuration. {0}")]
    InvalidConfig(String),

    /// Error to walk the input directory.
    #[error("Failed to walk the input directory. {0}")]
    Walk(#[from] walkdir::Error),

    /// Error to open, read or write a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The source path has no parent directory to derive the output from.
    #[error("Cannot derive an output path for {0}")]
    InvalidPath(PathBuf),

    /// Error to read or write an image.
    #[error("Image I/O error. {0}")]
    ImageIo(#[from] IoError),

    /// Error to create or quantize an image.
    #[error("Image error. {0}")]
    Image(#[from] ImageError),

    /// Error raised by a corruption.
    #[error("Corruption error. {0}")]
    Corruption(#[from] CorruptionError),

    /// Error to set up the progress bar.
    #[error("Invalid progress bar template. {0}")]
    Progress(#[from] indicatif::style::TemplateError),

    /// A thread panicked while holding the manifest writer.
    #[error("The manifest writer is poisoned")]
    SinkPoisoned,
}

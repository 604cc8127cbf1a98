use std::path::{Path, PathBuf};

use imgcorrupt::corruption::Severity;

use crate::error::RunnerError;

/// Suffix of the directory that receives the corrupted copies of a folder.
pub const CORRUPTED_SUFFIX: &str = "_corrupted";

/// Whether a directory name marks a folder of corrupted outputs.
pub fn is_corrupted_dir(name: &str) -> bool {
    name.ends_with(CORRUPTED_SUFFIX)
}

/// Derive where the corrupted copy of an image is written.
///
/// The image `<parent>/<leaf>/<file>` maps to
/// `<parent>/<leaf>_corrupted/<corruption>/<severity>/<file>`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use imgcorrupt::corruption::Severity;
/// use imgcorrupt_cli::layout::output_path;
///
/// let dst = output_path(
///     Path::new("/data/cats/tom.png"),
///     "glass_blur",
///     Severity::new(3).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(dst, Path::new("/data/cats_corrupted/glass_blur/3/tom.png"));
/// ```
pub fn output_path(
    source: &Path,
    corruption: &str,
    severity: Severity,
) -> Result<PathBuf, RunnerError> {
    let invalid = || RunnerError::InvalidPath(source.to_path_buf());

    let file_name = source.file_name().ok_or_else(invalid)?;
    let leaf_dir = source.parent().ok_or_else(invalid)?;
    let leaf = leaf_dir.file_name().ok_or_else(invalid)?.to_string_lossy();
    let parent = leaf_dir.parent().ok_or_else(invalid)?;

    Ok(parent
        .join(format!("{leaf}{CORRUPTED_SUFFIX}"))
        .join(corruption)
        .join(severity.to_string())
        .join(file_name))
}

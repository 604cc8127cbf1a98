use std::path::{Path, PathBuf};

use imgcorrupt::{corruption::Severity, io::functional::has_image_extension};

use crate::{error::RunnerError, layout::is_corrupted_dir};

/// One corruption of one image at one severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptionJob {
    /// Position of the job in its batch. Seeds the random stream of the job.
    pub index: usize,
    /// Path of the source image.
    pub source: PathBuf,
    /// Name of the corruption.
    pub corruption: String,
    /// Severity of the corruption.
    pub severity: Severity,
}

/// Supplies the images of a batch.
pub trait JobSource {
    /// The source images, in a stable order.
    fn images(&self) -> Result<Vec<PathBuf>, RunnerError>;

    /// Every image crossed with every corruption and severity, in that order.
    fn jobs(
        &self,
        corruptions: &[String],
        severities: &[Severity],
    ) -> Result<Vec<CorruptionJob>, RunnerError> {
        let images = self.images()?;

        let mut jobs = Vec::with_capacity(images.len() * corruptions.len() * severities.len());
        for source in images.iter() {
            for corruption in corruptions.iter() {
                for &severity in severities.iter() {
                    jobs.push(CorruptionJob {
                        index: jobs.len(),
                        source: source.clone(),
                        corruption: corruption.clone(),
                        severity,
                    });
                }
            }
        }

        Ok(jobs)
    }
}

/// Every image below a root directory.
///
/// Directories holding corrupted outputs are not entered, so a second run over
/// the same root does not corrupt the corrupted copies.
#[derive(Debug, Clone)]
pub struct DirectoryJobSource {
    root: PathBuf,
}

impl DirectoryJobSource {
    /// Create a source over `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl JobSource for DirectoryJobSource {
    fn images(&self) -> Result<Vec<PathBuf>, RunnerError> {
        let root = std::fs::canonicalize(&self.root)?;

        let mut images = Vec::new();
        let walker = walkdir::WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && is_corrupted_dir(&entry.file_name().to_string_lossy()))
            });

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && has_image_extension(entry.path()) {
                images.push(entry.into_path());
            }
        }

        Ok(images)
    }
}

/// An explicit list of images.
#[derive(Debug, Clone)]
pub struct SelectedJobSource {
    paths: Vec<PathBuf>,
}

impl SelectedJobSource {
    /// Create a source over the given image paths.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl JobSource for SelectedJobSource {
    fn images(&self) -> Result<Vec<PathBuf>, RunnerError> {
        self.paths
            .iter()
            .map(|path| std::fs::canonicalize(path).map_err(RunnerError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};

    fn touch(path: &Path) -> Result<(), RunnerError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(path, b"")?;
        Ok(())
    }

    #[test]
    fn directory_skips_corrupted_outputs() -> Result<(), RunnerError> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path().join("images");
        touch(&root.join("b.png"))?;
        touch(&root.join("a.JPG"))?;
        touch(&root.join("notes.txt"))?;
        touch(&root.join("nested").join("c.webp"))?;
        touch(&root.join("nested_corrupted").join("fog").join("1").join("c.webp"))?;

        let images = DirectoryJobSource::new(&root).images()?;
        let canonical_root = root.canonicalize()?;
        let names = images
            .iter()
            .filter_map(|p| p.strip_prefix(&canonical_root).ok())
            .map(Path::to_path_buf)
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.JPG"),
                PathBuf::from("b.png"),
                PathBuf::from("nested").join("c.webp"),
            ]
        );
        Ok(())
    }

    #[test]
    fn jobs_are_cross_product() -> Result<(), RunnerError> {
        let tmp_dir = tempfile::tempdir()?;
        let a = tmp_dir.path().join("a.png");
        let b = tmp_dir.path().join("b.png");
        touch(&a)?;
        touch(&b)?;

        let source = SelectedJobSource::new(vec![a.clone(), b.clone()]);
        let corruptions = vec!["glass_blur".to_string(), "contrast".to_string()];
        let severities = vec![Severity::new(1)?, Severity::new(4)?];
        let jobs = source.jobs(&corruptions, &severities)?;

        assert_eq!(jobs.len(), 8);
        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(job.index, i);
        }
        assert_eq!(jobs[0].source, a.canonicalize()?);
        assert_eq!(jobs[1].corruption, "glass_blur");
        assert_eq!(jobs[1].severity.level(), 4);
        assert_eq!(jobs[2].corruption, "contrast");
        assert_eq!(jobs[4].source, b.canonicalize()?);
        Ok(())
    }

    #[test]
    fn missing_root_fails() {
        let source = DirectoryJobSource::new("/definitely/not/here");
        assert!(matches!(source.images(), Err(RunnerError::FileError(_))));
    }
}

use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use imgcorrupt::corruption::Severity;
use serde::{Deserialize, Serialize};

use crate::{error::RunnerError, jobs::CorruptionJob};

/// Tag attached to every corrupted sample.
pub const CORRUPTED_TAG: &str = "corrupted";

/// Default file name of the manifest, next to the input root.
pub const MANIFEST_FILE_NAME: &str = "manifest.jsonl";

/// A corrupted image, as registered with the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorruptedSample {
    /// Path of the corrupted image.
    pub filepath: PathBuf,
    /// Dataset tags of the sample.
    pub tags: Vec<String>,
    /// Name of the corruption applied.
    pub corruption_name: String,
    /// Severity of the corruption applied.
    pub corruption_severity: Severity,
    /// Identifier of the source sample, its path.
    pub original_sample_id: String,
}

impl CorruptedSample {
    /// The record of `job` written to `filepath`.
    pub fn new(filepath: impl AsRef<Path>, job: &CorruptionJob) -> Self {
        Self {
            filepath: filepath.as_ref().to_path_buf(),
            tags: vec![CORRUPTED_TAG.to_string()],
            corruption_name: job.corruption.clone(),
            corruption_severity: job.severity,
            original_sample_id: job.source.to_string_lossy().into_owned(),
        }
    }
}

/// Receives the corrupted samples of a run.
///
/// Jobs run in parallel, so sinks are shared across threads.
pub trait ResultSink: Sync {
    /// Register one sample.
    fn register(&self, sample: CorruptedSample) -> Result<(), RunnerError>;

    /// Persist whatever is buffered.
    fn flush(&self) -> Result<(), RunnerError> {
        Ok(())
    }
}

/// Appends one JSON object per sample to a JSON lines file.
#[derive(Debug)]
pub struct ManifestSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl ManifestSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the manifest.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every sample of a manifest.
    pub fn read(path: impl AsRef<Path>) -> Result<Vec<CorruptedSample>, RunnerError> {
        let content = std::fs::read_to_string(path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(RunnerError::from))
            .collect()
    }
}

impl ResultSink for ManifestSink {
    fn register(&self, sample: CorruptedSample) -> Result<(), RunnerError> {
        let line = serde_json::to_string(&sample)?;
        let mut writer = self.writer.lock().map_err(|_| RunnerError::SinkPoisoned)?;
        writeln!(writer, "{line}")?;
        Ok(())
    }

    fn flush(&self) -> Result<(), RunnerError> {
        self.writer
            .lock()
            .map_err(|_| RunnerError::SinkPoisoned)?
            .flush()?;
        Ok(())
    }
}

/// Keeps the samples in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Mutex<Vec<CorruptedSample>>,
}

impl MemorySink {
    /// The samples registered so far, in registration order.
    pub fn samples(&self) -> Result<Vec<CorruptedSample>, RunnerError> {
        Ok(self
            .samples
            .lock()
            .map_err(|_| RunnerError::SinkPoisoned)?
            .clone())
    }
}

impl ResultSink for MemorySink {
    fn register(&self, sample: CorruptedSample) -> Result<(), RunnerError> {
        self.samples
            .lock()
            .map_err(|_| RunnerError::SinkPoisoned)?
            .push(sample);
        Ok(())
    }
}

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Run configuration and command line flags.
pub mod config;

/// Error types for batch runs.
pub mod error;

/// Sources of corruption jobs.
pub mod jobs;

/// Output path convention of corrupted images.
pub mod layout;

/// Parallel execution of corruption jobs.
pub mod runner;

/// Registration of corrupted samples.
pub mod sink;

use imgcorrupt::corruption::{BuiltinLibrary, Dispatcher};

pub use crate::config::{Args, RunConfig, Target};
pub use crate::error::RunnerError;
pub use crate::runner::{RunSummary, Runner, SkipPolicy};

use crate::jobs::{DirectoryJobSource, JobSource, SelectedJobSource};
use crate::sink::ManifestSink;

/// Corrupt the images described by `config` and append them to its manifest.
///
/// Runs on the current rayon pool.
pub fn run(config: &RunConfig) -> Result<RunSummary, RunnerError> {
    let dispatcher = Dispatcher::with_library(config.filter_convention.engine()?, BuiltinLibrary);

    let corruptions = config.selected_corruptions(&dispatcher)?;
    let severities = config.selected_severities()?;
    log::info!(
        "corruptions: {}, severities: {:?}",
        corruptions.join(", "),
        severities.iter().map(|s| s.level()).collect::<Vec<_>>()
    );

    let jobs = match (&config.target, &config.input) {
        (Target::Selected(paths), _) => {
            SelectedJobSource::new(paths.clone()).jobs(&corruptions, &severities)?
        }
        (Target::Entire, Some(input)) => {
            DirectoryJobSource::new(input).jobs(&corruptions, &severities)?
        }
        (Target::Entire, None) => {
            return Err(RunnerError::InvalidConfig(
                "an input directory is required to corrupt the entire dataset".to_string(),
            ))
        }
    };

    if jobs.is_empty() {
        log::warn!("no images found");
        return Ok(RunSummary::default());
    }

    let sink = ManifestSink::create(config.manifest_path()?)?;
    log::info!("registering samples in {}", sink.path().display());

    let seed = config.seed.unwrap_or_else(rand::random);

    let skip_policy = if config.skip_existing {
        SkipPolicy::SkipExisting
    } else {
        SkipPolicy::Always
    };

    Runner::new(dispatcher, sink, seed)
        .with_skip_policy(skip_policy)
        .with_progress(config.progress)
        .run(&jobs)
}

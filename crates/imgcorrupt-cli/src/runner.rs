use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use imgcorrupt::{
    corruption::{BuiltinLibrary, CorruptionLibrary, Dispatcher},
    image::{
        ops::{self, Rounding},
        Image,
    },
    io::functional::{read_image_any_rgb8, write_image},
};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;

use crate::{
    error::RunnerError,
    jobs::CorruptionJob,
    layout,
    sink::{CorruptedSample, ResultSink},
};

/// What to do when the output of a job already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Recompute and overwrite the output.
    #[default]
    Always,
    /// Keep the existing output and only register it.
    SkipExisting,
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The corrupted image was written to this path.
    Written(PathBuf),
    /// The output at this path existed and was kept.
    Skipped(PathBuf),
}

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Jobs whose output was written.
    pub written: usize,
    /// Jobs whose existing output was kept.
    pub skipped: usize,
    /// Jobs that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Number of jobs run.
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

/// Runs corruption jobs in parallel and registers their outputs.
///
/// Every job draws from its own random stream seeded with `seed + job.index`,
/// so the outputs do not depend on scheduling or on the number of threads.
pub struct Runner<S: ResultSink, L: CorruptionLibrary = BuiltinLibrary> {
    dispatcher: Dispatcher<L>,
    sink: S,
    seed: u64,
    skip_policy: SkipPolicy,
    progress: bool,
}

impl<S: ResultSink, L: CorruptionLibrary + Sync> Runner<S, L> {
    /// Create a runner writing its records to `sink`.
    pub fn new(dispatcher: Dispatcher<L>, sink: S, seed: u64) -> Self {
        Self {
            dispatcher,
            sink,
            seed,
            skip_policy: SkipPolicy::default(),
            progress: false,
        }
    }

    /// Set what happens to outputs that already exist.
    pub fn with_skip_policy(mut self, skip_policy: SkipPolicy) -> Self {
        self.skip_policy = skip_policy;
        self
    }

    /// Show a progress bar while running.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The sink of the runner.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one job.
    ///
    /// The source image is read, corrupted, rounded to 8 bits and written to
    /// the derived output path, then registered with the sink. Nothing is
    /// written when any step before the write fails.
    pub fn run_job(&self, job: &CorruptionJob) -> Result<JobOutcome, RunnerError> {
        let dst = layout::output_path(&job.source, &job.corruption, job.severity)?;

        let outcome = if self.skip_policy == SkipPolicy::SkipExisting && dst.exists() {
            log::debug!("keeping existing {}", dst.display());
            JobOutcome::Skipped(dst.clone())
        } else {
            let image = read_image_any_rgb8(&job.source)?;

            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(job.index as u64));
            let corrupted =
                self.dispatcher
                    .run(&image, &job.corruption, job.severity.into(), &mut rng)?;

            let mut quantized = Image::<u8, 3>::from_size_val(corrupted.size(), 0)?;
            ops::quantize_u8(&corrupted, &mut quantized, Rounding::Nearest)?;

            write_image(&dst, &quantized)?;
            JobOutcome::Written(dst.clone())
        };

        self.sink.register(CorruptedSample::new(&dst, job))?;

        Ok(outcome)
    }

    /// Run every job, in parallel on the current rayon pool.
    ///
    /// A failing job is logged and counted and does not stop the others.
    pub fn run(&self, jobs: &[CorruptionJob]) -> Result<RunSummary, RunnerError> {
        log::info!(
            "running {} jobs with base seed {}",
            jobs.len(),
            self.seed
        );

        let pb = if self.progress {
            let pb = ProgressBar::new(jobs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({eta}) {msg} {per_sec}",
                    )?
                    .progress_chars("##>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let written = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        jobs.par_iter()
            .progress_with(pb)
            .for_each(|job| match self.run_job(job) {
                Ok(JobOutcome::Written(_)) => {
                    written.fetch_add(1, Ordering::Relaxed);
                }
                Ok(JobOutcome::Skipped(_)) => {
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    log::warn!(
                        "{} on {} at severity {} failed: {err}",
                        job.corruption,
                        job.source.display(),
                        job.severity
                    );
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            });

        self.sink.flush()?;

        let summary = RunSummary {
            written: written.into_inner(),
            skipped: skipped.into_inner(),
            failed: failed.into_inner(),
        };
        log::info!(
            "{} written, {} skipped, {} failed",
            summary.written,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }
}

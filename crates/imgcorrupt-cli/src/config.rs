use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use argh::FromArgs;
use imgcorrupt::{
    corruption::{Catalog, CorruptionLibrary, Dispatcher, Severity, TransformEngine},
    imgproc::filter::ChannelConvention,
};
use serde::{Deserialize, Serialize};

use crate::{error::RunnerError, sink::MANIFEST_FILE_NAME};

/// Which images of the input a run corrupts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Every image below the input directory.
    #[default]
    Entire,
    /// The listed images only.
    Selected(Vec<PathBuf>),
}

/// How the gaussian filter is told to keep channels apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterConvention {
    /// Probe the filter once and use the first convention that works.
    #[default]
    Auto,
    /// Name the channel axis explicitly.
    ChannelAxis,
    /// Use the legacy multichannel flag.
    Multichannel,
}

impl FilterConvention {
    /// The fixed convention, `None` when it is probed.
    pub fn convention(&self) -> Option<ChannelConvention> {
        match self {
            FilterConvention::Auto => None,
            FilterConvention::ChannelAxis => Some(ChannelConvention::ChannelAxis),
            FilterConvention::Multichannel => Some(ChannelConvention::MultichannelFlag),
        }
    }

    /// Build a transform engine with this convention.
    pub fn engine(&self) -> Result<TransformEngine, RunnerError> {
        let engine = match self.convention() {
            Some(convention) => TransformEngine::with_convention(convention)?,
            None => TransformEngine::new()?,
        };
        log::debug!("gaussian channel convention: {}", engine.convention());
        Ok(engine)
    }
}

impl std::str::FromStr for FilterConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(FilterConvention::Auto),
            "channel_axis" => Ok(FilterConvention::ChannelAxis),
            "multichannel" => Ok(FilterConvention::Multichannel),
            _ => Err(format!("unknown filter convention: {s}")),
        }
    }
}

fn default_severities() -> BTreeSet<Severity> {
    BTreeSet::from([Severity::MIN])
}

/// Everything a batch run needs to know.
///
/// Every field has a default, so a JSON configuration only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Root directory of the images.
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Catalog the corruptions are taken from.
    #[serde(default)]
    pub corruption_type: Catalog,

    /// Run every corruption of the catalog.
    #[serde(default)]
    pub select_all: bool,

    /// Corruptions to run when `select_all` is off.
    #[serde(default)]
    pub corruptions: BTreeSet<String>,

    /// Severities to run.
    #[serde(default = "default_severities")]
    pub severities: BTreeSet<Severity>,

    /// Images to corrupt.
    #[serde(default)]
    pub target: Target,

    /// Base seed of the per-job random streams. Drawn at random when missing.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Leave outputs that already exist untouched.
    #[serde(default)]
    pub skip_existing: bool,

    /// Channel convention of the gaussian filter.
    #[serde(default)]
    pub filter_convention: FilterConvention,

    /// Number of worker threads. Rayon decides when missing.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Manifest path. Defaults to `manifest.jsonl` in the input directory.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Show a progress bar.
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_progress() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            corruption_type: Catalog::default(),
            select_all: false,
            corruptions: BTreeSet::new(),
            severities: default_severities(),
            target: Target::default(),
            seed: None,
            skip_existing: false,
            filter_convention: FilterConvention::default(),
            threads: None,
            manifest: None,
            progress: default_progress(),
        }
    }
}

impl RunConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The corruptions to run, in catalog order.
    ///
    /// With `select_all` this is every name of the catalog the dispatcher can
    /// run; names without an implementation are left out. Otherwise it is the
    /// requested names that belong to the catalog, including unimplemented
    /// ones, which then fail job by job.
    pub fn selected_corruptions<L: CorruptionLibrary>(
        &self,
        dispatcher: &Dispatcher<L>,
    ) -> Result<Vec<String>, RunnerError> {
        let selected = if self.select_all {
            dispatcher.names(self.corruption_type)
        } else {
            for name in self.corruptions.iter() {
                if !self.corruption_type.contains(name) || !dispatcher.is_known(name) {
                    log::warn!(
                        "ignoring corruption {name}, not in the {} catalog",
                        self.corruption_type
                    );
                }
            }
            self.corruption_type
                .names()
                .into_iter()
                .filter(|name| self.corruptions.contains(*name) && dispatcher.is_known(name))
                .collect()
        };
        let selected = selected
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        if selected.is_empty() {
            return Err(RunnerError::InvalidConfig(format!(
                "no corruption selected from the {} catalog",
                self.corruption_type
            )));
        }

        Ok(selected)
    }

    /// The severities to run, mildest first.
    pub fn selected_severities(&self) -> Result<Vec<Severity>, RunnerError> {
        if self.severities.is_empty() {
            return Err(RunnerError::InvalidConfig(
                "no severity selected".to_string(),
            ));
        }
        Ok(self.severities.iter().copied().collect())
    }

    /// Where the manifest is written.
    pub fn manifest_path(&self) -> Result<PathBuf, RunnerError> {
        if let Some(manifest) = &self.manifest {
            return Ok(manifest.clone());
        }
        match (&self.input, &self.target) {
            (Some(input), _) => Ok(input.join(MANIFEST_FILE_NAME)),
            (None, Target::Selected(_)) => Ok(PathBuf::from(MANIFEST_FILE_NAME)),
            (None, Target::Entire) => Err(RunnerError::InvalidConfig(
                "an input directory is required to corrupt the entire dataset".to_string(),
            )),
        }
    }
}

#[derive(FromArgs, Debug)]
/// Corrupt a folder of images at configurable severities.
pub struct Args {
    /// root directory of the images
    #[argh(option, short = 'i')]
    pub input: Option<PathBuf>,

    /// path to a JSON run configuration
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,

    /// catalog of corruptions: common, validation, all, noise, blur, weather or digital
    #[argh(option)]
    pub corruption_type: Option<Catalog>,

    /// comma separated corruption names
    #[argh(option)]
    pub corruptions: Option<String>,

    /// run every corruption of the catalog
    #[argh(switch)]
    pub select_all: bool,

    /// severity between 1 and 5, repeatable
    #[argh(option, short = 's')]
    pub severity: Vec<i64>,

    /// run the five severities
    #[argh(switch)]
    pub all_severities: bool,

    /// only corrupt this image, repeatable
    #[argh(option)]
    pub select: Vec<PathBuf>,

    /// base seed of the random streams
    #[argh(option)]
    pub seed: Option<u64>,

    /// do not recompute outputs that already exist
    #[argh(switch)]
    pub skip_existing: bool,

    /// number of worker threads
    #[argh(option, short = 'n')]
    pub threads: Option<usize>,

    /// path of the JSON lines manifest
    #[argh(option)]
    pub manifest: Option<PathBuf>,

    /// gaussian filter convention: auto, channel_axis or multichannel
    #[argh(option)]
    pub filter_convention: Option<FilterConvention>,

    /// hide the progress bar
    #[argh(switch)]
    pub no_progress: bool,
}

impl Args {
    /// The run configuration: the configuration file, if any, overridden by the flags.
    pub fn into_config(self) -> Result<RunConfig, RunnerError> {
        let config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        self.apply(config)
    }

    /// Override `config` with the flags that were given.
    pub fn apply(self, mut config: RunConfig) -> Result<RunConfig, RunnerError> {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(corruption_type) = self.corruption_type {
            config.corruption_type = corruption_type;
        }
        if let Some(corruptions) = self.corruptions {
            config.corruptions = corruptions
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        config.select_all |= self.select_all;

        if self.all_severities {
            config.severities = Severity::all().collect();
        } else if !self.severity.is_empty() {
            config.severities = self
                .severity
                .into_iter()
                .map(Severity::new)
                .collect::<Result<_, _>>()?;
        }

        if !self.select.is_empty() {
            config.target = Target::Selected(self.select);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.skip_existing |= self.skip_existing;
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if self.manifest.is_some() {
            config.manifest = self.manifest;
        }
        if let Some(filter_convention) = self.filter_convention {
            config.filter_convention = filter_convention;
        }
        if self.no_progress {
            config.progress = false;
        }

        Ok(config)
    }
}

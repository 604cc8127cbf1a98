use std::sync::OnceLock;

use imgcorrupt_image::{Image, ImageSize};

use super::{gaussian_with_strategy, ChannelArg, FilterError, FloatConversion};
use crate::parallel::ExecutionStrategy;

/// Calling convention used to keep channels apart when smoothing.
///
/// The smoothing primitive has been called in two ways over time: with a boolean
/// multichannel flag, and with an explicit channel axis index. A convention is
/// picked once, by probing the primitive, and then reused for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelConvention {
    /// Pass the index of the channel axis (`-1`).
    ChannelAxis,
    /// Pass the legacy `multichannel = true` flag.
    MultichannelFlag,
}

static DETECTED: OnceLock<Option<ChannelConvention>> = OnceLock::new();

impl ChannelConvention {
    /// Conventions in order of preference.
    pub const ALL: [ChannelConvention; 2] = [
        ChannelConvention::ChannelAxis,
        ChannelConvention::MultichannelFlag,
    ];

    /// Pick the calling convention honored by the smoothing primitive.
    ///
    /// The probe runs on the first call only; later calls return the cached result.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleConvention`] if no convention keeps channels apart,
    /// which points at a broken build rather than at bad input.
    pub fn detect() -> Result<Self, FilterError> {
        let detected = DETECTED.get_or_init(|| {
            let found = Self::ALL.into_iter().find(|c| c.probe());
            log::debug!("gaussian channel convention detected: {found:?}");
            found
        });
        detected.ok_or(FilterError::IncompatibleConvention)
    }

    /// Check that the smoothing primitive honors this convention.
    pub fn verify(self) -> Result<Self, FilterError> {
        if self.probe() {
            Ok(self)
        } else {
            Err(FilterError::UnsupportedConvention(self.name()))
        }
    }

    /// Short name of the convention.
    pub fn name(&self) -> &'static str {
        match self {
            ChannelConvention::ChannelAxis => "channel_axis",
            ChannelConvention::MultichannelFlag => "multichannel",
        }
    }

    /// The argument shape the primitive expects under this convention.
    pub fn channel_arg(&self) -> ChannelArg {
        match self {
            ChannelConvention::ChannelAxis => ChannelArg::ChannelAxis(Some(-1)),
            ChannelConvention::MultichannelFlag => ChannelArg::Multichannel(true),
        }
    }

    /// Smooth the spatial axes of `src` into `dst`, each channel on its own.
    pub fn smooth<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        sigma: f64,
        strategy: ExecutionStrategy,
    ) -> Result<(), FilterError>
    where
        T: FloatConversion + Send + Sync,
    {
        gaussian_with_strategy(src, dst, sigma, self.channel_arg(), strategy)
    }

    // A spatially flat two-channel image is a fixed point of channel-aware smoothing
    // and is changed by any smoothing that reaches across channels.
    fn probe(&self) -> bool {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let Ok(src) = Image::<f32, 2>::new(size, [0.0, 1.0].repeat(9)) else {
            return false;
        };
        let Ok(mut dst) = Image::<f32, 2>::from_size_val(size, f32::NAN) else {
            return false;
        };

        match self.smooth(&src, &mut dst, 1.0, ExecutionStrategy::Serial) {
            Ok(()) => dst
                .as_slice()
                .iter()
                .zip(src.as_slice())
                .all(|(a, b)| (a - b).abs() < 1e-6),
            Err(err) => {
                log::debug!("{} convention rejected: {err}", self.name());
                false
            }
        }
    }
}

impl std::fmt::Display for ChannelConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ChannelConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "channel_axis" => Ok(ChannelConvention::ChannelAxis),
            "multichannel" => Ok(ChannelConvention::MultichannelFlag),
            other => Err(format!("unknown channel convention: {other}")),
        }
    }
}

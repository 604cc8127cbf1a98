use imgcorrupt_image::{Image, ImageError};

use super::{kernels, separable_filter, FilterError, FloatConversion};
use crate::parallel::ExecutionStrategy;

/// How a caller tells the smoothing primitive which axis holds the channels.
///
/// Two calling conventions exist for the same request. Both are accepted; see
/// [`super::ChannelConvention`] for picking one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelArg {
    /// Legacy boolean flag. `true` marks the last axis as the channel axis.
    Multichannel(bool),
    /// Explicit channel axis index. Negative values count from the end,
    /// `None` declares that the image has no channel axis.
    ChannelAxis(Option<isize>),
}

impl ChannelArg {
    /// Whether the channel axis of an (H, W, C) image is left out of the smoothing.
    pub fn excludes_channels(&self) -> Result<bool, FilterError> {
        match *self {
            ChannelArg::Multichannel(flag) => Ok(flag),
            ChannelArg::ChannelAxis(None) => Ok(false),
            ChannelArg::ChannelAxis(Some(axis)) => {
                let normalized = if axis < 0 { axis + 3 } else { axis };
                if normalized == 2 {
                    Ok(true)
                } else {
                    Err(FilterError::InvalidChannelAxis(axis))
                }
            }
        }
    }
}

/// Smooth an image with a gaussian kernel.
///
/// The kernel is truncated at four standard deviations and samples outside the
/// image replicate the nearest edge sample. The spatial axes are always smoothed;
/// the channel axis only when `channels` does not exclude it. Weights and sums
/// are kept in f64 whatever the sample type.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `sigma` - The standard deviation of the kernel, in pixels. Zero copies the image.
/// * `channels` - Which axis, if any, holds the channels.
///
/// # Example
///
/// ```
/// use imgcorrupt_image::{Image, ImageSize};
/// use imgcorrupt_imgproc::filter::{gaussian, ChannelArg};
///
/// let image = Image::<f32, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     0.5,
/// )
/// .unwrap();
///
/// let mut blurred = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();
/// gaussian(&image, &mut blurred, 1.0, ChannelArg::ChannelAxis(Some(-1))).unwrap();
///
/// assert!(blurred.as_slice().iter().all(|&v| (v - 0.5).abs() < 1e-6));
/// ```
pub fn gaussian<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    sigma: f64,
    channels: ChannelArg,
) -> Result<(), FilterError>
where
    T: FloatConversion + Send + Sync,
{
    gaussian_with_strategy(src, dst, sigma, channels, ExecutionStrategy::Auto)
}

/// Smooth an image with a gaussian kernel, with execution strategy control.
///
/// See [`gaussian`].
pub fn gaussian_with_strategy<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    sigma: f64,
    channels: ChannelArg,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: FloatConversion + Send + Sync,
{
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(FilterError::InvalidSigma(sigma));
    }

    let excludes_channels = channels.excludes_channels()?;

    if sigma == 0.0 {
        if src.size() != dst.size() {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                dst.cols(),
                dst.rows(),
            )
            .into());
        }
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let kernel = kernels::gaussian_kernel_1d_truncated(sigma, kernels::DEFAULT_TRUNCATE);
    separable_filter(src, dst, &kernel, &kernel, strategy)?;

    if !excludes_channels && C > 1 {
        smooth_channel_axis::<T, C>(dst.as_slice_mut(), &kernel);
    }

    Ok(())
}

// 1D convolution along the channel axis of every pixel, edges replicated.
fn smooth_channel_axis<T: FloatConversion, const C: usize>(data: &mut [T], kernel: &[f64]) {
    let half = (kernel.len() / 2) as isize;
    let last = C as isize - 1;
    data.chunks_exact_mut(C).for_each(|pixel| {
        let mut acc = [0.0f64; C];
        for (ch, acc_val) in acc.iter_mut().enumerate() {
            let center = pixel[ch].to_f64();
            for (i, &k) in kernel.iter().enumerate() {
                let src_ch = (ch as isize + i as isize - half).clamp(0, last) as usize;
                *acc_val += (pixel[src_ch].to_f64() - center) * k;
            }
            *acc_val += center;
        }
        for (out, &acc_val) in pixel.iter_mut().zip(acc.iter()) {
            *out = T::from_f64(acc_val);
        }
    });
}

use imgcorrupt_image::{
    ops::{self, Rounding},
    Image,
};
use imgcorrupt_imgproc::{filter::ChannelConvention, parallel::ExecutionStrategy};
use rand::Rng;

use crate::{
    error::CorruptionError,
    severity::{GlassBlurParams, Severity, GAUSSIAN_BLUR_SIGMA, GLASS_BLUR_PARAMS},
    shuffle::shuffle_pixels,
    unit::to_unit_f64,
};

/// The blur transforms implemented in-house.
///
/// The engine holds the calling convention of the smoothing primitive, resolved
/// once when the engine is built, and the row-level execution strategy of the
/// filter. Both blurs compute in f64 and return `f32` images on the [0, 255]
/// scale, left unrounded.
#[derive(Debug, Clone, Copy)]
pub struct TransformEngine {
    convention: ChannelConvention,
    strategy: ExecutionStrategy,
}

impl TransformEngine {
    /// Build an engine, probing the smoothing primitive for its calling convention.
    ///
    /// # Errors
    ///
    /// [`CorruptionError::FilterCompatibility`] if no convention works.
    pub fn new() -> Result<Self, CorruptionError> {
        Ok(Self {
            convention: ChannelConvention::detect()?,
            strategy: ExecutionStrategy::Auto,
        })
    }

    /// Build an engine with a given calling convention, after checking it works.
    pub fn with_convention(convention: ChannelConvention) -> Result<Self, CorruptionError> {
        Ok(Self {
            convention: convention.verify()?,
            strategy: ExecutionStrategy::Auto,
        })
    }

    /// Set the execution strategy of the smoothing passes.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The calling convention in use.
    pub fn convention(&self) -> ChannelConvention {
        self.convention
    }

    // x / 255, smoothed, clipped to [0, 1] and scaled back to [0, 255]
    fn smooth_bytes<const C: usize>(
        &self,
        image: &Image<u8, C>,
        sigma: f64,
    ) -> Result<Image<f64, C>, CorruptionError> {
        let src = to_unit_f64(image);
        let mut dst = Image::from_size_val(src.size(), 0.0)?;
        self.convention.smooth(&src, &mut dst, sigma, self.strategy)?;
        ops::clip_and_scale_inplace(&mut dst, 0.0, 1.0, 255.0);
        Ok(dst)
    }

    /// Blur every channel of an image with a gaussian kernel.
    ///
    /// # Example
    ///
    /// ```
    /// use imgcorrupt_corruption::{Severity, TransformEngine};
    /// use imgcorrupt_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 8,
    ///         height: 8,
    ///     },
    ///     200,
    /// )
    /// .unwrap();
    ///
    /// let engine = TransformEngine::new().unwrap();
    /// let blurred = engine.gaussian_blur(&image, Severity::new(2).unwrap()).unwrap();
    ///
    /// assert_eq!(blurred.size(), image.size());
    /// assert!(blurred.as_slice().iter().all(|&v| (v - 200.0).abs() < 1e-2));
    /// ```
    pub fn gaussian_blur<const C: usize>(
        &self,
        image: &Image<u8, C>,
        severity: Severity,
    ) -> Result<Image<f32, C>, CorruptionError> {
        let sigma = severity.select(&GAUSSIAN_BLUR_SIGMA);
        let blurred = self.smooth_bytes(image, sigma)?;
        Ok(blurred.map(|&v| v as f32))
    }

    /// Blur an image, locally shuffle its pixels and blur it again.
    pub fn glass_blur<const C: usize, R: Rng>(
        &self,
        image: &Image<u8, C>,
        severity: Severity,
        rng: &mut R,
    ) -> Result<Image<f32, C>, CorruptionError> {
        self.glass_blur_with_params(image, severity.select(&GLASS_BLUR_PARAMS), rng)
    }

    /// Glass blur with explicit parameters.
    ///
    /// The first smoothing pass is quantized to 8 bits by truncation before the
    /// shuffle, so the shuffle moves integer pixel values.
    pub fn glass_blur_with_params<const C: usize, R: Rng>(
        &self,
        image: &Image<u8, C>,
        params: GlassBlurParams,
        rng: &mut R,
    ) -> Result<Image<f32, C>, CorruptionError> {
        let mut shuffled = self.glass_prepass(image, params.sigma)?;
        shuffle_pixels(&mut shuffled, params.max_delta, params.iterations, rng);

        let blurred = self.smooth_bytes(&shuffled, params.sigma)?;
        Ok(blurred.map(|&v| v as f32))
    }

    /// First glass blur pass: smooth and quantize to 8 bits.
    ///
    /// Flat regions keep their exact value through the smoothing, so a
    /// constant image is returned unchanged.
    pub fn glass_prepass<const C: usize>(
        &self,
        image: &Image<u8, C>,
        sigma: f64,
    ) -> Result<Image<u8, C>, CorruptionError> {
        let blurred = self.smooth_bytes(image, sigma)?;
        let mut quantized = Image::<u8, C>::from_size_val(image.size(), 0)?;
        ops::quantize_u8(&blurred, &mut quantized, Rounding::Truncate)?;
        Ok(quantized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::ImageSize;
    use rand::{rngs::StdRng, SeedableRng};

    fn gradient() -> Result<Image<u8, 3>, CorruptionError> {
        let size = ImageSize {
            width: 24,
            height: 20,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| ((i * 7) % 256) as u8)
            .collect();
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn gaussian_blur_shape_and_range() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let image = gradient()?;
        for severity in Severity::all() {
            let out = engine.gaussian_blur(&image, severity)?;
            assert_eq!(out.size(), image.size());
            assert!(out.as_slice().iter().all(|&v| (0.0..=255.0).contains(&v)));
        }
        Ok(())
    }

    #[test]
    fn gaussian_blur_is_stronger_with_severity() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let image = gradient()?;
        let spread = |img: &Image<f32, 3>| {
            let mean = img.as_slice().iter().sum::<f32>() / img.as_slice().len() as f32;
            img.as_slice().iter().map(|v| (v - mean).powi(2)).sum::<f32>()
        };
        let mild = engine.gaussian_blur(&image, Severity::MIN)?;
        let strong = engine.gaussian_blur(&image, Severity::MAX)?;
        assert!(spread(&strong) < spread(&mild));
        Ok(())
    }

    #[test]
    fn glass_blur_shape_and_range() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let image = gradient()?;
        let mut rng = StdRng::seed_from_u64(1);
        for severity in Severity::all() {
            let out = engine.glass_blur(&image, severity, &mut rng)?;
            assert_eq!(out.size(), image.size());
            assert!(out.as_slice().iter().all(|&v| (0.0..=255.0).contains(&v)));
        }
        Ok(())
    }

    #[test]
    fn glass_blur_reseeded_is_identical() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let image = gradient()?;
        let first = engine.glass_blur(&image, Severity::MAX, &mut StdRng::seed_from_u64(9))?;
        let second = engine.glass_blur(&image, Severity::MAX, &mut StdRng::seed_from_u64(9))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn glass_prepass_keeps_flat_images() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let size = ImageSize {
            width: 64,
            height: 64,
        };
        for value in [255u8, 128, 0, 1] {
            let image = Image::<u8, 3>::from_size_val(size, value)?;
            for params in GLASS_BLUR_PARAMS {
                let quantized = engine.glass_prepass(&image, params.sigma)?;
                assert_eq!(quantized, image, "value {value} sigma {}", params.sigma);
            }
        }
        Ok(())
    }

    #[test]
    fn blurs_keep_white_images_white() -> Result<(), CorruptionError> {
        let engine = TransformEngine::new()?;
        let image = Image::<u8, 3>::from_size_val([32, 24].into(), 255)?;
        let mut rng = StdRng::seed_from_u64(5);
        for severity in Severity::all() {
            let blurred = engine.gaussian_blur(&image, severity)?;
            assert!(blurred.as_slice().iter().all(|&v| v == 255.0));
            let glass = engine.glass_blur(&image, severity, &mut rng)?;
            assert!(glass.as_slice().iter().all(|&v| v == 255.0));
        }
        Ok(())
    }

    #[test]
    fn conventions_blur_identically() -> Result<(), CorruptionError> {
        let image = gradient()?;
        let by_axis = TransformEngine::with_convention(ChannelConvention::ChannelAxis)?;
        let by_flag = TransformEngine::with_convention(ChannelConvention::MultichannelFlag)?;
        for severity in Severity::all() {
            assert_eq!(
                by_axis.gaussian_blur(&image, severity)?,
                by_flag.gaussian_blur(&image, severity)?
            );
        }
        Ok(())
    }

    #[test]
    fn strategies_blur_identically() -> Result<(), CorruptionError> {
        let image = gradient()?;
        let serial = TransformEngine::new()?.with_strategy(ExecutionStrategy::Serial);
        let parallel = TransformEngine::new()?.with_strategy(ExecutionStrategy::Parallel);
        assert_eq!(
            serial.gaussian_blur(&image, Severity::MAX)?,
            parallel.gaussian_blur(&image, Severity::MAX)?
        );
        Ok(())
    }
}

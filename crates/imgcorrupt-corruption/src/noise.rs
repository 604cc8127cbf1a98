use imgcorrupt_image::Image;
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

use crate::{
    error::CorruptionError,
    severity::{Severity, SeverityTable},
    unit::{to_byte_scale, to_unit},
};

/// Standard deviation of the additive gaussian noise per severity.
pub const GAUSSIAN_NOISE_STD: SeverityTable<f32> = [0.08, 0.12, 0.18, 0.26, 0.38];

/// Photon count scale of the shot noise per severity. Lower is noisier.
pub const SHOT_NOISE_SCALE: SeverityTable<f32> = [60.0, 25.0, 12.0, 5.0, 3.0];

/// Fraction of samples replaced by salt or pepper per severity.
pub const IMPULSE_NOISE_AMOUNT: SeverityTable<f64> = [0.03, 0.06, 0.09, 0.17, 0.27];

/// Standard deviation of the multiplicative gaussian noise per severity.
pub const SPECKLE_NOISE_STD: SeverityTable<f32> = [0.15, 0.2, 0.35, 0.45, 0.6];

// Applies `f` to every [0, 1] sample in buffer order, then clips and rescales.
fn per_sample<const C: usize, R: Rng>(
    image: &Image<u8, C>,
    rng: &mut R,
    mut f: impl FnMut(f32, &mut R) -> f32,
) -> Result<Image<f32, C>, CorruptionError> {
    let mut unit = to_unit(image)?;
    unit.as_slice_mut()
        .iter_mut()
        .for_each(|x| *x = f(*x, rng));
    Ok(to_byte_scale(unit))
}

fn normal(std: f32) -> Result<Normal<f32>, CorruptionError> {
    Normal::new(0.0, std).map_err(|e| CorruptionError::Distribution(e.to_string()))
}

/// Add zero-mean gaussian noise to every sample.
pub fn gaussian_noise<const C: usize, R: Rng>(
    image: &Image<u8, C>,
    severity: Severity,
    rng: &mut R,
) -> Result<Image<f32, C>, CorruptionError> {
    let normal = normal(severity.select(&GAUSSIAN_NOISE_STD))?;
    per_sample(image, rng, |x, rng| x + normal.sample(rng))
}

/// Replace every sample with a Poisson draw around its scaled value.
pub fn shot_noise<const C: usize, R: Rng>(
    image: &Image<u8, C>,
    severity: Severity,
    rng: &mut R,
) -> Result<Image<f32, C>, CorruptionError> {
    let scale = severity.select(&SHOT_NOISE_SCALE);

    let mut unit = to_unit(image)?;
    for x in unit.as_slice_mut().iter_mut() {
        let lambda = (*x * scale) as f64;
        // a zero rate always counts zero photons
        let count = if lambda > 0.0 {
            Poisson::new(lambda)
                .map_err(|e| CorruptionError::Distribution(e.to_string()))?
                .sample(rng)
        } else {
            0.0
        };
        *x = count as f32 / scale;
    }
    Ok(to_byte_scale(unit))
}

/// Replace random samples with black or white, with even odds.
pub fn impulse_noise<const C: usize, R: Rng>(
    image: &Image<u8, C>,
    severity: Severity,
    rng: &mut R,
) -> Result<Image<f32, C>, CorruptionError> {
    let amount = severity.select(&IMPULSE_NOISE_AMOUNT);
    per_sample(image, rng, |x, rng| {
        if rng.random_bool(amount) {
            if rng.random_bool(0.5) {
                1.0
            } else {
                0.0
            }
        } else {
            x
        }
    })
}

/// Add gaussian noise proportional to every sample.
pub fn speckle_noise<const C: usize, R: Rng>(
    image: &Image<u8, C>,
    severity: Severity,
    rng: &mut R,
) -> Result<Image<f32, C>, CorruptionError> {
    let normal = normal(severity.select(&SPECKLE_NOISE_STD))?;
    per_sample(image, rng, |x, rng| x + x * normal.sample(rng))
}

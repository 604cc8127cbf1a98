use imgcorrupt_image::Image;
use rand::Rng;

use crate::{catalog::Catalog, digital, error::CorruptionError, noise, severity::Severity};

/// A library of reference corruptions, addressed by name.
///
/// The dispatcher hands every name it does not implement itself to a library,
/// together with the validated severity and the caller's random stream.
pub trait CorruptionLibrary {
    /// Whether the library recognizes `name`.
    fn knows(&self, name: &str) -> bool;

    /// Whether the library can run `name`, as opposed to only recognizing it.
    fn implements(&self, name: &str) -> bool {
        self.knows(name)
    }

    /// Apply the corruption `name` to an 8-bit image.
    ///
    /// The output is on the [0, 255] scale and keeps the size and channels of
    /// the input.
    fn corrupt<const C: usize, R: Rng>(
        &self,
        image: &Image<u8, C>,
        name: &str,
        severity: Severity,
        rng: &mut R,
    ) -> Result<Image<f32, C>, CorruptionError>;
}

/// The corruptions shipped with the crate.
///
/// The library recognizes every name of [`Catalog::All`] and implements the
/// noise corruptions and the pixel-level digital ones. The rest of the
/// catalog fails with [`CorruptionError::UnsupportedCorruption`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLibrary;

impl BuiltinLibrary {
    /// Names this library can run.
    pub const IMPLEMENTED: [&'static str; 9] = [
        "gaussian_noise",
        "shot_noise",
        "impulse_noise",
        "speckle_noise",
        "contrast",
        "brightness",
        "saturate",
        "pixelate",
        "jpeg_compression",
    ];
}

impl CorruptionLibrary for BuiltinLibrary {
    fn knows(&self, name: &str) -> bool {
        Catalog::All.contains(name)
    }

    fn implements(&self, name: &str) -> bool {
        Self::IMPLEMENTED.contains(&name)
    }

    fn corrupt<const C: usize, R: Rng>(
        &self,
        image: &Image<u8, C>,
        name: &str,
        severity: Severity,
        rng: &mut R,
    ) -> Result<Image<f32, C>, CorruptionError> {
        match name {
            "gaussian_noise" => noise::gaussian_noise(image, severity, rng),
            "shot_noise" => noise::shot_noise(image, severity, rng),
            "impulse_noise" => noise::impulse_noise(image, severity, rng),
            "speckle_noise" => noise::speckle_noise(image, severity, rng),
            "contrast" => digital::contrast(image, severity),
            "brightness" => digital::brightness(image, severity),
            "saturate" => digital::saturate(image, severity),
            "pixelate" => digital::pixelate(image, severity),
            "jpeg_compression" => digital::jpeg_compression(image, severity),
            name if self.knows(name) => {
                Err(CorruptionError::UnsupportedCorruption(name.to_string()))
            }
            name => Err(CorruptionError::UnknownCorruption(name.to_string())),
        }
    }
}

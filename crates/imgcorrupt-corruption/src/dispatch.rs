use imgcorrupt_image::Image;
use rand::Rng;

use crate::{
    blur::TransformEngine,
    catalog::Catalog,
    error::CorruptionError,
    library::{BuiltinLibrary, CorruptionLibrary},
    severity::Severity,
};

/// Corruptions implemented by the [`TransformEngine`] rather than the library.
pub const CUSTOM_CORRUPTIONS: [&str; 2] = ["gaussian_blur", "glass_blur"];

/// Routes a corruption name to its implementation.
///
/// `gaussian_blur` and `glass_blur` run on the transform engine. Every other
/// name is handed unchanged to the corruption library.
///
/// # Example
///
/// ```
/// use imgcorrupt_corruption::{CorruptionError, Dispatcher};
/// use imgcorrupt_image::{Image, ImageSize};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let image = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 32,
///         height: 32,
///     },
///     128,
/// )
/// .unwrap();
///
/// let dispatcher = Dispatcher::new().unwrap();
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let corrupted = dispatcher.run(&image, "glass_blur", 3, &mut rng).unwrap();
/// assert_eq!(corrupted.size(), image.size());
///
/// let res = dispatcher.run(&image, "glass_blur", 6, &mut rng);
/// assert!(matches!(res, Err(CorruptionError::InvalidSeverity(6))));
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher<L = BuiltinLibrary> {
    engine: TransformEngine,
    library: L,
}

impl Dispatcher<BuiltinLibrary> {
    /// Create a dispatcher over the built-in library, probing the filter convention.
    pub fn new() -> Result<Self, CorruptionError> {
        Ok(Self::with_library(TransformEngine::new()?, BuiltinLibrary))
    }
}

impl<L: CorruptionLibrary> Dispatcher<L> {
    /// Create a dispatcher from an engine and a library.
    pub fn with_library(engine: TransformEngine, library: L) -> Self {
        Self { engine, library }
    }

    /// The transform engine.
    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// Whether `name` is a custom corruption or known to the library.
    pub fn is_known(&self, name: &str) -> bool {
        CUSTOM_CORRUPTIONS.contains(&name) || self.library.knows(name)
    }

    /// Whether `name` is a custom corruption or implemented by the library.
    pub fn is_runnable(&self, name: &str) -> bool {
        CUSTOM_CORRUPTIONS.contains(&name) || self.library.implements(name)
    }

    /// The names of a catalog that this dispatcher can run.
    ///
    /// Names the library only recognizes are left out and logged.
    pub fn names(&self, catalog: Catalog) -> Vec<&'static str> {
        let (runnable, missing): (Vec<_>, Vec<_>) = catalog
            .names()
            .into_iter()
            .partition(|name| self.is_runnable(name));
        if !missing.is_empty() {
            log::warn!(
                "skipping {} corruptions of the {catalog} catalog without an implementation: {}",
                missing.len(),
                missing.join(", ")
            );
        }
        runnable
    }

    /// Corrupt an 8-bit image.
    ///
    /// # Arguments
    ///
    /// * `image` - The input image. It is not modified.
    /// * `name` - The corruption name.
    /// * `severity` - The severity, an integer in 1..=5.
    /// * `rng` - The random stream of this call.
    ///
    /// # Returns
    ///
    /// The corrupted image on the [0, 255] scale, not yet quantized.
    ///
    /// # Errors
    ///
    /// [`CorruptionError::InvalidSeverity`] for a severity outside 1..=5, checked
    /// before anything else, and [`CorruptionError::UnknownCorruption`] for a
    /// name neither the engine nor the library knows.
    pub fn run<const C: usize, R: Rng>(
        &self,
        image: &Image<u8, C>,
        name: &str,
        severity: i64,
        rng: &mut R,
    ) -> Result<Image<f32, C>, CorruptionError> {
        let severity = Severity::new(severity)?;

        log::debug!(
            "corrupting {}x{}x{} image with {name} at severity {severity}",
            image.width(),
            image.height(),
            C
        );

        match name {
            "gaussian_blur" => self.engine.gaussian_blur(image, severity),
            "glass_blur" => self.engine.glass_blur(image, severity, rng),
            name if self.library.knows(name) => {
                self.library.corrupt(image, name, severity, rng)
            }
            name => Err(CorruptionError::UnknownCorruption(name.to_string())),
        }
    }
}

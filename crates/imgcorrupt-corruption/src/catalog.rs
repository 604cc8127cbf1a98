use serde::{Deserialize, Serialize};

const COMMON: &[&str] = &[
    "gaussian_noise",
    "shot_noise",
    "impulse_noise",
    "defocus_blur",
    "glass_blur",
    "motion_blur",
    "zoom_blur",
    "snow",
    "frost",
    "fog",
    "brightness",
    "contrast",
    "elastic_transform",
    "pixelate",
    "jpeg_compression",
];

const VALIDATION: &[&str] = &["speckle_noise", "gaussian_blur", "spatter", "saturate"];

/// A named group of reference corruptions.
///
/// `Noise`, `Blur`, `Weather` and `Digital` split the common catalog by kind.
///
/// # Example
///
/// ```
/// use imgcorrupt_corruption::Catalog;
///
/// assert_eq!(Catalog::Noise.names().len(), 3);
/// assert!(Catalog::Validation.contains("gaussian_blur"));
/// assert!(!Catalog::Common.contains("gaussian_blur"));
/// assert_eq!("weather".parse::<Catalog>().unwrap(), Catalog::Weather);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// The fifteen common corruptions.
    #[default]
    Common,
    /// The four held-out validation corruptions.
    Validation,
    /// Common followed by validation.
    All,
    /// Noise corruptions of the common catalog.
    Noise,
    /// Blur corruptions of the common catalog.
    Blur,
    /// Weather corruptions of the common catalog.
    Weather,
    /// Digital corruptions of the common catalog.
    Digital,
}

impl Catalog {
    /// Every catalog.
    pub const ALL: [Catalog; 7] = [
        Catalog::Common,
        Catalog::Validation,
        Catalog::All,
        Catalog::Noise,
        Catalog::Blur,
        Catalog::Weather,
        Catalog::Digital,
    ];

    /// The corruption names of the catalog, in reference order.
    pub fn names(&self) -> Vec<&'static str> {
        match self {
            Catalog::Common => COMMON.to_vec(),
            Catalog::Validation => VALIDATION.to_vec(),
            Catalog::All => COMMON.iter().chain(VALIDATION).copied().collect(),
            Catalog::Noise => COMMON[0..3].to_vec(),
            Catalog::Blur => COMMON[3..7].to_vec(),
            Catalog::Weather => COMMON[7..11].to_vec(),
            Catalog::Digital => COMMON[11..15].to_vec(),
        }
    }

    /// Whether the catalog lists `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }

    /// The lowercase name of the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            Catalog::Common => "common",
            Catalog::Validation => "validation",
            Catalog::All => "all",
            Catalog::Noise => "noise",
            Catalog::Blur => "blur",
            Catalog::Weather => "weather",
            Catalog::Digital => "digital",
        }
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Catalog {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::ALL
            .into_iter()
            .find(|catalog| catalog.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown corruption catalog: {s}"))
    }
}

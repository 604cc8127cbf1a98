use serde::{Deserialize, Serialize};

use crate::error::CorruptionError;

/// Number of severity levels.
pub const NUM_SEVERITIES: usize = 5;

/// A table with one entry per severity level, lowest severity first.
pub type SeverityTable<T> = [T; NUM_SEVERITIES];

/// Parameters of one glass blur severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassBlurParams {
    /// Standard deviation of both smoothing passes, in pixels.
    pub sigma: f64,
    /// Radius of the local pixel shuffle.
    pub max_delta: usize,
    /// Number of shuffle passes.
    pub iterations: usize,
}

/// Gaussian blur sigma per severity.
pub const GAUSSIAN_BLUR_SIGMA: SeverityTable<f64> = [1.0, 2.0, 3.0, 4.0, 6.0];

/// Glass blur parameters per severity.
pub const GLASS_BLUR_PARAMS: SeverityTable<GlassBlurParams> = [
    GlassBlurParams {
        sigma: 0.7,
        max_delta: 1,
        iterations: 2,
    },
    GlassBlurParams {
        sigma: 0.9,
        max_delta: 2,
        iterations: 1,
    },
    GlassBlurParams {
        sigma: 1.0,
        max_delta: 2,
        iterations: 3,
    },
    GlassBlurParams {
        sigma: 1.1,
        max_delta: 3,
        iterations: 2,
    },
    GlassBlurParams {
        sigma: 1.5,
        max_delta: 4,
        iterations: 2,
    },
];

/// Severity of a corruption, from 1 (mild) to 5 (strong).
///
/// # Examples
///
/// ```
/// use imgcorrupt_corruption::Severity;
/// use imgcorrupt_corruption::severity::GAUSSIAN_BLUR_SIGMA;
///
/// let severity = Severity::new(5).unwrap();
/// assert_eq!(severity.select(&GAUSSIAN_BLUR_SIGMA), 6.0);
///
/// assert!(Severity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Severity(u8);

impl Severity {
    /// Mildest severity.
    pub const MIN: Severity = Severity(1);

    /// Strongest severity.
    pub const MAX: Severity = Severity(NUM_SEVERITIES as u8);

    /// Create a severity from an integer level.
    ///
    /// # Errors
    ///
    /// [`CorruptionError::InvalidSeverity`] if `level` is not in 1..=5.
    pub fn new(level: i64) -> Result<Self, CorruptionError> {
        if (1..=NUM_SEVERITIES as i64).contains(&level) {
            Ok(Severity(level as u8))
        } else {
            Err(CorruptionError::InvalidSeverity(level))
        }
    }

    /// The integer level, in 1..=5.
    pub fn level(&self) -> u8 {
        self.0
    }

    /// Zero-based row of this severity in a [`SeverityTable`].
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// Pick this severity's entry of a parameter table.
    pub fn select<T: Copy>(&self, table: &SeverityTable<T>) -> T {
        table[self.index()]
    }

    /// Every severity, mildest first.
    pub fn all() -> impl Iterator<Item = Severity> {
        (1..=NUM_SEVERITIES as u8).map(Severity)
    }
}

impl TryFrom<i64> for Severity {
    type Error = CorruptionError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Severity::new(level)
    }
}

impl From<Severity> for i64 {
    fn from(severity: Severity) -> Self {
        severity.0 as i64
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ELEVATED_RATIO;
use crate::error::{Error, Result};

/// Severity of one reading relative to its regulatory limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Safe,
    Elevated,
    Exceeded,
}

impl SeverityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityTier::Safe => "Safe",
            SeverityTier::Elevated => "Elevated",
            SeverityTier::Exceeded => "Exceeded",
        }
    }
}

/// Maps a (value, limit) pair to a [`SeverityTier`].
///
/// A metric without a configured limit is always `Safe`: a missing
/// regulation is never rendered as a violation. Callers that need to tell
/// "no limit" apart still have the `None` limit on the series entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classifier {
    elevated_ratio: f64,
}

impl Classifier {
    /// `elevated_ratio` is the fraction of the limit above which a reading
    /// becomes `Elevated`; it must lie strictly between 0 and 1.
    pub fn new(elevated_ratio: f64) -> Result<Self> {
        if elevated_ratio.is_finite() && elevated_ratio > 0.0 && elevated_ratio < 1.0 {
            Ok(Classifier { elevated_ratio })
        } else {
            Err(Error::InvalidRatio(elevated_ratio))
        }
    }

    pub fn elevated_ratio(&self) -> f64 {
        self.elevated_ratio
    }

    pub fn classify(&self, value: f64, limit: Option<f64>) -> SeverityTier {
        let Some(limit) = limit else {
            return SeverityTier::Safe;
        };
        if value > limit {
            SeverityTier::Exceeded
        } else if value > self.elevated_ratio * limit {
            SeverityTier::Elevated
        } else {
            SeverityTier::Safe
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            elevated_ratio: DEFAULT_ELEVATED_RATIO,
        }
    }
}

/// Classify with the default elevated ratio.
pub fn classify(value: f64, limit: Option<f64>) -> SeverityTier {
    Classifier::default().classify(value, limit)
}

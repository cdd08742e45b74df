//! Accept/reject outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an avatar was rejected.
///
/// Variants are declared in reporting order; reasons in a [`Verdict`] always
/// follow this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Not enough sharp edges.
    TooBlurry,
    /// No face could be found.
    NoFace,
    /// The center of the photo is too dark or too bright.
    BadBrightness,
    /// The short side is below the minimum resolution.
    LowResolution,
    /// The face is tilted beyond the allowed angle.
    NotFrontal,
}

impl FailureReason {
    /// Stable snake_case code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooBlurry => "too_blurry",
            Self::NoFace => "no_face",
            Self::BadBrightness => "bad_brightness",
            Self::LowResolution => "low_resolution",
            Self::NotFrontal => "not_frontal",
        }
    }

    /// Human-readable explanation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TooBlurry => "The photo is blurry",
            Self::NoFace => "No face was detected in the photo",
            Self::BadBrightness => "The photo is too dark or too bright",
            Self::LowResolution => "The photo resolution is too low",
            Self::NotFrontal => "The face must look straight at the camera",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The outcome of evaluating one set of metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// True iff `reasons` is empty.
    pub accepted: bool,
    /// Every failed check, in [`FailureReason`] declaration order.
    pub reasons: Vec<FailureReason>,
}

impl Verdict {
    /// Builds a verdict from the failed checks.
    #[must_use]
    pub fn from_reasons(mut reasons: Vec<FailureReason>) -> Self {
        reasons.sort_unstable();
        reasons.dedup();
        Self {
            accepted: reasons.is_empty(),
            reasons,
        }
    }

    /// Returns true if the given reason is present.
    #[must_use]
    pub fn has(&self, reason: FailureReason) -> bool {
        self.reasons.contains(&reason)
    }
}

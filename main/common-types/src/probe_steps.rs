use crate::TryFromRangeError;
use derive_more::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of intervals into which a probe divides its search interval.
///
/// A probe visits `steps + 1` candidates, each one costing a write and a read round trip to the
/// host. The upper bound caps that cost, the lower bound keeps the resolution meaningful.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub struct ProbeSteps(u32);

impl ProbeSteps {
    /// The minimum step count (10).
    pub const MIN: ProbeSteps = ProbeSteps(10);

    /// The maximum step count (10000).
    pub const MAX: ProbeSteps = ProbeSteps(10_000);

    /// The step count used when the caller doesn't specify one (1000).
    pub const DEFAULT: ProbeSteps = ProbeSteps(1000);

    fn is_valid(value: u32) -> bool {
        (Self::MIN.0..=Self::MAX.0).contains(&value)
    }

    /// Creates a step count.
    ///
    /// # Panics
    ///
    /// This function panics if the given value is not within 10 and 10000.
    pub fn new(value: u32) -> ProbeSteps {
        assert!(
            Self::is_valid(value),
            "{value} is not a valid probe step count"
        );
        ProbeSteps(value)
    }

    /// Returns the wrapped value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the number of candidates a complete scan visits (`steps + 1`).
    pub const fn candidate_count(self) -> u32 {
        self.0 + 1
    }
}

impl Default for ProbeSteps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for ProbeSteps {
    type Error = TryFromRangeError<u32>;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if !Self::is_valid(value) {
            return Err(TryFromRangeError::new("step count must be between 10 and 10000", value));
        }
        Ok(ProbeSteps(value))
    }
}

impl From<ProbeSteps> for u32 {
    fn from(value: ProbeSteps) -> Self {
        value.0
    }
}

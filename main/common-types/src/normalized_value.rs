use crate::TryFromRangeError;
use derive_more::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The position of a control on the unitless scale between 0.0 and 1.0 (both inclusive).
///
/// This is the only representation of a control value which the host accepts for writing. How a
/// normalized value maps to the real-world value (dB, Hz, ms, ...) is up to the control and
/// usually not published. The only way to learn about the mapping is to write a normalized value
/// and let the host render the resulting value as text.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct NormalizedValue(f64);

impl NormalizedValue {
    /// The minimum possible value (0.0).
    pub const MIN: NormalizedValue = NormalizedValue(0.0);

    /// The maximum possible value (1.0).
    pub const MAX: NormalizedValue = NormalizedValue(1.0);

    fn is_valid(value: f64) -> bool {
        (0.0..=1.0).contains(&value)
    }

    /// Creates a normalized value.
    ///
    /// # Panics
    ///
    /// This function panics if the given value is not within 0.0 and 1.0 (NaN included).
    pub fn new(value: f64) -> NormalizedValue {
        assert!(
            Self::is_valid(value),
            "{value} is not a valid normalized value"
        );
        NormalizedValue(value)
    }

    /// Creates a normalized value, forcing the given raw value into the valid range.
    ///
    /// NaN becomes [`MIN`].
    ///
    /// [`MIN`]: #associatedconstant.MIN
    pub fn new_clamped(value: f64) -> NormalizedValue {
        if value.is_nan() {
            return Self::MIN;
        }
        NormalizedValue(value.clamp(0.0, 1.0))
    }

    /// Returns the wrapped value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for NormalizedValue {
    type Error = TryFromRangeError<f64>;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !Self::is_valid(value) {
            return Err(TryFromRangeError::new("value must be between 0.0 and 1.0", value));
        }
        Ok(NormalizedValue(value))
    }
}

impl From<NormalizedValue> for f64 {
    fn from(value: NormalizedValue) -> Self {
        value.0
    }
}

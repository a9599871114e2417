use crate::ValidationError;
use derive_more::Display;
use scythe_chunk::{Chunk, ChunkEdits};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The shape with which new points of an envelope are created.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub enum EnvelopeShape {
    #[display(fmt = "linear")]
    Linear,
    #[display(fmt = "square")]
    Square,
    #[display(fmt = "slow start/end")]
    SlowStartEnd,
    #[display(fmt = "fast start")]
    FastStart,
    #[display(fmt = "fast end")]
    FastEnd,
    #[display(fmt = "bezier")]
    Bezier,
}

impl EnvelopeShape {
    /// Converts this value to the integer used in state chunks.
    pub fn to_raw(self) -> u32 {
        use EnvelopeShape::*;
        match self {
            Linear => 0,
            Square => 1,
            SlowStartEnd => 2,
            FastStart => 3,
            FastEnd => 4,
            Bezier => 5,
        }
    }
}

impl TryFrom<u32> for EnvelopeShape {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        use EnvelopeShape::*;
        let shape = match value {
            0 => Linear,
            1 => Square,
            2 => SlowStartEnd,
            3 => FastStart,
            4 => FastEnd,
            5 => Bezier,
            _ => return Err(ValidationError::InvalidEnvelopeShape(value)),
        };
        Ok(shape)
    }
}

impl From<EnvelopeShape> for u32 {
    fn from(value: EnvelopeShape) -> Self {
        value.to_raw()
    }
}

/// Envelope properties which are only accessible through the envelope's state chunk.
///
/// `None` means "leave as it is" when writing and "not present in chunk" when reading.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvelopeProperties {
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visible: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_shape: Option<EnvelopeShape>,
}

impl EnvelopeProperties {
    /// Properties which turn the envelope lane off and hide it.
    pub fn deactivated() -> Self {
        Self {
            active: Some(false),
            visible: Some(false),
            default_shape: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.visible.is_none() && self.default_shape.is_none()
    }

    /// `ACT`, `VIS` and `DEFSHAPE` edits. Properties which are `None` are left unchanged.
    pub fn to_chunk_edits(&self) -> ChunkEdits {
        [
            ("ACT", self.active.map(u32::from)),
            ("VIS", self.visible.map(u32::from)),
            ("DEFSHAPE", self.default_shape.map(EnvelopeShape::to_raw)),
        ]
        .into_iter()
        .collect()
    }

    /// Reads the properties from an envelope chunk.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let first_value = |token: &str| -> Option<u32> {
            chunk.field(token)?.into_values().next()?.parse().ok()
        };
        Self {
            active: first_value("ACT").map(|v| v != 0),
            visible: first_value("VIS").map(|v| v != 0),
            default_shape: first_value("DEFSHAPE").and_then(|v| EnvelopeShape::try_from(v).ok()),
        }
    }
}

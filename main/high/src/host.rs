use derive_more::Display;
use scythe_common_types::NormalizedValue;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies an FX on a track.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display(fmt = "FX {} on track {}", fx_index, track_index)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FxRef {
    pub track_index: u32,
    pub fx_index: u32,
}

impl FxRef {
    pub fn new(track_index: u32, fx_index: u32) -> Self {
        Self {
            track_index,
            fx_index,
        }
    }

    pub fn parameter(self, index: u32) -> ParameterRef {
        ParameterRef { fx: self, index }
    }
}

/// Identifies a single control (FX parameter).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display(fmt = "parameter {} of {}", index, fx)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterRef {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub fx: FxRef,
    #[cfg_attr(feature = "serde", serde(rename = "param_index"))]
    pub index: u32,
}

/// Identifies an envelope lane on a track.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display(fmt = "envelope {} on track {}", envelope_index, track_index)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvelopeRef {
    pub track_index: u32,
    pub envelope_index: u32,
}

impl EnvelopeRef {
    pub fn new(track_index: u32, envelope_index: u32) -> Self {
        Self {
            track_index,
            envelope_index,
        }
    }
}

/// Identifies an object which has a state chunk.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum ChunkObjectRef {
    #[display(fmt = "track {}", track_index)]
    Track { track_index: u32 },
    #[display(fmt = "item {} on track {}", item_index, track_index)]
    Item { track_index: u32, item_index: u32 },
    #[display(fmt = "{}", _0)]
    Envelope(EnvelopeRef),
}

impl From<EnvelopeRef> for ChunkObjectRef {
    fn from(value: EnvelopeRef) -> Self {
        ChunkObjectRef::Envelope(value)
    }
}

/// A failure reported by the host (or by the channel to it).
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum HostError {
    /// The host can't be reached at all.
    #[error("host unavailable: {0}")]
    Unavailable(String),
    /// The host refused to apply a write.
    #[error("host rejected write: {0}")]
    RejectedWrite(String),
    /// The referenced object doesn't exist (anymore).
    #[error("{0} not found")]
    NotFound(String),
}

impl HostError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        HostError::Unavailable(msg.into())
    }

    pub fn rejected_write(msg: impl Into<String>) -> Self {
        HostError::RejectedWrite(msg.into())
    }

    pub fn not_found(what: impl fmt::Display) -> Self {
        HostError::NotFound(what.to_string())
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Access to the controls of FX.
///
/// Implementations must not retry or cache. Each call is one round trip to the host, executed
/// in order.
pub trait ParameterAccessor {
    fn parameter_count(&self, fx: FxRef) -> HostResult<u32>;

    fn normalized_value(&self, param: ParameterRef) -> HostResult<NormalizedValue>;

    fn set_normalized_value(&self, param: ParameterRef, value: NormalizedValue) -> HostResult<()>;

    /// Lets the host render the current value of the control as text, e.g. `-6.0 dB`.
    fn formatted_value(&self, param: ParameterRef) -> HostResult<String>;
}

/// Access to the complete serialized state of objects.
pub trait ChunkAccessor {
    fn state_chunk(&self, object: ChunkObjectRef) -> HostResult<String>;

    fn set_state_chunk(&self, object: ChunkObjectRef, chunk: &str) -> HostResult<()>;
}

/// Undo history of the host.
///
/// Backends without undo support can rely on the default implementations, which do nothing.
pub trait UndoAccessor {
    fn begin_undo_block(&self) -> HostResult<()> {
        Ok(())
    }

    fn end_undo_block(&self, _label: &str) -> HostResult<()> {
        Ok(())
    }
}

//! This crate contains the two non-trivial operations of the automation layer.
//!
//! - [`ProbeEngine`] finds the normalized value of a control which makes the host display a
//!   given text (e.g. `-6.0 dB`). The control is always restored to its original value.
//! - [`ChunkPatcher`] edits fields of an object's state chunk which are not exposed by any other
//!   accessor, leaving everything else in the chunk untouched.
//!
//! Both talk to the host exclusively through the accessor traits in this crate
//! ([`ParameterAccessor`], [`ChunkAccessor`], [`UndoAccessor`]), which each backend implements
//! once. Neither keeps any state between calls.
mod error;
pub use error::*;

mod host;
pub use host::*;

mod probe;
pub use probe::*;

mod chunk_patcher;
pub use chunk_patcher::*;

mod envelope;
pub use envelope::*;

mod undo_block;

pub use scythe_chunk::{
    patch, AppliedField, Chunk, ChunkEdits, FieldAction, FieldEdit, PatchError,
};
pub use scythe_common_types::{NormalizedValue, ProbeSteps};

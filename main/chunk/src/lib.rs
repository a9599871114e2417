//! Reading and patching of state chunks.
//!
//! A state chunk is the line-oriented text REAPER uses to serialize the complete configuration
//! of an object (track, item, envelope, ...). Many properties are only accessible through it.
//! This crate doesn't know the meaning of any line. It only knows enough of the grammar to find
//! and rewrite the top-level attribute lines of a chunk without touching anything else.
//!
//! # Example
//!
//! ```
//! use scythe_chunk::{patch, ChunkEdits};
//!
//! let mut edits = ChunkEdits::new();
//! edits.set("ACT", 1).set("DEFSHAPE", 2);
//! let patched = patch("<VOLENV2\nACT 0 -1\nVIS 1 1 1\n>", &edits)?;
//! assert_eq!(
//!     patched.content(),
//!     "<VOLENV2\nACT 1 -1\nVIS 1 1 1\nDEFSHAPE 2\n>"
//! );
//! # Ok::<_, scythe_chunk::PatchError>(())
//! ```
mod item;
pub use item::*;

mod chunk;
pub use chunk::*;

mod edits;
pub use edits::*;

mod patch;
pub use patch::*;

mod error;
pub use error::*;

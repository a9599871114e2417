use crate::{HostError, ProbeResult};
use scythe_chunk::PatchError;
use thiserror::Error;

pub type ScytheResult<T> = Result<T, Error>;

/// A request that can't be executed as given. Always detected before anything is written.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum ValidationError {
    #[error("probe_min ({min}) must be less than probe_max ({max})")]
    EmptyInterval { min: f64, max: f64 },
    #[error("probe bounds must lie between 0.0 and 1.0, got [{min}, {max}]")]
    IntervalOutOfRange { min: f64, max: f64 },
    #[error("probe_steps must be between 10 and 10000, got {0}")]
    InvalidStepCount(u32),
    #[error("parameter index {index} out of range, FX has {count} parameters")]
    ParameterIndexOutOfRange { index: u32, count: u32 },
    #[error("invalid envelope shape {0}, expected a value from 0 to 5")]
    InvalidEnvelopeShape(u32),
    #[error("{0} doesn't exist")]
    ObjectNotFound(String),
    #[error(transparent)]
    Chunk(#[from] PatchError),
}

/// Everything that can go wrong when probing or patching.
///
/// Only [`RestoreFailed`] is fatal in the sense that the live state of the host might now differ
/// from what it was before the operation. After all other errors, the host is in its original
/// state.
///
/// [`RestoreFailed`]: #variant.RestoreFailed
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("host unavailable: {0}")]
    HostUnavailable(String),
    #[error("host rejected write: {0}")]
    HostRejectedWrite(String),
    #[error("couldn't restore original state of {target}, live state might be wrong: {source}")]
    RestoreFailed {
        target: String,
        /// Why the restore write failed.
        source: HostError,
        /// What made the operation fail before restoring, if anything.
        cause: Option<Box<Error>>,
        /// What the probe found until it had to give up (always `restored == false`).
        probe_result: Option<Box<ProbeResult>>,
    },
}

impl Error {
    /// Returns `true` if the host might have been left in a modified state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RestoreFailed { .. })
    }
}

impl From<HostError> for Error {
    fn from(e: HostError) -> Self {
        match e {
            HostError::Unavailable(msg) => Error::HostUnavailable(msg),
            HostError::RejectedWrite(msg) => Error::HostRejectedWrite(msg),
            HostError::NotFound(what) => ValidationError::ObjectNotFound(what).into(),
        }
    }
}

impl From<PatchError> for Error {
    fn from(e: PatchError) -> Self {
        ValidationError::from(e).into()
    }
}

use thiserror::Error;

/// Reasons why a chunk can't be patched.
///
/// All of them are detected before anything is written anywhere.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum PatchError {
    #[error("no field edits given")]
    EmptyEditSet,
    #[error("chunk is empty")]
    EmptyChunk,
    #[error("invalid field token {token:?}: {reason}")]
    InvalidToken { token: String, reason: &'static str },
    #[error("invalid value {value:?} for field {token}: {reason}")]
    InvalidValue {
        token: String,
        value: String,
        reason: &'static str,
    },
    #[error("chunk has no closing delimiter, can't insert fields {}", tokens.join(", "))]
    MissingClosingDelimiter { tokens: Vec<String> },
}

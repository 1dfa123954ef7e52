use thiserror::Error;

/// Error type for the fleetgate-slack crate.
///
/// Signature failures all map to the same HTTP status at the boundary;
/// the distinct variants exist for logging and tests. Messages stay
/// generic so nothing derived from the signing secret leaks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlackError {
    #[error("missing timestamp header")]
    MissingTimestamp,

    #[error("invalid timestamp header")]
    InvalidTimestamp,

    #[error("timestamp outside replay window")]
    StaleTimestamp,

    #[error("missing signature header")]
    MissingSignature,

    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("malformed event payload")]
    MalformedEvent,

    #[error("internal error")]
    InternalError,
}

/// Result type alias for fleetgate-slack operations.
pub type SlackResult<T> = Result<T, SlackError>;

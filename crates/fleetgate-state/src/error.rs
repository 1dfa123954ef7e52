use thiserror::Error;

/// Error type for the fleetgate-state crate.
///
/// Messages are generic: a state token is a secret, so lookups never
/// echo key material back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The state token was never issued, already redeemed, or expired.
    #[error("state not found")]
    StateNotFound,

    #[error("internal error")]
    InternalError,
}

/// Result type alias for fleetgate-state operations.
pub type StateResult<T> = Result<T, StateError>;

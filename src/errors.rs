use thiserror::Error;

/// Failure taxonomy for the simulation core and the bracket state machine.
///
/// Store-level plumbing keeps using `anyhow` with context; these variants
/// exist so callers can tell a bad request apart from a missing row or an
/// illegal bracket transition.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied input was rejected before any generation started.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation's precondition does not hold (e.g. too few teams to
    /// build a bracket). Nothing was written.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// An entity referenced by id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested mutation would corrupt bracket state (win counter past
    /// four, winner that matches neither side, result on a finished series).
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        CoreError::Precondition(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CoreError::NotFound(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        CoreError::InvalidTransition(msg.into())
    }
}

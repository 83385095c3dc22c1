use ulid::Ulid;

use super::conflict::Conflict;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed or incomplete request. Caller error; never retried.
    Validation(&'static str),
    /// The requested slot is unavailable. A legitimate business outcome;
    /// reported with its reason code and not retried automatically.
    Conflict(Conflict),
    /// Unknown amenity or booking id.
    NotFound(Ulid),
    LimitExceeded(&'static str),
    /// Transient persistence failure. The whole operation is atomic, so
    /// the caller may retry it as a unit.
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "invalid request: {msg}"),
            EngineError::Conflict(reason) => write!(f, "booking conflict: {reason}"),
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

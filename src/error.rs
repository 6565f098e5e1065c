use thiserror::Error;

/// Engine-level failures. None of these are fatal to the node process:
/// a validation error rejects one request, a transport error skips one
/// peer, an integrity violation rejects one candidate chain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("peer transport failed: {0}")]
    Transport(String),

    #[error("candidate chain failed integrity validation")]
    ChainIntegrity,
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Failures that reach the caller of `TokenManager::token` / `TokenManager::refresh`.
///
/// Storage load problems are not listed here: an unreadable or corrupt store
/// is a cache miss and ends in a refresh.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The issuer call itself failed (transport, HTTP status, rejected credentials).
    #[error(transparent)]
    Issuer(anyhow::Error),

    /// The issuer answered, but without a usable `access_token`.
    #[error("Response didn't have access_token")]
    MissingAccessToken,

    /// The fresh token could not be written to the storage backend.
    #[error("failed to persist access token: {0}")]
    Storage(anyhow::Error),
}

pub type TokenResult<T> = std::result::Result<T, TokenError>;

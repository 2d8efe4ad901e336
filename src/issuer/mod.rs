//! Issuer module
//!
//! The remote endpoint that exchanges application credentials for an access token.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::utils::constants::GRANT_TYPE_CLIENT_CREDENTIAL;

pub use http::HttpIssuer;

/// Query parameters of the token exchange.
#[derive(Clone, Serialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub appid: String,
    pub secret: String,
}

impl TokenRequest {
    pub fn client_credential(appid: &str, secret: &str) -> Self {
        Self {
            grant_type: GRANT_TYPE_CLIENT_CREDENTIAL.to_owned(),
            appid: appid.to_owned(),
            secret: secret.to_owned(),
        }
    }
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("grant_type", &self.grant_type)
            .field("appid", &self.appid)
            .field("secret", &"***")
            .finish()
    }
}

/// Performs the network call. Any `Err` is reported to the caller unchanged;
/// an `Ok` body is validated by the manager.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn get(&self, path: &str, params: &TokenRequest) -> Result<Value>;
}

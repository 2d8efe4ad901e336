//! # Access Token Manager
//!
//! Obtains a short-lived access token from a remote issuer, keeps it in
//! memory and persists it through a file or key-value storage backend.
//!
//! Modules:
//! - `cache` — validated issuer response
//! - `storage` — file and key-value storage backends
//! - `issuer` — remote issuer contract and HTTP implementation
//! - `manager` — lazy lookup / refresh state machine
//! - `config` — YAML configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod issuer;
pub mod manager;
pub mod observability;
pub mod storage;
pub mod utils;
#[cfg(test)]
mod tests;

pub use crate::cache::token_data::TokenData;
pub use crate::error::{TokenError, TokenResult};
pub use crate::issuer::{HttpIssuer, TokenIssuer, TokenRequest};
pub use crate::manager::TokenManager;
pub use crate::storage::{FileStore, InMemoryKeyValueStore, KeyValueStore, TokenStorage};

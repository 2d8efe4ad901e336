use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::token_data::TokenData;
use crate::config::settings::ManagerConfig;
use crate::error::{TokenError, TokenResult};
use crate::issuer::{HttpIssuer, TokenIssuer, TokenRequest};
use crate::observability::metrics::get_metrics;
use crate::storage::TokenStorage;
use crate::utils::constants::TOKEN_PATH;

static MEMORY_MSG: &'static str = "memory";
static STORAGE_MSG: &'static str = "storage";

/// Lazily obtains an access token and keeps it for the life of the instance.
///
/// Lookup order: in-memory cache, then storage, then the issuer. Once a token
/// is cached it is served from memory; there is no expiry check.
pub struct TokenManager {
    app_id: String,
    app_secret: String,
    issuer: Arc<dyn TokenIssuer>,
    storage: TokenStorage,
    // held across lookup and refresh so that concurrent first calls share one issuer request
    cached: Mutex<Option<TokenData>>,
}

impl TokenManager {
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        issuer: Arc<dyn TokenIssuer>,
        storage: TokenStorage,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            issuer,
            storage,
            cached: Mutex::new(None),
        }
    }

    /// Manager backed by the HTTP issuer and the configured storage.
    pub fn from_config(cfg: &ManagerConfig) -> anyhow::Result<Self> {
        let issuer = HttpIssuer::from_config(&cfg.issuer)?;
        Ok(Self::new(
            cfg.app_id.to_owned(),
            cfg.app_secret.to_owned(),
            Arc::new(issuer),
            TokenStorage::from_config(&cfg.storage),
        ))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    /// Snapshot of the cached issuer response, if any.
    pub async fn cached(&self) -> Option<TokenData> {
        self.cached.lock().await.clone()
    }

    /// Valid access token: cached, loaded from storage, or freshly issued.
    ///
    /// A stored document without `access_token` is reported as
    /// `MissingAccessToken` instead of being refreshed over.
    pub async fn token(&self) -> TokenResult<String> {
        let mut cached = self.cached.lock().await;
        let metrics = get_metrics().await;

        if let Some(data) = cached.as_ref() {
            debug!("app '{}': token served from memory", self.app_id);
            metrics.cache_hits.with_label_values(&[MEMORY_MSG]).inc();
            return Ok(data.access_token().to_owned());
        }

        if let Some(data) = self.storage.load().await? {
            debug!("app '{}': token loaded from '{}' storage", self.app_id, self.storage.kind());
            metrics.cache_hits.with_label_values(&[STORAGE_MSG]).inc();
            let token = data.access_token().to_owned();
            *cached = Some(data);
            return Ok(token);
        }

        self.refresh_locked(&mut cached).await
    }

    /// Always asks the issuer for a new token, persists it and replaces the cache.
    ///
    /// On failure the cache is left as it was.
    pub async fn refresh(&self) -> TokenResult<String> {
        let mut cached = self.cached.lock().await;
        self.refresh_locked(&mut cached).await
    }

    async fn refresh_locked(&self, cached: &mut Option<TokenData>) -> TokenResult<String> {
        info!("app '{}': requesting new access token", self.app_id);
        let request = TokenRequest::client_credential(&self.app_id, &self.app_secret);

        let response = self
            .issuer
            .get(TOKEN_PATH, &request)
            .await
            .map_err(|err| {
                error!("app '{}': token request failed: {:#}", self.app_id, err);
                TokenError::Issuer(err)
            })?;

        let data = TokenData::try_from(response).inspect_err(|err| {
            error!("app '{}': {}", self.app_id, err);
        })?;

        self.storage.persist(&data).await.map_err(|err| {
            error!("app '{}': persisting token to '{}' storage failed: {:#}", self.app_id, self.storage.kind(), err);
            TokenError::Storage(err)
        })?;

        info!(
            "app '{}': access token refreshed, expires_in: {:?}",
            self.app_id,
            data.expires_in()
        );
        let token = data.access_token().to_owned();
        *cached = Some(data);
        Ok(token)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("app_id", &self.app_id)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

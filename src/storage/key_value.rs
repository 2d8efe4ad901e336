use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// External store that only knows the bare token string (redis, keychain, ...).
///
/// `None` or a blank string from `get_token` means nothing is stored.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_token(&self) -> Result<Option<String>>;
    async fn set_token(&self, token: &str) -> Result<()>;
}

/// Process-local key-value store.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<Option<String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { inner: RwLock::new(Some(token.into())) }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.inner.read().await.clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        let mut guard = self.inner.write().await;
        *guard = Some(token.to_owned());
        Ok(())
    }
}

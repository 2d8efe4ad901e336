use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;

use crate::cache::token_data::TokenData;

/// JSON document on disk holding the full issuer response.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist, `Err` when it cannot be read or is not JSON.
    pub async fn load(&self) -> Result<Option<Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read token file {}", self.path.display()))
            }
        };
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parse token file {}", self.path.display()))?;
        Ok(Some(value))
    }

    /// Overwrite the file with the whole response (tmp -> rename, 0600 on unix).
    pub async fn save(&self, data: &TokenData) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, data.to_json_string().as_bytes())
            .await
            .with_context(|| format!("write token file {}", tmp.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace token file {}", self.path.display()))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

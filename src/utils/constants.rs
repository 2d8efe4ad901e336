//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_ISSUER_BASE_URL: &str = "https://api.weixin.qq.com/cgi-bin/";

/// Path of the token endpoint, relative to the issuer base url
pub const TOKEN_PATH: &str = "token";
pub const GRANT_TYPE_CLIENT_CREDENTIAL: &str = "client_credential";

pub const ACCESS_TOKEN_FIELD: &str = "access_token";
pub const EXPIRES_IN_FIELD: &str = "expires_in";

// Supported storage types
pub const STORAGE_FILE: &str = "file";
pub const STORAGE_KEY_VALUE: &str = "key_value";

use serde_json::{Map, Value};

use crate::error::TokenError;
use crate::utils::constants::{ACCESS_TOKEN_FIELD, EXPIRES_IN_FIELD};

/// Issuer response kept by the manager.
///
/// Always holds a non-empty `access_token`; the only way in is through
/// `TryFrom<Value>` or `from_access_token`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenData {
    fields: Map<String, Value>,
}

impl TokenData {
    /// Minimal response rebuilt from a bare token (key-value storage keeps nothing else).
    pub fn from_access_token(token: impl Into<String>) -> Result<Self, TokenError> {
        let mut fields = Map::new();
        fields.insert(ACCESS_TOKEN_FIELD.to_owned(), Value::String(token.into()));
        Self::try_from(Value::Object(fields))
    }

    pub fn access_token(&self) -> &str {
        // checked on construction
        self.fields
            .get(ACCESS_TOKEN_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Lifetime reported by the issuer. Informational only, never used to expire the cache.
    pub fn expires_in(&self) -> Option<u64> {
        self.fields.get(EXPIRES_IN_FIELD).and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

impl TryFrom<Value> for TokenData {
    type Error = TokenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(TokenError::MissingAccessToken);
        };
        let valid = fields
            .get(ACCESS_TOKEN_FIELD)
            .and_then(Value::as_str)
            .filter(|token| !token.trim().is_empty())
            .is_some();
        if !valid {
            return Err(TokenError::MissingAccessToken);
        }
        Ok(Self { fields })
    }
}

impl From<TokenData> for Value {
    fn from(data: TokenData) -> Self {
        Value::Object(data.fields)
    }
}

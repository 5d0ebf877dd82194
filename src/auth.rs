use crate::error::{DataFlowError, DataFlowResult};

/// Authentication trait for the DataFlow API
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> DataFlowResult<()>;
}

/// Bearer token authentication using a DataFlow API key
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value sent in the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// The key must never end up in logs.
impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"<redacted>").finish()
    }
}

#[async_trait::async_trait]
impl Authentication for BearerAuth {
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> DataFlowResult<()> {
        let mut value: reqwest::header::HeaderValue = self
            .header_value()
            .parse()
            .map_err(|e| DataFlowError::auth_error(format!("Invalid auth header: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, AUTHORIZATION};

    #[tokio::test]
    async fn bearer_auth_sets_prefixed_header() {
        let mut headers = HeaderMap::new();
        BearerAuth::new("abc123").apply_auth(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[tokio::test]
    async fn bearer_auth_rejects_unencodable_key() {
        let mut headers = HeaderMap::new();
        let result = BearerAuth::new("bad\nkey").apply_auth(&mut headers).await;
        assert!(matches!(result, Err(DataFlowError::Auth(_))));
    }

    #[test]
    fn debug_output_hides_key() {
        let shown = format!("{:?}", BearerAuth::new("secret-key"));
        assert!(!shown.contains("secret-key"));
    }
}

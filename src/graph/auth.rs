use crate::config::Credentials;
use crate::error::{GroupSourceError, Result};
use oauth2::{
    basic::{BasicClient, BasicErrorResponse},
    reqwest::async_http_client,
    AuthUrl, ClientId, ClientSecret, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use std::time::Duration;

pub const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Cached tokens are dropped this long before they actually expire
const EXPIRY_SKEW_SECS: i64 = 300;

/// Access token held in memory for the lifetime of the process
#[derive(Debug, Clone)]
pub struct TokenCache {
    pub access_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl TokenCache {
    pub fn is_valid(&self) -> bool {
        self.expires_at - chrono::Duration::seconds(EXPIRY_SKEW_SECS) > chrono::Utc::now()
    }
}

/// Client credentials authentication against the Microsoft identity platform
pub struct GraphAuth {
    credentials: Credentials,
    authority: String,
    cache: Option<TokenCache>,
}

impl GraphAuth {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            authority: MICROSOFT_AUTHORITY.to_string(),
            cache: None,
        }
    }

    /// Point token requests at a different authority host
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority, self.credentials.tenant_id
        )
    }

    /// Return a cached token if one is still valid, otherwise run the
    /// client credentials grant and cache the result
    pub async fn acquire_token(&mut self) -> Result<String> {
        if let Some(token) = self.acquire_token_silent() {
            tracing::debug!("Reusing cached Graph token");
            return Ok(token);
        }

        let token = self.login_client_credentials().await?;
        let access_token = token.access_token.clone();
        self.cache = Some(token);
        Ok(access_token)
    }

    pub fn acquire_token_silent(&self) -> Option<String> {
        self.cache
            .as_ref()
            .filter(|t| t.is_valid())
            .map(|t| t.access_token.clone())
    }

    async fn login_client_credentials(&self) -> Result<TokenCache> {
        tracing::debug!(
            "Requesting client credentials token for tenant {}",
            self.credentials.tenant_id
        );

        let client_id = ClientId::new(self.credentials.client_id.clone());
        let client_secret = ClientSecret::new(self.credentials.client_secret.clone());

        let auth_url = AuthUrl::new(format!(
            "{}/{}/oauth2/v2.0/authorize",
            self.authority, self.credentials.tenant_id
        ))
        .map_err(|e| GroupSourceError::AuthError(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(self.token_url())
            .map_err(|e| GroupSourceError::AuthError(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(client_id, Some(client_secret), auth_url, Some(token_url));

        let token = client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_SCOPE.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| GroupSourceError::TokenAcquisition(describe_token_error(e)))?;

        let lifetime = token.expires_in().unwrap_or(Duration::from_secs(3600));
        let expires_at = chrono::Utc::now()
            + chrono::Duration::from_std(lifetime).unwrap_or_else(|_| chrono::Duration::hours(1));

        Ok(TokenCache {
            access_token: token.access_token().secret().clone(),
            expires_at,
        })
    }
}

/// The provider's `error_description` when it sent one, otherwise the transport failure
fn describe_token_error<RE>(error: RequestTokenError<RE, BasicErrorResponse>) -> String
where
    RE: std::error::Error + 'static,
{
    match error {
        RequestTokenError::ServerResponse(response) => response
            .error_description()
            .cloned()
            .unwrap_or_else(|| "unknown error".to_string()),
        other => other.to_string(),
    }
}

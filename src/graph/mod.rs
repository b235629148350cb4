pub mod auth;
pub mod groups;

use crate::error::{GroupSourceError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Collection envelope returned by Graph list endpoints
#[derive(Debug, Deserialize)]
pub struct GraphCollection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
}

/// Graph API client bound to one access token
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl GraphClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            base_url: GRAPH_API_BASE.to_string(),
        }
    }

    /// Send requests to a different Graph root (national clouds, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET with query parameters and `ConsistencyLevel: eventual`, bounded by `timeout`.
    /// A single attempt: transport failures and non-success statuses are returned as errors.
    pub async fn get_advanced<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("ConsistencyLevel", "eventual")
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(GroupSourceError::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        let data = resp.json::<T>().await?;
        Ok(data)
    }
}

//! Group lookups by display name
//!
//! Graph filters `displayName` with an exact comparison on the service side.
//! The best candidate is then picked locally, preferring a case-insensitive
//! match over whatever Graph happened to return first.

use super::{GraphClient, GraphCollection};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fields requested for every group lookup
pub const GROUP_SELECT_FIELDS: &str = "id,displayName,onPremisesSyncEnabled,onPremisesDomainName,\
onPremisesSecurityIdentifier,securityEnabled,mailEnabled,groupTypes,createdDateTime";

/// Directory group as returned by `/groups`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub on_premises_sync_enabled: Option<bool>,
    pub on_premises_domain_name: Option<String>,
    pub on_premises_security_identifier: Option<String>,
    pub security_enabled: Option<bool>,
    pub mail_enabled: Option<bool>,
    pub group_types: Option<Vec<String>>,
    pub created_date_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Per-call lookup options
#[derive(Debug, Clone, Copy)]
pub struct LookupOptions {
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            verbose: false,
        }
    }
}

/// Anything that can resolve a group display name to a directory record
#[allow(async_fn_in_trait)]
pub trait GroupDirectory {
    async fn find_group(&self, display_name: &str, options: &LookupOptions)
        -> Result<Option<Group>>;
}

impl GroupDirectory for GraphClient {
    async fn find_group(
        &self,
        display_name: &str,
        options: &LookupOptions,
    ) -> Result<Option<Group>> {
        tracing::debug!("GET groups?$filter={}", display_name_filter(display_name));

        let response: GraphCollection<Group> = self
            .get_advanced("groups", &group_query(display_name), options.timeout)
            .await?;

        tracing::debug!(
            "Graph returned {} candidate(s) for '{}' (@odata.count: {:?})",
            response.value.len(),
            display_name,
            response.count
        );

        Ok(select_best_match(response.value, display_name))
    }
}

/// Quote a value for an OData string literal
pub fn escape_filter_value(value: &str) -> String {
    value.replace('\'', "''")
}

pub fn display_name_filter(display_name: &str) -> String {
    format!("displayName eq '{}'", escape_filter_value(display_name))
}

/// Query parameters for a single display name lookup
pub fn group_query(display_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("$filter", display_name_filter(display_name)),
        ("$select", GROUP_SELECT_FIELDS.to_string()),
        ("$count", "true".to_string()),
    ]
}

/// First case-insensitive match, else the first candidate, else nothing
pub fn select_best_match(candidates: Vec<Group>, display_name: &str) -> Option<Group> {
    let wanted = display_name.to_lowercase();
    let exact = candidates.iter().position(|g| {
        g.display_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == wanted)
    });

    let index = exact.unwrap_or(0);
    candidates.into_iter().nth(index)
}

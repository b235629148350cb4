//! Cloud vs. on-premises classification for directory groups

use crate::graph::groups::Group;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupSource {
    Cloud,
    OnPrem,
    NotFound,
    Error,
}

impl GroupSource {
    pub const ALL: [GroupSource; 4] = [
        GroupSource::Cloud,
        GroupSource::OnPrem,
        GroupSource::NotFound,
        GroupSource::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupSource::Cloud => "cloud",
            GroupSource::OnPrem => "on-prem",
            GroupSource::NotFound => "not-found",
            GroupSource::Error => "error",
        }
    }
}

impl fmt::Display for GroupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const REASON_NOT_FOUND: &str = "group was not returned by the directory";
pub const REASON_SYNC_TRUE: &str = "synchronization flag is true";
pub const REASON_DOMAIN: &str = "on-premises domain name populated";
pub const REASON_SID: &str = "on-premises security identifier populated";
pub const REASON_SYNC_FALSE: &str = "synchronization flag is false";
pub const REASON_NO_ATTRIBUTES: &str = "no on-premises attributes detected";

fn populated(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Decide where a group comes from.
///
/// An explicit `onPremisesSyncEnabled = true` wins outright. Otherwise a
/// populated on-premises domain or SID marks the group as synced, and only
/// then does an explicit `false` (or nothing at all) mean cloud-only.
pub fn classify_group(group: Option<&Group>) -> (GroupSource, &'static str) {
    let Some(group) = group else {
        return (GroupSource::NotFound, REASON_NOT_FOUND);
    };

    if group.on_premises_sync_enabled == Some(true) {
        return (GroupSource::OnPrem, REASON_SYNC_TRUE);
    }
    if populated(&group.on_premises_domain_name) {
        return (GroupSource::OnPrem, REASON_DOMAIN);
    }
    if populated(&group.on_premises_security_identifier) {
        return (GroupSource::OnPrem, REASON_SID);
    }
    if group.on_premises_sync_enabled == Some(false) {
        return (GroupSource::Cloud, REASON_SYNC_FALSE);
    }

    (GroupSource::Cloud, REASON_NO_ATTRIBUTES)
}

/// One report row per requested group name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub requested_name: String,
    pub matched_name: String,
    pub source: GroupSource,
    pub reason: String,
    pub group_id: String,
    pub domain: String,
}

impl GroupReport {
    pub fn from_lookup(requested_name: &str, group: Option<&Group>) -> Self {
        let (source, reason) = classify_group(group);

        Self {
            requested_name: requested_name.to_string(),
            matched_name: group
                .and_then(|g| g.display_name.clone())
                .unwrap_or_default(),
            source,
            reason: reason.to_string(),
            group_id: group.and_then(|g| g.id.clone()).unwrap_or_default(),
            domain: group
                .and_then(|g| g.on_premises_domain_name.clone())
                .unwrap_or_default(),
        }
    }

    pub fn from_error(requested_name: &str, error: &crate::error::GroupSourceError) -> Self {
        Self {
            requested_name: requested_name.to_string(),
            matched_name: String::new(),
            source: GroupSource::Error,
            reason: format!("request failed: {}", error.detail()),
            group_id: String::new(),
            domain: String::new(),
        }
    }
}

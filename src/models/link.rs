//! Issue relationship link and remote link models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::issue::IssueId;

/// Named relation type; the `system` flag marks types reserved for
/// structural relationships such as subtask-to-parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkType {
    pub id: String,
    pub name: String,
    pub system: bool,
}

/// Directed, typed relation between two issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: Option<String>,
    pub source_id: IssueId,
    pub destination_id: IssueId,
    pub link_type: LinkType,
}

/// Reference from an issue to an external resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLink {
    pub id: Option<String>,
    pub issue_id: IssueId,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl RemoteLink {
    /// Returns a copy re-attached to another issue, with identity cleared
    /// so the host assigns a fresh id on creation.
    pub fn duplicate_for(&self, issue_id: &IssueId) -> Self {
        Self {
            id: None,
            issue_id: issue_id.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::user::User;

/// Opaque issue identifier assigned by the host store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueId(String);

impl IssueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IssueId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for IssueId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Workflow status reference resolved from the host's configured status list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
}

/// Project version that an issue can fix or affect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub name: String,
    pub archived: bool,
}

/// Issue snapshot read from the host store.
///
/// The host owns the persistent record; this value carries the fields the
/// extension functions read and, for the in-flight transitioned issue,
/// mutate in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub key: Option<String>,
    pub project_id: String,
    pub issue_type_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub workflow_id: Option<String>,
    pub reporter: Option<User>,
    pub assignee: Option<User>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub resolved: Option<DateTime<Utc>>,
    pub votes: Option<u64>,
    pub original_estimate: Option<i64>,
    pub time_spent: Option<i64>,
    pub fix_versions: Vec<Version>,
    pub affected_versions: Vec<Version>,
    pub parent_id: Option<IssueId>,
}

/// Field set submitted to the host when creating an issue.
///
/// Carries the source issue's base shape with projection rules applied;
/// fields left as `None` are assigned by the host on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    pub key: Option<String>,
    pub project_id: String,
    pub issue_type_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub workflow_id: Option<String>,
    pub reporter: Option<User>,
    pub assignee: Option<User>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub resolved: Option<DateTime<Utc>>,
    pub votes: Option<u64>,
    pub original_estimate: Option<i64>,
    pub time_spent: Option<i64>,
    pub fix_versions: Vec<Version>,
    pub affected_versions: Vec<Version>,
    pub parent_id: Option<IssueId>,
    pub custom_fields: HashMap<String, Value>,
}

impl IssueFields {
    /// Seeds a field set from an existing issue's base shape.
    pub fn from_source(source: &Issue) -> Self {
        Self {
            key: source.key.clone(),
            project_id: source.project_id.clone(),
            issue_type_id: source.issue_type_id.clone(),
            summary: source.summary.clone(),
            description: source.description.clone(),
            status: source.status.clone(),
            workflow_id: source.workflow_id.clone(),
            reporter: source.reporter.clone(),
            assignee: source.assignee.clone(),
            created: source.created,
            updated: source.updated,
            resolved: source.resolved,
            votes: source.votes,
            original_estimate: source.original_estimate,
            time_spent: source.time_spent,
            fix_versions: source.fix_versions.clone(),
            affected_versions: source.affected_versions.clone(),
            parent_id: source.parent_id.clone(),
            custom_fields: HashMap::new(),
        }
    }
}

//! Narrow contracts over the host services consumed by the extension
//! functions.
//!
//! The host application owns persistence, permissions and configuration;
//! the functions in this crate hold these contracts as trait objects and
//! never reach past them.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    Attachment, CustomField, Issue, IssueFields, IssueId, Link, LinkType, RemoteLink, Status, User,
};

/// Capabilities checked against the host permission scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Browse,
    ModifyReporter,
}

/// Issue persistence operations.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Creates a new issue from a field set; the host assigns id, key and
    /// initial workflow status.
    async fn create_issue(&self, user: Option<&User>, fields: &IssueFields) -> Result<Issue>;

    /// Resolves an issue snapshot by id.
    async fn issue(&self, id: &IssueId) -> Result<Option<Issue>>;

    /// Returns the subtasks structurally owned by an issue.
    async fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>>;
}

/// Permission checks evaluated by the host scheme.
pub trait PermissionService: Send + Sync {
    fn has_permission(&self, permission: Permission, issue: &Issue, user: Option<&User>) -> bool;
}

/// Relationship link and remote link persistence.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Whether issue linking is enabled at the host level.
    fn linking_enabled(&self) -> bool;

    /// Links pointing at the given issue.
    async fn inward_links(&self, issue_id: &IssueId) -> Result<Vec<Link>>;

    /// Links originating from the given issue.
    async fn outward_links(&self, issue_id: &IssueId) -> Result<Vec<Link>>;

    /// Creates a directed link between two issues.
    async fn create_link(
        &self,
        source_id: &IssueId,
        destination_id: &IssueId,
        link_type_id: &str,
        user: Option<&User>,
    ) -> Result<()>;

    /// Resolves a link type by exact name.
    async fn link_type_by_name(&self, name: &str) -> Result<Option<LinkType>>;

    /// Remote links attached to the given issue.
    async fn remote_links(&self, issue_id: &IssueId) -> Result<Vec<RemoteLink>>;

    /// Creates a remote link record.
    async fn create_remote_link(&self, link: &RemoteLink, user: Option<&User>) -> Result<()>;
}

/// Attachment record and content persistence.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Whether attachment support is enabled at the host level.
    fn attachments_enabled(&self) -> bool;

    /// Attachment records owned by the given issue.
    async fn attachments(&self, issue_id: &IssueId) -> Result<Vec<Attachment>>;

    /// Creates a new attachment on `target` by duplicating the content at
    /// `source_path`.
    async fn create_copy(
        &self,
        source_path: &Path,
        filename: &str,
        mime_type: &str,
        author: Option<&str>,
        target: &IssueId,
        properties: &HashMap<String, Value>,
        created: DateTime<Utc>,
    ) -> Result<()>;
}

/// Default-backed host configuration lookups.
pub trait HostSettings: Send + Sync {
    /// Returns the configured value for a setting key, falling back to the
    /// host default when unset.
    fn setting(&self, key: &str) -> Option<String>;

    /// Whether subtasks are enabled in host configuration.
    fn subtasks_enabled(&self) -> bool;
}

/// Custom field registry scoped by project and issue type.
#[async_trait]
pub trait CustomFieldRegistry: Send + Sync {
    /// Fields applicable to issues of the given project and type.
    async fn applicable_fields(
        &self,
        project_id: &str,
        issue_type_id: &str,
    ) -> Result<Vec<CustomField>>;

    /// Current value of a field on an issue, `None` when unset.
    async fn value(&self, field: &CustomField, issue: &Issue) -> Result<Option<Value>>;
}

/// Account lookups against the host user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_login(&self, login: &str) -> Result<Option<User>>;
}

/// The host's configured workflow status list.
#[async_trait]
pub trait StatusRegistry: Send + Sync {
    async fn statuses(&self) -> Result<Vec<Status>>;
}

/// Read-only view of the host change-audit trail.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Ids of issues carrying a status-change record authored by `author`
    /// with the given new value, grouped by issue.
    async fn issues_with_status_change(&self, author: &str, new_value: &str)
        -> Result<Vec<IssueId>>;
}

//! In-memory host doubles and fixtures used by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, WorkflowError};
use crate::host::{
    AttachmentStore, AuditTrail, CustomFieldRegistry, HostSettings, IssueStore, LinkStore,
    Permission, PermissionService, StatusRegistry, UserDirectory,
};
use crate::models::{
    Attachment, CustomField, Issue, IssueFields, IssueId, Link, LinkType, RemoteLink, Status, User,
};

/// Link creation captured by the fake link store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub source_id: IssueId,
    pub destination_id: IssueId,
    pub link_type_id: String,
}

/// Attachment copy captured by the fake attachment store.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentCopy {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
    pub author: Option<String>,
    pub target: IssueId,
}

/// Status change record served by the fake audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub author: String,
    pub new_value: String,
    pub issue_id: IssueId,
}

/// HashMap-backed double implementing every host contract, with switches
/// for the failure paths the extension functions must tolerate.
#[derive(Default)]
pub struct FakeHost {
    pub issues: Mutex<HashMap<IssueId, Issue>>,
    pub subtask_map: Mutex<HashMap<IssueId, Vec<Issue>>>,
    pub created: Mutex<Vec<(IssueFields, Issue)>>,
    pub fail_create_on: Mutex<Option<usize>>,
    next_id: AtomicU64,

    pub modify_reporter_granted: AtomicBool,
    pub browse_denied: Mutex<HashSet<IssueId>>,

    pub linking_on: AtomicBool,
    pub fail_link_create: AtomicBool,
    pub link_types: Mutex<Vec<LinkType>>,
    pub inward: Mutex<HashMap<IssueId, Vec<Link>>>,
    pub outward: Mutex<HashMap<IssueId, Vec<Link>>>,
    pub remote: Mutex<HashMap<IssueId, Vec<RemoteLink>>>,
    pub created_links: Mutex<Vec<CreatedLink>>,
    pub created_remote_links: Mutex<Vec<RemoteLink>>,

    pub attachments_on: AtomicBool,
    pub attachment_map: Mutex<HashMap<IssueId, Vec<Attachment>>>,
    pub attachment_copies: Mutex<Vec<AttachmentCopy>>,
    pub fail_copy_for: Mutex<HashSet<String>>,

    pub settings: Mutex<HashMap<String, String>>,
    pub subtasks_on: AtomicBool,

    pub fields: Mutex<Vec<CustomField>>,
    pub field_values: Mutex<HashMap<(String, IssueId), Value>>,

    pub users: Mutex<HashMap<String, User>>,
    pub status_list: Mutex<Vec<Status>>,
    pub audit: Mutex<Vec<AuditRecord>>,
    pub audit_fails: AtomicBool,
}

impl FakeHost {
    /// Creates a host double with linking, attachments and subtasks enabled.
    pub fn new() -> Self {
        let host = Self::default();
        host.linking_on.store(true, Ordering::SeqCst);
        host.attachments_on.store(true, Ordering::SeqCst);
        host.subtasks_on.store(true, Ordering::SeqCst);
        host
    }

    pub fn insert_issue(&self, issue: Issue) {
        self.issues.lock().unwrap().insert(issue.id.clone(), issue);
    }

    pub fn set_setting(&self, key: &str, value: &str) {
        self.settings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn add_subtask(&self, parent: &IssueId, subtask: Issue) {
        self.subtask_map
            .lock()
            .unwrap()
            .entry(parent.clone())
            .or_default()
            .push(subtask);
    }

    pub fn add_inward_link(&self, issue: &IssueId, link: Link) {
        self.inward
            .lock()
            .unwrap()
            .entry(issue.clone())
            .or_default()
            .push(link);
    }

    pub fn add_outward_link(&self, issue: &IssueId, link: Link) {
        self.outward
            .lock()
            .unwrap()
            .entry(issue.clone())
            .or_default()
            .push(link);
    }

    pub fn add_remote_link(&self, issue: &IssueId, link: RemoteLink) {
        self.remote
            .lock()
            .unwrap()
            .entry(issue.clone())
            .or_default()
            .push(link);
    }

    pub fn add_attachment(&self, attachment: Attachment) {
        self.attachment_map
            .lock()
            .unwrap()
            .entry(attachment.issue_id.clone())
            .or_default()
            .push(attachment);
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.login.clone(), user);
    }

    pub fn add_status(&self, id: &str, name: &str) {
        self.status_list.lock().unwrap().push(Status {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn add_audit_record(&self, author: &str, new_value: &str, issue_id: &IssueId) {
        self.audit.lock().unwrap().push(AuditRecord {
            author: author.to_string(),
            new_value: new_value.to_string(),
            issue_id: issue_id.clone(),
        });
    }

    pub fn created_issues(&self) -> Vec<Issue> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, issue)| issue.clone())
            .collect()
    }

    pub fn created_field_sets(&self) -> Vec<IssueFields> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(fields, _)| fields.clone())
            .collect()
    }
}

#[async_trait]
impl IssueStore for FakeHost {
    async fn create_issue(&self, _user: Option<&User>, fields: &IssueFields) -> Result<Issue> {
        let ordinal = self.created.lock().unwrap().len() + 1;
        if *self.fail_create_on.lock().unwrap() == Some(ordinal) {
            return Err(WorkflowError::data_access("issue store rejected creation"));
        }
        let serial = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let issue = Issue {
            id: IssueId::from(format!("{}", 20000 + serial)),
            key: Some(format!("TW-{}", 20000 + serial)),
            project_id: fields.project_id.clone(),
            issue_type_id: fields.issue_type_id.clone(),
            summary: fields.summary.clone(),
            description: fields.description.clone(),
            status: Some(Status {
                id: "1".to_string(),
                name: "Open".to_string(),
            }),
            workflow_id: Some(format!("wf-{serial}")),
            reporter: fields.reporter.clone(),
            assignee: fields.assignee.clone(),
            created: Some(Utc::now()),
            updated: Some(Utc::now()),
            resolved: None,
            votes: Some(0),
            original_estimate: fields.original_estimate,
            time_spent: fields.time_spent,
            fix_versions: fields.fix_versions.clone(),
            affected_versions: fields.affected_versions.clone(),
            parent_id: fields.parent_id.clone(),
        };
        self.issues
            .lock()
            .unwrap()
            .insert(issue.id.clone(), issue.clone());
        self.created
            .lock()
            .unwrap()
            .push((fields.clone(), issue.clone()));
        Ok(issue)
    }

    async fn issue(&self, id: &IssueId) -> Result<Option<Issue>> {
        Ok(self.issues.lock().unwrap().get(id).cloned())
    }

    async fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>> {
        Ok(self
            .subtask_map
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

impl PermissionService for FakeHost {
    fn has_permission(&self, permission: Permission, issue: &Issue, _user: Option<&User>) -> bool {
        match permission {
            Permission::ModifyReporter => self.modify_reporter_granted.load(Ordering::SeqCst),
            Permission::Browse => !self.browse_denied.lock().unwrap().contains(&issue.id),
        }
    }
}

#[async_trait]
impl LinkStore for FakeHost {
    fn linking_enabled(&self) -> bool {
        self.linking_on.load(Ordering::SeqCst)
    }

    async fn inward_links(&self, issue_id: &IssueId) -> Result<Vec<Link>> {
        Ok(self
            .inward
            .lock()
            .unwrap()
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn outward_links(&self, issue_id: &IssueId) -> Result<Vec<Link>> {
        Ok(self
            .outward
            .lock()
            .unwrap()
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_link(
        &self,
        source_id: &IssueId,
        destination_id: &IssueId,
        link_type_id: &str,
        _user: Option<&User>,
    ) -> Result<()> {
        if self.fail_link_create.load(Ordering::SeqCst) {
            return Err(WorkflowError::data_access("link store rejected creation"));
        }
        self.created_links.lock().unwrap().push(CreatedLink {
            source_id: source_id.clone(),
            destination_id: destination_id.clone(),
            link_type_id: link_type_id.to_string(),
        });
        Ok(())
    }

    async fn link_type_by_name(&self, name: &str) -> Result<Option<LinkType>> {
        Ok(self
            .link_types
            .lock()
            .unwrap()
            .iter()
            .find(|link_type| link_type.name == name)
            .cloned())
    }

    async fn remote_links(&self, issue_id: &IssueId) -> Result<Vec<RemoteLink>> {
        Ok(self
            .remote
            .lock()
            .unwrap()
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_remote_link(&self, link: &RemoteLink, _user: Option<&User>) -> Result<()> {
        self.created_remote_links.lock().unwrap().push(link.clone());
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for FakeHost {
    fn attachments_enabled(&self) -> bool {
        self.attachments_on.load(Ordering::SeqCst)
    }

    async fn attachments(&self, issue_id: &IssueId) -> Result<Vec<Attachment>> {
        Ok(self
            .attachment_map
            .lock()
            .unwrap()
            .get(issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_copy(
        &self,
        source_path: &Path,
        filename: &str,
        mime_type: &str,
        author: Option<&str>,
        target: &IssueId,
        _properties: &HashMap<String, Value>,
        _created: DateTime<Utc>,
    ) -> Result<()> {
        if self.fail_copy_for.lock().unwrap().contains(filename) {
            return Err(WorkflowError::data_access("attachment store rejected copy"));
        }
        self.attachment_copies.lock().unwrap().push(AttachmentCopy {
            path: source_path.to_path_buf(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            author: author.map(ToOwned::to_owned),
            target: target.clone(),
        });
        Ok(())
    }
}

impl HostSettings for FakeHost {
    fn setting(&self, key: &str) -> Option<String> {
        self.settings.lock().unwrap().get(key).cloned()
    }

    fn subtasks_enabled(&self) -> bool {
        self.subtasks_on.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomFieldRegistry for FakeHost {
    async fn applicable_fields(
        &self,
        _project_id: &str,
        _issue_type_id: &str,
    ) -> Result<Vec<CustomField>> {
        Ok(self.fields.lock().unwrap().clone())
    }

    async fn value(&self, field: &CustomField, issue: &Issue) -> Result<Option<Value>> {
        Ok(self
            .field_values
            .lock()
            .unwrap()
            .get(&(field.id.clone(), issue.id.clone()))
            .cloned())
    }
}

#[async_trait]
impl UserDirectory for FakeHost {
    async fn user_by_login(&self, login: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(login).cloned())
    }
}

#[async_trait]
impl StatusRegistry for FakeHost {
    async fn statuses(&self) -> Result<Vec<Status>> {
        Ok(self.status_list.lock().unwrap().clone())
    }
}

#[async_trait]
impl AuditTrail for FakeHost {
    async fn issues_with_status_change(
        &self,
        author: &str,
        new_value: &str,
    ) -> Result<Vec<IssueId>> {
        if self.audit_fails.load(Ordering::SeqCst) {
            return Err(WorkflowError::data_access("audit trail unavailable"));
        }
        let mut grouped = Vec::new();
        for record in self.audit.lock().unwrap().iter() {
            if record.author == author
                && record.new_value == new_value
                && !grouped.contains(&record.issue_id)
            {
                grouped.push(record.issue_id.clone());
            }
        }
        Ok(grouped)
    }
}

/// Builds an issue snapshot with representative field values.
pub fn sample_issue(id: &str) -> Issue {
    Issue {
        id: IssueId::from(id),
        key: Some(format!("TW-{id}")),
        project_id: "backend".to_string(),
        issue_type_id: "task".to_string(),
        summary: "Original summary".to_string(),
        description: Some("Original description".to_string()),
        status: Some(Status {
            id: "3".to_string(),
            name: "In Progress".to_string(),
        }),
        workflow_id: Some("wf-original".to_string()),
        reporter: Some(User::new("reporter")),
        assignee: Some(User::new("assignee")),
        created: Some(Utc::now()),
        updated: Some(Utc::now()),
        resolved: None,
        votes: Some(4),
        original_estimate: Some(7200),
        time_spent: Some(1800),
        fix_versions: Vec::new(),
        affected_versions: Vec::new(),
        parent_id: None,
    }
}

/// Builds a user-defined link between two issues.
pub fn link_between(source: &IssueId, destination: &IssueId, link_type: &LinkType) -> Link {
    Link {
        id: None,
        source_id: source.clone(),
        destination_id: destination.clone(),
        link_type: link_type.clone(),
    }
}

/// Builds a user-defined link type.
pub fn user_link_type(id: &str, name: &str) -> LinkType {
    LinkType {
        id: id.to_string(),
        name: name.to_string(),
        system: false,
    }
}

/// Returns a unique path under the system temp directory.
pub fn unique_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("tracker-workflow-tests-{name}-{nanos}"))
}

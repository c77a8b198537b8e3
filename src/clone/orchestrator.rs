//! Clone batch orchestration for the issue clone post function.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{error, warn};

use crate::clone::{AttachmentDuplicator, FieldProjector, LinkDuplicator};
use crate::config::{CloneParams, CLONE_LINK_TYPE_NAME_KEY};
use crate::error::{Result, WorkflowError};
use crate::host::{
    AttachmentStore, CustomFieldRegistry, HostSettings, IssueStore, LinkStore, PermissionService,
};
use crate::models::{Issue, IssueId, LinkType, User};

/// Per-invocation batch state: the identity map from original issue ids to
/// their freshly created clones, and the cached clone link type resolution.
struct CloneBatch {
    identity_map: HashMap<IssueId, IssueId>,
    clone_link_type: Option<Option<LinkType>>,
}

impl CloneBatch {
    fn new() -> Self {
        Self {
            identity_map: HashMap::new(),
            clone_link_type: None,
        }
    }

    /// Resolves the configured clone link type once per batch. A blank
    /// configured name resolves to `None` silently; a configured name
    /// without a matching type warns and resolves to `None`.
    async fn clone_link_type(
        &mut self,
        links: &dyn LinkStore,
        settings: &dyn HostSettings,
    ) -> Result<Option<LinkType>> {
        if let Some(resolved) = &self.clone_link_type {
            return Ok(resolved.clone());
        }

        let resolved = match settings.setting(CLONE_LINK_TYPE_NAME_KEY) {
            Some(name) if !name.trim().is_empty() => {
                let found = links.link_type_by_name(&name).await?;
                if found.is_none() {
                    warn!(
                        "The clone link type '{}' does not exist. A link to the original issue will not be created.",
                        name
                    );
                }
                found
            }
            _ => None,
        };

        self.clone_link_type = Some(resolved.clone());
        Ok(resolved)
    }
}

/// Workflow post function that clones the transitioned issue a configured
/// number of times, optionally duplicating attachments and links.
pub struct ClonePostFunction {
    issues: Arc<dyn IssueStore>,
    links: Arc<dyn LinkStore>,
    settings: Arc<dyn HostSettings>,
    projector: FieldProjector,
    attachments: AttachmentDuplicator,
    link_duplicator: LinkDuplicator,
}

impl ClonePostFunction {
    pub fn new(
        issues: Arc<dyn IssueStore>,
        links: Arc<dyn LinkStore>,
        attachments: Arc<dyn AttachmentStore>,
        permissions: Arc<dyn PermissionService>,
        custom_fields: Arc<dyn CustomFieldRegistry>,
        settings: Arc<dyn HostSettings>,
    ) -> Self {
        Self {
            projector: FieldProjector::new(settings.clone(), permissions, custom_fields),
            attachments: AttachmentDuplicator::new(attachments),
            link_duplicator: LinkDuplicator::new(links.clone()),
            issues,
            links,
            settings,
        }
    }

    /// Entry point invoked by the workflow engine on transition.
    ///
    /// Validates the argument map before any mutation, then creates the
    /// requested clones and returns them. A creation failure aborts the
    /// remaining iterations; clones already created are not rolled back.
    pub async fn execute(
        &self,
        args: &HashMap<String, String>,
        issue: &mut Issue,
        user: Option<&User>,
    ) -> Result<Vec<Issue>> {
        let params = CloneParams::from_args(args)?;
        match self.run(&params, issue, user).await {
            Ok(created) => Ok(created),
            Err(err) => {
                error!("Clone batch for issue '{}' failed: {}", issue.id, err);
                Err(WorkflowError::CloneFailed)
            }
        }
    }

    async fn run(
        &self,
        params: &CloneParams,
        issue: &mut Issue,
        user: Option<&User>,
    ) -> Result<Vec<Issue>> {
        let mut batch = CloneBatch::new();
        let mut created = Vec::with_capacity(params.count as usize);

        for _ in 0..params.count {
            let fields = self.projector.project(issue, user).await?;
            let new_issue = self.issues.create_issue(user, &fields).await?;
            batch
                .identity_map
                .insert(issue.id.clone(), new_issue.id.clone());

            let clone_link_type = batch
                .clone_link_type(self.links.as_ref(), self.settings.as_ref())
                .await?;
            if let Some(clone_link_type) = &clone_link_type {
                self.links
                    .create_link(&issue.id, &new_issue.id, &clone_link_type.id, user)
                    .await?;
            }

            if params.copy_attachments {
                self.attachments.copy(issue, &new_issue, user).await;
            }

            let originals = self.original_issue_ids(issue).await?;
            if params.copy_links {
                self.link_duplicator
                    .copy(
                        issue,
                        &new_issue,
                        &originals,
                        &batch.identity_map,
                        clone_link_type.as_ref(),
                        user,
                    )
                    .await?;
            }

            created.push(new_issue);
        }

        Ok(created)
    }

    /// Snapshot of the source issue id plus its subtask ids when subtasks
    /// are enabled in host configuration.
    async fn original_issue_ids(&self, issue: &Issue) -> Result<HashSet<IssueId>> {
        let mut originals = HashSet::new();
        originals.insert(issue.id.clone());
        if self.settings.subtasks_enabled() {
            for subtask in self.issues.subtasks(&issue.id).await? {
                originals.insert(subtask.id);
            }
        }
        Ok(originals)
    }
}

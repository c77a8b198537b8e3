//! Field projection rules applied when seeding a clone from a source issue.

use std::sync::Arc;

use crate::config::CLONE_PREFIX_KEY;
use crate::error::Result;
use crate::host::{CustomFieldRegistry, HostSettings, Permission, PermissionService};
use crate::models::{Issue, IssueFields, User, Version};

/// Computes the field set for a new clone of a source issue.
pub struct FieldProjector {
    settings: Arc<dyn HostSettings>,
    permissions: Arc<dyn PermissionService>,
    custom_fields: Arc<dyn CustomFieldRegistry>,
}

impl FieldProjector {
    pub fn new(
        settings: Arc<dyn HostSettings>,
        permissions: Arc<dyn PermissionService>,
        custom_fields: Arc<dyn CustomFieldRegistry>,
    ) -> Self {
        Self {
            settings,
            permissions,
            custom_fields,
        }
    }

    /// Projects the source issue's base shape into a creation field set:
    /// prefixed summary, cleared lifecycle fields, carried-over estimate,
    /// archived versions dropped, non-null custom field values copied.
    ///
    /// When the acting user may not modify reporters on the source issue,
    /// the reporter reassignment applies to the source, not the clone; the
    /// returned field set snapshots the reporter before the change.
    pub async fn project(&self, source: &mut Issue, user: Option<&User>) -> Result<IssueFields> {
        let mut fields = IssueFields::from_source(source);
        fields.summary = format!("{}{}", self.clone_prefix(), source.summary);
        fields.created = None;
        fields.updated = None;
        fields.resolved = None;
        fields.key = None;
        fields.votes = None;
        fields.status = None;
        fields.workflow_id = None;
        fields.original_estimate = source.original_estimate;
        fields.time_spent = None;
        fields.fix_versions = without_archived(&source.fix_versions);
        fields.affected_versions = without_archived(&source.affected_versions);

        if !self
            .permissions
            .has_permission(Permission::ModifyReporter, source, user)
        {
            source.reporter = user.cloned();
        }

        let applicable = self
            .custom_fields
            .applicable_fields(&source.project_id, &source.issue_type_id)
            .await?;
        for field in applicable {
            if let Some(value) = self.custom_fields.value(&field, source).await? {
                fields.custom_fields.insert(field.id, value);
            }
        }

        Ok(fields)
    }

    /// Returns the configured clone prefix followed by a separating space,
    /// or an empty string when no prefix is configured.
    fn clone_prefix(&self) -> String {
        match self.settings.setting(CLONE_PREFIX_KEY) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix} "),
            _ => String::new(),
        }
    }
}

fn without_archived(versions: &[Version]) -> Vec<Version> {
    versions
        .iter()
        .filter(|version| !version.archived)
        .cloned()
        .collect()
}

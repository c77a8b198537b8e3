//! Query function returning issues a user transitioned into a status.

use std::sync::Arc;

use tracing::error;

use crate::error::Result;
use crate::host::{AuditTrail, IssueStore, Permission, PermissionService, StatusRegistry, UserDirectory};
use crate::models::{IssueId, User};

/// Name the host query engine registers the function under.
pub const FUNCTION_NAME: &str = "transitioned";

/// Number of positional arguments the function expects.
pub const EXPECTED_ARGUMENT_COUNT: usize = 2;

/// Accumulated validation messages returned to the query engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageSet {
    errors: Vec<String>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Permission context describing the user on whose behalf a query runs.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub user: Option<User>,
}

impl QueryContext {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }
}

/// Query function matching issues whose status was changed to a target
/// value by a specific user, filtered by the caller's browse permission.
pub struct TransitionQueryFunction {
    audit: Arc<dyn AuditTrail>,
    issues: Arc<dyn IssueStore>,
    permissions: Arc<dyn PermissionService>,
    users: Arc<dyn UserDirectory>,
    statuses: Arc<dyn StatusRegistry>,
}

impl TransitionQueryFunction {
    pub fn new(
        audit: Arc<dyn AuditTrail>,
        issues: Arc<dyn IssueStore>,
        permissions: Arc<dyn PermissionService>,
        users: Arc<dyn UserDirectory>,
        statuses: Arc<dyn StatusRegistry>,
    ) -> Self {
        Self {
            audit,
            issues,
            permissions,
            users,
            statuses,
        }
    }

    /// Validates the positional `(username, status name)` arguments,
    /// returning a message per offending argument. Status names match
    /// case-sensitively against the host's configured list.
    pub async fn validate(&self, args: &[String]) -> MessageSet {
        let mut messages = MessageSet::new();
        if args.len() != EXPECTED_ARGUMENT_COUNT {
            messages.add_error(format!(
                "Function '{FUNCTION_NAME}' expects exactly two arguments: user and status"
            ));
            return messages;
        }

        let login = &args[0];
        let status = &args[1];

        match self.users.user_by_login(login).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                messages.add_error(format!(
                    "Function '{FUNCTION_NAME}': unknown user '{login}'"
                ));
                return messages;
            }
            Err(err) => {
                error!("{}: user lookup failed: {}", FUNCTION_NAME, err);
                messages.add_error(format!(
                    "Function '{FUNCTION_NAME}': could not resolve user '{login}'"
                ));
                return messages;
            }
        }

        let known = match self.statuses.statuses().await {
            Ok(statuses) => statuses.iter().any(|entry| entry.name == *status),
            Err(err) => {
                error!("{}: status lookup failed: {}", FUNCTION_NAME, err);
                false
            }
        };
        if !known {
            messages.add_error(format!(
                "Function '{FUNCTION_NAME}': unknown status '{status}'"
            ));
        }

        messages
    }

    /// Executes the query and returns the ids of matched, browseable
    /// issues. Any data-access failure yields an empty result set.
    pub async fn values(&self, context: &QueryContext, args: &[String]) -> Vec<IssueId> {
        if args.len() != EXPECTED_ARGUMENT_COUNT {
            return Vec::new();
        }

        let author = match self.users.user_by_login(&args[0]).await {
            Ok(Some(user)) => user,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!("{}: user lookup failed: {}", FUNCTION_NAME, err);
                return Vec::new();
            }
        };

        match self.collect(context, &author, &args[1]).await {
            Ok(ids) => ids,
            Err(err) => {
                error!("{}: query execution failed: {}", FUNCTION_NAME, err);
                Vec::new()
            }
        }
    }

    async fn collect(
        &self,
        context: &QueryContext,
        author: &User,
        status: &str,
    ) -> Result<Vec<IssueId>> {
        let mut results = Vec::new();
        for id in self
            .audit
            .issues_with_status_change(&author.login, status)
            .await?
        {
            let Some(issue) = self.issues.issue(&id).await? else {
                continue;
            };
            if self
                .permissions
                .has_permission(Permission::Browse, &issue, context.user.as_ref())
            {
                results.push(id);
            }
        }
        Ok(results)
    }
}

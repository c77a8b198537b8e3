//! Workflow extension functions for an issue-tracking host.
//!
//! Two entry points: [`ClonePostFunction`], a workflow post function that
//! clones the transitioned issue a configured number of times, optionally
//! duplicating attachments and relationship links; and
//! [`TransitionQueryFunction`], a query function returning issues a user
//! transitioned into a given status. The host application is consumed
//! through the contracts in [`host`].

pub mod clone;
pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use clone::{AttachmentDuplicator, ClonePostFunction, FieldProjector, LinkDuplicator};
pub use config::CloneParams;
pub use error::{Result, WorkflowError};
pub use models::{
    Attachment, CustomField, Issue, IssueFields, IssueId, Link, LinkType, RemoteLink, Status, User,
    Version,
};
pub use query::{MessageSet, QueryContext, TransitionQueryFunction};

//! Attachment record model owned by the host store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::issue::IssueId;

/// Represents an attachment record, including the backing file path, filename, MIME type, owning issue and creation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub issue_id: IssueId,
    pub filename: String,
    pub mime_type: String,
    pub path: PathBuf,
    pub created: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

//! Attachment duplication with per-item failure isolation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::host::AttachmentStore;
use crate::models::{Issue, User};

/// Copies attachment records and their backing files from a source issue
/// onto a clone.
pub struct AttachmentDuplicator {
    attachments: Arc<dyn AttachmentStore>,
}

impl AttachmentDuplicator {
    pub fn new(attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { attachments }
    }

    /// Copies every readable attachment of `source` onto `target`,
    /// attributed to the acting user and timestamped at copy time.
    ///
    /// Per-attachment failures are logged and skipped; this call never
    /// fails the surrounding clone batch.
    pub async fn copy(&self, source: &Issue, target: &Issue, user: Option<&User>) {
        if !self.attachments.attachments_enabled() {
            return;
        }

        let records = match self.attachments.attachments(&source.id).await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "Could not list attachments of issue '{}': {}",
                    source.id, err
                );
                return;
            }
        };

        let author = user.map(|user| user.login.as_str());
        let properties = HashMap::new();
        for attachment in records {
            if let Err(err) = tokio::fs::File::open(&attachment.path).await {
                warn!(
                    "Could not clone attachment '{}' with file path '{}' for issue '{}': {}",
                    attachment.id,
                    attachment.path.display(),
                    target.id,
                    err
                );
                continue;
            }
            if let Err(err) = self
                .attachments
                .create_copy(
                    &attachment.path,
                    &attachment.filename,
                    &attachment.mime_type,
                    author,
                    &target.id,
                    &properties,
                    Utc::now(),
                )
                .await
            {
                warn!(
                    "Could not clone attachment '{}' for issue '{}': {}",
                    attachment.id, target.id, err
                );
            }
        }
    }
}

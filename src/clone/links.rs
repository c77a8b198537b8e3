//! Relationship link duplication with clone-aware endpoint redirection.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::host::LinkStore;
use crate::models::{Issue, IssueId, Link, LinkType, User};

/// Replicates inward, outward and remote links of a source issue onto a
/// clone.
pub struct LinkDuplicator {
    links: Arc<dyn LinkStore>,
}

impl LinkDuplicator {
    pub fn new(links: Arc<dyn LinkStore>) -> Self {
        Self { links }
    }

    /// Copies the source issue's links onto `target`. Endpoints found in
    /// `originals` are redirected through `identity_map`; endpoints whose
    /// clone is not registered yet are skipped. No-op when linking is
    /// disabled at the host level.
    pub async fn copy(
        &self,
        source: &Issue,
        target: &Issue,
        originals: &HashSet<IssueId>,
        identity_map: &HashMap<IssueId, IssueId>,
        clone_link_type: Option<&LinkType>,
        user: Option<&User>,
    ) -> Result<()> {
        if !self.links.linking_enabled() {
            return Ok(());
        }

        for link in self.links.inward_links(&source.id).await? {
            if !eligible(&link, clone_link_type) {
                continue;
            }
            let Some(far_end) = redirect(&link.source_id, originals, identity_map) else {
                debug!(
                    "Skipping inward '{}' link of issue '{}': endpoint '{}' has no registered clone",
                    link.link_type.name, source.id, link.source_id
                );
                continue;
            };
            self.links
                .create_link(&far_end, &target.id, &link.link_type.id, user)
                .await?;
        }

        for link in self.links.outward_links(&source.id).await? {
            if !eligible(&link, clone_link_type) {
                continue;
            }
            let Some(far_end) = redirect(&link.destination_id, originals, identity_map) else {
                debug!(
                    "Skipping outward '{}' link of issue '{}': endpoint '{}' has no registered clone",
                    link.link_type.name, source.id, link.destination_id
                );
                continue;
            };
            self.links
                .create_link(&target.id, &far_end, &link.link_type.id, user)
                .await?;
        }

        for remote in self.links.remote_links(&source.id).await? {
            self.links
                .create_remote_link(&remote.duplicate_for(&target.id), user)
                .await?;
        }

        Ok(())
    }
}

/// A link may be duplicated when it is user-created and its type is not
/// the configured clone relation.
fn eligible(link: &Link, clone_link_type: Option<&LinkType>) -> bool {
    !link.link_type.system
        && clone_link_type.map_or(true, |clone_type| clone_type.id != link.link_type.id)
}

/// Maps a link endpoint to the id a duplicated link should use. Endpoints
/// outside the original set pass through unchanged; endpoints inside it
/// resolve to their registered clone. `None` means the link must be
/// skipped.
fn redirect(
    endpoint: &IssueId,
    originals: &HashSet<IssueId>,
    identity_map: &HashMap<IssueId, IssueId>,
) -> Option<IssueId> {
    if originals.contains(endpoint) {
        identity_map.get(endpoint).cloned()
    } else {
        Some(endpoint.clone())
    }
}

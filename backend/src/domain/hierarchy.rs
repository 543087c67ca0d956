//! Descendant resolution over the organization tree.
//!
//! The tree is acyclic by construction (the join-parent workflow refuses
//! attachments that would close a cycle), but the resolver still carries a
//! hard node cap so a corrupted store cannot make the traversal loop forever.

use std::collections::{HashSet, VecDeque};

use crate::domain::ports::{OrganizationRepository, OrganizationRepositoryError};
use crate::domain::{Error, OrganizationId};

/// Upper bound on nodes visited in one traversal. Exceeding it means the
/// stored tree is corrupted, not that a legitimate hierarchy is this large.
pub const MAX_TRAVERSAL_NODES: usize = 10_000;

fn map_org_error(error: OrganizationRepositoryError) -> Error {
    match error {
        OrganizationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("organization repository unavailable: {message}"))
        }
        OrganizationRepositoryError::Query { message } => {
            Error::internal(format!("organization repository error: {message}"))
        }
    }
}

/// Transitive closure of child edges under `root`, excluding `root` itself.
///
/// Breadth-first so shallow descendants resolve before deep ones when the
/// cap is ever hit. Fails not-found when `root` does not exist.
pub async fn descendant_ids(
    orgs: &impl OrganizationRepository,
    root: &OrganizationId,
) -> Result<HashSet<OrganizationId>, Error> {
    if orgs
        .find_by_id(root)
        .await
        .map_err(map_org_error)?
        .is_none()
    {
        return Err(Error::not_found("organization not found"));
    }

    let mut visited = HashSet::from([*root]);
    let mut queue = VecDeque::from([*root]);
    while let Some(current) = queue.pop_front() {
        for child in orgs.children_of(&current).await.map_err(map_org_error)? {
            if visited.insert(child) {
                if visited.len() > MAX_TRAVERSAL_NODES {
                    return Err(Error::internal(
                        "organization hierarchy exceeds the traversal node limit",
                    ));
                }
                queue.push_back(child);
            }
        }
    }

    visited.remove(root);
    Ok(visited)
}

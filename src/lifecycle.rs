//! Account lifecycle state machine: `active ⇄ blocked`.
//!
//! Blocking revokes all non-exclusive access. Memberships that are the
//! account's only ownership stake in a resource are left untouched, since
//! removing them would orphan the resource; everything else is destroyed
//! before the state change is committed.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::membership::MembershipIndex;
use crate::store::Store;
use crate::types::{AccessLevel, MembershipId, ProjectId, User, UserId, UserState};

pub struct Lifecycle<'a> {
    store: &'a dyn Store,
}

/// Membership ids the block cascade will destroy, computed before any
/// mutation.
struct RevocationPlan {
    project_memberships: Vec<MembershipId>,
    group_memberships: Vec<MembershipId>,
}

impl<'a> Lifecycle<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Transitions `active → blocked`, revoking non-exclusive memberships.
    ///
    /// The cascade is best-effort: destroys are applied in plan order and the
    /// transition aborts on the first failed destroy with
    /// [`Error::TransitionDenied`]. Memberships already destroyed in the pass
    /// stay destroyed; the state change is only committed after the whole
    /// plan applies.
    ///
    /// Concurrent blocks for one user must be serialized by the store layer:
    /// the last-owner check below is read-then-act and is unsafe under
    /// concurrent membership deletion.
    pub fn block(&self, user: &User) -> Result<User> {
        if user.state != UserState::Active {
            return Err(Error::TransitionDenied(format!(
                "cannot block a {} account",
                user.state
            )));
        }

        let plan = self.plan_revocation(user)?;

        for id in &plan.project_memberships {
            if let Err(e) = self.store.delete_project_membership(*id) {
                tracing::warn!(
                    user_id = user.id,
                    membership_id = id,
                    "block cascade aborted: project membership destroy failed: {}",
                    e
                );
                return Err(Error::TransitionDenied(
                    "membership revocation failed".to_string(),
                ));
            }
        }

        for id in &plan.group_memberships {
            if let Err(e) = self.store.delete_group_membership(*id) {
                tracing::warn!(
                    user_id = user.id,
                    membership_id = id,
                    "block cascade aborted: group membership destroy failed: {}",
                    e
                );
                return Err(Error::TransitionDenied(
                    "membership revocation failed".to_string(),
                ));
            }
        }

        self.store.update_user_state(user.id, UserState::Blocked)?;
        self.store.get_user(user.id)?.ok_or(Error::NotFound)
    }

    /// Transitions `blocked → active`. No side effects; memberships removed
    /// by a prior block are not restored.
    pub fn activate(&self, user: &User) -> Result<User> {
        if user.state != UserState::Blocked {
            return Err(Error::TransitionDenied(format!(
                "cannot activate a {} account",
                user.state
            )));
        }

        self.store.update_user_state(user.id, UserState::Active)?;
        self.store.get_user(user.id)?.ok_or(Error::NotFound)
    }

    fn plan_revocation(&self, user: &User) -> Result<RevocationPlan> {
        let index = MembershipIndex::new(self.store);
        let owned_projects: HashSet<_> = index
            .owned_namespace_project_ids(user.id)?
            .into_iter()
            .collect();

        let mut project_memberships = Vec::new();
        for m in self.store.list_project_memberships_for_user(user.id)? {
            if m.access_level == AccessLevel::Owner
                || owned_projects.contains(&m.project_id)
                || self.created_project(user.id, m.project_id)?
            {
                continue;
            }
            project_memberships.push(m.id);
        }

        let mut group_memberships = Vec::new();
        for m in self.store.list_group_memberships_for_user(user.id)? {
            // Last remaining owner keeps the membership.
            if m.access_level == AccessLevel::Owner
                && self.store.count_group_owners(m.group_id)? <= 1
            {
                continue;
            }
            group_memberships.push(m.id);
        }

        Ok(RevocationPlan {
            project_memberships,
            group_memberships,
        })
    }

    fn created_project(&self, user_id: UserId, project_id: ProjectId) -> Result<bool> {
        Ok(self
            .store
            .get_project(project_id)?
            .is_some_and(|p| p.creator_id == Some(user_id)))
    }
}

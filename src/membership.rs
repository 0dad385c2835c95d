//! Membership Index: pure query layer answering which groups and projects a
//! user reaches through each relation, with no business policy. Results are
//! id-ascending and empty for users with no relations; store failures
//! propagate unchanged.

use crate::error::Result;
use crate::store::Store;
use crate::types::{GroupId, ProjectId, UserId};

pub struct MembershipIndex<'a> {
    store: &'a dyn Store,
}

impl<'a> MembershipIndex<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Groups whose namespace the user owns.
    pub fn owned_group_ids(&self, user_id: UserId) -> Result<Vec<GroupId>> {
        let groups = self.store.list_groups_owned_by(user_id)?;
        Ok(groups.into_iter().map(|g| g.id).collect())
    }

    /// Groups reached through membership join records.
    pub fn joined_group_ids(&self, user_id: UserId) -> Result<Vec<GroupId>> {
        let memberships = self.store.list_group_memberships_for_user(user_id)?;
        let mut ids: Vec<GroupId> = memberships.into_iter().map(|m| m.group_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Projects under the user's personal namespace.
    pub fn personal_project_ids(&self, user_id: UserId) -> Result<Vec<ProjectId>> {
        let Some(ns) = self.store.get_personal_namespace(user_id)? else {
            return Ok(Vec::new());
        };
        let projects = self.store.list_projects_in_namespace(ns.id)?;
        Ok(projects.into_iter().map(|p| p.id).collect())
    }

    /// Projects under any namespace the user owns (personal plus owned
    /// group-backed namespaces).
    pub fn owned_namespace_project_ids(&self, user_id: UserId) -> Result<Vec<ProjectId>> {
        let mut ids = Vec::new();
        for ns in self.store.list_owned_namespaces(user_id)? {
            let projects = self.store.list_projects_in_namespace(ns.id)?;
            ids.extend(projects.into_iter().map(|p| p.id));
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Projects the user created, wherever they now live.
    pub fn created_project_ids(&self, user_id: UserId) -> Result<Vec<ProjectId>> {
        let projects = self.store.list_projects_created_by(user_id)?;
        Ok(projects.into_iter().map(|p| p.id).collect())
    }

    /// Projects reached through direct membership join records.
    pub fn direct_project_ids(&self, user_id: UserId) -> Result<Vec<ProjectId>> {
        let memberships = self.store.list_project_memberships_for_user(user_id)?;
        let mut ids: Vec<ProjectId> = memberships.into_iter().map(|m| m.project_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Projects under the namespaces of the given groups.
    pub fn group_project_ids(&self, group_ids: &[GroupId]) -> Result<Vec<ProjectId>> {
        let mut ids = Vec::new();
        for group in self.store.list_groups_by_ids(group_ids)? {
            let projects = self.store.list_projects_in_namespace(group.namespace_id)?;
            ids.extend(projects.into_iter().map(|p| p.id));
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

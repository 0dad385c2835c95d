//! Authorization Resolver: the "what can I see" surface. Access in this
//! domain is multi-path (direct membership, via group, via ownership), so
//! each view is a set union over the Membership Index, never a single join.
//!
//! A resolver is built per unit of work and memoizes each derived collection
//! for its own lifetime. Discard it after the request; a resolver spanning a
//! mutation would serve stale answers.

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::membership::MembershipIndex;
use crate::store::Store;
use crate::types::{Group, NamespaceId, NamespaceKind, Project, ProjectId, User};

pub struct AccessResolver<'a> {
    store: &'a dyn Store,
    user: User,
    projects: Option<Vec<Project>>,
    groups: Option<Vec<Group>>,
    personal_project_ids: Option<Vec<ProjectId>>,
}

impl<'a> AccessResolver<'a> {
    pub fn new(store: &'a dyn Store, user: User) -> Self {
        Self {
            store,
            user,
            projects: None,
            groups: None,
            personal_project_ids: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Every project the user can see, deduplicated, ordered by owning
    /// namespace display name ascending with project id as the tiebreak.
    pub fn authorized_projects(&mut self) -> Result<&[Project]> {
        if self.projects.is_none() {
            let projects = self.compute_authorized_projects()?;
            self.projects = Some(projects);
        }
        Ok(self.projects.as_deref().unwrap_or_default())
    }

    /// Every group the user can see: joined, owned, and the groups backing
    /// the namespaces of authorized projects. Ordered by group name
    /// ascending, ties by group id.
    pub fn authorized_groups(&mut self) -> Result<&[Group]> {
        if self.groups.is_none() {
            let groups = self.compute_authorized_groups()?;
            self.groups = Some(groups);
        }
        Ok(self.groups.as_deref().unwrap_or_default())
    }

    /// May go negative when the limit was lowered after creation; that is an
    /// observable state, not an error.
    pub fn projects_limit_remaining(&mut self) -> Result<i64> {
        let personal = self.personal_project_count()?;
        Ok(i64::from(self.user.projects_limit) - personal)
    }

    /// 100 when the limit is zero; otherwise unclamped above 100.
    pub fn projects_limit_percent_used(&mut self) -> Result<f64> {
        if self.user.projects_limit == 0 {
            return Ok(100.0);
        }
        let personal = self.personal_project_count()? as f64;
        Ok(100.0 * personal / f64::from(self.user.projects_limit))
    }

    pub fn can_create_project(&mut self) -> Result<bool> {
        Ok(self.projects_limit_remaining()? > 0)
    }

    fn personal_project_count(&mut self) -> Result<i64> {
        if self.personal_project_ids.is_none() {
            let index = MembershipIndex::new(self.store);
            let ids = index.personal_project_ids(self.user.id)?;
            self.personal_project_ids = Some(ids);
        }
        Ok(self.personal_project_ids.as_deref().unwrap_or_default().len() as i64)
    }

    fn compute_authorized_projects(&self) -> Result<Vec<Project>> {
        let index = MembershipIndex::new(self.store);
        let user_id = self.user.id;

        let mut group_ids: BTreeSet<_> = index.owned_group_ids(user_id)?.into_iter().collect();
        group_ids.extend(index.joined_group_ids(user_id)?);
        let group_ids: Vec<_> = group_ids.into_iter().collect();

        let mut project_ids: BTreeSet<ProjectId> = index
            .owned_namespace_project_ids(user_id)?
            .into_iter()
            .collect();
        project_ids.extend(index.group_project_ids(&group_ids)?);
        project_ids.extend(index.direct_project_ids(user_id)?);
        project_ids.extend(index.created_project_ids(user_id)?);

        let ids: Vec<_> = project_ids.into_iter().collect();
        let mut projects = self.store.list_projects_by_ids(&ids)?;

        let namespace_names = self.namespace_names(projects.iter().map(|p| p.namespace_id))?;
        projects.sort_by(|a, b| {
            let an = namespace_names.get(&a.namespace_id);
            let bn = namespace_names.get(&b.namespace_id);
            an.cmp(&bn).then(a.id.cmp(&b.id))
        });
        Ok(projects)
    }

    fn compute_authorized_groups(&mut self) -> Result<Vec<Group>> {
        let index = MembershipIndex::new(self.store);
        let user_id = self.user.id;

        let mut group_ids: BTreeSet<_> = index.joined_group_ids(user_id)?.into_iter().collect();
        group_ids.extend(index.owned_group_ids(user_id)?);

        // Groups implied by project access through a group-backed namespace.
        let project_namespaces: Vec<NamespaceId> = self
            .authorized_projects()?
            .iter()
            .map(|p| p.namespace_id)
            .collect();
        for ns_id in project_namespaces {
            let Some(ns) = self.store.get_namespace(ns_id)? else {
                continue;
            };
            if ns.kind != NamespaceKind::Group {
                continue;
            }
            if let Some(group) = self.store.get_group_by_namespace(ns.id)? {
                group_ids.insert(group.id);
            }
        }

        let ids: Vec<_> = group_ids.into_iter().collect();
        let mut groups = self.store.list_groups_by_ids(&ids)?;
        groups.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    fn namespace_names(
        &self,
        namespace_ids: impl Iterator<Item = NamespaceId>,
    ) -> Result<HashMap<NamespaceId, String>> {
        let mut names = HashMap::new();
        for ns_id in namespace_ids {
            if names.contains_key(&ns_id) {
                continue;
            }
            if let Some(ns) = self.store.get_namespace(ns_id)? {
                names.insert(ns_id, ns.name);
            }
        }
        Ok(names)
    }
}

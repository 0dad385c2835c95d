//! Ability Gate: a pluggable policy evaluator answering "can this user
//! perform this action on this subject". A `false` answer is a normal
//! outcome, never an error.

use std::collections::HashMap;

use crate::store::Store;
use crate::types::{Group, GroupId, Project, ProjectId, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateGroup,
    ManageGroup,
    ManageProject,
}

/// The thing an action targets; `None` at the call site for global actions
/// such as group creation.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Group(&'a Group),
    Project(&'a Project),
}

pub trait AbilityGate {
    fn allowed(&self, user: &User, action: Action, subject: Option<Subject<'_>>) -> bool;
}

/// Built-in policy: admins may do anything; group creation follows the
/// account's `can_create_group` flag; managing a group or project requires
/// being its creator or owning its namespace.
pub struct DefaultPolicy<'a> {
    store: &'a dyn Store,
}

impl<'a> DefaultPolicy<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    fn owns_namespace(&self, user: &User, namespace_id: i64) -> bool {
        match self.store.get_namespace(namespace_id) {
            Ok(ns) => ns.and_then(|n| n.owner_id) == Some(user.id),
            Err(e) => {
                tracing::warn!("namespace lookup failed during policy check: {}", e);
                false
            }
        }
    }
}

impl AbilityGate for DefaultPolicy<'_> {
    fn allowed(&self, user: &User, action: Action, subject: Option<Subject<'_>>) -> bool {
        if user.admin {
            return true;
        }

        match (action, subject) {
            (Action::CreateGroup, _) => user.can_create_group,
            (Action::ManageGroup, Some(Subject::Group(group))) => {
                group.created_by_id == Some(user.id) || self.owns_namespace(user, group.namespace_id)
            }
            (Action::ManageProject, Some(Subject::Project(project))) => {
                project.creator_id == Some(user.id)
                    || self.owns_namespace(user, project.namespace_id)
            }
            // Subject-scoped actions without a subject are denied.
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SubjectKey {
    Group(GroupId),
    Project(ProjectId),
}

impl Subject<'_> {
    fn key(&self) -> SubjectKey {
        match self {
            Subject::Group(g) => SubjectKey::Group(g.id),
            Subject::Project(p) => SubjectKey::Project(p.id),
        }
    }
}

/// Per-user memoizing wrapper around an [`AbilityGate`]. Scoped to one
/// resolution pass; build a fresh one per unit of work.
pub struct Abilities<'a> {
    user: &'a User,
    gate: &'a dyn AbilityGate,
    memo: HashMap<(Action, Option<SubjectKey>), bool>,
}

impl<'a> Abilities<'a> {
    pub fn new(user: &'a User, gate: &'a dyn AbilityGate) -> Self {
        Self {
            user,
            gate,
            memo: HashMap::new(),
        }
    }

    pub fn allowed(&mut self, action: Action, subject: Option<Subject<'_>>) -> bool {
        let key = (action, subject.as_ref().map(Subject::key));
        if let Some(&cached) = self.memo.get(&key) {
            return cached;
        }
        let result = self.gate.allowed(self.user, action, subject);
        self.memo.insert(key, result);
        result
    }

    pub fn can_create_group(&mut self) -> bool {
        self.allowed(Action::CreateGroup, None)
    }
}

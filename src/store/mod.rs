mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Point lookups return `Ok(None)` for missing rows; deletes return whether
/// a row was removed. Updates aimed at a missing row fail with
/// [`crate::error::Error::NotFound`]. Implementations must serialize
/// statements touching one user's membership rows, since the block cascade's
/// last-owner check is read-then-act (see [`crate::lifecycle`]).
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    /// Inserts the user and their personal namespace in one transaction;
    /// the namespace's `owner_id` is bound to the new user's id. Neither row
    /// survives a failure of the other.
    fn create_user_with_namespace(&self, user: &User, ns: &Namespace) -> Result<UserId>;
    fn get_user(&self, id: UserId) -> Result<Option<User>>;
    /// Case-insensitive username lookup.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Case-insensitive lookup by email or username, lowest id wins.
    fn find_user_by_login(&self, login: &str) -> Result<Option<User>>;
    fn update_user(&self, user: &User) -> Result<()>;
    /// Single-row transactional state update.
    fn update_user_state(&self, id: UserId, state: UserState) -> Result<()>;
    fn delete_user(&self, id: UserId) -> Result<bool>;

    // Namespace operations
    fn create_namespace(&self, ns: &Namespace) -> Result<NamespaceId>;
    fn get_namespace(&self, id: NamespaceId) -> Result<Option<Namespace>>;
    /// Case-insensitive path lookup.
    fn get_namespace_by_path(&self, path: &str) -> Result<Option<Namespace>>;
    fn get_personal_namespace(&self, owner_id: UserId) -> Result<Option<Namespace>>;
    fn list_owned_namespaces(&self, owner_id: UserId) -> Result<Vec<Namespace>>;
    fn update_namespace(&self, ns: &Namespace) -> Result<()>;
    fn delete_namespace(&self, id: NamespaceId) -> Result<bool>;

    // Group operations
    fn create_group(&self, group: &Group) -> Result<GroupId>;
    fn get_group(&self, id: GroupId) -> Result<Option<Group>>;
    fn get_group_by_namespace(&self, namespace_id: NamespaceId) -> Result<Option<Group>>;
    /// Groups whose namespace is owned by the given user.
    fn list_groups_owned_by(&self, owner_id: UserId) -> Result<Vec<Group>>;
    fn list_groups_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>>;

    // Group membership operations
    fn add_group_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
        access_level: AccessLevel,
    ) -> Result<MembershipId>;
    fn list_group_memberships_for_user(&self, user_id: UserId) -> Result<Vec<GroupMembership>>;
    fn count_group_owners(&self, group_id: GroupId) -> Result<i64>;
    fn delete_group_membership(&self, id: MembershipId) -> Result<bool>;

    // Project operations
    fn create_project(&self, project: &Project) -> Result<ProjectId>;
    fn get_project(&self, id: ProjectId) -> Result<Option<Project>>;
    fn list_projects_in_namespace(&self, namespace_id: NamespaceId) -> Result<Vec<Project>>;
    fn list_projects_created_by(&self, creator_id: UserId) -> Result<Vec<Project>>;
    fn list_projects_by_ids(&self, ids: &[ProjectId]) -> Result<Vec<Project>>;

    // Project membership operations
    fn add_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        access_level: AccessLevel,
    ) -> Result<MembershipId>;
    fn list_project_memberships_for_user(&self, user_id: UserId)
    -> Result<Vec<ProjectMembership>>;
    fn delete_project_membership(&self, id: MembershipId) -> Result<bool>;
}

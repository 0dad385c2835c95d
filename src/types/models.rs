use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccessLevel, UserState};

pub type UserId = i64;
pub type NamespaceId = i64;
pub type GroupId = i64;
pub type ProjectId = i64;
pub type MembershipId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub name: String,
    pub state: UserState,
    pub admin: bool,
    pub projects_limit: u32,
    pub can_create_group: bool,
    pub theme_id: i32,
    /// Who provisioned this account; informational, not an ownership relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a namespace is backed by: a user's personal space or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceKind {
    User,
    Group,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,
    /// Display name, used for ordering authorized-project listings.
    pub name: String,
    /// URL path segment; shares the username space and is unique with it.
    pub path: String,
    pub kind: NamespaceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub namespace_id: NamespaceId,
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub namespace_id: NamespaceId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub group_id: GroupId,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
}

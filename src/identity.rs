//! Account factories: creation with configured defaults, renames, and the
//! destroy cascade. The personal namespace is created and removed in lockstep
//! with the user it backs.

use chrono::Utc;

use crate::config::Defaults;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Namespace, NamespaceKind, User, UserId, UserState};
use crate::validation::{validate_email, validate_username};

/// Attributes for a new account. Optional fields fall back to [`Defaults`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub projects_limit: Option<u32>,
    pub can_create_group: Option<bool>,
    pub theme_id: Option<i32>,
    pub created_by_id: Option<UserId>,
}

impl NewUser {
    pub fn new(username: &str, email: &str, name: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            admin: false,
            projects_limit: None,
            can_create_group: None,
            theme_id: None,
            created_by_id: None,
        }
    }
}

/// Rejects usernames that collide, case-insensitively, with an existing
/// username or namespace path. The two share one path space.
fn check_username_free(store: &dyn Store, username: &str) -> Result<()> {
    if store.get_user_by_username(username)?.is_some() {
        return Err(Error::AlreadyExists);
    }
    if store.get_namespace_by_path(username)?.is_some() {
        return Err(Error::AlreadyExists);
    }
    Ok(())
}

/// Creates a user and their personal namespace.
///
/// Validation failures are rejected before any mutation.
pub fn create_user(store: &dyn Store, defaults: &Defaults, req: NewUser) -> Result<User> {
    validate_username(&req.username).map_err(Error::Validation)?;
    validate_email(&req.email).map_err(Error::Validation)?;
    check_username_free(store, &req.username)?;

    let now = Utc::now();
    let user = User {
        id: 0,
        username: req.username.clone(),
        email: req.email,
        name: req.name.clone(),
        state: UserState::Active,
        admin: req.admin,
        projects_limit: req.projects_limit.unwrap_or(defaults.projects_limit),
        can_create_group: req.can_create_group.unwrap_or(defaults.can_create_group),
        theme_id: req.theme_id.unwrap_or(defaults.theme_id),
        created_by_id: req.created_by_id,
        created_at: now,
        updated_at: now,
    };

    let ns = Namespace {
        id: 0,
        name: req.name,
        path: req.username,
        kind: NamespaceKind::User,
        owner_id: None,
        created_at: now,
    };
    // One transaction: a user without their personal namespace must never
    // be observable.
    let user_id = store.create_user_with_namespace(&user, &ns)?;

    store.get_user(user_id)?.ok_or(Error::NotFound)
}

/// Changes a username and the personal namespace path together.
pub fn rename_user(
    store: &dyn Store,
    defaults: &Defaults,
    user_id: UserId,
    new_username: &str,
) -> Result<User> {
    if !defaults.username_changing_enabled {
        return Err(Error::Validation(
            "Username changing is disabled".to_string(),
        ));
    }
    validate_username(new_username).map_err(Error::Validation)?;

    let Some(mut user) = store.get_user(user_id)? else {
        return Err(Error::NotFound);
    };
    if !user.username.eq_ignore_ascii_case(new_username) {
        check_username_free(store, new_username)?;
    }

    user.username = new_username.to_string();
    store.update_user(&user)?;

    if let Some(mut ns) = store.get_personal_namespace(user_id)? {
        ns.path = new_username.to_string();
        store.update_namespace(&ns)?;
    }

    store.get_user(user_id)?.ok_or(Error::NotFound)
}

/// Destroys a user: the personal namespace goes first (cascading its
/// projects), then the user row, which cascades membership join records.
/// Group namespaces the user owned are orphaned, not destroyed.
pub fn destroy_user(store: &dyn Store, user_id: UserId) -> Result<bool> {
    if let Some(ns) = store.get_personal_namespace(user_id)? {
        store.delete_namespace(ns.id)?;
    }
    store.delete_user(user_id)
}

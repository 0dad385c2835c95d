#![allow(dead_code)]

use chrono::Utc;

use cohort::config::Defaults;
use cohort::identity::{self, NewUser};
use cohort::store::{SqliteStore, Store};
use cohort::types::{
    AccessLevel, Group, MembershipId, Namespace, NamespaceKind, Project, User, UserId,
};

static TRACING: std::sync::Once = std::sync::Once::new();

/// Routes crate logs to the test output when RUST_LOG is set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn test_store() -> SqliteStore {
    init_tracing();
    let store = SqliteStore::open_in_memory().expect("open in-memory store");
    store.initialize().expect("initialize schema");
    store
}

pub fn create_user(store: &dyn Store, username: &str) -> User {
    let email = format!("{username}@example.com");
    identity::create_user(
        store,
        &Defaults::default(),
        NewUser::new(username, &email, username),
    )
    .expect("create user")
}

pub fn create_user_with_limit(store: &dyn Store, username: &str, projects_limit: u32) -> User {
    let email = format!("{username}@example.com");
    let mut req = NewUser::new(username, &email, username);
    req.projects_limit = Some(projects_limit);
    identity::create_user(store, &Defaults::default(), req).expect("create user")
}

/// Creates a group with its backing namespace and an Owner membership for
/// the creator. Returns the group and the creator's membership id.
pub fn create_group(store: &dyn Store, name: &str, creator: &User) -> (Group, MembershipId) {
    let ns_id = store
        .create_namespace(&Namespace {
            id: 0,
            name: name.to_string(),
            path: format!("{name}-group"),
            kind: NamespaceKind::Group,
            owner_id: Some(creator.id),
            created_at: Utc::now(),
        })
        .expect("create group namespace");

    let group_id = store
        .create_group(&Group {
            id: 0,
            namespace_id: ns_id,
            name: name.to_string(),
            path: format!("{name}-group"),
            created_by_id: Some(creator.id),
            created_at: Utc::now(),
        })
        .expect("create group");

    let membership_id = store
        .add_group_member(group_id, creator.id, AccessLevel::Owner)
        .expect("add owner membership");

    let group = store.get_group(group_id).expect("get group").expect("group");
    (group, membership_id)
}

/// Creates a group owned by nobody in particular (namespace has no owner).
pub fn create_orphan_group(store: &dyn Store, name: &str) -> Group {
    let ns_id = store
        .create_namespace(&Namespace {
            id: 0,
            name: name.to_string(),
            path: format!("{name}-group"),
            kind: NamespaceKind::Group,
            owner_id: None,
            created_at: Utc::now(),
        })
        .expect("create group namespace");

    let group_id = store
        .create_group(&Group {
            id: 0,
            namespace_id: ns_id,
            name: name.to_string(),
            path: format!("{name}-group"),
            created_by_id: None,
            created_at: Utc::now(),
        })
        .expect("create group");

    store.get_group(group_id).expect("get group").expect("group")
}

pub fn create_project(
    store: &dyn Store,
    namespace_id: i64,
    name: &str,
    creator_id: Option<UserId>,
) -> Project {
    let id = store
        .create_project(&Project {
            id: 0,
            namespace_id,
            name: name.to_string(),
            creator_id,
            created_at: Utc::now(),
        })
        .expect("create project");
    store.get_project(id).expect("get project").expect("project")
}

pub fn personal_namespace(store: &dyn Store, user: &User) -> Namespace {
    store
        .get_personal_namespace(user.id)
        .expect("get personal namespace")
        .expect("personal namespace exists")
}

/// Creates `n` projects under the user's personal namespace.
pub fn create_personal_projects(store: &dyn Store, user: &User, n: usize) -> Vec<Project> {
    let ns = personal_namespace(store, user);
    (0..n)
        .map(|i| create_project(store, ns.id, &format!("project-{i}"), Some(user.id)))
        .collect()
}

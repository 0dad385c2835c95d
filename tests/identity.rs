mod common;

use chrono::Utc;

use cohort::config::Defaults;
use cohort::error::Error;
use cohort::identity::{self, NewUser};
use cohort::store::Store;
use cohort::types::{AccessLevel, Namespace, NamespaceKind, User, UserState};

use common::*;

#[test]
fn create_applies_configured_defaults() {
    let store = test_store();
    let defaults = Defaults {
        projects_limit: 42,
        can_create_group: false,
        theme_id: 3,
        username_changing_enabled: true,
    };

    let user = identity::create_user(
        &store,
        &defaults,
        NewUser::new("alice", "alice@example.com", "Alice"),
    )
    .unwrap();

    assert_eq!(user.projects_limit, 42);
    assert!(!user.can_create_group);
    assert_eq!(user.theme_id, 3);
    assert_eq!(user.state, UserState::Active);
    assert!(!user.admin);
}

#[test]
fn create_honors_explicit_overrides() {
    let store = test_store();
    let mut req = NewUser::new("alice", "alice@example.com", "Alice");
    req.projects_limit = Some(0);
    req.admin = true;

    let user = identity::create_user(&store, &Defaults::default(), req).unwrap();
    assert_eq!(user.projects_limit, 0);
    assert!(user.admin);
}

#[test]
fn create_builds_personal_namespace_in_lockstep() {
    let store = test_store();
    let user = create_user(&store, "alice");

    let ns = personal_namespace(&store, &user);
    assert_eq!(ns.kind, NamespaceKind::User);
    assert_eq!(ns.path, "alice");
    assert_eq!(ns.owner_id, Some(user.id));
}

#[test]
fn user_and_namespace_creation_is_atomic() {
    let store = test_store();
    let now = Utc::now();

    // Claim the path ahead of time, bypassing the factory's checks, so the
    // namespace insert hits the unique path index.
    store
        .create_namespace(&Namespace {
            id: 0,
            name: "squatter".to_string(),
            path: "alice".to_string(),
            kind: NamespaceKind::Group,
            owner_id: None,
            created_at: now,
        })
        .unwrap();

    let user = User {
        id: 0,
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        name: "Alice".to_string(),
        state: UserState::Active,
        admin: false,
        projects_limit: 10,
        can_create_group: true,
        theme_id: 1,
        created_by_id: None,
        created_at: now,
        updated_at: now,
    };
    let ns = Namespace {
        id: 0,
        name: "Alice".to_string(),
        path: "alice".to_string(),
        kind: NamespaceKind::User,
        owner_id: None,
        created_at: now,
    };

    let result = store.create_user_with_namespace(&user, &ns);
    assert!(matches!(result, Err(Error::Database(_))));
    assert!(
        store.get_user_by_username("alice").unwrap().is_none(),
        "user insert rolled back with the failed namespace insert"
    );
}

#[test]
fn create_rejects_bad_input_before_mutation() {
    let store = test_store();
    let defaults = Defaults::default();

    for (username, email) in [
        ("9lives", "ok@example.com"),
        ("admin", "ok@example.com"),
        ("ok", "not-an-email"),
    ] {
        let result =
            identity::create_user(&store, &defaults, NewUser::new(username, email, "x"));
        assert!(matches!(result, Err(Error::Validation(_))), "{username}");
        assert!(store.get_user_by_username(username).unwrap().is_none());
    }
}

#[test]
fn create_rejects_username_collisions_case_insensitively() {
    let store = test_store();
    let defaults = Defaults::default();
    create_user(&store, "alice");

    let result = identity::create_user(
        &store,
        &defaults,
        NewUser::new("Alice", "other@example.com", "Alice"),
    );
    assert!(matches!(result, Err(Error::AlreadyExists)));
}

#[test]
fn create_rejects_namespace_path_collisions() {
    let store = test_store();
    let alice = create_user(&store, "alice");
    create_group(&store, "devs", &alice);

    // The group fixture claims the "devs-group" path.
    let result = identity::create_user(
        &store,
        &Defaults::default(),
        NewUser::new("devs-group", "d@example.com", "Devs"),
    );
    assert!(matches!(result, Err(Error::AlreadyExists)));
}

#[test]
fn lookups_are_case_insensitive() {
    let store = test_store();
    let user = create_user(&store, "Alice");

    assert_eq!(
        store.get_user_by_username("alice").unwrap().map(|u| u.id),
        Some(user.id)
    );
    assert_eq!(
        store.find_user_by_login("ALICE@EXAMPLE.COM").unwrap().map(|u| u.id),
        Some(user.id)
    );
    assert_eq!(
        store.find_user_by_login("alice").unwrap().map(|u| u.id),
        Some(user.id)
    );
    assert!(store.find_user_by_login("nobody").unwrap().is_none());
}

#[test]
fn rename_updates_user_and_namespace_path() {
    let store = test_store();
    let defaults = Defaults::default();
    let user = create_user(&store, "alice");

    let renamed = identity::rename_user(&store, &defaults, user.id, "alicia").unwrap();
    assert_eq!(renamed.username, "alicia");

    let ns = personal_namespace(&store, &renamed);
    assert_eq!(ns.path, "alicia");
    assert!(store.get_namespace_by_path("alice").unwrap().is_none());
}

#[test]
fn rename_denied_when_disabled() {
    let store = test_store();
    let defaults = Defaults {
        username_changing_enabled: false,
        ..Defaults::default()
    };
    let user = create_user(&store, "alice");

    let result = identity::rename_user(&store, &defaults, user.id, "alicia");
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(
        store.get_user(user.id).unwrap().unwrap().username,
        "alice"
    );
}

#[test]
fn destroy_cascades_personal_resources_and_orphans_groups() {
    let store = test_store();
    let alice = create_user(&store, "alice");
    let bob = create_user(&store, "bob");

    let personal = create_personal_projects(&store, &alice, 2);
    let (group, _) = create_group(&store, "team", &alice);
    let group_project = create_project(&store, group.namespace_id, "gp", Some(alice.id));

    let bob_ns = personal_namespace(&store, &bob);
    let shared = create_project(&store, bob_ns.id, "shared", Some(bob.id));
    store
        .add_project_member(shared.id, alice.id, AccessLevel::Developer)
        .unwrap();

    assert!(identity::destroy_user(&store, alice.id).unwrap());

    assert!(store.get_user(alice.id).unwrap().is_none());
    assert!(store.get_namespace_by_path("alice").unwrap().is_none());
    for p in personal {
        assert!(store.get_project(p.id).unwrap().is_none());
    }
    assert!(
        store
            .list_project_memberships_for_user(alice.id)
            .unwrap()
            .is_empty()
    );

    // The group survives, ownerless.
    let group_ns = store.get_namespace(group.namespace_id).unwrap().unwrap();
    assert_eq!(group_ns.owner_id, None);
    assert!(store.get_project(group_project.id).unwrap().is_some());
    assert!(store.get_project(shared.id).unwrap().is_some());
}

mod common;

use cohort::store::{SqliteStore, Store};
use cohort::types::UserState;

use common::*;

#[test]
fn store_persists_across_reopen() {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("cohort.db");

    let user_id = {
        let store = SqliteStore::new(&db_path).expect("open store");
        store.initialize().expect("initialize schema");
        create_user(&store, "alice").id
    };

    let store = SqliteStore::new(&db_path).expect("reopen store");
    store.initialize().expect("initialize is idempotent");

    let user = store.get_user(user_id).unwrap().expect("user survived");
    assert_eq!(user.username, "alice");
    assert_eq!(user.state, UserState::Active);
    assert!(store.get_personal_namespace(user_id).unwrap().is_some());
}

#[test]
fn user_serialization_skips_absent_backreference() {
    let store = test_store();
    let user = create_user(&store, "alice");

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["username"], "alice");
    assert_eq!(value["state"], "active");
    assert!(value.get("created_by_id").is_none());
}

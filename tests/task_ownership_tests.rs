//! Ownership contract integration tests: per-user task isolation and the
//! create/fetch/update/delete round trips, exercised the way the task
//! handlers compose the guard, the ownership check and the store.

use axum::http::HeaderMap;
use chrono::NaiveDate;
use tempfile::tempdir;

use tasknest::config::ServerConfig;
use tasknest::error::AppError;
use tasknest::identity::{ensure_owner, Principal, RegisterRequest};
use tasknest::server::AppState;
use tasknest::storage::tasks::TaskPatch;

const TEST_SECRET: &str = "integration-test-secret";

fn state_for(root: &std::path::Path) -> AppState {
    let cfg = ServerConfig {
        http_port: 0,
        db_root: root.to_string_lossy().to_string(),
        token_secret: TEST_SECRET.to_string(),
    };
    AppState::new(&cfg).expect("app state")
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("authorization", format!("Bearer {}", token).parse().unwrap());
    headers
}

/// Register a user and resolve their principal through the guard, as a
/// protected request would.
fn signup(state: &AppState, name: &str, email: &str) -> Principal {
    let issued = state
        .issuer
        .register(&RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some("password123".to_string()),
        })
        .expect("register");
    state.guard.authenticate(&bearer(&issued.token)).expect("authenticate")
}

#[test]
fn owner_passes_other_identity_fails() {
    let tmp = tempdir().unwrap();
    let state = state_for(tmp.path());

    let alice = signup(&state, "Alice", "alice@example.com");
    let bob = signup(&state, "Bob", "bob@example.com");

    let task = {
        let guard = state.store.0.lock();
        guard.insert_task("Alice's task", None, alice.user_id).unwrap()
    };

    assert!(ensure_owner(&alice, task.user).is_ok());

    let err = ensure_owner(&bob, task.user).unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
    assert_eq!(err.message(), "Not authorized");
    assert_eq!(err.http_status(), 403);
}

#[test]
fn task_round_trip_preserves_fields() {
    let tmp = tempdir().unwrap();
    let state = state_for(tmp.path());
    let alice = signup(&state, "Alice", "alice@example.com");

    let due = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let created = {
        let guard = state.store.0.lock();
        guard.insert_task("Test Task", Some(due), alice.user_id).unwrap()
    };
    assert!(!created.completed);

    let fetched = {
        let guard = state.store.0.lock();
        guard.find_task_by_id(created.id).unwrap().expect("task exists")
    };
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.due_date, created.due_date);
    assert_eq!(fetched.completed, created.completed);

    {
        let guard = state.store.0.lock();
        guard.delete_task(created.id).unwrap();
        assert!(guard.find_task_by_id(created.id).unwrap().is_none());
    }
}

#[test]
fn listing_is_scoped_to_the_caller() {
    let tmp = tempdir().unwrap();
    let state = state_for(tmp.path());

    let alice = signup(&state, "Alice", "alice@example.com");
    let bob = signup(&state, "Bob", "bob@example.com");

    {
        let guard = state.store.0.lock();
        guard.insert_task("Test Task 1", None, alice.user_id).unwrap();
        guard.insert_task("Test Task 2", None, alice.user_id).unwrap();
    }

    let guard = state.store.0.lock();
    let alices = guard.find_tasks_by_owner(alice.user_id).unwrap();
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|t| t.user == alice.user_id));

    // fresh user sees an empty list, not an error
    let bobs = guard.find_tasks_by_owner(bob.user_id).unwrap();
    assert!(bobs.is_empty());
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let tmp = tempdir().unwrap();
    let state = state_for(tmp.path());
    let alice = signup(&state, "Alice", "alice@example.com");

    let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let guard = state.store.0.lock();
    let task = guard.insert_task("Task to Update", Some(due), alice.user_id).unwrap();

    let updated = guard
        .update_task(task.id, &TaskPatch { title: Some("Updated Task".into()), completed: Some(true), ..Default::default() })
        .unwrap();
    assert_eq!(updated.title, "Updated Task");
    assert!(updated.completed);
    assert_eq!(updated.due_date, Some(due));
    assert_eq!(updated.user, alice.user_id);
}

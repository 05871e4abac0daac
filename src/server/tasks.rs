//! Protected task endpoints. Every handler runs the access guard first and
//! the per-id handlers apply the ownership contract before touching the
//! document.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::identity::{ensure_owner, Principal};
use crate::storage::tasks::TaskPatch;
use crate::storage::Task;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskPayload {
    pub title: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
}

/// Guard the request, load the task, and check ownership. The shared
/// preamble of every per-id handler.
fn load_owned_task(state: &AppState, headers: &HeaderMap, id: Uuid) -> AppResult<(Principal, Task)> {
    let principal = state.guard.authenticate(headers)?;
    let task = {
        let guard = state.store.0.lock();
        guard.find_task_by_id(id)?
    };
    let Some(task) = task else {
        return Err(AppError::not_found("task_not_found", "Task not found"));
    };
    ensure_owner(&principal, task.user)?;
    Ok((principal, task))
}

pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<Task>>> {
    let principal = state.guard.authenticate(&headers)?;
    let tasks = {
        let guard = state.store.0.lock();
        guard.find_tasks_by_owner(principal.user_id)?
    };
    Ok(Json(tasks))
}

pub(crate) async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTaskPayload>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let principal = state.guard.authenticate(&headers)?;
    let Some(title) = payload.title.as_deref().filter(|t| !t.is_empty()) else {
        return Err(AppError::user("missing_title", "Title is required"));
    };
    let task = {
        let guard = state.store.0.lock();
        guard.insert_task(title, payload.due_date, principal.user_id)?
    };
    Ok((StatusCode::CREATED, Json(task)))
}

pub(crate) async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Task>> {
    let (_principal, task) = load_owned_task(&state, &headers, id)?;
    Ok(Json(task))
}

pub(crate) async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> AppResult<Json<Task>> {
    let (_principal, task) = load_owned_task(&state, &headers, id)?;
    let updated = {
        let guard = state.store.0.lock();
        guard.update_task(task.id, &patch)?
    };
    Ok(Json(updated))
}

pub(crate) async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let (_principal, task) = load_owned_task(&state, &headers, id)?;
    {
        let guard = state.store.0.lock();
        guard.delete_task(task.id)?;
    }
    Ok(Json(serde_json::json!({ "message": "Task removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::identity::RegisterRequest;

    fn state_for(root: &std::path::Path) -> AppState {
        let cfg = ServerConfig {
            http_port: 0,
            db_root: root.to_string_lossy().to_string(),
            token_secret: "handler-test-secret".to_string(),
        };
        AppState::new(&cfg).unwrap()
    }

    fn signup(state: &AppState, email: &str) -> HeaderMap {
        let issued = state
            .issuer
            .register(&RegisterRequest {
                name: Some("Test User".into()),
                email: Some(email.into()),
                password: Some("password123".into()),
            })
            .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {}", issued.token).parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn create_requires_title() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path());
        let headers = signup(&state, "test@example.com");

        let payload = CreateTaskPayload { title: None, due_date: None };
        let err = create_task(State(state), headers, Json(payload)).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.message(), "Title is required");
    }

    #[tokio::test]
    async fn requests_without_token_are_401() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path());
        let err = list_tasks(State(state), HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.http_status(), 401);
        assert_eq!(err.message(), "Not authorized, no token");
    }

    #[tokio::test]
    async fn create_get_delete_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path());
        let headers = signup(&state, "test@example.com");

        let payload = CreateTaskPayload {
            title: Some("Test Task".into()),
            due_date: NaiveDate::from_ymd_opt(2023, 12, 31),
        };
        let (status, Json(task)) =
            create_task(State(state.clone()), headers.clone(), Json(payload)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(!task.completed);

        let Json(fetched) =
            get_task(State(state.clone()), headers.clone(), Path(task.id)).await.unwrap();
        assert_eq!(fetched.title, "Test Task");
        assert_eq!(fetched.due_date, task.due_date);

        let Json(removed) =
            delete_task(State(state.clone()), headers.clone(), Path(task.id)).await.unwrap();
        assert_eq!(removed["message"], "Task removed");

        let err = get_task(State(state), headers, Path(task.id)).await.unwrap_err();
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.message(), "Task not found");
    }

    #[tokio::test]
    async fn other_identity_cannot_touch_the_task() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path());
        let alice = signup(&state, "alice@example.com");
        let bob = signup(&state, "bob@example.com");

        let payload = CreateTaskPayload { title: Some("Alice's task".into()), due_date: None };
        let (_, Json(task)) =
            create_task(State(state.clone()), alice.clone(), Json(payload)).await.unwrap();

        let err = get_task(State(state.clone()), bob.clone(), Path(task.id)).await.unwrap_err();
        assert_eq!(err.http_status(), 403);
        assert_eq!(err.message(), "Not authorized");

        let patch = TaskPatch { title: Some("Should Not Update".into()), ..Default::default() };
        let err = update_task(State(state.clone()), bob.clone(), Path(task.id), Json(patch))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Not authorized");

        let err = delete_task(State(state.clone()), bob, Path(task.id)).await.unwrap_err();
        assert_eq!(err.message(), "Not authorized");

        // the owner still succeeds
        let patch = TaskPatch { completed: Some(true), ..Default::default() };
        let Json(updated) =
            update_task(State(state), alice, Path(task.id), Json(patch)).await.unwrap();
        assert!(updated.completed);
    }
}

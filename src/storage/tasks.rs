//! Task collection primitives. Ownership is recorded on the document; the
//! ownership check itself lives with the access guard, not here.

use std::fs;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, Task};

/// Partial update for a task. Absent fields are left unchanged.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl Store {
    pub fn insert_task(&self, title: &str, due_date: Option<NaiveDate>, owner: Uuid) -> StoreResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            due_date,
            completed: false,
            user: owner,
            created_at: Utc::now(),
        };
        self.write_doc(&self.task_path(task.id), &task)?;
        debug!(target: "tasknest::storage", "insert_task: id='{}' owner='{}'", task.id, task.user);
        Ok(task)
    }

    pub fn find_task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        self.read_doc(&self.task_path(id))
    }

    /// All tasks owned by the given user, oldest first. Ties on the creation
    /// timestamp break on id so listings are stable across calls.
    pub fn find_tasks_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let mut out: Vec<Task> = Vec::new();
        for entry in fs::read_dir(self.tasks_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") { continue; }
            if let Some(task) = self.read_doc::<Task>(&path)? {
                if task.user == owner { out.push(task); }
            }
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    /// Apply a partial update to an existing task and persist the result.
    pub fn update_task(&self, id: Uuid, patch: &TaskPatch) -> StoreResult<Task> {
        let Some(mut task) = self.find_task_by_id(id)? else {
            return Err(StoreError::NotFound { kind: "task" });
        };
        if let Some(title) = &patch.title { task.title = title.clone(); }
        if let Some(due) = patch.due_date { task.due_date = Some(due); }
        if let Some(done) = patch.completed { task.completed = done; }
        self.write_doc(&self.task_path(task.id), &task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { kind: "task" });
        }
        fs::remove_file(path)?;
        debug!(target: "tasknest::storage", "delete_task: id='{}'", id);
        Ok(())
    }
}

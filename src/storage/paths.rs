use std::path::PathBuf;
use uuid::Uuid;

use super::Store;

impl Store {
    pub(crate) fn users_dir(&self) -> PathBuf { self.root.join("users") }

    pub(crate) fn tasks_dir(&self) -> PathBuf { self.root.join("tasks") }

    pub(crate) fn user_path(&self, id: Uuid) -> PathBuf {
        self.users_dir().join(format!("{}.json", id))
    }

    pub(crate) fn task_path(&self, id: Uuid) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }
}

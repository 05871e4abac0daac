//!
//! tasknest storage module
//! -----------------------
//! This module implements the on-disk document store for tasknest using a
//! simple two-collection directory layout: `users/<id>.json` and
//! `tasks/<id>.json` under a configured root folder. Each document is a
//! single JSON file rewritten whole on every mutation.
//!
//! Key responsibilities:
//! - User creation with email uniqueness enforced under the store lock.
//! - Task CRUD with owner-scoped listing.
//! - Lookup primitives used by the credential issuer and the access guard.
//!
//! The public API centers around the `Store` type, which is usually wrapped in
//! a thread-safe `SharedStore` (`Arc<Mutex<Store>>`) elsewhere in the codebase.

use std::{fs, path::{Path, PathBuf}};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod paths;
pub mod users;
pub mod tasks;

/// Errors surfaced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str },
    #[error("user with email '{email}' already exists")]
    DuplicateEmail { email: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// An identity record. The password is only ever stored as an Argon2 PHC
/// string; handlers never serialize this struct onto the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Case-sensitive natural key; unique across the users collection.
    pub email: String,
    pub password_hash: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A per-user task document. `user` is the owning identity; every read or
/// mutation must come from that identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub user: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Core on-disk storage handle for a tasknest document tree.
///
/// Store exposes methods to create and look up users and tasks. It operates
/// under a configured root folder and resolves document ids to real paths.
#[derive(Clone)]
pub struct Store {
    /// Root folder for all collections.
    root: PathBuf,
}

impl Store {
    /// Create a new Store rooted at the given filesystem path.
    /// The collection directories are created if they do not already exist.
    pub fn new<P: AsRef<Path>>(root: P) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        fs::create_dir_all(root.join("tasks"))?;
        Ok(Self { root })
    }

    /// Return the configured root folder for this Store.
    pub fn root_path(&self) -> &PathBuf { &self.root }

    fn read_doc<T: serde::de::DeserializeOwned>(&self, path: &Path) -> StoreResult<Option<T>> {
        if !path.exists() { return Ok(None); }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write_doc<T: Serialize>(&self, path: &Path, doc: &T) -> StoreResult<()> {
        if let Some(dir) = path.parent() { fs::create_dir_all(dir)?; }
        let text = serde_json::to_string_pretty(doc)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SharedStore(pub Arc<Mutex<Store>>);

impl SharedStore {
    pub fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self(Arc::new(Mutex::new(Store::new(root)?))))
    }
}

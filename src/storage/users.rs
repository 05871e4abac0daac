//! User collection primitives: creation with email uniqueness, plus the
//! lookups used by the credential issuer (by email) and the access guard
//! (by id).

use std::fs;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, User};

impl Store {
    /// Persist a new user. Fails with `DuplicateEmail` if a user with the
    /// same email already exists; callers hold the store lock, so the
    /// check-then-write pair is atomic with respect to other requests.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User> {
        if self.find_user_by_email(email)?.is_some() {
            return Err(StoreError::DuplicateEmail { email: email.to_string() });
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.write_doc(&self.user_path(user.id), &user)?;
        debug!(target: "tasknest::storage", "create_user: id='{}' email='{}'", user.id, user.email);
        Ok(user)
    }

    /// Scan the users collection for a document with the given email.
    /// Emails are compared case-sensitively; the email is the natural key.
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        for entry in fs::read_dir(self.users_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") { continue; }
            if let Some(user) = self.read_doc::<User>(&path)? {
                if user.email == email { return Ok(Some(user)); }
            }
        }
        Ok(None)
    }

    pub fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.read_doc(&self.user_path(id))
    }
}

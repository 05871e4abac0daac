use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::security;
use crate::storage::{SharedStore, User};

use super::token::TokenSigner;

/// Minimal `local@domain.tld` shape check; anything stricter belongs to a
/// mail delivery layer, not registration.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A freshly authenticated identity and the bearer token bound to it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user: User,
    pub token: String,
}

/// Verifies submitted credentials and mints access tokens. Holds the store
/// handle and the injected signer; no state survives a request.
#[derive(Clone)]
pub struct CredentialIssuer {
    store: SharedStore,
    signer: TokenSigner,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn invalid_credentials() -> AppError {
    // one generic message for unknown email and wrong password alike
    AppError::auth("invalid_credentials", "Invalid credentials")
}

impl CredentialIssuer {
    pub fn new(store: SharedStore, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    /// Register a new user and issue a token bound to the new identity.
    /// The duplicate-email check runs before field validation, so a taken
    /// email reports the conflict even when other fields are missing.
    pub fn register(&self, req: &RegisterRequest) -> AppResult<IssuedToken> {
        let guard = self.store.0.lock();
        if let Some(email) = present(&req.email) {
            if guard.find_user_by_email(email)?.is_some() {
                return Err(AppError::conflict("duplicate_email", "User already exists"));
            }
        }
        let (Some(name), Some(email), Some(password)) =
            (present(&req.name), present(&req.email), present(&req.password))
        else {
            return Err(AppError::user("missing_fields", "All fields are required"));
        };
        if !EMAIL_SHAPE.is_match(email) {
            return Err(AppError::user("invalid_email", "Please enter a valid email"));
        }
        let phc = security::hash_password(password)?;
        let user = guard.create_user(name, email, &phc)?;
        let token = self.signer.mint(user.id)?;
        info!(target: "tasknest::auth", "auth.register user={} email={}", user.id, user.email);
        Ok(IssuedToken { user, token })
    }

    /// Authenticate an existing user and issue a fresh token.
    pub fn login(&self, req: &LoginRequest) -> AppResult<IssuedToken> {
        let (Some(email), Some(password)) = (present(&req.email), present(&req.password)) else {
            return Err(AppError::user("missing_fields", "Email and password are required"));
        };
        let user = {
            let guard = self.store.0.lock();
            guard.find_user_by_email(email)?
        };
        let Some(user) = user else { return Err(invalid_credentials()) };
        if !security::verify_password(&user.password_hash, password) {
            return Err(invalid_credentials());
        }
        let token = self.signer.mint(user.id)?;
        info!(target: "tasknest::auth", "auth.login user={}", user.id);
        Ok(IssuedToken { user, token })
    }
}

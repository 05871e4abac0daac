use axum::http::HeaderMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::storage::SharedStore;

use super::principal::Principal;
use super::token::TokenSigner;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization").or_else(|| headers.get("Authorization"))?;
    let s = value.to_str().ok()?;
    s.strip_prefix("Bearer ")
}

/// Gate in front of every protected operation: validates the presented
/// bearer token and resolves it to a live user record. Holds only the store
/// handle and the injected signer; validating has no side effects.
#[derive(Clone)]
pub struct AccessGuard {
    store: SharedStore,
    signer: TokenSigner,
}

impl AccessGuard {
    pub fn new(store: SharedStore, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    /// Extract, verify, and resolve the request's bearer token.
    ///
    /// A missing or non-Bearer header, a failed signature/expiry check, and
    /// a token whose subject no longer exists all fail authentication; the
    /// latter two share one message so callers learn nothing about which.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<Principal> {
        let Some(token) = bearer_token(headers) else {
            return Err(AppError::auth("no_token", "Not authorized, no token"));
        };
        let claims = self
            .signer
            .verify(token)
            .map_err(|_| AppError::auth("token_failed", "Not authorized, token failed"))?;
        let user = {
            let guard = self.store.0.lock();
            guard.find_user_by_id(claims.sub)?
        };
        let Some(user) = user else {
            return Err(AppError::auth("token_failed", "Not authorized, token failed"));
        };
        Ok(Principal::from(&user))
    }
}

/// Ownership contract shared by every per-user resource handler: after the
/// guard succeeds and the resource is loaded, the caller must match the
/// resource's owning identity. Fails with Forbidden, distinct from NotFound.
pub fn ensure_owner(principal: &Principal, owner: Uuid) -> AppResult<()> {
    if principal.user_id != owner {
        return Err(AppError::forbidden("not_owner", "Not authorized"));
    }
    Ok(())
}

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Fixed token lifetime. No refresh or revocation exists; a minted token is
/// valid until this window elapses.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Signed token payload. `sub` is the owning user id; `exp` is checked by
/// the verifier, so validity needs no server-side lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and verifies self-contained HS256 access tokens. The signing secret
/// is injected at construction and never read from ambient state.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign `{sub, iat, exp}` for the given user with the fixed lifetime.
    pub fn mint(&self, user_id: Uuid) -> AppResult<String> {
        let iat = Utc::now().timestamp();
        let claims = Claims { sub: user_id, iat, exp: iat + TOKEN_TTL_DAYS * 24 * 3600 };
        self.sign(&claims)
    }

    /// Sign arbitrary claims. Split from `mint` so tests can build
    /// already-expired tokens with the real key.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal { code: "token_sign".into(), message: e.to_string() })
    }

    /// Verify signature and expiry. Any failure (tampered, wrong key,
    /// expired, malformed) surfaces as the jsonwebtoken error.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

//! Central identity handling for tasknest: credential issuance, stateless
//! token signing, and the access guard with its ownership contract.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod token;
mod issuer;
mod guard;

pub use principal::Principal;
pub use token::{Claims, TokenSigner, TOKEN_TTL_DAYS};
pub use issuer::{CredentialIssuer, IssuedToken, LoginRequest, RegisterRequest};
pub use guard::{ensure_owner, AccessGuard};

//! Public auth endpoints: registration and login. Both delegate to the
//! credential issuer and return the identity plus its bearer token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::identity::{IssuedToken, LoginRequest, RegisterRequest};

use super::AppState;

/// Wire shape shared by register and login responses.
#[derive(Debug, Serialize)]
pub struct AuthBody {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl From<IssuedToken> for AuthBody {
    fn from(issued: IssuedToken) -> Self {
        Self {
            id: issued.user.id,
            name: issued.user.name,
            email: issued.user.email,
            token: issued.token,
        }
    }
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthBody>)> {
    let issued = state.issuer.register(&payload)?;
    Ok((StatusCode::CREATED, Json(issued.into())))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthBody>> {
    let issued = state.issuer.login(&payload)?;
    Ok(Json(issued.into()))
}

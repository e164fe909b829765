//! Registration and login endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use bazaar_core::validation::{validate_email, validate_password};
use bazaar_core::{Role, User, ValidationError};

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub roles: Vec<Role>,
}

// -- Handlers --

/// POST /auth/register — create an account with the Buyer role.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    let full_name = req.full_name.trim();
    if full_name.is_empty() {
        return Err(ValidationError::Required {
            field: "fullName".to_string(),
        }
        .into());
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email.trim().to_lowercase(),
        full_name: full_name.to_string(),
        password_hash: hash_password(&req.password)?,
        created_at: Utc::now(),
    };

    state.db.users().insert(&user).await?;
    state.db.users().add_role(&user.id, Role::Buyer).await?;

    info!(user_id = %user.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
            role: Role::Buyer,
        }),
    ))
}

/// POST /auth/login — verify credentials and issue a bearer token.
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Both failure modes return the same message: the response must not
    // reveal whether the account exists.
    let invalid = || ApiError::Unauthenticated("Invalid email or password".to_string());

    let email = req.email.trim().to_lowercase();
    let user = state
        .db
        .users()
        .get_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let roles = state.db.users().roles(&user.id).await?;
    let role_names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();

    let token = state.jwt.generate_token(&user.id, &user.email, &role_names)?;

    info!(user_id = %user.id, "Login succeeded");

    Ok(Json(AuthResponse {
        token,
        email: user.email,
        full_name: user.full_name,
        role: roles.first().copied().unwrap_or(Role::Buyer),
        roles,
    }))
}

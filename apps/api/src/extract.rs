//! Typed authentication extractor.
//!
//! Replaces per-handler credential parsing with one reusable extractor:
//! any handler that takes an [`AuthUser`] argument gets a verified
//! (identity, role-set) pair, or the request is rejected with a uniform
//! 401 before the handler body runs.
//!
//! ## Failure Modes (all → the same 401)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Missing Authorization header                                           │
//! │  Header is not "Bearer <token>"                                         │
//! │  Token fails signature or expiry validation                             │
//! │  Token subject no longer exists in the store                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Failing closed with one message keeps the response from revealing which
//! check failed.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use bazaar_core::{Role, User};

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller: identity plus role memberships, loaded fresh
/// from the store on every request (a revoked account fails immediately,
/// not at token expiry).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub roles: Vec<Role>,
}

impl AuthUser {
    /// The caller's user id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Checks role membership.
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Rejects non-admin callers.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(
                "This endpoint is admin only".to_string(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(ApiError::unauthenticated)?;

        let token = extract_bearer_token(header).ok_or_else(ApiError::unauthenticated)?;

        let claims = state.jwt.validate_token(token)?;

        let user = state
            .db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or_else(ApiError::unauthenticated)?;

        let roles = state.db.users().roles(&user.id).await?;

        Ok(AuthUser { user, roles })
    }
}

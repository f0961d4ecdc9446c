use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Admin checks happen via `require_admin()` in the handler body.
pub struct AuthUser {
    pub subject: Option<String>,
    pub role: String,
    is_admin: bool,
}

impl AuthUser {
    /// Returns `Ok(())` if the token's role is an admin role, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let auth = &state.config.auth;
        let claims = jwt::verify(&auth.jwt_secret, token).map_err(|_| AppError::TokenInvalid)?;
        let is_admin = auth.admin_roles.iter().any(|r| *r == claims.role);

        Ok(AuthUser {
            subject: claims.sub,
            role: claims.role,
            is_admin,
        })
    }
}

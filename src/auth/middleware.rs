use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{app_state::AppState, auth::claims::identity_from_token, error::ApiError};

/// Caller identity taken from the `Authorization: Bearer` token. Rejects with
/// 401 when the header or the identity claim is missing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity_claim = AppState::from_ref(state).identity_claim;
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        async move {
            let auth_header = auth_header.ok_or(ApiError::Unauthorized)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .map(str::trim)
                .ok_or(ApiError::Unauthorized)?;

            let user_id =
                identity_from_token(token, &identity_claim).ok_or(ApiError::Unauthorized)?;

            Ok(AuthenticatedUser::new(user_id))
        }
    }
}

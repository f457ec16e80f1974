use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use headers::Authorization;
use headers::authorization::Bearer;

use crate::auth::tokens::{Claims, TokenIssuer};
use crate::error::DoormanError;

/// Verified caller identity for routes that require a bearer token.
///
/// Extraction rejects with the standard 401 envelope when the
/// `Authorization: Bearer` header is missing or the token does not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenIssuer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| DoormanError::InvalidToken.into_response())?;

        let claims = TokenIssuer::from_ref(state)
            .verify(bearer.token())
            .map_err(|e| e.into_response())?;

        Ok(Self { claims })
    }
}

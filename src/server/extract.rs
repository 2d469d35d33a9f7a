use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequest, Query, RequestParts},
    http::header::AUTHORIZATION,
};

use crate::api::DynAPI;
use crate::auth::{Credentials, UserProfile, BYPASS_PARAM, BYPASS_VALUE};
use crate::error::{unexpected_error, Error};

/// Reads the `Authorization: Bearer <token>` header and the bypass marker of
/// the request's own query string.
#[async_trait]
impl<B> FromRequest<B> for Credentials
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from);

        let bypass = Query::<HashMap<String, String>>::from_request(req)
            .await
            .map(|Query(query)| {
                query.get(BYPASS_PARAM).map(String::as_str) == Some(BYPASS_VALUE)
            })
            .unwrap_or(false);

        Ok(Self { token, bypass })
    }
}

/// The signed-in user making the request; rejects with `AuthFailure`.
pub struct CurrentUser(pub UserProfile);

#[async_trait]
impl<B> FromRequest<B> for CurrentUser
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(api) = Extension::<DynAPI>::from_request(req)
            .await
            .map_err(unexpected_error)?;
        let credentials = Credentials::from_request(req).await?;

        api.current_user(&credentials).await.map(Self)
    }
}

use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::{Credentials, LogoutOutcome, Session, SignedIn};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    credential: String,
}

pub async fn find(Extension(api): Extension<DynAPI>, credentials: Credentials) -> Json<Session> {
    api.session(&credentials).await.into()
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<SignedIn>, Error> {
    let signed_in = api.login(params.credential).await?;

    Ok(signed_in.into())
}

pub async fn logout(
    Extension(api): Extension<DynAPI>,
    credentials: Credentials,
) -> Json<LogoutOutcome> {
    api.logout(&credentials).await.into()
}

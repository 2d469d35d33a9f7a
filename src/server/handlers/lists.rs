use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::SavedErrandsList;
use crate::error::Error;
use crate::server::extract::CurrentUser;

#[derive(Serialize, Deserialize)]
pub struct ListParams {
    name: String,
    errands: Vec<String>,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SavedErrandsList>>, Error> {
    let lists = api.list_lists(&user).await?;

    Ok(lists.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    CurrentUser(user): CurrentUser,
    Json(params): Json<ListParams>,
) -> Result<(StatusCode, Json<SavedErrandsList>), Error> {
    let list = api.save_list(&user, params.name, params.errands).await?;

    Ok((StatusCode::CREATED, list.into()))
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(params): Json<ListParams>,
) -> Result<Json<SavedErrandsList>, Error> {
    let list = api
        .update_list(&user, id, params.name, params.errands)
        .await?;

    Ok(list.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.delete_list(&user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

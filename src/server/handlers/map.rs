use axum::extract::{Extension, Json};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::error::Error;
use crate::routing::{MapSnapshot, MapSurface};

#[derive(Serialize, Deserialize)]
pub struct MountParams {
    surface: Option<MapSurface>,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Json<MapSnapshot> {
    api.map_snapshot().into()
}

pub async fn mount(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<MountParams>,
) -> Json<MapSnapshot> {
    api.mount_map(params.surface);

    api.map_snapshot().into()
}

pub async fn image(Extension(api): Extension<DynAPI>) -> Result<Response, Error> {
    let response = match api.map_image().await? {
        Some(image) => ([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };

    Ok(response)
}

use axum::extract::{Extension, Json};
use axum::http::StatusCode;

use crate::analytics::ClientEvent;
use crate::api::DynAPI;

pub async fn track(
    Extension(api): Extension<DynAPI>,
    Json(event): Json<ClientEvent>,
) -> StatusCode {
    api.track(event);

    StatusCode::ACCEPTED
}

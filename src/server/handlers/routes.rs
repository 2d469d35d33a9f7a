use axum::extract::{Extension, Json};

use crate::api::DynAPI;
use crate::entities::{RouteRequest, RouteSummary};
use crate::error::Error;

pub async fn plan(
    Extension(api): Extension<DynAPI>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteSummary>, Error> {
    let summary = api.plan_routes(request).await?;

    Ok(summary.into())
}

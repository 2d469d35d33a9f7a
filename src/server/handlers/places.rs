use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::error::Error;
use crate::external::google_maps::PlaceSuggestions;

#[derive(Serialize, Deserialize)]
pub struct SuggestionParams {
    input: String,
    #[serde(default)]
    session_token: String,
}

pub async fn find_suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<PlaceSuggestions>, Error> {
    let data = api
        .find_place_suggestions(params.input, params.session_token)
        .await?;

    Ok(data.into())
}

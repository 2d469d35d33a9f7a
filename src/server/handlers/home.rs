use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct HomeAddress {
    address: String,
}

#[derive(Serialize, Deserialize)]
pub struct SaveResult {
    saved: bool,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Json<HomeAddress> {
    let address = api.load_home_address().await;

    HomeAddress { address }.into()
}

pub async fn save(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<HomeAddress>,
) -> Json<SaveResult> {
    let saved = api.save_home_address(params.address).await;

    SaveResult { saved }.into()
}

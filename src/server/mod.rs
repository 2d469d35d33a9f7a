mod extract;
mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::DynAPI;
use crate::error::{unexpected_error, Error};
use crate::routing::STATIC_MAP_ROUTE;
use crate::server::handlers::{events, home, lists, map, places, routes, session};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/routes/plan", post(routes::plan))
        .route("/map", get(map::find).put(map::mount))
        .route(STATIC_MAP_ROUTE, get(map::image))
        .route("/places/suggestions", get(places::find_suggestions))
        .route("/home_address", get(home::find).put(home::save))
        .route("/lists", get(lists::list).post(lists::create))
        .route("/lists/:id", put(lists::update).delete(lists::delete))
        .route("/session", get(session::find))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/events", post(events::track))
        .layer(Extension(api))
}

pub async fn serve(api: DynAPI, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "failed to listen for shutdown signal");
            }
        })
        .await
        .map_err(unexpected_error)
}

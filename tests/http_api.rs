use async_trait::async_trait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use errand_router::analytics::EventTracker;
use errand_router::api::DynAPI;
use errand_router::auth::{IdentityProvider, SessionProvider, UserProfile};
use errand_router::engine::Engine;
use errand_router::error::{auth_failure, Error};
use errand_router::external::directions::{
    DirectionsRequest, DirectionsResponse, DirectionsService, ProviderError, ServiceLoader,
};
use errand_router::external::google_maps::{GoogleMapsClient, DEFAULT_API_BASE};
use errand_router::preferences::{HomeAddressStore, LocalStorage, MemoryErrandListStore};
use errand_router::routing::{DirectionsGateway, RouteOrchestrator};
use errand_router::server::router;

/// Answers every request with the interior stops reversed.
struct ReversingDirections;

#[async_trait]
impl DirectionsService for ReversingDirections {
    async fn route(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, ProviderError> {
        let stops = request.waypoints.len();
        let legs: Vec<Value> = (0..=stops)
            .map(|_| {
                json!({
                    "distance": {"text": "1 km", "value": 1000},
                    "duration": {"text": "2 mins", "value": 120}
                })
            })
            .collect();

        Ok(serde_json::from_value(json!({
            "status": "OK",
            "routes": [{
                "legs": legs,
                "waypoint_order": (0..stops).rev().collect::<Vec<_>>(),
                "overview_polyline": {"points": "abc"}
            }]
        }))
        .unwrap())
    }
}

struct Loader;

#[async_trait]
impl ServiceLoader for Loader {
    async fn load(&self, _api_key: &str) -> Result<Arc<dyn DirectionsService>, Error> {
        Ok(Arc::new(ReversingDirections))
    }
}

/// Accepts `token-<name>` and signs in a user with uid `<name>`.
struct TokenIdentity;

#[async_trait]
impl IdentityProvider for TokenIdentity {
    async fn sign_in(&self, credential: &str) -> Result<UserProfile, Error> {
        let uid = credential
            .strip_prefix("token-")
            .ok_or_else(|| auth_failure("invalid ID token"))?;

        Ok(UserProfile {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
        })
    }

    async fn sign_out(&self, _user: &UserProfile) -> Result<(), Error> {
        Ok(())
    }
}

async fn spawn_app(dir: &tempfile::TempDir) -> SocketAddr {
    let gateway = Arc::new(DirectionsGateway::new("test-key", Arc::new(Loader)));
    let session = SessionProvider::new(
        Arc::new(TokenIdentity),
        reqwest::Url::parse("http://localhost:5173/?bypass=mellon").unwrap(),
    );

    let engine = Engine::new(
        RouteOrchestrator::new(gateway),
        GoogleMapsClient::new(DEFAULT_API_BASE, "test-key"),
        Arc::new(MemoryErrandListStore::new()),
        HomeAddressStore::new(LocalStorage::new(dir.path().join("storage.json"))),
        session,
        EventTracker::disabled(),
    );

    let app = router(Arc::new(engine) as DynAPI);
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = server.local_addr();

    tokio::spawn(server);

    addr
}

#[tokio::test]
async fn plans_routes_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{}/routes/plan", addr))
        .json(&json!({
            "origin": "777 S Broad St",
            "destination": "1 Penn Sq",
            "errands": ["bank", "grocer", "pharmacy"],
            "transport_mode": "DRIVING",
            "departure_time": "2026-10-18T17:30:00Z"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let summary: Value = res.json().await.unwrap();
    assert_eq!(
        summary["time_optimized_route"],
        json!(["777 S Broad St", "pharmacy", "grocer", "bank", "1 Penn Sq"])
    );
    assert_eq!(summary["total_time"], 480);
    assert_eq!(summary["total_distance"], 4000);

    let res = client
        .post(format!("http://{}/routes/plan", addr))
        .json(&json!({"origin": "777 S Broad St", "destination": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], 101);
}

#[tokio::test]
async fn manages_lists_for_bypass_user() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("http://{}/lists?bypass=mellon", addr))
        .json(&json!({"name": "Saturday", "errands": ["bank", "grocer"]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let lists: Value = client
        .get(format!("http://{}/lists?bypass=mellon", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(lists[0]["errands"], json!(["bank", "grocer"]));

    let res = client
        .delete(format!("http://{}/lists/{}?bypass=mellon", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let lists: Value = client
        .get(format!("http://{}/lists?bypass=mellon", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(lists, json!([]));

    let outcome: Value = client
        .post(format!("http://{}/session/logout?bypass=mellon", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        outcome,
        json!({"outcome": "reload", "location": "http://localhost:5173/"})
    );

    let res = client
        .get(format!("http://{}/lists", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn lists_stay_with_the_client_that_signed_in() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let owner = reqwest::Client::new();
    let stranger = reqwest::Client::new();

    let signed_in: Value = owner
        .post(format!("http://{}/session/login", addr))
        .json(&json!({"credential": "token-alice"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(signed_in["user"]["uid"], "alice");
    assert_eq!(signed_in["is_authenticated"], true);
    let token = signed_in["token"].as_str().unwrap().to_string();

    let res = owner
        .post(format!("http://{}/lists", addr))
        .bearer_auth(&token)
        .json(&json!({"name": "private", "errands": ["doctor"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = stranger
        .get(format!("http://{}/lists", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], 104);

    let session: Value = stranger
        .get(format!("http://{}/session", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["is_authenticated"], false);

    let gandalf: Value = stranger
        .get(format!("http://{}/lists?bypass=mellon", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(gandalf, json!([]));

    let lists: Value = owner
        .get(format!("http://{}/lists", addr))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(lists[0]["name"], "private");

    let outcome: Value = owner
        .post(format!("http://{}/session/logout", addr))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome, json!({"outcome": "signed_out"}));

    let res = owner
        .get(format!("http://{}/lists", addr))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn map_snapshot_keeps_api_key_on_server() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{}/map/static", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let snapshot = client
        .put(format!("http://{}/map", addr))
        .json(&json!({"surface": {
            "element_id": "map",
            "zoom": 12,
            "center": {"lat": 39.9526, "lng": -75.1652},
            "width": 640,
            "height": 480,
            "zoom_control": true,
            "map_type_control": false,
            "street_view_control": false,
            "fullscreen_control": false
        }}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(snapshot.contains("/map/static"));
    assert!(!snapshot.contains("test-key"));
}

#[tokio::test]
async fn accepts_known_client_events() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{}/events", addr))
        .json(&json!({"name": "form_complete", "label": "origin", "value": "777 S Broad St"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 202);

    let res = client
        .post(format!("http://{}/events", addr))
        .json(&json!({"name": "page_view", "label": "home"}))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn stores_home_address() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_app(&dir).await;
    let client = reqwest::Client::new();

    let home: Value = client
        .get(format!("http://{}/home_address", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["address"], "");

    let saved: Value = client
        .put(format!("http://{}/home_address", addr))
        .json(&json!({"address": "777 S Broad St"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["saved"], true);

    let home: Value = client
        .get(format!("http://{}/home_address", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["address"], "777 S Broad St");
}

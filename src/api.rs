use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::analytics::ClientEvent;
use crate::auth::{Credentials, LogoutOutcome, Session, SignedIn, UserProfile};
use crate::entities::{RouteRequest, RouteSummary, SavedErrandsList};
use crate::error::Error;
use crate::external::google_maps::{PlaceSuggestions, StaticMapImage};
use crate::routing::{MapSnapshot, MapSurface};

#[async_trait]
pub trait RouteAPI {
    async fn plan_routes(&self, request: RouteRequest) -> Result<RouteSummary, Error>;
    fn mount_map(&self, surface: Option<MapSurface>);
    fn map_snapshot(&self) -> MapSnapshot;
    /// Rendered image of the current map, `None` until a surface is mounted.
    async fn map_image(&self) -> Result<Option<StaticMapImage>, Error>;
    async fn find_place_suggestions(
        &self,
        input: String,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error>;
}

#[async_trait]
pub trait PreferenceAPI {
    async fn save_list(
        &self,
        user: &UserProfile,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error>;
    async fn list_lists(&self, user: &UserProfile) -> Result<Vec<SavedErrandsList>, Error>;
    async fn update_list(
        &self,
        user: &UserProfile,
        id: Uuid,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error>;
    async fn delete_list(&self, user: &UserProfile, id: Uuid) -> Result<(), Error>;
    async fn save_home_address(&self, address: String) -> bool;
    async fn load_home_address(&self) -> String;
}

#[async_trait]
pub trait SessionAPI {
    async fn session(&self, credentials: &Credentials) -> Session;
    async fn current_user(&self, credentials: &Credentials) -> Result<UserProfile, Error>;
    async fn login(&self, credential: String) -> Result<SignedIn, Error>;
    async fn logout(&self, credentials: &Credentials) -> LogoutOutcome;
}

pub trait EventAPI {
    fn track(&self, event: ClientEvent);
}

pub trait API: RouteAPI + PreferenceAPI + SessionAPI + EventAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;

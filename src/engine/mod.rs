mod preference_api;
mod route_api;
mod session_api;

use std::sync::Arc;

use crate::{
    analytics::{ClientEvent, EventTracker, MeasurementProtocolSink},
    api::{EventAPI, API},
    auth::SessionProvider,
    config::Config,
    db::PgPool,
    error::Error,
    external::{google_identity::GoogleIdentityProvider, google_maps},
    preferences::{
        ErrandListStore, HomeAddressStore, LocalStorage, MemoryErrandListStore, PgErrandListStore,
    },
    routing::{DirectionsGateway, RouteOrchestrator},
};

pub struct Engine {
    orchestrator: RouteOrchestrator,
    maps: google_maps::GoogleMapsClient,
    lists: Arc<dyn ErrandListStore>,
    home: HomeAddressStore,
    session: SessionProvider,
    tracker: EventTracker,
}

impl Engine {
    pub fn new(
        orchestrator: RouteOrchestrator,
        maps: google_maps::GoogleMapsClient,
        lists: Arc<dyn ErrandListStore>,
        home: HomeAddressStore,
        session: SessionProvider,
        tracker: EventTracker,
    ) -> Self {
        Self {
            orchestrator,
            maps,
            lists,
            home,
            session,
            tracker,
        }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let loader = Arc::new(google_maps::GoogleMapsLoader::new(
            config.google_maps_api_base.clone(),
        ));
        let gateway = Arc::new(DirectionsGateway::new(
            config.google_maps_api_key.clone(),
            loader,
        ));
        let maps = google_maps::GoogleMapsClient::new(
            config.google_maps_api_base.clone(),
            config.google_maps_api_key.clone(),
        );

        let lists: Arc<dyn ErrandListStore> = match &config.database_url {
            Some(database_url) => {
                let PgPool(pool) =
                    PgPool::new(database_url, config.database_max_connections).await?;
                Arc::new(PgErrandListStore::new(pool).await?)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, errand lists are kept in memory");
                Arc::new(MemoryErrandListStore::new())
            }
        };

        let home = HomeAddressStore::new(LocalStorage::new(config.local_storage_path.clone()));

        let identity = Arc::new(GoogleIdentityProvider::new(config.google_client_id.clone()));
        let session = SessionProvider::new(identity, config.app_url.clone());

        let tracker = match &config.analytics {
            Some(analytics) => EventTracker::start(Arc::new(MeasurementProtocolSink::new(
                analytics.measurement_id.clone(),
                analytics.api_secret.clone(),
                analytics.client_id.clone(),
            ))),
            None => EventTracker::disabled(),
        };

        Ok(Self::new(
            RouteOrchestrator::new(gateway),
            maps,
            lists,
            home,
            session,
            tracker,
        ))
    }

    pub async fn shutdown(&self) {
        self.tracker.close().await;
    }
}

impl EventAPI for Engine {
    fn track(&self, event: ClientEvent) {
        self.tracker.track_client_event(event);
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::Engine;
    use crate::analytics::EventTracker;
    use crate::auth::{test_support::FakeIdentity, SessionProvider};
    use crate::external::directions::{DirectionsResponse, ProviderError};
    use crate::external::google_maps::{GoogleMapsClient, DEFAULT_API_BASE};
    use crate::preferences::{HomeAddressStore, LocalStorage, MemoryErrandListStore};
    use crate::routing::{DirectionsGateway, RouteOrchestrator};

    pub use crate::routing::gateway_test_support::*;

    pub struct TestEngine {
        pub engine: Engine,
        pub directions: Arc<ScriptedDirections>,
        pub _dir: tempfile::TempDir,
    }

    pub async fn engine(
        responses: Vec<Result<DirectionsResponse, ProviderError>>,
        location: &str,
    ) -> TestEngine {
        let directions = ScriptedDirections::new(responses);
        let loader = CountingLoader::new(directions.clone());
        let gateway = Arc::new(DirectionsGateway::new("test-key", loader));
        let dir = tempfile::tempdir().unwrap();

        let session = SessionProvider::new(
            Arc::new(FakeIdentity::default()),
            reqwest::Url::parse(location).unwrap(),
        );

        let engine = Engine::new(
            RouteOrchestrator::new(gateway),
            GoogleMapsClient::new(DEFAULT_API_BASE, "test-key"),
            Arc::new(MemoryErrandListStore::new()),
            HomeAddressStore::new(LocalStorage::new(dir.path().join("storage.json"))),
            session,
            EventTracker::disabled(),
        );

        TestEngine {
            engine,
            directions,
            _dir: dir,
        }
    }
}

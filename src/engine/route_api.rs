use super::Engine;

use async_trait::async_trait;

use crate::{
    analytics::RouteStats,
    api::RouteAPI,
    entities::{RouteRequest, RouteSummary},
    error::Error,
    external::google_maps::{PlaceSuggestions, StaticMapImage},
    routing::{MapSnapshot, MapSurface},
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self, request))]
    async fn plan_routes(&self, request: RouteRequest) -> Result<RouteSummary, Error> {
        let summary = self.orchestrator.plan_routes(&request).await?;

        self.tracker.track_route_success(&RouteStats {
            num_errands: request.errands.len(),
            transport_mode: request.transport_mode,
            custom_time_used: request.departure_time.is_some(),
            total_time: summary.total_time,
            total_distance: summary.total_distance,
        });

        Ok(summary)
    }

    fn mount_map(&self, surface: Option<MapSurface>) {
        self.orchestrator.gateway().mount_surface(surface);
    }

    fn map_snapshot(&self) -> MapSnapshot {
        self.orchestrator.gateway().renderer().snapshot()
    }

    #[tracing::instrument(skip(self))]
    async fn map_image(&self) -> Result<Option<StaticMapImage>, Error> {
        match self.orchestrator.gateway().renderer().static_map_url() {
            Some(url) => self.maps.fetch_static_map(url).await.map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_place_suggestions(
        &self,
        input: String,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error> {
        self.maps
            .find_place_suggestions(input, session_token)
            .await
    }
}

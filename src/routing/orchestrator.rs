use std::sync::Arc;

use crate::{
    entities::{RouteRequest, RouteSummary},
    error::Error,
    routing::gateway::DirectionsGateway,
};

pub struct RouteOrchestrator {
    gateway: Arc<DirectionsGateway>,
}

impl RouteOrchestrator {
    pub fn new(gateway: Arc<DirectionsGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<DirectionsGateway> {
        &self.gateway
    }

    /// Computes the time-optimized and distance-optimized variants of a trip.
    ///
    /// Both calls share the waypoint sequence and mode. Only the first carries
    /// the departure time; the undated second call is the distance baseline.
    /// They run one after the other and the first failure is returned as is.
    #[tracing::instrument(
        skip(self, request),
        fields(errands = request.errands.len(), mode = request.transport_mode.name())
    )]
    pub async fn plan_routes(&self, request: &RouteRequest) -> Result<RouteSummary, Error> {
        self.gateway.initialize().await?;

        let waypoints = request.waypoints();
        let mode = request.transport_mode;

        let time_result = self
            .gateway
            .compute_route(&waypoints, mode, request.departure_time)
            .await?;
        let distance_result = self.gateway.compute_route(&waypoints, mode, None).await?;

        let summary = RouteSummary::new(time_result, distance_result);

        tracing::info!(
            total_time = summary.total_time,
            total_distance = summary.total_distance,
            "routes planned"
        );

        Ok(summary)
    }
}

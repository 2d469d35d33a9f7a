use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    entities::{RouteResult, TravelMode, Waypoint},
    error::{invalid_input_error, routing_failure, Error},
    external::directions::{
        DepartureOptions, DirectionsRequest, DirectionsRoute, DirectionsService,
        DirectionsWaypoint, ServiceLoader,
    },
    routing::renderer::{MapRenderer, MapSurface},
};

/// Initialized directions service plus the renderer routes are drawn on.
#[derive(Clone)]
pub struct ServiceHandle {
    pub directions: Arc<dyn DirectionsService>,
    pub renderer: Arc<MapRenderer>,
}

/// Owns the directions service for the lifetime of the application.
///
/// The service is loaded on the first call to [`DirectionsGateway::initialize`]
/// and cached; later calls, including concurrent ones, reuse that handle.
pub struct DirectionsGateway {
    api_key: String,
    loader: Arc<dyn ServiceLoader>,
    handle: OnceCell<ServiceHandle>,
    renderer: Arc<MapRenderer>,
}

impl DirectionsGateway {
    pub fn new(api_key: impl Into<String>, loader: Arc<dyn ServiceLoader>) -> Self {
        Self {
            api_key: api_key.into(),
            loader,
            handle: OnceCell::new(),
            renderer: Arc::new(MapRenderer::new()),
        }
    }

    pub fn renderer(&self) -> &Arc<MapRenderer> {
        &self.renderer
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }

    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> Result<ServiceHandle, Error> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let directions = self.loader.load(&self.api_key).await?;
                tracing::info!("directions service initialized");

                Ok::<_, Error>(ServiceHandle {
                    directions,
                    renderer: self.renderer.clone(),
                })
            })
            .await?;

        Ok(handle.clone())
    }

    pub fn mount_surface(&self, surface: Option<MapSurface>) {
        self.renderer.mount(surface);
    }

    #[tracing::instrument(skip(self, waypoints), fields(stops = waypoints.len()))]
    pub async fn compute_route(
        &self,
        waypoints: &[Waypoint],
        mode: TravelMode,
        departure_time: Option<DateTime<Utc>>,
    ) -> Result<RouteResult, Error> {
        validate_waypoints(waypoints)?;

        let handle = self.initialize().await?;
        let request = build_request(waypoints, mode, departure_time);

        let response = handle.directions.route(&request).await.map_err(|err| {
            tracing::error!(kind = ?err.kind, message = %err.message, "directions request failed");
            routing_failure(err)
        })?;

        let route = response
            .routes
            .first()
            .ok_or_else(|| routing_failure("provider returned no routes"))?;

        let result = resolve_route(waypoints, route)?;
        handle.renderer.draw(route);

        tracing::debug!(
            distance = result.total_distance_meters,
            duration = result.total_duration_seconds,
            "route computed"
        );

        Ok(result)
    }
}

pub fn validate_waypoints(waypoints: &[Waypoint]) -> Result<(), Error> {
    if waypoints.len() < 2 {
        return Err(invalid_input_error(
            "a route needs at least an origin and a destination",
        ));
    }

    if let Some(index) = waypoints.iter().position(Waypoint::is_empty) {
        tracing::warn!(index, "empty waypoint rejected");
        return Err(invalid_input_error("All waypoints must be non-empty"));
    }

    if let Some(index) = waypoints.iter().position(Waypoint::is_ambiguous) {
        tracing::warn!(index, "ambiguous waypoint rejected");
        return Err(invalid_input_error(
            "Waypoints must not contain '|' or start with 'via:' or 'enc:'",
        ));
    }

    Ok(())
}

/// Provider request for `waypoints`, which must already be validated.
pub(crate) fn build_request(
    waypoints: &[Waypoint],
    mode: TravelMode,
    departure_time: Option<DateTime<Utc>>,
) -> DirectionsRequest {
    let last = waypoints.len() - 1;
    let options = departure_time.map(|departure_time| DepartureOptions { departure_time });

    DirectionsRequest {
        origin: waypoints[0].to_param(),
        destination: waypoints[last].to_param(),
        waypoints: waypoints[1..last]
            .iter()
            .map(|waypoint| DirectionsWaypoint {
                location: waypoint.to_param(),
                stopover: true,
            })
            .collect(),
        travel_mode: mode,
        optimize_waypoints: true,
        driving_options: options.filter(|_| mode == TravelMode::Driving),
        transit_options: options.filter(|_| mode == TravelMode::Transit),
    }
}

/// Totals the legs and reorders the interior stops by `waypoint_order`.
///
/// Entry `i` of the order refers to `waypoints[i + 1]`, since the origin is
/// not part of the optimized list. A non-empty order must be a permutation of
/// the interior indices.
pub(crate) fn resolve_route(
    waypoints: &[Waypoint],
    route: &DirectionsRoute,
) -> Result<RouteResult, Error> {
    let last = waypoints.len() - 1;
    let interior = &waypoints[1..last];

    let mut ordered_stops = Vec::with_capacity(waypoints.len());
    ordered_stops.push(waypoints[0].clone());

    if route.waypoint_order.is_empty() {
        ordered_stops.extend(interior.iter().cloned());
    } else {
        if route.waypoint_order.len() != interior.len() {
            return Err(routing_failure(format!(
                "provider ordered {} of {} waypoints",
                route.waypoint_order.len(),
                interior.len()
            )));
        }

        let mut seen = vec![false; interior.len()];
        for &index in &route.waypoint_order {
            let stop = interior.get(index).ok_or_else(|| {
                routing_failure(format!("provider returned unknown waypoint index {}", index))
            })?;
            if std::mem::replace(&mut seen[index], true) {
                return Err(routing_failure(format!(
                    "provider repeated waypoint index {}",
                    index
                )));
            }
            ordered_stops.push(stop.clone());
        }
    }

    ordered_stops.push(waypoints[last].clone());

    Ok(RouteResult {
        ordered_stops,
        total_distance_meters: route.total_distance(),
        total_duration_seconds: route.total_duration(),
    })
}

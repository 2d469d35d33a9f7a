mod gateway;
mod orchestrator;
mod renderer;

pub use gateway::{validate_waypoints, DirectionsGateway, ServiceHandle};
pub use orchestrator::RouteOrchestrator;
pub use renderer::{MapRenderer, MapSnapshot, MapSurface, MapView, STATIC_MAP_ROUTE};

#[cfg(test)]
pub(crate) use gateway::test_support as gateway_test_support;

mod errands_list;
mod route;
mod waypoint;

pub use errands_list::SavedErrandsList;
pub use route::{RouteRequest, RouteResult, RouteSummary};
pub use waypoint::{Coordinates, TravelMode, Waypoint};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{TravelMode, Waypoint};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    #[serde(default)]
    pub errands: Vec<Waypoint>,
    #[serde(default)]
    pub transport_mode: TravelMode,
    pub departure_time: Option<DateTime<Utc>>,
}

impl RouteRequest {
    /// `[origin, ...errands, destination]`
    pub fn waypoints(&self) -> Vec<Waypoint> {
        let mut waypoints = Vec::with_capacity(self.errands.len() + 2);
        waypoints.push(self.origin.clone());
        waypoints.extend(self.errands.iter().cloned());
        waypoints.push(self.destination.clone());
        waypoints
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub ordered_stops: Vec<Waypoint>,
    pub total_distance_meters: u64,
    pub total_duration_seconds: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub time_optimized_route: Vec<Waypoint>,
    pub distance_optimized_route: Vec<Waypoint>,
    /// Seconds, from the time-optimized result.
    pub total_time: u64,
    /// Meters, from the distance-optimized result.
    pub total_distance: u64,
}

impl RouteSummary {
    pub fn new(time_result: RouteResult, distance_result: RouteResult) -> Self {
        Self {
            time_optimized_route: time_result.ordered_stops,
            distance_optimized_route: distance_result.ordered_stops,
            total_time: time_result.total_duration_seconds,
            total_distance: distance_result.total_distance_meters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoints_wrap_errands() {
        let request: RouteRequest = serde_json::from_value(serde_json::json!({
            "origin": "home",
            "destination": "work",
            "errands": ["bank", "grocer"],
            "departure_time": null
        }))
        .unwrap();

        assert_eq!(request.transport_mode, TravelMode::Driving);
        assert_eq!(
            request.waypoints(),
            vec![
                Waypoint::from("home"),
                Waypoint::from("bank"),
                Waypoint::from("grocer"),
                Waypoint::from("work"),
            ]
        );
    }

    #[test]
    fn summary_takes_time_and_distance_from_their_own_results() {
        let time_result = RouteResult {
            ordered_stops: vec!["a".into(), "c".into(), "b".into(), "d".into()],
            total_distance_meters: 5000,
            total_duration_seconds: 600,
        };
        let distance_result = RouteResult {
            ordered_stops: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            total_distance_meters: 4000,
            total_duration_seconds: 900,
        };

        let summary = RouteSummary::new(time_result, distance_result);

        assert_eq!(summary.total_time, 600);
        assert_eq!(summary.total_distance, 4000);
        assert_eq!(summary.time_optimized_route[1], Waypoint::from("c"));
        assert_eq!(summary.distance_optimized_route[1], Waypoint::from("b"));
    }
}

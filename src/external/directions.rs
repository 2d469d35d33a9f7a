//! Provider-facing directions types.
//!
//! [`DirectionsRequest`] is what the gateway builds from a waypoint list and
//! [`DirectionsResponse`] mirrors the JSON returned by the Google Directions
//! web service. Both are kept free of transport details so a
//! [`DirectionsService`] can be faked in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::entities::TravelMode;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsWaypoint {
    pub location: String,
    pub stopover: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartureOptions {
    pub departure_time: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<DirectionsWaypoint>,
    pub travel_mode: TravelMode,
    pub optimize_waypoints: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_options: Option<DepartureOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_options: Option<DepartureOptions>,
}

impl DirectionsRequest {
    /// Departure time from whichever option block the mode allowed.
    pub fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.driving_options
            .or(self.transit_options)
            .map(|options| options.departure_time)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    pub overview_polyline: Option<OverviewPolyline>,
}

impl DirectionsRoute {
    pub fn total_distance(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance.value).sum()
    }

    pub fn total_duration(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration.value).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    Upstream,
}

impl ProviderErrorKind {
    pub fn from_status(status: &str) -> Self {
        match status {
            "NOT_FOUND" => Self::NotFound,
            "ZERO_RESULTS" => Self::ZeroResults,
            "MAX_WAYPOINTS_EXCEEDED" | "MAX_ROUTE_LENGTH_EXCEEDED" => Self::MaxWaypointsExceeded,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            _ => Self::Upstream,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an error from a non-`OK` directions status and its optional
    /// `error_message`.
    pub fn from_status(status: &str, error_message: Option<String>) -> Self {
        let kind = ProviderErrorKind::from_status(status);
        let message = match error_message {
            Some(detail) => format!("{}: {}", status, detail),
            None => status.to_string(),
        };

        Self { kind, message }
    }

    /// Message shown to the user. A denied request whose detail says the API
    /// is not activated gets an actionable hint instead of the raw text.
    pub fn display_message(&self) -> String {
        match self.kind {
            ProviderErrorKind::RequestDenied if self.message.contains("not activated") => format!(
                "{} (enable the Directions API for this key in the Google Cloud Console)",
                self.message
            ),
            ProviderErrorKind::ZeroResults => format!("{} (no route found)", self.message),
            _ => self.message.clone(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_message())
    }
}

#[async_trait]
pub trait DirectionsService: Send + Sync {
    async fn route(&self, request: &DirectionsRequest)
        -> Result<DirectionsResponse, ProviderError>;
}

/// Constructs the directions service on first use.
#[async_trait]
pub trait ServiceLoader: Send + Sync {
    async fn load(&self, api_key: &str) -> Result<Arc<dyn DirectionsService>, Error>;
}

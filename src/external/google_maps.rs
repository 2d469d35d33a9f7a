use async_trait::async_trait;
use reqwest::{header, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{configuration_error, invalid_input_error, upstream_error, Error},
    external::directions::{
        DirectionsRequest, DirectionsResponse, DirectionsService, ProviderError,
        ProviderErrorKind, ServiceLoader,
    },
};

pub const DEFAULT_API_BASE: &str = "maps.googleapis.com";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

pub type PlaceSuggestions = Vec<PlaceSuggestion>;

#[derive(Clone, Debug, PartialEq)]
pub struct StaticMapImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    error_message: Option<String>,
    predictions: Option<T>,
}

#[derive(Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GoogleMapsClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}/maps/api/{}", self.api_base, path)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_place_suggestions(
        &self,
        input: String,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error> {
        if input.trim().is_empty() {
            return Err(invalid_input_error("autocomplete input must be non-empty"));
        }

        let res = self
            .http
            .get(self.url("place/autocomplete/json"))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("input", input.as_str())])
            .query(&[("components", "country:us")])
            .query(&[("sessiontoken", session_token.as_str())])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error("autocomplete request rejected"));
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<PlaceSuggestions> = res.json().await?;

        match data.status.as_str() {
            "OK" => data.predictions.ok_or_else(upstream_error),
            "ZERO_RESULTS" => Ok(data.predictions.unwrap_or_default()),
            status => {
                tracing::error!(status, error_message = ?data.error_message, "autocomplete failed");
                Err(upstream_error())
            }
        }
    }

    /// Fetches a rendered map image, adding the API key to `url` so it never
    /// leaves the server.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_static_map(&self, mut url: Url) -> Result<StaticMapImage, Error> {
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let res = self.http.get(url).send().await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "static map request failed");
            return Err(upstream_error());
        }

        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = res.bytes().await?.to_vec();

        Ok(StaticMapImage {
            content_type,
            bytes,
        })
    }

    /// Query parameters for the directions web service.
    ///
    /// Stopover waypoints are pipe-separated and prefixed with `optimize:true`
    /// when reordering is requested. Departure time is sent as unix seconds.
    pub fn directions_query(&self, request: &DirectionsRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("origin", request.origin.clone()),
            ("destination", request.destination.clone()),
            ("mode", request.travel_mode.name().to_string()),
        ];

        if !request.waypoints.is_empty() {
            let mut parts = Vec::with_capacity(request.waypoints.len() + 1);
            if request.optimize_waypoints {
                parts.push("optimize:true".to_string());
            }
            for waypoint in &request.waypoints {
                if waypoint.stopover {
                    parts.push(waypoint.location.clone());
                } else {
                    parts.push(format!("via:{}", waypoint.location));
                }
            }
            query.push(("waypoints", parts.join("|")));
        }

        if let Some(departure_time) = request.departure_time() {
            query.push(("departure_time", departure_time.timestamp().to_string()));
        }

        query
    }
}

#[async_trait]
impl DirectionsService for GoogleMapsClient {
    #[tracing::instrument(skip(self, request), fields(mode = request.travel_mode.name()))]
    async fn route(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, ProviderError> {
        let res = self
            .http
            .get(self.url("directions/json"))
            .query(&self.directions_query(request))
            .send()
            .await
            .map_err(|err| ProviderError::new(ProviderErrorKind::Upstream, err.to_string()))?;

        let status = res.status();

        if status.is_client_error() {
            return Err(ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                format!("directions request rejected with HTTP {}", status.as_u16()),
            ));
        } else if !status.is_success() {
            return Err(ProviderError::new(
                ProviderErrorKind::Upstream,
                format!("directions service returned HTTP {}", status.as_u16()),
            ));
        }

        let data: DirectionsResponse = res
            .json()
            .await
            .map_err(|err| ProviderError::new(ProviderErrorKind::Upstream, err.to_string()))?;

        if data.status != "OK" {
            return Err(ProviderError::from_status(&data.status, data.error_message));
        }

        Ok(data)
    }
}

pub struct GoogleMapsLoader {
    api_base: String,
}

impl GoogleMapsLoader {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl ServiceLoader for GoogleMapsLoader {
    async fn load(&self, api_key: &str) -> Result<Arc<dyn DirectionsService>, Error> {
        if api_key.is_empty() {
            tracing::error!("google maps API key missing");
            return Err(configuration_error("Google Maps API key is missing"));
        }

        tracing::info!(api_base = %self.api_base, "google maps directions service loaded");

        Ok(Arc::new(GoogleMapsClient::new(self.api_base.clone(), api_key)))
    }
}

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use crate::{
    analytics::AnalyticsEvent,
    error::{upstream_error, Error},
};

pub const MEASUREMENT_PROTOCOL_URL: &str = "https://www.google-analytics.com/mp/collect";

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), Error>;
}

/// Forwards events to a GA4 property through the Measurement Protocol.
pub struct MeasurementProtocolSink {
    http: reqwest::Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
}

#[derive(Serialize)]
struct Payload<'a> {
    client_id: &'a str,
    events: [serde_json::Value; 1],
}

impl MeasurementProtocolSink {
    pub fn new(
        measurement_id: impl Into<String>,
        api_secret: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: MEASUREMENT_PROTOCOL_URL.into(),
            measurement_id: measurement_id.into(),
            api_secret: api_secret.into(),
            client_id: client_id.into(),
        }
    }

    fn payload<'a>(&'a self, event: &AnalyticsEvent) -> Payload<'a> {
        Payload {
            client_id: &self.client_id,
            events: [json!({
                "name": event.name,
                "params": event.params,
            })],
        }
    }
}

#[async_trait]
impl AnalyticsSink for MeasurementProtocolSink {
    async fn send(&self, event: &AnalyticsEvent) -> Result<(), Error> {
        let res = self
            .http
            .post(&self.endpoint)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&self.payload(event))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(upstream_error());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::EventParams;

    #[test]
    fn payload_wraps_single_event() {
        let sink = MeasurementProtocolSink::new("G-TEST", "secret", "errand-router");
        let event = AnalyticsEvent {
            name: "button_click".into(),
            params: EventParams::labelled("calculate_routes"),
        };

        let payload = serde_json::to_value(sink.payload(&event)).unwrap();

        assert_eq!(payload["client_id"], "errand-router");
        assert_eq!(payload["events"][0]["name"], "button_click");
        assert_eq!(payload["events"][0]["params"]["label"], "calculate_routes");
    }
}

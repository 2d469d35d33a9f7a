//! Best-effort analytics.
//!
//! [`EventTracker::track`] never fails. Events are queued and a background
//! task forwards them to the configured sink, logging anything that goes
//! wrong; without a sink tracking only logs a warning.

mod sink;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::entities::TravelMode;

pub use sink::{AnalyticsSink, MeasurementProtocolSink, MEASUREMENT_PROTOCOL_URL};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventParams {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl EventParams {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value.filter(|value| !value.is_empty());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub params: EventParams,
}

/// Interaction events reported by clients over HTTP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ClientEvent {
    FormInteract {
        label: String,
    },
    FormComplete {
        label: String,
        #[serde(default)]
        value: Option<String>,
    },
    AutocompleteSelect {
        label: String,
        #[serde(default)]
        value: Option<String>,
    },
    ButtonClick {
        label: String,
        #[serde(default)]
        extra: Map<String, Value>,
    },
}

/// Figures reported after a successful route calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    pub num_errands: usize,
    pub transport_mode: TravelMode,
    pub custom_time_used: bool,
    pub total_time: u64,
    pub total_distance: u64,
}

pub struct EventTracker {
    queue: Option<async_channel::Sender<AnalyticsEvent>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventTracker {
    /// Tracker without a sink.
    pub fn disabled() -> Self {
        Self {
            queue: None,
            worker: Mutex::new(None),
        }
    }

    /// Spawns the forwarding task; must be called inside a tokio runtime.
    pub fn start(sink: Arc<dyn AnalyticsSink>) -> Self {
        let (sender, receiver) = async_channel::unbounded::<AnalyticsEvent>();

        let worker = tokio::spawn(async move {
            let mut receiver = receiver;
            while let Some(event) = receiver.next().await {
                if let Err(err) = sink.send(&event).await {
                    tracing::error!(%err, event = %event.name, "error tracking event");
                }
            }
        });

        Self {
            queue: Some(sender),
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    pub fn track(&self, name: &str, params: EventParams) {
        let Some(queue) = &self.queue else {
            tracing::warn!(event = name, "analytics sink not available");
            return;
        };

        tracing::debug!(event = name, label = %params.label, "tracking event");

        let event = AnalyticsEvent {
            name: name.into(),
            params,
        };

        if let Err(err) = queue.try_send(event) {
            tracing::warn!(%err, "analytics queue closed");
        }
    }

    /// Stops accepting events and waits for queued ones to be forwarded.
    pub async fn close(&self) {
        if let Some(queue) = &self.queue {
            queue.close();
        }

        if let Some(worker) = self.worker.lock().await.take() {
            if let Err(err) = worker.await {
                tracing::error!(%err, "analytics worker failed");
            }
        }
    }

    pub fn track_client_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::FormInteract { label } => self.track_form_interact(&label),
            ClientEvent::FormComplete { label, value } => self.track_form_complete(&label, value),
            ClientEvent::AutocompleteSelect { label, value } => {
                self.track_autocomplete_select(&label, value)
            }
            ClientEvent::ButtonClick { label, extra } => self.track_button_click(&label, extra),
        }
    }

    pub fn track_form_interact(&self, label: &str) {
        self.track("form_interact", EventParams::labelled(label));
    }

    pub fn track_form_complete(&self, label: &str, value: Option<String>) {
        self.track(
            "form_complete",
            EventParams::labelled(label).with_value(value),
        );
    }

    pub fn track_autocomplete_select(&self, label: &str, selected: Option<String>) {
        self.track(
            "autocomplete_select",
            EventParams::labelled(label).with_value(selected),
        );
    }

    pub fn track_button_click(&self, label: &str, extra: Map<String, Value>) {
        let mut params = EventParams::labelled(label);
        params.custom.extend(extra);
        self.track("button_click", params);
    }

    pub fn track_route_success(&self, stats: &RouteStats) {
        self.track(
            "route_success",
            EventParams::labelled("route_calculated")
                .with("num_errands", stats.num_errands)
                .with("transport_mode", stats.transport_mode.name())
                .with("custom_time_used", stats.custom_time_used)
                .with("total_time_seconds", stats.total_time)
                .with("total_distance_meters", stats.total_distance),
        );
    }
}

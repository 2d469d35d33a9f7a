use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::entities::Coordinates;
use crate::external::directions::DirectionsRoute;

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Server route that serves the rendered map image.
pub const STATIC_MAP_ROUTE: &str = "/map/static";

/// Display options of the surface a route is drawn on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSurface {
    pub element_id: String,
    pub zoom: u8,
    pub center: Coordinates,
    pub width: u32,
    pub height: u32,
    pub zoom_control: bool,
    pub map_type_control: bool,
    pub street_view_control: bool,
    pub fullscreen_control: bool,
}

impl MapSurface {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            ..Self::default()
        }
    }
}

impl Default for MapSurface {
    fn default() -> Self {
        Self {
            element_id: "map".into(),
            zoom: 12,
            // Philadelphia City Hall
            center: Coordinates {
                lat: 39.9526,
                lng: -75.1652,
            },
            width: 640,
            height: 480,
            zoom_control: true,
            map_type_control: false,
            street_view_control: false,
            fullscreen_control: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub surface: Option<MapSurface>,
    pub route: Option<DirectionsRoute>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub view: MapView,
    /// Where the rendered image can be fetched, once a surface is mounted.
    pub image_path: Option<String>,
}

/// Holds the mounted surface and the most recently drawn route.
///
/// Draws from concurrent route computations overwrite each other; whichever
/// finishes last is what the view shows.
#[derive(Debug, Default)]
pub struct MapRenderer {
    view: RwLock<MapView>,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self, surface: Option<MapSurface>) {
        let Some(surface) = surface else {
            return;
        };

        tracing::debug!(element_id = %surface.element_id, "map surface mounted");

        if let Ok(mut view) = self.view.write() {
            view.surface = Some(surface);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.view
            .read()
            .map(|view| view.surface.is_some())
            .unwrap_or(false)
    }

    pub fn draw(&self, route: &DirectionsRoute) {
        if let Ok(mut view) = self.view.write() {
            view.route = Some(route.clone());
        }
    }

    pub fn view(&self) -> MapView {
        self.view
            .read()
            .map(|view| view.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let view = self.view();
        let image_path = view.surface.as_ref().map(|_| STATIC_MAP_ROUTE.to_string());

        MapSnapshot { view, image_path }
    }

    /// Static Maps URL for the current view, `None` until a surface is mounted.
    ///
    /// The URL carries no API key; the maps client adds it when fetching.
    pub fn static_map_url(&self) -> Option<Url> {
        let view = self.view();
        let surface = view.surface?;

        let mut url = Url::parse(STATIC_MAP_ENDPOINT).ok()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("size", &format!("{}x{}", surface.width, surface.height));

            match view
                .route
                .as_ref()
                .and_then(|route| route.overview_polyline.as_ref().map(|line| (route, line)))
            {
                Some((route, polyline)) => {
                    query.append_pair("path", &format!("enc:{}", polyline.points));
                    let start = route.legs.first().and_then(|leg| leg.start_address.as_ref());
                    if let Some(start) = start {
                        query.append_pair("markers", &format!("label:A|{}", start));
                    }
                    let end = route.legs.last().and_then(|leg| leg.end_address.as_ref());
                    if let Some(end) = end {
                        query.append_pair("markers", &format!("label:B|{}", end));
                    }
                }
                None => {
                    query.append_pair("center", &String::from(surface.center));
                    query.append_pair("zoom", &surface.zoom.to_string());
                }
            }
        }

        Some(url)
    }
}

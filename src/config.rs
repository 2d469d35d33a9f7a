use reqwest::Url;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::has_bypass_marker;
use crate::error::{configuration_error, Error};
use crate::external::google_maps::DEFAULT_API_BASE;

#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
    pub measurement_id: String,
    pub api_secret: String,
    pub client_id: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub google_maps_api_key: String,
    pub google_maps_api_base: String,
    pub google_client_id: Option<String>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub local_storage_path: PathBuf,
    pub app_url: Url,
    pub analytics: Option<AnalyticsConfig>,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Error> {
    match optional(key) {
        Some(value) => value
            .parse()
            .map_err(|_| configuration_error(format!("{} has an invalid value", key))),
        None => Ok(default),
    }
}

impl Config {
    /// Reads `.env` (when present) and then the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY")?;

        let app_url = optional("APP_URL").unwrap_or_else(|| "http://127.0.0.1:3000/".into());
        let app_url = Url::parse(&app_url)
            .map_err(|err| configuration_error(format!("APP_URL is invalid: {}", err)))?;

        let google_client_id = optional("GOOGLE_CLIENT_ID");
        if google_client_id.is_none() && !has_bypass_marker(&app_url) {
            return Err(configuration_error(
                "GOOGLE_CLIENT_ID is required unless APP_URL enables the bypass",
            ));
        }

        let analytics = match (optional("GA_MEASUREMENT_ID"), optional("GA_API_SECRET")) {
            (Some(measurement_id), Some(api_secret)) => Some(AnalyticsConfig {
                measurement_id,
                api_secret,
                client_id: optional("GA_CLIENT_ID").unwrap_or_else(|| "errand-router".into()),
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr: parsed("LISTEN_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            google_maps_api_key,
            google_maps_api_base: optional("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
            google_client_id,
            database_url: optional("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            local_storage_path: optional("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("local_storage.json")),
            app_url,
            analytics,
        })
    }
}

use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::error::Error;

pub const HOME_ADDRESS_KEY: &str = "homeAddress";

/// String key-value pairs persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Stored items. A file that does not hold a JSON object reads as empty
    /// so the next write replaces it.
    async fn read_all(&self) -> Result<Map<String, Value>, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(
                    %err,
                    path = %self.path.display(),
                    "discarding unreadable local storage"
                );
                Ok(Map::new())
            }
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().await;
        let items = self.read_all().await?;

        Ok(items
            .get(key)
            .and_then(Value::as_str)
            .map(|value| value.to_string()))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // staged next to the target so the rename stays on one filesystem
        let staging = self.staging_path();
        let bytes = serde_json::to_vec_pretty(&items)?;
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        Ok(())
    }
}

/// Device-local home address. Never fails towards the caller.
#[derive(Debug)]
pub struct HomeAddressStore {
    storage: LocalStorage,
}

impl HomeAddressStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Returns `false` when the address could not be written.
    #[tracing::instrument(skip(self))]
    pub async fn save_home_address(&self, address: &str) -> bool {
        match self.storage.set_item(HOME_ADDRESS_KEY, address).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%err, "error saving home address");
                false
            }
        }
    }

    /// Empty string when nothing was saved or the storage is unreadable.
    #[tracing::instrument(skip(self))]
    pub async fn load_home_address(&self) -> String {
        match self.storage.get_item(HOME_ADDRESS_KEY).await {
            Ok(address) => address.unwrap_or_default(),
            Err(err) => {
                tracing::error!(%err, "error loading home address");
                String::new()
            }
        }
    }
}

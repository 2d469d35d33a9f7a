use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    entities::SavedErrandsList,
    error::{storage_failure, Error},
};

/// Per-user collection of named errand lists.
#[async_trait]
pub trait ErrandListStore: Send + Sync {
    async fn save_list(
        &self,
        user_id: &str,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error>;

    async fn list_all(&self, user_id: &str) -> Result<Vec<SavedErrandsList>, Error>;

    async fn update_list(
        &self,
        user_id: &str,
        list_id: Uuid,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error>;

    async fn delete_list(&self, user_id: &str, list_id: Uuid) -> Result<(), Error>;
}

pub fn missing_list_error(list_id: Uuid) -> Error {
    storage_failure(format!("No document to update: errands_lists/{}", list_id))
}

/// Keeps lists in process memory; used when no database is configured.
#[derive(Default)]
pub struct MemoryErrandListStore {
    lists: RwLock<HashMap<String, Vec<SavedErrandsList>>>,
}

impl MemoryErrandListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ErrandListStore for MemoryErrandListStore {
    #[tracing::instrument(skip(self, errands))]
    async fn save_list(
        &self,
        user_id: &str,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        let list = SavedErrandsList::new(name, errands);

        self.lists
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(list.clone());

        Ok(list)
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self, user_id: &str) -> Result<Vec<SavedErrandsList>, Error> {
        Ok(self
            .lists
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self, errands))]
    async fn update_list(
        &self,
        user_id: &str,
        list_id: Uuid,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        let mut lists = self.lists.write().await;

        let list = lists
            .get_mut(user_id)
            .and_then(|lists| lists.iter_mut().find(|list| list.id == list_id))
            .ok_or_else(|| missing_list_error(list_id))?;

        list.update(name, errands);

        Ok(list.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_list(&self, user_id: &str, list_id: Uuid) -> Result<(), Error> {
        if let Some(lists) = self.lists.write().await.get_mut(user_id) {
            lists.retain(|list| list.id != list_id);
        }

        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::{types::Json, Executor, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    entities::SavedErrandsList,
    error::{storage_failure, Error},
    preferences::lists::{missing_list_error, ErrandListStore},
};

/// Errand lists stored as JSONB documents, one row per list.
pub struct PgErrandListStore {
    pool: Pool<Postgres>,
}

fn store_error(operation: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |err| {
        tracing::error!(%err, operation, "errand list store error");
        storage_failure(err.to_string())
    }
}

impl PgErrandListStore {
    #[tracing::instrument(name = "PgErrandListStore::new", skip_all)]
    pub async fn new(pool: Pool<Postgres>) -> Result<Self, Error> {
        pool.execute(
            "CREATE TABLE IF NOT EXISTS errands_lists (id UUID PRIMARY KEY, user_id VARCHAR NOT NULL, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)",
        )
        .await?;
        pool.execute(
            "CREATE INDEX IF NOT EXISTS errands_lists_user_id ON errands_lists (user_id, created_at)",
        )
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ErrandListStore for PgErrandListStore {
    #[tracing::instrument(skip(self, errands))]
    async fn save_list(
        &self,
        user_id: &str,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        let list = SavedErrandsList::new(name, errands);

        self.pool
            .execute(
                sqlx::query(
                    "INSERT INTO errands_lists (id, user_id, created_at, data) VALUES ($1, $2, $3, $4)",
                )
                .bind(&list.id)
                .bind(user_id)
                .bind(&list.created_at)
                .bind(Json(&list)),
            )
            .await
            .map_err(store_error("save"))?;

        Ok(list)
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self, user_id: &str) -> Result<Vec<SavedErrandsList>, Error> {
        let rows = self
            .pool
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM errands_lists WHERE user_id = $1 ORDER BY created_at",
                )
                .bind(user_id),
            )
            .await
            .map_err(store_error("list"))?;

        rows.iter()
            .map(|row| {
                let Json(list): Json<SavedErrandsList> =
                    row.try_get("data").map_err(store_error("list"))?;
                Ok::<_, Error>(list)
            })
            .collect()
    }

    #[tracing::instrument(skip(self, errands))]
    async fn update_list(
        &self,
        user_id: &str,
        list_id: Uuid,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        let mut tx = self.pool.begin().await.map_err(store_error("update"))?;

        let Json(mut list): Json<SavedErrandsList> = tx
            .fetch_optional(
                sqlx::query(
                    "SELECT data FROM errands_lists WHERE id = $1 AND user_id = $2 FOR UPDATE",
                )
                .bind(&list_id)
                .bind(user_id),
            )
            .await
            .map_err(store_error("update"))?
            .ok_or_else(|| missing_list_error(list_id))?
            .try_get("data")
            .map_err(store_error("update"))?;

        list.update(name, errands);

        tx.execute(
            sqlx::query("UPDATE errands_lists SET data = $3 WHERE id = $1 AND user_id = $2")
                .bind(&list_id)
                .bind(user_id)
                .bind(Json(&list)),
        )
        .await
        .map_err(store_error("update"))?;

        tx.commit().await.map_err(store_error("update"))?;

        Ok(list)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_list(&self, user_id: &str, list_id: Uuid) -> Result<(), Error> {
        self.pool
            .execute(
                sqlx::query("DELETE FROM errands_lists WHERE id = $1 AND user_id = $2")
                    .bind(&list_id)
                    .bind(user_id),
            )
            .await
            .map_err(store_error("delete"))?;

        Ok(())
    }
}

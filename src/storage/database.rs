use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReelStore, StoreError};
use crate::db::ConnectionProvider;
use crate::models::{NewReel, Reel};

/// Durable backend over the `reels` table.
pub struct DatabaseStorage {
    provider: Arc<ConnectionProvider>,
}

impl DatabaseStorage {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    fn pool(&self) -> Result<&PgPool, StoreError> {
        self.provider
            .get_handle()?
            .ok_or_else(|| StoreError::Unavailable("Database not configured".to_string()))
    }

    /// Applies the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(self.pool()?).await?;
        Ok(())
    }
}

#[async_trait]
impl ReelStore for DatabaseStorage {
    #[tracing::instrument(name = "List reels", skip(self))]
    async fn list(&self) -> Result<Vec<Reel>, StoreError> {
        let reels = sqlx::query_as::<_, Reel>(
            r#"SELECT id, title, description, video_url, poster_url,
                      COALESCE(is_featured, FALSE) AS is_featured
               FROM reels ORDER BY id"#,
        )
        .fetch_all(self.pool()?)
        .await?;

        Ok(reels)
    }

    #[tracing::instrument(name = "Get reel", skip(self))]
    async fn get(&self, id: i32) -> Result<Option<Reel>, StoreError> {
        let reel = sqlx::query_as::<_, Reel>(
            r#"SELECT id, title, description, video_url, poster_url,
                      COALESCE(is_featured, FALSE) AS is_featured
               FROM reels WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool()?)
        .await?;

        Ok(reel)
    }

    #[tracing::instrument(name = "Create reel", skip(self, reel), fields(title = %reel.title))]
    async fn create(&self, reel: NewReel) -> Result<Reel, StoreError> {
        let created = sqlx::query_as::<_, Reel>(
            r#"INSERT INTO reels (title, description, video_url, poster_url, is_featured)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, title, description, video_url, poster_url,
                         COALESCE(is_featured, FALSE) AS is_featured"#,
        )
        .bind(reel.title)
        .bind(reel.description)
        .bind(reel.video_url)
        .bind(reel.poster_url)
        .bind(reel.is_featured)
        .fetch_one(self.pool()?)
        .await?;

        tracing::info!(id = created.id, "Inserted reel");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn storage(url: Option<String>) -> DatabaseStorage {
        DatabaseStorage::new(Arc::new(ConnectionProvider::new(
            url,
            Duration::from_secs(30),
            Duration::from_secs(10),
        )))
    }

    #[tokio::test]
    async fn every_operation_is_unavailable_without_connection_string() {
        let store = storage(None);

        assert!(matches!(store.list().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.get(1).await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.create(NewReel::new("A", "/x.mp4")).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips() {
        let store = storage(std::env::var("DATABASE_URL").ok());
        store.migrate().await.expect("migrations failed");

        let created = store
            .create(NewReel::new("Integration Edit", "/reels/integration.mp4").featured(true))
            .await
            .unwrap();

        assert_eq!(store.get(created.id).await.unwrap(), Some(created.clone()));
        assert!(store.list().await.unwrap().contains(&created));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_id_is_not_found() {
        let store = storage(std::env::var("DATABASE_URL").ok());
        store.migrate().await.expect("migrations failed");

        assert_eq!(store.get(i32::MAX).await.unwrap(), None);
    }
}

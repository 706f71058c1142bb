use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{CredentialStore, StorageError, StoredCredentials};

use super::SqliteRepository;

#[async_trait]
impl CredentialStore for SqliteRepository {
    async fn load(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT access_token, refresh_token, username, remember
            FROM credentials
            WHERE id = 1
            ",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let access: String = row
            .try_get("access_token")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let refresh: String = row
            .try_get("refresh_token")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let username: String = row
            .try_get("username")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let remember: i64 = row
            .try_get("remember")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(StoredCredentials {
            access,
            refresh,
            username,
            remember: remember != 0,
        }))
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO credentials (id, access_token, refresh_token, username, remember)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                username = excluded.username,
                remember = excluded.remember
            ",
        )
        .bind(1_i64)
        .bind(&credentials.access)
        .bind(&credentials.refresh)
        .bind(&credentials.username)
        .bind(i64::from(credentials.remember))
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::Row;

use quizdesk_core::model::LangCode;

use crate::repository::{PreferenceStore, StorageError};

use super::SqliteRepository;

#[async_trait]
impl PreferenceStore for SqliteRepository {
    async fn preferred_language(&self) -> Result<Option<LangCode>, StorageError> {
        let row = sqlx::query("SELECT preferred_language FROM preferences WHERE id = 1")
            .fetch_optional(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let code: Option<String> = row
            .try_get("preferred_language")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        match code {
            Some(code) => code
                .parse::<LangCode>()
                .map(Some)
                .map_err(|err| StorageError::Serialization(err.to_string())),
            None => Ok(None),
        }
    }

    async fn set_preferred_language(&self, language: LangCode) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO preferences (id, preferred_language)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                preferred_language = excluded.preferred_language
            ",
        )
        .bind(1_i64)
        .bind(language.as_str())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

use crate::{
    core::{
        model::record::{RecordInsert, UploadRecord},
        repo::record::RecordRepo,
    },
    error::CasekitError,
    map_err,
};
use sqlx::SqlitePool;

#[async_trait::async_trait]
impl RecordRepo for SqlitePool {
    async fn insert(&self, record: RecordInsert<'_>) -> Result<UploadRecord, CasekitError> {
        let RecordInsert {
            name,
            created_at,
            note,
        } = record;

        let id = map_err!(
            sqlx::query("INSERT INTO records (name, create_on, note) VALUES (?, ?, ?)")
                .bind(name)
                .bind(&created_at)
                .bind(note)
                .execute(self)
                .await
        )
        .last_insert_rowid();

        Ok(UploadRecord {
            id,
            name: name.to_string(),
            created_at,
            note: note.map(String::from),
            deleted: false,
        })
    }

    async fn list_active(&self) -> Result<Vec<UploadRecord>, CasekitError> {
        Ok(map_err!(
            sqlx::query_as::<_, UploadRecord>(
                "SELECT id, name, create_on, note, is_deleted
                 FROM records
                 WHERE is_deleted = 0
                 ORDER BY create_on DESC, id DESC",
            )
            .fetch_all(self)
            .await
        ))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>, CasekitError> {
        Ok(map_err!(
            sqlx::query_as::<_, UploadRecord>(
                "SELECT id, name, create_on, note, is_deleted FROM records WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(self)
            .await
        ))
    }

    async fn get_by_name(&self, name: &str) -> Result<Vec<UploadRecord>, CasekitError> {
        Ok(map_err!(
            sqlx::query_as::<_, UploadRecord>(
                "SELECT id, name, create_on, note, is_deleted FROM records WHERE name = ? ORDER BY id",
            )
            .bind(name)
            .fetch_all(self)
            .await
        ))
    }

    async fn remove_by_name(&self, name: &str) -> Result<u64, CasekitError> {
        Ok(map_err!(
            sqlx::query("DELETE FROM records WHERE name = ?")
                .bind(name)
                .execute(self)
                .await
        )
        .rows_affected())
    }

    async fn remove_by_id(&self, id: i64) -> Result<u64, CasekitError> {
        Ok(map_err!(
            sqlx::query("DELETE FROM records WHERE id = ?")
                .bind(id)
                .execute(self)
                .await
        )
        .rows_affected())
    }

    async fn close(&self) {
        sqlx::Pool::close(self).await
    }
}

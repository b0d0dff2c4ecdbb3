use crate::{
    core::model::record::{RecordInsert, UploadRecord},
    error::CasekitError,
};

/// Keeps track of uploaded files.
/// Names are not unique at this level; the upload store guarantees distinct names on disk.
#[async_trait::async_trait]
pub trait RecordRepo {
    /// Insert a record and return it with its assigned ID.
    ///
    /// * `record`: Insert payload.
    async fn insert(&self, record: RecordInsert<'_>) -> Result<UploadRecord, CasekitError>;

    /// List every record not flagged as deleted, newest first.
    async fn list_active(&self) -> Result<Vec<UploadRecord>, CasekitError>;

    /// Get a record based on ID.
    ///
    /// * `id`: Record ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>, CasekitError>;

    /// Get all records with the exact `name`.
    ///
    /// * `name`: File name.
    async fn get_by_name(&self, name: &str) -> Result<Vec<UploadRecord>, CasekitError>;

    /// Remove every record whose name matches exactly.
    /// Returns the amount of removed rows, zero if none matched.
    ///
    /// * `name`: File name.
    async fn remove_by_name(&self, name: &str) -> Result<u64, CasekitError>;

    /// Remove a record by id.
    ///
    /// * `id`: Record ID.
    async fn remove_by_id(&self, id: i64) -> Result<u64, CasekitError>;

    /// Release the underlying connection.
    async fn close(&self);
}

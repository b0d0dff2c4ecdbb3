use chrono::NaiveDateTime;
use serde::Serialize;

/// Format of [UploadRecord::created_at], second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Note attached to records created by uploads.
pub const DEFAULT_NOTE: &str = "Uploaded XMind file";

/// Holds upload metadata.
/// Main model for the `records` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UploadRecord {
    /// Primary key.
    pub id: i64,

    /// File name in the upload directory.
    pub name: String,

    /// Insertion time, `YYYY-MM-DD HH:MM:SS`.
    #[sqlx(rename = "create_on")]
    pub created_at: String,

    /// Free-form annotation.
    pub note: Option<String>,

    /// Soft deletion flag. Listing never returns deleted records.
    #[sqlx(rename = "is_deleted")]
    pub deleted: bool,
}

/// DTO for inserting.
#[derive(Debug)]
pub struct RecordInsert<'a> {
    pub name: &'a str,
    pub created_at: String,
    pub note: Option<&'a str>,
}

impl<'a> RecordInsert<'a> {
    /// Create an insert payload stamped with the current local time.
    pub fn new(name: &'a str, note: Option<&'a str>) -> Self {
        Self::at(name, chrono::Local::now().naive_local(), note)
    }

    pub fn at(name: &'a str, time: NaiveDateTime, note: Option<&'a str>) -> Self {
        Self {
            name,
            created_at: time.format(TIMESTAMP_FORMAT).to_string(),
            note,
        }
    }
}

/// Outcome of reconciling the upload directory with the record store.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// Records removed because their file no longer exists.
    pub pruned: Vec<UploadRecord>,

    /// Records created for files that had none.
    pub registered: Vec<UploadRecord>,
}

#[cfg(test)]
mod tests {
    use super::RecordInsert;
    use chrono::NaiveDate;

    #[test]
    fn insert_timestamp_format() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        let insert = RecordInsert::at("plan.xmind", time, None);
        assert_eq!("2024-03-07 09:05:01", insert.created_at);
    }
}

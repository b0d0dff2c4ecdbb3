use crate::{
    core::{
        model::record::{RecordInsert, SyncReport, UploadRecord, DEFAULT_NOTE},
        preview::Preview,
        provider::ProviderState,
        repo::record::RecordRepo,
        upload::store::is_xmind,
    },
    err,
    error::CasekitError,
    map_err,
};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Note attached to records created for files found in the upload directory.
pub const SYNC_NOTE: &str = "Registered from upload directory";

/// High level operations on uploads and their conversions.
#[derive(Clone)]
pub struct RecordService<R> {
    pub repo: R,
    providers: ProviderState,
}

impl<R> RecordService<R>
where
    R: RecordRepo + Send + Sync,
{
    pub fn new(repo: R, providers: ProviderState) -> Self {
        Self { repo, providers }
    }

    /// List all active records, newest first.
    pub async fn list(&self) -> Result<Vec<UploadRecord>, CasekitError> {
        self.repo.list_active().await
    }

    /// Get a record from the repository.
    ///
    /// * `id`: Record ID.
    pub async fn get_record(&self, id: i64) -> Result<UploadRecord, CasekitError> {
        match self.repo.get_by_id(id).await? {
            Some(record) => Ok(record),
            None => err!(DoesNotExist, "Record with ID '{id}'"),
        }
    }

    /// Copy `source` into the upload directory under a free name, record it
    /// and convert it to test cases.
    ///
    /// The record is kept if the conversion fails, since the upload itself succeeded.
    ///
    /// * `source`: The selected file, if any.
    /// * `note`: Record annotation, defaults to [DEFAULT_NOTE].
    pub async fn upload(
        &self,
        source: Option<&Path>,
        note: Option<&str>,
    ) -> Result<(UploadRecord, Preview), CasekitError> {
        let Some(source) = source else {
            return err!(NoSelection);
        };

        if !map_err!(tokio::fs::try_exists(source).await) || !source.is_file() {
            return err!(DoesNotExist, "file {}", source.display());
        }

        let Some(file_name) = source.file_name().and_then(|name| name.to_str()) else {
            return err!(InvalidFileName, "{}", source.display());
        };

        if !is_xmind(file_name) {
            return err!(UnsupportedFileType, "{file_name}");
        }

        validate_name(file_name)?;

        let store = &self.providers.store;

        let name = store.unique_name(file_name).await?;
        let path = store.write(source, &name).await?;

        let insert = RecordInsert::new(&name, Some(note.unwrap_or(DEFAULT_NOTE)));
        let record = match self.repo.insert(insert).await {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = store.delete(&name).await {
                    warn!("Unable to remove '{name}' after failed insert: {cleanup}");
                }
                return Err(e);
            }
        };

        info!("Uploaded '{}' ({})", record.name, record.id);

        let cases = self.providers.parser.parse(&path).await?;

        Ok((record, Preview::new(name, cases)))
    }

    /// Convert a stored upload to test cases.
    ///
    /// * `name`: File name in the upload directory.
    pub async fn preview(&self, name: &str) -> Result<Preview, CasekitError> {
        let path = self.stored_path(name).await?;
        let cases = self.providers.parser.parse(&path).await?;
        debug!("Parsed {} test cases from '{name}'", cases.len());
        Ok(Preview::new(name, cases))
    }

    /// Generate the CSV of a stored upload and copy it to `destination`.
    /// Returns the path of the copy.
    ///
    /// * `name`: File name in the upload directory.
    /// * `destination`: Where to copy the CSV, defaults to its file name in the working directory.
    pub async fn export_csv(
        &self,
        name: &str,
        destination: Option<&Path>,
    ) -> Result<PathBuf, CasekitError> {
        let path = self.stored_path(name).await?;

        let csv = self.providers.exporter.to_csv(&path).await?;
        info!("Converted '{name}' to {}", csv.display());

        let csv_name = csv
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| csv.display().to_string());

        if !map_err!(tokio::fs::try_exists(&csv).await) {
            return err!(DoesNotExist, "file {csv_name}");
        }

        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&csv_name));

        self.providers.store.export(&csv, &destination).await?;
        info!("Downloaded '{csv_name}' to {}", destination.display());

        Ok(destination)
    }

    /// Copy a stored upload to `destination`. Returns the path of the copy.
    ///
    /// * `name`: File name in the upload directory.
    /// * `destination`: Where to copy the file, defaults to `name` in the working directory.
    pub async fn download(
        &self,
        name: &str,
        destination: Option<&Path>,
    ) -> Result<PathBuf, CasekitError> {
        let path = self.stored_path(name).await?;

        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(name));

        self.providers.store.export(&path, &destination).await?;
        info!("Downloaded '{name}' to {}", destination.display());

        Ok(destination)
    }

    /// Remove all records named `name`, then try to delete the file and its CSV twin.
    /// Deleting a name without records or files is not an error.
    /// Returns the amount of removed records.
    ///
    /// * `name`: File name in the upload directory.
    pub async fn delete(&self, name: &str) -> Result<u64, CasekitError> {
        validate_name(name)?;

        let removed = self.repo.remove_by_name(name).await?;
        if let Err(e) = self.providers.store.delete(name).await {
            warn!("Unable to remove files of '{name}': {e}");
        }

        info!("Deleted '{name}' ({removed} records)");

        Ok(removed)
    }

    /// Remove a single record and, unless another record still points to it, its files.
    ///
    /// * `id`: Record ID.
    pub async fn delete_by_id(&self, id: i64) -> Result<UploadRecord, CasekitError> {
        let record = self.get_record(id).await?;

        self.repo.remove_by_id(id).await?;

        if self.repo.get_by_name(&record.name).await?.is_empty() {
            if let Err(e) = self.providers.store.delete(&record.name).await {
                warn!("Unable to remove files of '{}': {e}", record.name);
            }
        }

        info!("Deleted '{}' ({id})", record.name);

        Ok(record)
    }

    /// Reconcile the repository with the upload directory.
    /// Records whose files are gone are removed and files without records get one.
    pub async fn sync(&self) -> Result<SyncReport, CasekitError> {
        let store = &self.providers.store;
        info!("Syncing records with {}", store.id());

        let mut report = SyncReport::default();
        let mut known = HashSet::new();

        for record in self.repo.list_active().await? {
            if store.exists(&record.name).await? {
                known.insert(record.name);
                continue;
            }
            info!("'{}' not found in storage, trimming", record.name);
            self.repo.remove_by_id(record.id).await?;
            report.pruned.push(record);
        }

        for name in store.list().await? {
            if known.contains(&name) {
                continue;
            }
            if validate_name(&name).is_err() {
                warn!("Skipping '{name}', not addressable by name");
                continue;
            }
            if !self.repo.get_by_name(&name).await?.is_empty() {
                continue;
            }
            let record = self
                .repo
                .insert(RecordInsert::new(&name, Some(SYNC_NOTE)))
                .await?;
            info!("Registered '{}' ({})", record.name, record.id);
            report.registered.push(record);
        }

        Ok(report)
    }

    /// Release the repository connection.
    pub async fn close(&self) {
        self.repo.close().await
    }

    /// Path of an upload that must exist in the store.
    async fn stored_path(&self, name: &str) -> Result<PathBuf, CasekitError> {
        validate_name(name)?;

        if !self.providers.store.exists(name).await? {
            return err!(DoesNotExist, "file {name}");
        }

        Ok(self.providers.store.path(name))
    }
}

/// Names address files directly inside the upload directory.
fn validate_name(name: &str) -> Result<(), CasekitError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return err!(InvalidFileName, "{name}");
    }
    Ok(())
}

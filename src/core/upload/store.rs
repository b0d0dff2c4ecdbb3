use crate::error::CasekitError;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Extension of files accepted for upload.
pub const XMIND_EXTENSION: &str = "xmind";

/// Extension of the CSV twin generated next to an upload.
pub const CSV_EXTENSION: &str = "csv";

/// Suffix appended to colliding names, second resolution.
const SUFFIX_FORMAT: &str = "_%Y%m%d_%H%M%S";

/// Manages the files in the upload directory.
/// Every upload is stored as `<base>.xmind` and may gain a `<base>.csv` twin.
#[async_trait::async_trait]
pub trait UploadStore {
    fn id(&self) -> &'static str;

    /// Full path of the file `name` in the store.
    fn path(&self, name: &str) -> PathBuf;

    /// Check whether `name` exists in the store.
    async fn exists(&self, name: &str) -> Result<bool, CasekitError>;

    /// Return a name based on `desired` that does not exist in the store.
    ///
    /// * `desired`: The preferred file name, usually the name of the source file.
    async fn unique_name(&self, desired: &str) -> Result<String, CasekitError>;

    /// Copy `source` into the store as `name`.
    /// Returns the path of the stored copy. Nothing is left behind if the copy fails.
    ///
    /// * `source`: The file to copy.
    /// * `name`: File name in the store.
    async fn write(&self, source: &Path, name: &str) -> Result<PathBuf, CasekitError>;

    /// Copy a stored file to a location outside of the store.
    ///
    /// * `file`: A file in the store.
    /// * `destination`: Where to put the copy.
    async fn export(&self, file: &Path, destination: &Path) -> Result<(), CasekitError>;

    /// Remove `name` and its CSV twin. Files that do not exist are skipped.
    ///
    /// * `name`: File name in the store.
    async fn delete(&self, name: &str) -> Result<(), CasekitError>;

    /// List the names of all uploads in the store.
    async fn list(&self) -> Result<Vec<String>, CasekitError>;
}

/// Append a `_YYYYMMDD_HHMMSS` suffix to the stem of `name`, keeping its extension.
pub fn timestamped_name(name: &str, time: NaiveDateTime) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let suffix = time.format(SUFFIX_FORMAT);
    match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    }
}

/// Name of the CSV twin of `name`.
pub fn csv_name(name: &str) -> String {
    Path::new(name)
        .with_extension(CSV_EXTENSION)
        .to_string_lossy()
        .to_string()
}

/// Whether `name` carries the `.xmind` extension, in any letter case.
pub fn is_xmind(name: impl AsRef<Path>) -> bool {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XMIND_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::{csv_name, is_xmind, timestamped_name};
    use chrono::NaiveDate;

    fn time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 18)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap()
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            "plan_20241018_140309.xmind",
            timestamped_name("plan.xmind", time())
        );
        assert_eq!(
            "my.plan_20241018_140309.xmind",
            timestamped_name("my.plan.xmind", time())
        );
        assert_eq!("plan_20241018_140309", timestamped_name("plan", time()));
    }

    #[test]
    fn csv_twin() {
        assert_eq!("plan.csv", csv_name("plan.xmind"));
        assert_eq!("plan_20241018_140309.csv", csv_name("plan_20241018_140309.xmind"));
        assert_eq!("plan.csv", csv_name("plan.XMIND"));
    }

    #[test]
    fn xmind_extension() {
        assert!(is_xmind("plan.xmind"));
        assert!(is_xmind("/some/dir/plan.xmind"));
        assert!(is_xmind("plan.XMIND"));
        assert!(is_xmind("plan.XMind"));
        assert!(!is_xmind("plan.csv"));
        assert!(!is_xmind("xmind"));
    }
}

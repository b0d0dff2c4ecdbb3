use crate::{
    core::upload::store::{csv_name, is_xmind, timestamped_name, UploadStore},
    error::CasekitError,
    map_err,
};
use chrono::NaiveDateTime;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info, warn};

/// How long to wait before sampling the clock again when a timestamped name is taken.
const RETRY_DELAY: Duration = Duration::from_millis(100);

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Simple FS based implementation of an [UploadStore](crate::core::upload::store::UploadStore).
/// All files live directly in the base directory.
#[derive(Clone)]
pub struct FsUploadStore {
    /// The base directory to store the uploads in.
    base: PathBuf,

    /// Time source for collision suffixes.
    clock: Clock,
}

impl std::fmt::Debug for FsUploadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsUploadStore")
            .field("base", &self.base)
            .finish()
    }
}

impl FsUploadStore {
    /// Create the store, creating the base directory if it does not exist.
    ///
    /// * `path`: The upload directory.
    pub async fn init(path: impl AsRef<Path>) -> Result<Self, CasekitError> {
        let base = path.as_ref().to_path_buf();

        map_err!(tokio::fs::create_dir_all(&base).await);

        info!("Initialising fs store at {}", base.display());

        Ok(Self {
            base,
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        })
    }

    /// Replace the clock used for collision suffixes.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Remove a file, treating a missing file as success.
    async fn remove(&self, name: &str) -> Result<(), CasekitError> {
        let path = self.path(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => map_err!(Err(e)),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UploadStore for FsUploadStore {
    fn id(&self) -> &'static str {
        "fs"
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    async fn exists(&self, name: &str) -> Result<bool, CasekitError> {
        Ok(map_err!(tokio::fs::try_exists(self.path(name)).await))
    }

    async fn unique_name(&self, desired: &str) -> Result<String, CasekitError> {
        let mut name = desired.to_string();
        let mut attempt = 0;

        while self.exists(&name).await? {
            if attempt > 0 {
                tokio::time::sleep(RETRY_DELAY).await;
            }
            attempt += 1;
            name = timestamped_name(desired, (self.clock)());
        }

        if name != desired {
            debug!("'{desired}' exists, using '{name}'");
        }

        Ok(name)
    }

    async fn write(&self, source: &Path, name: &str) -> Result<PathBuf, CasekitError> {
        let path = self.path(name);
        debug!("Copying {} to {}", source.display(), path.display());

        let copied = tokio::fs::copy(source, &path).await;
        if copied.is_err() {
            if let Err(cleanup) = self.remove(name).await {
                warn!("Unable to remove partial copy {}: {cleanup}", path.display());
            }
        }
        map_err!(copied);

        Ok(path)
    }

    async fn export(&self, file: &Path, destination: &Path) -> Result<(), CasekitError> {
        debug!("Copying {} to {}", file.display(), destination.display());
        map_err!(tokio::fs::copy(file, destination).await);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), CasekitError> {
        self.remove(name).await?;
        self.remove(&csv_name(name)).await
    }

    async fn list(&self) -> Result<Vec<String>, CasekitError> {
        let mut files = map_err!(tokio::fs::read_dir(&self.base).await);
        let mut names = vec![];

        while let Some(file) = map_err!(files.next_entry().await) {
            if !map_err!(file.file_type().await).is_file() {
                continue;
            }
            let Some(name) = file.file_name().to_str().map(String::from) else {
                warn!("Skipping non UTF-8 file name {:?}", file.file_name());
                continue;
            };
            if is_xmind(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::FsUploadStore;
    use crate::{core::upload::store::UploadStore, error::CasekitErr};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::{
        collections::HashSet,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc,
        },
    };

    const CONTENT: &str = "Hello world.";

    fn second(s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 18)
            .unwrap()
            .and_hms_opt(14, 0, s)
            .unwrap()
    }

    /// A clock that stays on the same second for `repeat` samples, then advances.
    fn stepping_clock(repeat: u32) -> impl Fn() -> NaiveDateTime + Send + Sync + 'static {
        let calls = Arc::new(AtomicU32::new(0));
        move || second(calls.fetch_add(1, Ordering::SeqCst) / repeat)
    }

    #[tokio::test]
    async fn works() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.xmind");
        tokio::fs::write(&source, CONTENT).await.unwrap();

        let store = FsUploadStore::init(dir.path().join("upload")).await.unwrap();

        let path = store.write(&source, "plan.xmind").await.unwrap();
        assert_eq!(CONTENT, tokio::fs::read_to_string(&path).await.unwrap());
        assert!(store.exists("plan.xmind").await.unwrap());

        let out = dir.path().join("out.xmind");
        store.export(&path, &out).await.unwrap();
        assert_eq!(CONTENT, tokio::fs::read_to_string(&out).await.unwrap());

        store.delete("plan.xmind").await.unwrap();
        assert!(!store.exists("plan.xmind").await.unwrap());
    }

    #[tokio::test]
    async fn init_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("nested").join("upload");

        let store = FsUploadStore::init(&base).await.unwrap();

        assert!(base.is_dir());
        assert_eq!(base, store.base());
    }

    #[tokio::test]
    async fn init_fails_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("upload");
        tokio::fs::write(&file, CONTENT).await.unwrap();

        let e = FsUploadStore::init(&file).await.unwrap_err();

        assert!(matches!(e.error, CasekitErr::IO(_)));
    }

    #[tokio::test]
    async fn unique_name_keeps_free_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path()).await.unwrap();

        assert_eq!("plan.xmind", store.unique_name("plan.xmind").await.unwrap());
    }

    #[tokio::test]
    async fn unique_name_appends_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path())
            .await
            .unwrap()
            .with_clock(|| second(9));

        tokio::fs::write(dir.path().join("plan.xmind"), CONTENT)
            .await
            .unwrap();

        assert_eq!(
            "plan_20241018_140009.xmind",
            store.unique_name("plan.xmind").await.unwrap()
        );
    }

    #[tokio::test]
    async fn unique_name_waits_for_the_clock() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path())
            .await
            .unwrap()
            .with_clock(stepping_clock(3));

        tokio::fs::write(dir.path().join("plan.xmind"), CONTENT)
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("plan_20241018_140000.xmind"), CONTENT)
            .await
            .unwrap();

        assert_eq!(
            "plan_20241018_140001.xmind",
            store.unique_name("plan.xmind").await.unwrap()
        );
    }

    #[tokio::test]
    async fn repeated_uploads_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("plan.xmind");
        tokio::fs::write(&source, CONTENT).await.unwrap();

        let store = FsUploadStore::init(dir.path().join("upload"))
            .await
            .unwrap()
            .with_clock(stepping_clock(2));

        let mut names = HashSet::new();
        for _ in 0..4 {
            let name = store.unique_name("plan.xmind").await.unwrap();
            assert!(!store.exists(&name).await.unwrap());
            store.write(&source, &name).await.unwrap();
            assert!(names.insert(name));
        }

        assert_eq!(4, store.list().await.unwrap().len());
    }

    #[tokio::test]
    async fn delete_removes_csv_twin() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path()).await.unwrap();

        tokio::fs::write(store.path("plan.xmind"), CONTENT).await.unwrap();
        tokio::fs::write(store.path("plan.csv"), CONTENT).await.unwrap();

        store.delete("plan.xmind").await.unwrap();

        assert!(!store.exists("plan.xmind").await.unwrap());
        assert!(!store.exists("plan.csv").await.unwrap());

        // Nothing left to remove.
        store.delete("plan.xmind").await.unwrap();
    }

    #[tokio::test]
    async fn failed_copy_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path().join("upload")).await.unwrap();

        let missing = dir.path().join("missing.xmind");
        assert!(store.write(&missing, "missing.xmind").await.is_err());
        assert!(!store.exists("missing.xmind").await.unwrap());
    }

    #[tokio::test]
    async fn list_only_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsUploadStore::init(dir.path()).await.unwrap();

        tokio::fs::write(store.path("b.xmind"), CONTENT).await.unwrap();
        tokio::fs::write(store.path("a.xmind"), CONTENT).await.unwrap();
        tokio::fs::write(store.path("a.csv"), CONTENT).await.unwrap();
        tokio::fs::create_dir(store.path("dir.xmind")).await.unwrap();

        assert_eq!(vec!["a.xmind", "b.xmind"], store.list().await.unwrap());
    }
}

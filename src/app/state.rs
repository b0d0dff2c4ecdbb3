use super::{
    convert::xmind2testcase::Xmind2Testcase, repo::sqlite, upload::store::FsUploadStore,
};
use crate::{
    config::{StartArgs, StoreConfig},
    core::{
        provider::{DynCaseParser, DynCsvExporter, ProviderState},
        service::record::RecordService,
    },
    error::CasekitError,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    /// Casekit services.
    pub services: ServiceState,

    /// Downstream providers for casekit services.
    pub providers: AppProviderState,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &StartArgs) -> Result<Self, CasekitError> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .with_writer(std::io::stderr)
            .init();

        let (program, converter_args) = args.converter_command();
        let converter = Arc::new(Xmind2Testcase::new(program).with_args(converter_args));

        Self::init(args.store_config(), converter.clone(), converter).await
    }

    /// Open the record database and the upload directory described by `config`.
    ///
    /// * `config`: Store locations.
    /// * `parser`: XMind to test case conversion.
    /// * `exporter`: XMind to CSV conversion.
    pub async fn init(
        config: StoreConfig,
        parser: DynCaseParser,
        exporter: DynCsvExporter,
    ) -> Result<Self, CasekitError> {
        let database = sqlite::init(&config.db_path).await?;
        let store = Arc::new(FsUploadStore::init(&config.upload_dir).await?);

        let providers = AppProviderState {
            database: database.clone(),
            store,
            parser,
            exporter,
        };

        let record = RecordService::new(database, providers.clone().into());

        info!("Casekit ready");

        Ok(Self {
            services: ServiceState { record },
            providers,
        })
    }

    /// Release the database connection.
    pub async fn close(&self) {
        self.services.record.close().await;
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub record: RecordService<SqlitePool>,
}

#[derive(Clone)]
pub struct AppProviderState {
    pub database: SqlitePool,
    pub store: Arc<FsUploadStore>,
    pub parser: DynCaseParser,
    pub exporter: DynCsvExporter,
}

impl From<AppProviderState> for ProviderState {
    fn from(value: AppProviderState) -> ProviderState {
        ProviderState {
            store: value.store,
            parser: value.parser,
            exporter: value.exporter,
        }
    }
}

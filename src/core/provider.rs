use super::{
    convert::{CaseParser, CsvExporter},
    upload::store::UploadStore,
};
use std::sync::Arc;

pub type DynUploadStore = Arc<dyn UploadStore + Send + Sync>;
pub type DynCaseParser = Arc<dyn CaseParser + Send + Sync>;
pub type DynCsvExporter = Arc<dyn CsvExporter + Send + Sync>;

/// Holds the concrete implementations the record service delegates to.
/// Decouples the orchestration from the file system and the external converter.
#[derive(Clone)]
pub struct ProviderState {
    /// Upload directory.
    pub store: DynUploadStore,

    /// XMind to test case conversion.
    pub parser: DynCaseParser,

    /// XMind to CSV conversion.
    pub exporter: DynCsvExporter,
}

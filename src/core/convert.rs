//! Narrow interfaces over the external XMind converter.
//! Neither the XMind format nor the Zentao CSV layout are handled here.

use crate::{core::model::case::TestCase, error::CasekitError};
use std::path::{Path, PathBuf};

/// Turns an XMind file into an ordered list of test cases.
#[async_trait::async_trait]
pub trait CaseParser {
    /// Parse the file at `path`.
    ///
    /// * `path`: Path to an `.xmind` file.
    async fn parse(&self, path: &Path) -> Result<Vec<TestCase>, CasekitError>;
}

/// Writes the Zentao CSV representation of an XMind file.
#[async_trait::async_trait]
pub trait CsvExporter {
    /// Generate the CSV and return where it was written.
    /// Callers must check that the returned file exists before using it.
    ///
    /// * `path`: Path to an `.xmind` file.
    async fn to_csv(&self, path: &Path) -> Result<PathBuf, CasekitError>;
}

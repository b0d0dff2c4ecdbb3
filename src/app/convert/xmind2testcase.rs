use crate::{
    core::{
        convert::{CaseParser, CsvExporter},
        model::case::TestCase,
    },
    err,
    error::CasekitError,
    map_err,
};
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs the `xmind2testcase` command line tool.
///
/// `xmind2testcase <file> -json` writes the test case list to `<base>.json`,
/// `xmind2testcase <file> -csv` writes the Zentao CSV to `<base>.csv`.
/// Both outputs land next to the input file.
#[derive(Debug, Clone)]
pub struct Xmind2Testcase {
    /// Executable to run.
    program: String,

    /// Arguments passed before the file, e.g. a script for an interpreter.
    args: Vec<String>,
}

impl Default for Xmind2Testcase {
    fn default() -> Self {
        Self::new("xmind2testcase")
    }
}

impl Xmind2Testcase {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the converter on `file` with the output `flag` and wait for it to exit.
    async fn call(&self, file: &Path, flag: &str) -> Result<(), CasekitError> {
        debug!("Running {} {} {flag}", self.program, file.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .arg(flag)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return err!(ConverterNotFound, "{}", self.program);
            }
            Err(e) => map_err!(Err(e)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}: {}", self.program, stdout.trim());
        }

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return err!(
                Conversion,
                "{} exited with {code}: {}",
                self.program,
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CaseParser for Xmind2Testcase {
    async fn parse(&self, path: &Path) -> Result<Vec<TestCase>, CasekitError> {
        self.call(path, "-json").await?;

        let json = path.with_extension("json");
        let content = match tokio::fs::read(&json).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return err!(Conversion, "no output at {}", json.display());
            }
            Err(e) => map_err!(Err(e)),
        };

        if let Err(e) = tokio::fs::remove_file(&json).await {
            warn!("Unable to remove {}: {e}", json.display());
        }

        Ok(map_err!(serde_json::from_slice(&content)))
    }
}

#[async_trait::async_trait]
impl CsvExporter for Xmind2Testcase {
    async fn to_csv(&self, path: &Path) -> Result<PathBuf, CasekitError> {
        self.call(path, "-csv").await?;
        Ok(path.with_extension("csv"))
    }
}

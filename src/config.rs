use clap::Parser;
use std::path::PathBuf;

use crate::app::cli::Command;

/// The default location of the record database.
const DEFAULT_DB_PATH: &str = "records.db";
/// The default upload path for the `fs` upload store.
const DEFAULT_UPLOAD_PATH: &str = "upload";
/// The default command used to invoke the external converter.
const DEFAULT_CONVERTER: &str = "xmind2testcase";

#[derive(Debug, Parser)]
#[command(name = "casekit", author = "casekit", version = "0.1", about = "Convert XMind files to test cases", long_about = None)]
pub struct StartArgs {
    /// Path to the SQLite record database.
    #[arg(short, long, global = true)]
    db_path: Option<String>,

    /// RUST_LOG string to use as the env filter.
    #[arg(short, long, global = true)]
    log: Option<String>,

    /// Directory uploaded files are copied into.
    #[arg(short, long, global = true)]
    upload_path: Option<String>,

    /// Command used to run xmind2testcase. May contain leading arguments,
    /// e.g. `python -m xmind2testcase.cli`.
    #[arg(short, long, global = true)]
    converter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and the default if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
}

arg!(db_path,     "DATABASE_PATH",      default DEFAULT_DB_PATH.to_string());
arg!(log,         "RUST_LOG",           default "info".to_string());
arg!(upload_path, "UPLOAD_PATH",        default DEFAULT_UPLOAD_PATH.to_string());
arg!(converter,   "XMIND2TESTCASE_CMD", default DEFAULT_CONVERTER.to_string());

impl StartArgs {
    /// Resolve the locations of the record database and the upload directory.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            db_path: PathBuf::from(self.db_path()),
            upload_dir: PathBuf::from(self.upload_path()),
        }
    }

    /// Split the converter command into the program and its leading arguments.
    pub fn converter_command(&self) -> (String, Vec<String>) {
        let command = self.converter();
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts
            .next()
            .unwrap_or_else(|| DEFAULT_CONVERTER.to_string());
        (program, parts.collect())
    }
}

/// Where the record store keeps its state.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file, created if missing.
    pub db_path: PathBuf,

    /// Flat directory holding uploads and their CSV twins, created if missing.
    pub upload_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            upload_dir: upload_dir.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH, DEFAULT_UPLOAD_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::StartArgs;
    use clap::Parser;

    #[test]
    fn explicit_arguments_win() {
        let args = StartArgs::parse_from([
            "casekit",
            "--db-path",
            "/tmp/r.db",
            "--upload-path",
            "/tmp/up",
            "list",
        ]);
        let config = args.store_config();
        assert_eq!("/tmp/r.db", config.db_path.to_str().unwrap());
        assert_eq!("/tmp/up", config.upload_dir.to_str().unwrap());
    }

    #[test]
    fn converter_with_leading_args() {
        let args = StartArgs::parse_from([
            "casekit",
            "--converter",
            "python -m xmind2testcase.cli",
            "list",
        ]);
        let (program, rest) = args.converter_command();
        assert_eq!("python", program);
        assert_eq!(vec!["-m", "xmind2testcase.cli"], rest);
    }

    #[test]
    fn global_options_after_subcommand() {
        let args = StartArgs::parse_from(["casekit", "list", "--upload-path", "elsewhere"]);
        assert_eq!("elsewhere", args.upload_path());
    }
}

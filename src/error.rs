use std::error::Error as _;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum CasekitErr {
    #[error("Does not exist; {0}")]
    DoesNotExist(String),

    #[error("Invalid file name; {0}")]
    InvalidFileName(String),

    #[error("Unsupported file type; {0}")]
    UnsupportedFileType(String),

    #[error("No file selected")]
    NoSelection,

    #[error("Converter not found; {0}")]
    ConverterNotFound(String),

    #[error("Conversion failed; {0}")]
    Conversion(String),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("SQL; {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration; {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error; {0}")]
    SerdeJson(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("{error}")]
pub struct CasekitError {
    file: &'static str,
    line: u32,
    column: u32,
    pub error: CasekitErr,
}

impl CasekitError {
    pub fn new(file: &'static str, line: u32, column: u32, error: CasekitErr) -> CasekitError {
        CasekitError {
            file,
            line,
            column,
            error,
        }
    }

    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    pub fn print(&self) {
        let location = self.location();

        error!("{location} | {self}");

        if self.error.source().is_some() {
            error!("Causes:");
        }

        let mut src = self.error.source();
        while let Some(source) = src {
            error!(" - {source}");
            src = source.source();
        }
    }
}

/// Return early with an `Err` holding the given [CasekitErr] variant and the call site.
#[macro_export]
macro_rules! err {
    ($ty:ident $(, $l:literal $(,)? $($args:expr),* )?) => {
        Err($crate::error::CasekitError::new(
            file!(),
            line!(),
            column!(),
            $crate::error::CasekitErr::$ty $( (format!($l, $( $args, )*)) )?,
        ))
    };
}

#[macro_export]
macro_rules! map_err {
    ($ex:expr) => {
        $ex.map_err(|e| $crate::error::CasekitError::new(file!(), line!(), column!(), e.into()))?
    };
}

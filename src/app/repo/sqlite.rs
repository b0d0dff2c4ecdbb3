use crate::{error::CasekitError, map_err};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;
use tracing::info;

pub mod record;

/// Open (or create) the record database at `path` and run the migrations.
/// The pool holds a single connection; the store is only ever used by one actor.
pub async fn init(path: &Path) -> Result<SqlitePool, CasekitError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = map_err!(
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
    );

    map_err!(sqlx::migrate!().run(&pool).await);

    info!("Connected to sqlite at {}", path.display());
    Ok(pool)
}

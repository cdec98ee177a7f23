pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Builds a connection URL from `DATABASE_PATH`.
///
/// Anything that already looks like a DSN is used as-is. Plain paths are treated as
/// SQLite files, created on first use. Fails when the parent directory cannot be created.
pub fn database_url(path_or_url: &str) -> Result<String, DbErr> {
    if path_or_url.starts_with("sqlite:") {
        return Ok(path_or_url.to_owned());
    }

    if let Some(parent) = Path::new(path_or_url).parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbErr::Custom(format!(
                "Failed to create DB directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(format!("sqlite://{path_or_url}?mode=rwc"))
}

pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = database_url(&config::database_path())?;
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    Database::connect(options).await
}

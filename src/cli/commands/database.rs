use sqlx::PgPool;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Pool for one-shot operator commands
pub async fn connect() -> anyhow::Result<PgPool> {
    let config = AppConfig::from_env();
    Ok(DatabaseManager::connect(&config.database).await?)
}

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    DatabaseManager::migrate(&pool).await?;
    output_success(output_format, "Migrations applied", None)
}

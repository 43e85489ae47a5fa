use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Postgres SQLSTATE codes we translate into client-facing errors
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return DatabaseError::Conflict("Resource already exists".to_string())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DatabaseError::NotFound("Referenced resource does not exist".to_string())
                }
                _ => {}
            }
        }
        DatabaseError::Sqlx(err)
    }
}

impl DatabaseError {
    /// Replace the generic conflict message with a domain-specific one
    pub fn on_conflict(self, message: &str) -> Self {
        match self {
            DatabaseError::Conflict(_) => DatabaseError::Conflict(message.to_string()),
            other => other,
        }
    }
}

/// Builds the shared connection pool and runs schema maintenance
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect eagerly; fails fast when Postgres is unreachable
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = Self::validated_url(config)?;
        let pool = Self::pool_options(config).connect(&url).await?;
        info!("Connected database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Build a pool that connects on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = Self::validated_url(config)?;
        Ok(Self::pool_options(config).connect_lazy(&url)?)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    fn validated_url(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        if config.url.trim().is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let url = url::Url::parse(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url.into()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Apply embedded migrations from `migrations/`
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 2,
            connection_timeout: 1,
        }
    }

    #[test]
    fn rejects_missing_url() {
        assert!(matches!(
            DatabaseManager::validated_url(&config("")),
            Err(DatabaseError::ConfigMissing("DATABASE_URL"))
        ));
    }

    #[test]
    fn rejects_non_postgres_scheme() {
        assert!(matches!(
            DatabaseManager::validated_url(&config("mysql://localhost/racehub")),
            Err(DatabaseError::InvalidDatabaseUrl)
        ));
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let pool = DatabaseManager::connect_lazy(&config("postgres://nobody@127.0.0.1:1/none"));
        assert!(pool.is_ok());
    }

    #[test]
    fn on_conflict_rewrites_only_conflicts() {
        let err = DatabaseError::Conflict("x".into()).on_conflict("Email already registered");
        assert_eq!(err.to_string(), "Conflict: Email already registered");

        let err = DatabaseError::NotFound("event".into()).on_conflict("ignored");
        assert_eq!(err.to_string(), "Not found: event");
    }
}

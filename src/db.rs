use std::time::Duration;

use actix_web::rt::time::timeout;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{Connection, MySqlConnection, MySqlPool};
use tracing::{debug, info};

use crate::config::{ConfigError, DatabaseSettings};
use crate::startup::{DatabaseProbe, MigrationError, SchemaMigrator};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

impl From<MigrateError> for MigrationError {
    fn from(e: MigrateError) -> Self {
        MigrationError(e.to_string())
    }
}

pub fn connect_options(settings: &DatabaseSettings) -> Result<MySqlConnectOptions, ConfigError> {
    match &settings.url {
        Some(url) => url.parse().map_err(|_| ConfigError::Invalid {
            key: "DATABASE_URL",
            value: "<redacted>".to_string(),
        }),
        None => Ok(MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name)),
    }
}

/// Pool that opens connections on first use, so it can exist before the
/// database is up.
pub fn init_pool(settings: &DatabaseSettings) -> Result<MySqlPool, ConfigError> {
    let options = connect_options(settings)?;
    Ok(MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_lazy_with(options))
}

/// Opens a dedicated connection per probe so pool state is never touched.
pub struct MySqlProbe {
    options: MySqlConnectOptions,
    timeout: Duration,
}

impl MySqlProbe {
    pub fn new(options: MySqlConnectOptions, timeout: Duration) -> Self {
        Self { options, timeout }
    }
}

impl DatabaseProbe for MySqlProbe {
    async fn probe(&self) -> bool {
        let check = async {
            let mut conn = MySqlConnection::connect_with(&self.options).await?;
            conn.ping().await?;
            conn.close().await
        };

        match timeout(self.timeout, check).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "Database probe failed");
                false
            }
            Err(_) => {
                debug!(timeout_secs = self.timeout.as_secs(), "Database probe timed out");
                false
            }
        }
    }
}

pub struct SqlxMigrator {
    pool: MySqlPool,
}

impl SqlxMigrator {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl SchemaMigrator for SqlxMigrator {
    async fn migrate(&self) -> Result<(), MigrationError> {
        info!(known = MIGRATOR.iter().count(), "Running embedded migrations");
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}

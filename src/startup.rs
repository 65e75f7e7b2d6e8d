//! Startup sequence: wait for the database, migrate the schema, then serve.
//!
//! ```text
//! WAITING --probe ok--> MIGRATING --migrated--> SERVING
//!    |                      |
//!    +--retries exhausted---+--migration failed--> FAILED
//! ```
//!
//! Every collaborator sits behind a small trait so the sequence can be driven
//! with fakes in tests.
use std::io;
use std::time::Duration;

use derive_more::{Display, From};
use tracing::{error, info, warn};

use crate::config::{ConfigError, HealthCheckSettings};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[display(fmt = "WAITING")]
    Waiting,
    #[display(fmt = "MIGRATING")]
    Migrating,
    #[display(fmt = "SERVING")]
    Serving,
    #[display(fmt = "FAILED")]
    Failed,
}

impl Phase {
    /// Whether the machine may move from `self` to `next`.
    pub fn allows(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Waiting, Phase::Migrating)
                | (Phase::Waiting, Phase::Failed)
                | (Phase::Migrating, Phase::Serving)
                | (Phase::Migrating, Phase::Failed)
                | (Phase::Serving, Phase::Failed)
        )
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "{}", _0)]
pub struct MigrationError(pub String);

impl std::error::Error for MigrationError {}

#[derive(Debug, Display, From)]
pub enum StartupError {
    #[display(fmt = "invalid configuration: {}", _0)]
    Config(ConfigError),
    #[display(fmt = "database not reachable after {} attempts", attempts)]
    #[from(ignore)]
    DatabaseUnreachable { attempts: u32 },
    #[display(fmt = "migration failed: {}", _0)]
    Migration(MigrationError),
    #[display(fmt = "server failed: {}", _0)]
    Server(io::Error),
}

impl std::error::Error for StartupError {}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Config(_)
            | StartupError::DatabaseUnreachable { .. }
            | StartupError::Migration(_)
            | StartupError::Server(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    /// Probes made before the database answered.
    pub probe_attempts: u32,
}

/// Read-only readiness check. Must not change any state on either side.
pub trait DatabaseProbe {
    async fn probe(&self) -> bool;
}

/// Brings the schema to the latest revision.
pub trait SchemaMigrator {
    async fn migrate(&self) -> Result<(), MigrationError>;
}

/// Binds the HTTP listener and runs it until shutdown.
pub trait ApiListener {
    async fn start(self, port: u16) -> io::Result<()>;
}

pub trait Pause {
    async fn pause(&self, interval: Duration);
}

/// Sleeps on the actix runtime.
pub struct ActixPause;

impl Pause for ActixPause {
    async fn pause(&self, interval: Duration) {
        actix_web::rt::time::sleep(interval).await;
    }
}

pub struct Orchestrator<P, M, L, S> {
    probe: P,
    migrator: M,
    listener: L,
    pause: S,
    health_check: HealthCheckSettings,
    port: u16,
}

fn advance(from: Phase, to: Phase) -> Phase {
    debug_assert!(from.allows(to), "illegal transition {from} -> {to}");
    info!(%from, %to, "Startup phase changed");
    to
}

fn fail(from: Phase, err: &StartupError) {
    debug_assert!(from.allows(Phase::Failed));
    error!(%from, to = %Phase::Failed, error = %err, "Startup failed");
}

impl<P, M, L, S> Orchestrator<P, M, L, S>
where
    P: DatabaseProbe,
    M: SchemaMigrator,
    L: ApiListener,
    S: Pause,
{
    pub fn new(
        probe: P,
        migrator: M,
        listener: L,
        pause: S,
        health_check: HealthCheckSettings,
        port: u16,
    ) -> Self {
        Self {
            probe,
            migrator,
            listener,
            pause,
            health_check,
            port,
        }
    }

    /// Drives the full sequence. Returns once the server stops.
    pub async fn run(self) -> Result<StartupReport, StartupError> {
        let mut phase = Phase::Waiting;
        info!(
            %phase,
            retries = self.health_check.retries,
            interval_secs = self.health_check.interval.as_secs(),
            "Waiting for database"
        );

        let probe_attempts = self
            .wait_for_database()
            .await
            .inspect_err(|e| fail(phase, e))?;

        phase = advance(phase, Phase::Migrating);
        self.migrate().await.inspect_err(|e| fail(phase, e))?;

        phase = advance(phase, Phase::Serving);
        self.serve().await.inspect_err(|e| fail(phase, e))?;

        info!("Server stopped");
        Ok(StartupReport { probe_attempts })
    }

    /// Probes until the database answers. Returns the number of probes made.
    pub async fn wait_for_database(&self) -> Result<u32, StartupError> {
        let retries = self.health_check.retries.max(1);
        let interval = self.health_check.interval;

        for attempt in 1..=retries {
            if self.probe.probe().await {
                info!(attempt, "Database is ready");
                return Ok(attempt);
            }
            if attempt < retries {
                warn!(
                    attempt,
                    retries,
                    retry_in_secs = interval.as_secs(),
                    "Database not ready"
                );
                self.pause.pause(interval).await;
            }
        }

        error!(attempts = retries, "Database never became ready");
        Err(StartupError::DatabaseUnreachable { attempts: retries })
    }

    pub async fn migrate(&self) -> Result<(), StartupError> {
        info!("Applying schema migrations");
        self.migrator.migrate().await?;
        info!("Schema is up to date");
        Ok(())
    }

    pub async fn serve(self) -> Result<(), StartupError> {
        info!(port = self.port, "Starting API server");
        self.listener.start(self.port).await?;
        Ok(())
    }
}

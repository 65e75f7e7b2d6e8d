use std::env;
use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

mod api;
mod application;
mod config;
mod db;
mod docs;
mod domain;
mod infrastructure;
mod logging;
mod routes;
mod server;
mod startup;

use config::Config;
use db::{MySqlProbe, SqlxMigrator};
use server::ApiServer;
use startup::{ActixPause, Orchestrator, StartupError, StartupReport};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let _guard = logging::init(env::var("LOG_DIR").ok().as_deref());

    info!("Server starting...");

    match run().await {
        Ok(report) => {
            info!(probe_attempts = report.probe_attempts, "Server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Startup aborted");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<StartupReport, StartupError> {
    let config = Config::from_env()?;
    info!(
        port = config.backend_port,
        api_prefix = %config.api_prefix,
        database = ?config.database,
        "Configuration loaded"
    );

    let options = db::connect_options(&config.database)?;
    let pool = db::init_pool(&config.database)?;

    Orchestrator::new(
        MySqlProbe::new(options, config.health_check.timeout),
        SqlxMigrator::new(pool.clone()),
        ApiServer::new(pool, config.clone()),
        ActixPause,
        config.health_check,
        config.backend_port,
    )
    .run()
    .await
}

use std::io;
use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use sqlx::MySqlPool;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AttendanceService, UserService};
use crate::config::Config;
use crate::docs;
use crate::infrastructure::{MySqlAttendanceRepository, MySqlUserRepository};
use crate::routes;
use crate::startup::ApiListener;

/// The HTTP application, started once the schema is ready.
pub struct ApiServer {
    pool: MySqlPool,
    config: Config,
}

impl ApiServer {
    pub fn new(pool: MySqlPool, config: Config) -> Self {
        Self { pool, config }
    }
}

impl ApiListener for ApiServer {
    async fn start(self, port: u16) -> io::Result<()> {
        let Self { pool, config } = self;

        let users = Data::new(UserService::new(Arc::new(MySqlUserRepository::new(
            pool.clone(),
        ))));
        let attendances = Data::new(AttendanceService::new(Arc::new(
            MySqlAttendanceRepository::new(pool.clone()),
        )));
        let pool = Data::new(pool);

        let openapi = docs::openapi(&config.project_name);
        let openapi_url = format!("{}/openapi.json", config.api_prefix);
        let prefix = config.api_prefix;

        HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .wrap(NormalizePath::trim())
                .service(
                    // wildcard so the UI's JS/CSS assets resolve
                    SwaggerUi::new("/swagger-ui/{_:.*}").url(openapi_url.clone(), openapi.clone()),
                )
                .app_data(pool.clone())
                .app_data(users.clone())
                .app_data(attendances.clone())
                .configure(|cfg| routes::configure(cfg, &prefix))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

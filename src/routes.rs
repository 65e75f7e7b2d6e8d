use actix_web::{error, web};

use crate::api::{ApiError, attendance, health, initialize, users};

/// Mounts every route: health probes at the root, resources under `prefix`.
pub fn configure(cfg: &mut web::ServiceConfig, prefix: &str) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(health::index)
        .service(health::health)
        .service(
            web::scope(prefix)
                .configure(user_routes)
                .configure(attendance_routes)
                .configure(initialize_routes),
        );
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            // /users
            .service(
                web::resource("")
                    .route(web::post().to(users::create_user))
                    .route(web::get().to(users::list_users)),
            )
            // /users/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(users::get_user))
                    .route(web::put().to(users::update_user))
                    .route(web::delete().to(users::delete_user)),
            ),
    );
}

pub fn attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendances")
            // /attendances
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendances))
                    .route(web::post().to(attendance::create_attendance)),
            )
            // /attendances/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(attendance::get_attendance))
                    .route(web::put().to(attendance::update_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            ),
    );
}

pub fn initialize_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/initialize")
            .service(web::resource("/roles").route(web::post().to(initialize::initialize_roles))),
    );
}

// Extractor failures get the same `{"message"}` body as handler errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| error::Error::from(ApiError::BadRequest(err.to_string())))
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| error::Error::from(ApiError::BadRequest(err.to_string())))
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| error::Error::from(ApiError::BadRequest(err.to_string())))
}

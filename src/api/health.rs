use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = Object, example = json!({
            "message": "Hello World"
        }))
    ),
    tag = "Health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Hello World" }))
}

/// Reports whether the pool can still reach the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable", body = Object, example = json!({
            "status": "ok"
        })),
        (status = 503, description = "Database unreachable", body = Object, example = json!({
            "status": "unavailable"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health(pool: web::Data<MySqlPool>) -> impl Responder {
    let (mut response, status) = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => (HttpResponse::Ok(), "ok"),
        Err(e) => {
            warn!(error = %e, "Health check query failed");
            (HttpResponse::ServiceUnavailable(), "unavailable")
        }
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(json!({ "status": status }))
}

use actix_web::{HttpResponse, web};
use serde_json::json;

use super::error::ApiError;
use crate::application::UserService;

/// Seed system roles
///
/// Safe to call repeatedly; existing roles are left untouched.
#[utoipa::path(
    post,
    path = "/api/v1/initialize/roles",
    responses(
        (status = 201, description = "Roles present", body = Object, example = json!({
            "message": "Roles initialized",
            "inserted": 0
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Initialize"
)]
pub async fn initialize_roles(service: web::Data<UserService>) -> Result<HttpResponse, ApiError> {
    let inserted = service.initialize_roles().await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Roles initialized",
        "inserted": inserted
    })))
}

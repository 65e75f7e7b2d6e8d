use actix_web::{HttpResponse, web};

use super::error::ApiError;
use crate::application::UserService;
use crate::application::user_dto::{UserCreateDto, UserListQuery, UserUpdateDto};
use crate::application::user_service::SYSTEM_ACTOR;

/// Create User
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserCreateDto,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Invalid email format: yamada@"
        })),
        (status = 409, description = "Username or email already registered", body = Object, example = json!({
            "message": "Username already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn create_user(
    service: web::Data<UserService>,
    payload: web::Json<UserCreateDto>,
) -> Result<HttpResponse, ApiError> {
    let user = service.create_user(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Active users", body = [UserResponse])
    ),
    tag = "Users"
)]
pub async fn list_users(
    service: web::Data<UserService>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, ApiError> {
    let users = service.get_users(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = service.get_user(&path).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UserUpdateDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_user(
    service: web::Data<UserService>,
    path: web::Path<String>,
    payload: web::Json<UserUpdateDto>,
) -> Result<HttpResponse, ApiError> {
    let user = service
        .update_user(&path, payload.into_inner(), SYSTEM_ACTOR)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User removed"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn delete_user(
    service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    service.remove_user(&path, SYSTEM_ACTOR).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::application::UserService;
    use crate::domain::user::fixtures::sample_user;
    use crate::infrastructure::memory::InMemoryUserRepository;
    use crate::routes;

    fn service(repo: Arc<InMemoryUserRepository>) -> web::Data<UserService> {
        web::Data::new(UserService::new(repo))
    }

    fn new_user() -> Value {
        json!({
            "username": "yamada",
            "email": "yamada@example.com",
            "password": "password123",
            "gender": "male",
            "birth_day": "1990-01-01",
            "phone_number": "090-1234-5678",
            "zip_code": "123-4567"
        })
    }

    #[actix_web::test]
    async fn create_then_fetch_user() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let app = test::init_service(
            App::new()
                .app_data(service(repo.clone()))
                .configure(routes::user_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(new_user())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["username"], "yamada");
        assert!(created.get("hashed_password").is_none());
        assert_eq!(
            created["role_ids"],
            json!([repo.default_role().to_string()])
        );

        let id = created["id"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["email"], "yamada@example.com");
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let mut existing = sample_user();
        existing.username = "yamada".to_string();
        repo.insert(existing);
        let app = test::init_service(
            App::new()
                .app_data(service(repo))
                .configure(routes::user_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(new_user())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn invalid_email_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(service(Arc::default()))
                .configure(routes::user_routes),
        )
        .await;

        let mut payload = new_user();
        payload["email"] = json!("yamada@");
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_and_malformed_ids() {
        let app = test::init_service(
            App::new()
                .app_data(service(Arc::default()))
                .configure(routes::user_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/users/{}", uuid::Uuid::new_v4()))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::get().uri("/users/abc").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn delete_hides_user_from_listing() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let user = sample_user();
        let id = user.id;
        repo.insert(user);
        let app = test::init_service(
            App::new()
                .app_data(service(repo))
                .configure(routes::user_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );

        let req = test::TestRequest::get().uri("/users").to_request();
        let users: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(users.is_empty());

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn update_changes_profile_fields() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let user = sample_user();
        let id = user.id;
        repo.insert(user);
        let app = test::init_service(
            App::new()
                .app_data(service(repo))
                .configure(routes::user_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "address": "Tokyo" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["address"], "Tokyo");
        assert_eq!(updated["updated_by"], "system");
    }
}

use actix_web::{HttpResponse, web};

use super::error::ApiError;
use crate::application::AttendanceService;
use crate::application::attendance_dto::{
    AttendanceCreateDto, AttendanceDeleteDto, AttendanceQuery, AttendanceUpdateDto,
};

#[utoipa::path(
    get,
    path = "/api/v1/attendances",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Matching attendance records", body = [AttendanceResponse]),
        (status = 400, description = "Invalid filter", body = Object, example = json!({
            "message": "start_date and end_date must be given together"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendances(
    service: web::Data<AttendanceService>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = service.get_attendances(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Record a work day
#[utoipa::path(
    post,
    path = "/api/v1/attendances",
    request_body = AttendanceCreateDto,
    responses(
        (status = 201, description = "Attendance created", body = AttendanceResponse),
        (status = 400, description = "Clock times out of order", body = Object, example = json!({
            "message": "Clock-in time must be before rest-in time"
        })),
        (status = 409, description = "Record for that user and day exists", body = Object, example = json!({
            "message": "Attendance record for user 7d0c2f7e-4a1b-4f0e-9a43-5d6b1f3c2a10 on 2024-04-01 already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<AttendanceCreateDto>,
) -> Result<HttpResponse, ApiError> {
    let record = service.create_attendance(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendances/{id}",
    params(("id" = String, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance found", body = AttendanceResponse),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let record = service.get_attendance(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    put,
    path = "/api/v1/attendances/{id}",
    params(("id" = String, Path, description = "Attendance ID")),
    request_body = AttendanceUpdateDto,
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceResponse),
        (status = 400, description = "Clock times out of order"),
        (status = 404, description = "Attendance not found"),
        (status = 409, description = "Another record exists on the new date")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    payload: web::Json<AttendanceUpdateDto>,
) -> Result<HttpResponse, ApiError> {
    let record = service
        .update_attendance(&path, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attendances/{id}",
    params(("id" = String, Path, description = "Attendance ID")),
    request_body = AttendanceDeleteDto,
    responses(
        (status = 204, description = "Attendance deleted"),
        (status = 404, description = "Attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    payload: web::Json<AttendanceDeleteDto>,
) -> Result<HttpResponse, ApiError> {
    service
        .delete_attendance(&path, &payload.updated_by)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

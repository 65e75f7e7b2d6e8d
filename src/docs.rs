use utoipa::OpenApi;

use crate::application::attendance_dto::{
    AttendanceCreateDto, AttendanceDeleteDto, AttendanceResponse, AttendanceUpdateDto,
};
use crate::application::user_dto::{UserCreateDto, UserResponse, UserUpdateDto};
use crate::domain::{AttendanceStatus, Gender};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Management API

Users and their daily attendance records, stored in MySQL.

### Key Features
- **User Management**
  - Register, update, list and logically delete users
- **Attendance Management**
  - One record per user and work day with clock-in/out and rest times
  - Computed working and rest hours on every response
- **Initialization**
  - Idempotent seeding of the system roles

### Response Format
- JSON bodies; errors are `{"message": "..."}`
- List endpoints accept offset/limit pagination
"#,
    ),
    paths(
        crate::api::health::index,
        crate::api::health::health,

        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        crate::api::attendance::list_attendances,
        crate::api::attendance::create_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::initialize::initialize_roles
    ),
    components(
        schemas(
            Gender,
            AttendanceStatus,
            UserCreateDto,
            UserUpdateDto,
            UserResponse,
            AttendanceCreateDto,
            AttendanceUpdateDto,
            AttendanceDeleteDto,
            AttendanceResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and greeting"),
        (name = "Users", description = "User management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Initialize", description = "One-off data seeding"),
    )
)]
pub struct ApiDoc;

/// The document with the configured project name as its title.
pub fn openapi(project_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = project_name.to_string();
    doc
}

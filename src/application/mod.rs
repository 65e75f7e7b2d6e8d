pub mod attendance_dto;
pub mod attendance_service;
pub mod error;
pub mod password;
pub mod user_dto;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use error::ServiceError;
pub use user_service::UserService;

pub mod attendance;
pub mod error;
pub mod repositories;
pub mod user;
pub mod value_objects;

pub use attendance::{Attendance, AttendanceChanges};
pub use error::DomainError;
pub use repositories::{
    AttendanceFilter, AttendanceOrder, AttendanceRepository, RepositoryError, UserRepository,
};
pub use user::{User, UserChanges};
pub use value_objects::{
    AttendanceId, AttendanceStatus, Email, Gender, RoleId, RoleName, UserId,
};

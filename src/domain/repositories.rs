//! Persistence ports implemented by the infrastructure layer.
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use super::attendance::Attendance;
use super::user::User;
use super::value_objects::{AttendanceId, AttendanceStatus, RoleId, UserId};

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[display(fmt = "database connection failed: {}", _0)]
    Connection(String),
    #[display(fmt = "database query failed: {}", _0)]
    Query(String),
    /// A unique or foreign key constraint rejected the write.
    #[display(fmt = "constraint violation: {}", _0)]
    Constraint(String),
    #[display(fmt = "stored row is invalid: {}", _0)]
    Corrupt(String),
    #[display(fmt = "default user role is missing; seed roles first")]
    MissingDefaultRole,
}

impl std::error::Error for RepositoryError {}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;

    /// Active users only.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Includes logically deleted users; usernames stay unique across both.
    async fn username_taken(&self, username: &str) -> Result<bool, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn default_role_id(&self) -> Result<RoleId, RepositoryError>;

    /// Inserts every system role not present yet and returns how many were added.
    async fn seed_roles(&self) -> Result<u64, RepositoryError>;

    /// Active users ordered by creation time.
    async fn list(
        &self,
        offset: u32,
        limit: u32,
        ascending: bool,
    ) -> Result<Vec<User>, RepositoryError>;

    async fn update(&self, user: &User) -> Result<User, RepositoryError>;

    /// Persists a deactivated user. Returns `false` when no active row matched.
    async fn remove(&self, user: &User) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttendanceOrder {
    #[default]
    WorkDate,
    CreatedAt,
    UpdatedAt,
}

impl AttendanceOrder {
    pub fn column(self) -> &'static str {
        match self {
            Self::WorkDate => "work_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub user_id: Option<UserId>,
    pub status: Option<AttendanceStatus>,
    /// Inclusive on both ends.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: AttendanceOrder,
    pub ascending: bool,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: &AttendanceId) -> Result<Option<Attendance>, RepositoryError>;

    async fn find_by_user_and_date(
        &self,
        user_id: &UserId,
        work_date: NaiveDate,
    ) -> Result<Option<Attendance>, RepositoryError>;

    /// Records that are not logically deleted and match every set filter.
    async fn search(&self, filter: &AttendanceFilter) -> Result<Vec<Attendance>, RepositoryError>;

    /// Inserts or overwrites the record with the same id.
    async fn save(&self, attendance: &Attendance) -> Result<Attendance, RepositoryError>;
}

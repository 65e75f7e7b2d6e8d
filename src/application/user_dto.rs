use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Gender, User, UserChanges};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserCreateDto {
    #[schema(example = "yamada")]
    pub username: String,
    #[schema(example = "yamada@example.com", format = "email")]
    pub email: String,
    #[schema(example = "password123", min_length = 8)]
    pub password: String,
    pub first_name: Option<String>,
    pub first_name_ruby: Option<String>,
    pub last_name: Option<String>,
    pub last_name_ruby: Option<String>,
    pub gender: Gender,
    #[schema(example = "1990-01-01", value_type = String, format = "date")]
    pub birth_day: NaiveDate,
    #[schema(example = "090-1234-5678")]
    pub phone_number: Option<String>,
    #[schema(example = "123-4567")]
    pub zip_code: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserUpdateDto {
    pub first_name: Option<String>,
    pub first_name_ruby: Option<String>,
    pub last_name: Option<String>,
    pub last_name_ruby: Option<String>,
    pub gender: Option<Gender>,
    #[schema(example = "1990-01-01", value_type = Option<String>, format = "date")]
    pub birth_day: Option<NaiveDate>,
    #[schema(example = "090-1234-5678")]
    pub phone_number: Option<String>,
    #[schema(example = "123-4567")]
    pub zip_code: Option<String>,
    pub address: Option<String>,
}

impl From<UserUpdateDto> for UserChanges {
    fn from(dto: UserUpdateDto) -> Self {
        Self {
            first_name: dto.first_name,
            first_name_ruby: dto.first_name_ruby,
            last_name: dto.last_name,
            last_name_ruby: dto.last_name_ruby,
            gender: dto.gender,
            birth_day: dto.birth_day,
            phone_number: dto.phone_number,
            zip_code: dto.zip_code,
            address: dto.address,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Number of users to skip (default 0)
    pub offset: Option<u32>,
    /// Maximum number of users to return (default 100)
    pub limit: Option<u32>,
    /// Sort by creation time ascending (default true)
    pub ascending: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub first_name_ruby: Option<String>,
    pub last_name: Option<String>,
    pub last_name_ruby: Option<String>,
    pub gender: Gender,
    #[schema(value_type = String, format = "date")]
    pub birth_day: NaiveDate,
    pub phone_number: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub role_ids: Vec<Uuid>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub delete_flag: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            username: user.username,
            email: user.email.into(),
            first_name: user.first_name,
            first_name_ruby: user.first_name_ruby,
            last_name: user.last_name,
            last_name_ruby: user.last_name_ruby,
            gender: user.gender,
            birth_day: user.birth_day,
            phone_number: user.phone_number,
            zip_code: user.zip_code,
            address: user.address,
            role_ids: user.role_ids.iter().map(|id| *id.as_uuid()).collect(),
            created_at: user.created_at,
            created_by: user.created_by,
            updated_at: user.updated_at,
            updated_by: user.updated_by,
            delete_flag: user.delete_flag,
        }
    }
}
